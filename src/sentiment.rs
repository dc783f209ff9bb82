//! Lexicon sentiment scoring for company business summaries

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Words that flip and dampen the polarity of the word that follows
const NEGATORS: [&str; 4] = ["not", "no", "never", "without"];

/// Multiplier applied to a matched word preceded by a negator
const NEGATION_FACTOR: f64 = -0.5;

/// Polarity lexicon, values in [-1, 1], keyed on lowercase tokens
static LEXICON: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    let entries: &[(&str, f64)] = &[
        // Positive
        ("leading", 0.5),
        ("leader", 0.5),
        ("largest", 0.4),
        ("diversified", 0.3),
        ("growth", 0.6),
        ("growing", 0.5),
        ("strong", 0.6),
        ("strength", 0.5),
        ("profit", 0.6),
        ("profitable", 0.7),
        ("profitability", 0.6),
        ("innovative", 0.6),
        ("innovation", 0.5),
        ("premium", 0.4),
        ("quality", 0.4),
        ("trusted", 0.6),
        ("trust", 0.4),
        ("robust", 0.5),
        ("resilient", 0.5),
        ("efficient", 0.5),
        ("efficiency", 0.4),
        ("success", 0.7),
        ("successful", 0.7),
        ("expanding", 0.4),
        ("expansion", 0.3),
        ("award", 0.5),
        ("renowned", 0.5),
        ("pioneer", 0.5),
        ("pioneering", 0.5),
        ("advanced", 0.4),
        ("modern", 0.3),
        ("sustainable", 0.4),
        ("sustainability", 0.3),
        ("reliable", 0.6),
        ("excellence", 0.7),
        ("excellent", 0.8),
        ("best", 0.8),
        ("better", 0.4),
        ("improved", 0.4),
        ("improving", 0.4),
        ("opportunity", 0.4),
        ("opportunities", 0.4),
        ("gain", 0.4),
        ("gains", 0.4),
        ("benefit", 0.4),
        ("benefits", 0.4),
        ("value", 0.3),
        ("valuable", 0.5),
        ("dominant", 0.4),
        ("flagship", 0.3),
        ("established", 0.3),
        ("prominent", 0.4),
        ("superior", 0.6),
        ("integrated", 0.2),
        ("comprehensive", 0.3),
        ("extensive", 0.3),
        ("dynamic", 0.3),
        ("favorable", 0.5),
        ("healthy", 0.5),
        ("momentum", 0.3),
        ("outperform", 0.6),
        ("record", 0.3),
        ("recognized", 0.4),
        ("stable", 0.4),
        ("stability", 0.4),
        ("upgrade", 0.4),
        ("wins", 0.5),
        ("won", 0.4),
        // Negative
        ("loss", -0.6),
        ("losses", -0.6),
        ("decline", -0.5),
        ("declining", -0.5),
        ("weak", -0.6),
        ("weakness", -0.5),
        ("risk", -0.4),
        ("risks", -0.4),
        ("risky", -0.6),
        ("debt", -0.3),
        ("default", -0.7),
        ("litigation", -0.5),
        ("lawsuit", -0.5),
        ("penalty", -0.5),
        ("fine", -0.3),
        ("fraud", -0.9),
        ("scandal", -0.8),
        ("bankruptcy", -0.9),
        ("insolvency", -0.8),
        ("downturn", -0.6),
        ("slowdown", -0.5),
        ("recession", -0.7),
        ("volatile", -0.4),
        ("volatility", -0.4),
        ("uncertain", -0.5),
        ("uncertainty", -0.5),
        ("adverse", -0.6),
        ("negative", -0.6),
        ("poor", -0.7),
        ("fail", -0.7),
        ("failed", -0.7),
        ("failure", -0.7),
        ("concern", -0.4),
        ("concerns", -0.4),
        ("problem", -0.5),
        ("problems", -0.5),
        ("struggling", -0.6),
        ("struggle", -0.5),
        ("crisis", -0.8),
        ("downgrade", -0.5),
        ("impairment", -0.5),
        ("writedown", -0.5),
        ("layoff", -0.6),
        ("layoffs", -0.6),
        ("shortage", -0.4),
        ("disruption", -0.4),
        ("deficit", -0.5),
        ("underperform", -0.6),
        ("challenged", -0.4),
        ("challenging", -0.3),
        ("costly", -0.4),
        ("expensive", -0.3),
        ("delayed", -0.4),
        ("delay", -0.3),
        ("warning", -0.5),
        ("halt", -0.5),
        ("suspended", -0.6),
    ];
    entries.iter().copied().collect()
});

/// Sentiment verdict shown in the Analysis view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Positive,
    Negative,
    Neutral,
}

impl Verdict {
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > 0.0 {
            Verdict::Positive
        } else if polarity < 0.0 {
            Verdict::Negative
        } else {
            Verdict::Neutral
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            Verdict::Positive => "Positive sentiment detected",
            Verdict::Negative => "Negative sentiment detected",
            Verdict::Neutral => "Neutral sentiment detected",
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            Verdict::Positive => "Consider investing in this stock.",
            Verdict::Negative => "Exercise caution before investing in this stock.",
            Verdict::Neutral => "No strong sentiment detected. Further analysis may be needed.",
        }
    }
}

/// Average polarity of lexicon words present in the text, clamped to [-1, 1].
///
/// Tokens are lowercased with punctuation stripped. A negator directly before
/// a matched word flips and dampens it. Text with no lexicon matches scores 0.
pub fn polarity(text: &str) -> f64 {
    let tokens = tokenize(text);
    let mut sum = 0.0;
    let mut matched = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        if let Some(&score) = LEXICON.get(token.as_str()) {
            let negated = i > 0 && NEGATORS.contains(&tokens[i - 1].as_str());
            sum += if negated { score * NEGATION_FACTOR } else { score };
            matched += 1;
        }
    }

    if matched == 0 {
        return 0.0;
    }
    (sum / matched as f64).clamp(-1.0, 1.0)
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_unmatched_text_is_neutral() {
        assert_eq!(polarity(""), 0.0);
        assert_eq!(polarity("the company makes widgets in three factories"), 0.0);
    }

    #[test]
    fn positive_summary_scores_positive() {
        let p = polarity("A leading and profitable company with strong growth.");
        assert!(p > 0.0, "expected positive, got {}", p);
    }

    #[test]
    fn negative_summary_scores_negative() {
        let p = polarity("The company reported losses amid litigation and a declining market.");
        assert!(p < 0.0, "expected negative, got {}", p);
    }

    #[test]
    fn polarity_is_an_average_not_a_sum() {
        // One word at 0.6 averages to 0.6 regardless of filler
        let single = polarity("growth");
        let padded = polarity("growth in the market across the country");
        assert!((single - padded).abs() < 1e-12);
        assert!((single - 0.6).abs() < 1e-12);
    }

    #[test]
    fn negation_flips_and_dampens() {
        let plain = polarity("profitable");
        let negated = polarity("not profitable");
        assert!((negated - plain * NEGATION_FACTOR).abs() < 1e-12);
    }

    #[test]
    fn punctuation_and_case_are_ignored() {
        let a = polarity("STRONG, profitable!");
        let b = polarity("strong profitable");
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn deterministic_for_same_input() {
        let text = "A trusted leader facing headwinds, litigation risk, and weak demand.";
        assert_eq!(polarity(text).to_bits(), polarity(text).to_bits());
    }

    #[test]
    fn result_is_clamped() {
        let p = polarity("fraud scandal bankruptcy crisis");
        assert!((-1.0..=1.0).contains(&p));
    }

    #[test]
    fn verdict_mapping() {
        assert_eq!(Verdict::from_polarity(0.2), Verdict::Positive);
        assert_eq!(Verdict::from_polarity(-0.2), Verdict::Negative);
        assert_eq!(Verdict::from_polarity(0.0), Verdict::Neutral);
    }
}
