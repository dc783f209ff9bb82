//! Symbol list filtering and sorting logic

use super::App;
use crate::types::*;
use std::collections::HashSet;

impl App {
    pub fn apply_filters(&mut self) {
        self.filtered_indices = filter_and_sort(
            &self.symbols,
            self.search_query.trim(),
            &self.sector_filters,
            self.watch_filter,
            self.sort_column,
            self.sort_direction,
        );
    }
}

/// Filter by sector and watchlist, rank by search relevance, then sort.
/// Case-sensitive matches outrank case-insensitive; code matches outrank name
/// matches. An empty query passes everything through at equal rank.
pub(crate) fn filter_and_sort(
    symbols: &[Equity],
    query: &str,
    sectors: &HashSet<String>,
    watch: WatchFilter,
    sort_column: SortColumn,
    sort_direction: SortDirection,
) -> Vec<usize> {
    let query_lower = query.to_lowercase();

    let mut scored: Vec<(usize, u8)> = symbols
        .iter()
        .enumerate()
        .filter_map(|(i, s)| {
            if !sectors.contains(&s.sector) {
                return None;
            }

            match watch {
                WatchFilter::All => {}
                WatchFilter::Watchlist => {
                    if !s.watchlisted {
                        return None;
                    }
                }
                WatchFilter::Others => {
                    if s.watchlisted {
                        return None;
                    }
                }
            }

            // Search filter with priority scoring
            if query.is_empty() {
                return Some((i, 4));
            }
            if s.code.contains(query) {
                return Some((i, 0));
            }
            if s.name.contains(query) {
                return Some((i, 1));
            }
            if s.code.to_lowercase().contains(&query_lower) {
                return Some((i, 2));
            }
            if s.name.to_lowercase().contains(&query_lower) {
                return Some((i, 3));
            }
            None
        })
        .collect();

    scored.sort_by_key(|(_, priority)| *priority);
    let mut indices: Vec<usize> = scored.into_iter().map(|(i, _)| i).collect();

    // Column sort only applies without a query; search order is relevance
    if query.is_empty() {
        indices.sort_by(|&a, &b| {
            let cmp = match sort_column {
                SortColumn::Code => symbols[a].code.cmp(&symbols[b].code),
                SortColumn::Name => symbols[a]
                    .name
                    .to_lowercase()
                    .cmp(&symbols[b].name.to_lowercase()),
                SortColumn::Sector => symbols[a]
                    .sector
                    .cmp(&symbols[b].sector)
                    .then_with(|| symbols[a].code.cmp(&symbols[b].code)),
            };
            if sort_direction == SortDirection::Descending {
                cmp.reverse()
            } else {
                cmp
            }
        });
    }

    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equity(code: &str, name: &str, sector: &str, watchlisted: bool) -> Equity {
        Equity {
            code: code.to_string(),
            name: name.to_string(),
            sector: sector.to_string(),
            watchlisted,
        }
    }

    fn universe() -> Vec<Equity> {
        vec![
            equity("TCS.NS", "Tata Consultancy Services", "IT", true),
            equity("TATASTEEL.NS", "Tata Steel", "Metals", false),
            equity("INFY.NS", "Infosys", "IT", false),
            equity("SBIN.NS", "State Bank of India", "Banking", true),
        ]
    }

    fn all_sectors() -> HashSet<String> {
        ["IT", "Metals", "Banking"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn run(
        symbols: &[Equity],
        query: &str,
        sectors: &HashSet<String>,
        watch: WatchFilter,
    ) -> Vec<usize> {
        filter_and_sort(
            symbols,
            query,
            sectors,
            watch,
            SortColumn::Code,
            SortDirection::Ascending,
        )
    }

    #[test]
    fn empty_query_shows_all_sorted_by_code() {
        let symbols = universe();
        let indices = run(&symbols, "", &all_sectors(), WatchFilter::All);
        let codes: Vec<&str> = indices.iter().map(|&i| symbols[i].code.as_str()).collect();
        assert_eq!(codes, vec!["INFY.NS", "SBIN.NS", "TATASTEEL.NS", "TCS.NS"]);
    }

    #[test]
    fn code_match_outranks_name_match() {
        let symbols = universe();
        // "TATA" hits TATASTEEL.NS by code and TCS/TATASTEEL by name
        let indices = run(&symbols, "TATA", &all_sectors(), WatchFilter::All);
        assert_eq!(symbols[indices[0]].code, "TATASTEEL.NS");
        assert!(indices.contains(&0));
    }

    #[test]
    fn case_sensitive_outranks_case_insensitive() {
        let symbols = universe();
        let indices = run(&symbols, "tata", &all_sectors(), WatchFilter::All);
        // Lowercase query only matches case-insensitively; code still first
        assert_eq!(symbols[indices[0]].code, "TATASTEEL.NS");

        let exact = run(&symbols, "Tata", &all_sectors(), WatchFilter::All);
        // "Tata" matches both names case-sensitively (rank 1) before the
        // case-insensitive code match (rank 2)
        assert_eq!(symbols[exact[0]].name, "Tata Consultancy Services");
    }

    #[test]
    fn sector_filter_excludes() {
        let symbols = universe();
        let only_it: HashSet<String> = std::iter::once("IT".to_string()).collect();
        let indices = run(&symbols, "", &only_it, WatchFilter::All);
        assert!(indices.iter().all(|&i| symbols[i].sector == "IT"));
        assert_eq!(indices.len(), 2);
    }

    #[test]
    fn watchlist_segments() {
        let symbols = universe();
        let starred = run(&symbols, "", &all_sectors(), WatchFilter::Watchlist);
        assert_eq!(starred.len(), 2);
        assert!(starred.iter().all(|&i| symbols[i].watchlisted));

        let others = run(&symbols, "", &all_sectors(), WatchFilter::Others);
        assert_eq!(others.len(), 2);
        assert!(others.iter().all(|&i| !symbols[i].watchlisted));
    }

    #[test]
    fn filters_can_reduce_to_empty() {
        let symbols = universe();
        let none: HashSet<String> = HashSet::new();
        assert!(run(&symbols, "", &none, WatchFilter::All).is_empty());
        assert!(run(&symbols, "ZZZZ", &all_sectors(), WatchFilter::All).is_empty());
    }

    #[test]
    fn descending_sort_by_name() {
        let symbols = universe();
        let indices = filter_and_sort(
            &symbols,
            "",
            &all_sectors(),
            WatchFilter::All,
            SortColumn::Name,
            SortDirection::Descending,
        );
        assert_eq!(symbols[indices[0]].name, "Tata Steel");
    }
}
