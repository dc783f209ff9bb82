//! Headline feed parsing (Google News RSS)

use crate::constants::NEWS_LIMIT;
use crate::types::Headline;
use rss::Channel;

/// Parse an RSS document into at most [`NEWS_LIMIT`] headlines.
///
/// Items missing a title or link are skipped; source and publish time are
/// carried when the feed provides them.
pub fn parse_headlines(xml: &[u8]) -> Result<Vec<Headline>, rss::Error> {
    let channel = Channel::read_from(xml)?;

    let headlines = channel
        .items()
        .iter()
        .filter_map(|item| {
            let title = item.title()?.trim();
            let link = item.link()?.trim();
            if title.is_empty() || link.is_empty() {
                return None;
            }
            Some(Headline {
                title: title.to_string(),
                link: link.to_string(),
                source: item
                    .source()
                    .and_then(|s| s.title())
                    .map(|t| t.to_string()),
                published: item.pub_date().map(|d| d.to_string()),
            })
        })
        .take(NEWS_LIMIT)
        .collect();

    Ok(headlines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_with_items(items: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel>
<title>"finance" - Google News</title>
<link>https://news.google.com</link>
<description>Google News</description>
{}
</channel></rss>"#,
            items
        )
    }

    fn item(title: &str, link: &str) -> String {
        format!(
            "<item><title>{}</title><link>{}</link>\
             <pubDate>Mon, 24 Aug 2026 06:30:00 GMT</pubDate>\
             <source url=\"https://example.com\">Example Times</source></item>",
            title, link
        )
    }

    #[test]
    fn parses_title_link_source_and_date() {
        let xml = feed_with_items(&item("Markets rally", "https://example.com/a"));
        let headlines = parse_headlines(xml.as_bytes()).unwrap();
        assert_eq!(headlines.len(), 1);
        assert_eq!(headlines[0].title, "Markets rally");
        assert_eq!(headlines[0].link, "https://example.com/a");
        assert_eq!(headlines[0].source.as_deref(), Some("Example Times"));
        assert!(headlines[0].published.as_deref().unwrap().contains("2026"));
    }

    #[test]
    fn caps_at_news_limit() {
        let items: String = (0..8)
            .map(|i| item(&format!("Story {}", i), &format!("https://e.com/{}", i)))
            .collect();
        let headlines = parse_headlines(feed_with_items(&items).as_bytes()).unwrap();
        assert_eq!(headlines.len(), NEWS_LIMIT);
        assert_eq!(headlines[0].title, "Story 0");
    }

    #[test]
    fn skips_items_without_title_or_link() {
        let items = format!(
            "<item><title>No link here</title></item>\
             <item><link>https://e.com/orphan</link></item>\
             {}",
            item("Kept", "https://e.com/kept")
        );
        let headlines = parse_headlines(feed_with_items(&items).as_bytes()).unwrap();
        assert_eq!(headlines.len(), 1);
        assert_eq!(headlines[0].title, "Kept");
    }

    #[test]
    fn fewer_than_limit_is_fine() {
        let headlines = parse_headlines(feed_with_items("").as_bytes()).unwrap();
        assert!(headlines.is_empty());
    }

    #[test]
    fn invalid_xml_is_an_error() {
        assert!(parse_headlines(b"this is not xml").is_err());
    }
}
