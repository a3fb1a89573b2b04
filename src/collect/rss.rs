// src/collect/rss.rs
//! RSS 2.0 → `NewsItem` parsing via quick-xml serde structs.

use anyhow::{Context, Result};
use quick_xml::de::from_str;
use serde::Deserialize;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::{OffsetDateTime, UtcOffset};

use crate::store::NewsItem;

/// Per-feed cap on collected items.
pub const MAX_ITEMS_PER_FEED: usize = 10;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    title: Option<String>,
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

/// Normalize an RFC-2822 `pubDate` to RFC-3339 UTC; a date that does not
/// parse is kept verbatim.
fn normalize_pub_date(ts: &str) -> String {
    OffsetDateTime::parse(ts, &Rfc2822)
        .ok()
        .and_then(|dt| dt.to_offset(UtcOffset::UTC).format(&Rfc3339).ok())
        .unwrap_or_else(|| ts.to_string())
}

/// Parse one feed document into at most [`MAX_ITEMS_PER_FEED`] items. The
/// channel title becomes each item's `source`; items without a title and
/// link are dropped.
pub fn parse_feed(xml: &str) -> Result<Vec<NewsItem>> {
    let xml_clean = scrub_html_entities_for_xml(xml);
    let rss: Rss = from_str(&xml_clean).context("parsing rss xml")?;

    let source = rss.channel.title.unwrap_or_default();
    let mut out = Vec::new();
    for it in rss.channel.item.into_iter().take(MAX_ITEMS_PER_FEED) {
        let title = it.title.unwrap_or_default();
        let link = it.link.unwrap_or_default();
        if title.is_empty() && link.is_empty() {
            continue;
        }
        out.push(NewsItem {
            title,
            link,
            description: it.description.unwrap_or_default(),
            published: it
                .pub_date
                .as_deref()
                .map(normalize_pub_date)
                .unwrap_or_default(),
            source: source.clone(),
            source_name: String::new(),
            category: String::new(),
        });
    }
    Ok(out)
}

/// Feeds routinely carry bare HTML entities that are not valid XML; replace
/// the usual suspects before handing the document to the XML parser.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Yonhap News Agency</title>
    <item>
      <title>First headline</title>
      <link>https://example.test/1</link>
      <description>Some &ldquo;quoted&rdquo; text</description>
      <pubDate>Mon, 03 Aug 2026 09:30:00 +0900</pubDate>
    </item>
    <item>
      <title>Second headline</title>
      <link>https://example.test/2</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_items_with_channel_title_as_source() {
        let items = parse_feed(SAMPLE).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].source, "Yonhap News Agency");
        assert_eq!(items[0].title, "First headline");
        assert_eq!(items[0].link, "https://example.test/1");
    }

    #[test]
    fn pub_date_is_normalized_to_utc() {
        let items = parse_feed(SAMPLE).unwrap();
        assert_eq!(items[0].published, "2026-08-03T00:30:00Z");
        // Missing pubDate stays empty.
        assert_eq!(items[1].published, "");
    }

    #[test]
    fn unparseable_pub_date_is_kept_verbatim() {
        assert_eq!(normalize_pub_date("yesterday-ish"), "yesterday-ish");
    }

    #[test]
    fn caps_items_per_feed() {
        let mut xml = String::from(
            "<rss version=\"2.0\"><channel><title>T</title>",
        );
        for i in 0..25 {
            xml.push_str(&format!(
                "<item><title>t{i}</title><link>https://example.test/{i}</link></item>"
            ));
        }
        xml.push_str("</channel></rss>");
        let items = parse_feed(&xml).unwrap();
        assert_eq!(items.len(), MAX_ITEMS_PER_FEED);
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(parse_feed("<rss><channel>").is_err());
    }
}
