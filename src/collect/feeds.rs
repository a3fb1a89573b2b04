// src/collect/feeds.rs
//! Feed list configuration. Resolution order:
//! 1) $KONA_FEEDS_PATH
//! 2) config/feeds.toml
//! 3) built-in defaults

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

const ENV_PATH: &str = "KONA_FEEDS_PATH";
const DEFAULT_PATH: &str = "config/feeds.toml";

/// One RSS feed to collect: which source/category bucket it fills and where
/// to fetch it.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FeedSpec {
    pub source: String,
    pub category: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct FeedsFile {
    feeds: Vec<FeedSpec>,
}

pub fn load_feeds_from(path: &Path) -> Result<Vec<FeedSpec>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading feeds config from {}", path.display()))?;
    parse_feeds(&content)
}

pub fn load_feeds_default() -> Result<Vec<FeedSpec>> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_feeds_from(&pb);
        }
        return Err(anyhow!("KONA_FEEDS_PATH points to non-existent path"));
    }
    let default = PathBuf::from(DEFAULT_PATH);
    if default.exists() {
        return load_feeds_from(&default);
    }
    Ok(default_feeds())
}

fn parse_feeds(s: &str) -> Result<Vec<FeedSpec>> {
    let file: FeedsFile = toml::from_str(s).context("parsing feeds toml")?;
    let feeds: Vec<FeedSpec> = file
        .feeds
        .into_iter()
        .filter(|f| !f.url.trim().is_empty())
        .collect();
    if feeds.is_empty() {
        return Err(anyhow!("feeds config contains no usable feeds"));
    }
    Ok(feeds)
}

/// The feed set shipped with the project: Yonhap English news plus the
/// Google News Korea topic feeds.
pub fn default_feeds() -> Vec<FeedSpec> {
    let spec = |source: &str, category: &str, url: &str| FeedSpec {
        source: source.to_string(),
        category: category.to_string(),
        url: url.to_string(),
    };
    vec![
        spec("yonhap", "all_news", "https://en.yna.co.kr/RSS/news.xml"),
        spec(
            "google_news_kr",
            "top_stories",
            "https://news.google.com/rss?hl=ko&gl=KR&ceid=KR:ko",
        ),
        spec(
            "google_news_kr",
            "business",
            "https://news.google.com/rss/topics/CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx6TVdZU0FtdHZHZ0pMVWlnQVAB?hl=ko&gl=KR&ceid=KR:ko",
        ),
        spec(
            "google_news_kr",
            "technology",
            "https://news.google.com/rss/topics/CAAqJggKIiBDQkFTRWdvSUwyMHZNRGRqTVhZU0FtdHZHZ0pMVWlnQVAB?hl=ko&gl=KR&ceid=KR:ko",
        ),
        spec(
            "google_news_kr",
            "entertainment",
            "https://news.google.com/rss/topics/CAAqJggKIiBDQkFTRWdvSUwyMHZNREpxYW5RU0FtdHZHZ0pMVWlnQVAB?hl=ko&gl=KR&ceid=KR:ko",
        ),
        spec(
            "google_news_kr",
            "sports",
            "https://news.google.com/rss/topics/CAAqJggKIiBDQkFTRWdvSUwyMHZNRFp1ZEdvU0FtdHZHZ0pMVWlnQVAB?hl=ko&gl=KR&ceid=KR:ko",
        ),
    ]
}
