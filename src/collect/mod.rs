// src/collect/mod.rs
//! News collection: fetch every configured RSS feed, assemble the nested
//! source → category → items dataset, and persist it with run metadata.
//! Uses no AI APIs, so it is free to run as often as wanted.

pub mod feeds;
pub mod rss;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;

use crate::store::{self, DatasetMetadata, NewsDataset, NewsItem};
use self::feeds::FeedSpec;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Fetch all configured feeds into a dataset. A failing feed is logged and
/// contributes an empty item list; it never aborts the run.
pub async fn collect_all(http: &reqwest::Client, feeds: &[FeedSpec]) -> NewsDataset {
    let mut news: BTreeMap<String, BTreeMap<String, Vec<NewsItem>>> = BTreeMap::new();

    for feed in feeds {
        tracing::info!(source = %feed.source, category = %feed.category, "collecting feed");
        let items = match fetch_feed(http, feed).await {
            Ok(items) => {
                tracing::info!(
                    source = %feed.source,
                    category = %feed.category,
                    count = items.len(),
                    "collected feed"
                );
                items
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    source = %feed.source,
                    category = %feed.category,
                    "feed collection failed"
                );
                Vec::new()
            }
        };
        news.entry(feed.source.clone())
            .or_default()
            .insert(feed.category.clone(), items);
    }

    let total_articles = news.values().flat_map(|c| c.values()).map(Vec::len).sum();
    NewsDataset {
        metadata: DatasetMetadata {
            collected_at: Utc::now(),
            total_articles,
        },
        news,
    }
}

async fn fetch_feed(http: &reqwest::Client, feed: &FeedSpec) -> Result<Vec<NewsItem>> {
    let resp = http
        .get(&feed.url)
        .send()
        .await
        .with_context(|| format!("fetching {}", feed.url))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(anyhow!("feed returned {status}"));
    }

    let body = resp.text().await.context("reading feed body")?;
    rss::parse_feed(&body)
}

/// Run one collection pass and persist the dataset under `news_dir`.
pub async fn run(news_dir: &Path) -> Result<PathBuf> {
    let feeds = feeds::load_feeds_default()?;
    tracing::info!(feeds = feeds.len(), "starting news collection");

    let http = reqwest::Client::builder()
        .user_agent("kona-news/0.1")
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("reqwest client");

    let dataset = collect_all(&http, &feeds).await;
    let path = store::save_dataset(news_dir, &dataset)?;

    tracing::info!(
        total = dataset.metadata.total_articles,
        path = %path.display(),
        "collection complete"
    );
    Ok(path)
}
