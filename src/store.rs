// src/store.rs
//! Flat-file JSON sinks: timestamped news datasets written by the collector
//! and one file per generated article. Writes go through a tmp + rename so a
//! crashed run never leaves a half-written file behind.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ModelKind;

/// One news item as collected from a feed. Identity is `link`.
/// `source_name` and `category` are empty until the selector annotates them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub published: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub source_name: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatasetMetadata {
    pub collected_at: DateTime<Utc>,
    pub total_articles: usize,
}

/// Collector output: source → category → items. `BTreeMap` keeps the
/// mapping-iteration order deterministic for the selector's flatten.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsDataset {
    pub metadata: DatasetMetadata,
    pub news: BTreeMap<String, BTreeMap<String, Vec<NewsItem>>>,
}

/// Placeholder validation record. The score and fact list are constants,
/// not the result of checking anything against the source links.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationResult {
    pub accuracy_score: u32,
    pub verified_facts: Vec<String>,
    pub validation_timestamp: DateTime<Utc>,
}

/// A generated article as persisted to disk. Created once per successful
/// generation call and never mutated after validation is attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedArticle {
    pub title: String,
    pub content: String,
    /// Provider-defined fields beyond title/content (summary, category, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
    pub generated_at: DateTime<Utc>,
    pub model_used: ModelKind,
    pub source_articles: Vec<NewsItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
}

// ---- Dataset sink ----

/// Persist a dataset as `news_<YYYYmmdd_HHMMSS>.json` under `dir`.
pub fn save_dataset(dir: &Path, dataset: &NewsDataset) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(format!("news_{}.json", file_stamp()));
    write_json_atomic(&path, dataset)?;
    Ok(path)
}

/// Load the most recent dataset: `news_*.json` files sorted by filename,
/// lexically greatest wins. Returns `Ok(None)` when no usable file exists;
/// an unreadable or malformed candidate is logged and treated as absent.
pub fn load_latest_dataset(dir: &Path) -> Result<Option<NewsDataset>> {
    let mut candidates = list_json_files(dir, "news_")?;
    candidates.sort();
    let Some(latest) = candidates.pop() else {
        return Ok(None);
    };

    tracing::info!(path = %latest.display(), "loading news dataset");
    match fs::read_to_string(&latest) {
        Ok(s) => match serde_json::from_str(&s) {
            Ok(ds) => Ok(Some(ds)),
            Err(e) => {
                tracing::error!(error = %e, path = %latest.display(), "malformed news dataset");
                Ok(None)
            }
        },
        Err(e) => {
            tracing::error!(error = %e, path = %latest.display(), "unreadable news dataset");
            Ok(None)
        }
    }
}

// ---- Article sink ----

/// Keep only `[A-Za-z0-9 _-]` and cap at 50 chars. Idempotent.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .take(50)
        .collect()
}

/// Persist one article as `<sanitized title>_<YYYYmmdd_HHMMSS>.json`.
pub fn save_article(dir: &Path, article: &GeneratedArticle) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(format!(
        "{}_{}.json",
        sanitize_title(&article.title),
        file_stamp()
    ));
    write_json_atomic(&path, article)?;
    Ok(path)
}

/// Load every persisted article under `dir` with its id (the file stem).
/// A file that fails to parse is logged and skipped.
pub fn load_articles(dir: &Path) -> Result<Vec<(String, GeneratedArticle)>> {
    let mut out = Vec::new();
    for path in list_json_files(dir, "")? {
        let Some(id) = path.file_stem().and_then(|s| s.to_str()).map(String::from) else {
            continue;
        };
        match fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|s| serde_json::from_str::<GeneratedArticle>(&s).map_err(Into::into))
        {
            Ok(article) => out.push((id, article)),
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "skipping unreadable article");
            }
        }
    }
    Ok(out)
}

// ---- Helpers ----

fn file_stamp() -> String {
    Utc::now().format("%Y%m%d_%H%M%S").to_string()
}

fn list_json_files(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Ok(out), // missing dir == empty sink
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(prefix) && name.ends_with(".json") {
            out.push(path);
        }
    }
    Ok(out)
}

fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing json")?;
    let tmp = path.with_extension("json.tmp");
    let mut f =
        fs::File::create(&tmp).with_context(|| format!("creating {}", tmp.display()))?;
    f.write_all(json.as_bytes())
        .with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("renaming into {}", path.display()))?;
    Ok(())
}
