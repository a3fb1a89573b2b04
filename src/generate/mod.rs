// src/generate/mod.rs
//! Article generation: select top stories from the latest dataset, ask the
//! active provider for one article per story, attach the validation
//! placeholder, persist each result.

pub mod client;
pub mod prompt;
pub mod provider;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;

use crate::config::AppConfig;
use crate::generate::client::GenerationClient;
use crate::generate::prompt::build_request;
use crate::generate::validate::attach_validation;
use crate::store::{self, GeneratedArticle, NewsDataset, NewsItem};

/// Flatten the source → category → items mapping in mapping-iteration order
/// and keep the first `limit` items, each annotated with its source name and
/// category. No recency or relevance ranking, just truncation; a ranking
/// function would slot in here.
pub fn select_top_stories(dataset: &NewsDataset, limit: usize) -> Vec<NewsItem> {
    let mut selected = Vec::new();
    'outer: for (source, categories) in &dataset.news {
        for (category, articles) in categories {
            for article in articles {
                if selected.len() >= limit {
                    break 'outer;
                }
                let mut item = article.clone();
                item.source_name = source.clone();
                item.category = category.clone();
                selected.push(item);
            }
        }
    }
    tracing::info!(selected = selected.len(), "selected articles for generation");
    selected
}

/// Drives the per-item generation loop. One linear pass, items succeed or
/// fail independently; only a sink write error aborts the run (it would
/// recur for every remaining item).
pub struct ArticleGenerator {
    cfg: AppConfig,
    client: Option<GenerationClient>,
    news_dir: PathBuf,
    articles_dir: PathBuf,
}

impl ArticleGenerator {
    /// Build from config; the client is absent when the active model has no
    /// credential, which `run` reports as an empty result.
    pub fn from_config(cfg: AppConfig, news_dir: PathBuf, articles_dir: PathBuf) -> Self {
        let client = provider::build_provider(&cfg)
            .map(|p| GenerationClient::new(p, cfg.active_model, cfg.calls_per_minute));
        Self {
            cfg,
            client,
            news_dir,
            articles_dir,
        }
    }

    /// Inject a prebuilt client (tests use a scripted provider here).
    pub fn with_client(
        cfg: AppConfig,
        client: GenerationClient,
        news_dir: PathBuf,
        articles_dir: PathBuf,
    ) -> Self {
        Self {
            cfg,
            client: Some(client),
            news_dir,
            articles_dir,
        }
    }

    /// Generate up to `max_articles` articles from the latest dataset and
    /// return the persisted file paths.
    ///
    /// Missing credential or missing dataset yield an empty result, not an
    /// error; per-item generation failures are skipped; a persistence error
    /// propagates and ends the run.
    pub async fn run(&self, max_articles: usize) -> Result<Vec<PathBuf>> {
        tracing::info!(max_articles, "starting article generation");

        if !self.cfg.has_valid_key() {
            tracing::error!(
                model = self.cfg.active_model.as_str(),
                "no valid API key configured; set CLAUDE_API_KEY or GPT4_API_KEY"
            );
            return Ok(Vec::new());
        }
        let Some(client) = &self.client else {
            tracing::error!("generation client not initialized");
            return Ok(Vec::new());
        };

        let Some(dataset) = store::load_latest_dataset(&self.news_dir)? else {
            tracing::error!("no news dataset found; run `kona collect` first");
            return Ok(Vec::new());
        };

        let stories = select_top_stories(&dataset, max_articles);

        let mut saved = Vec::new();
        for (i, story) in stories.iter().enumerate() {
            tracing::info!(n = i + 1, of = stories.len(), "generating article");

            // One story per request; grouping related stories is a future
            // extension.
            let request = build_request(std::slice::from_ref(story));
            let Some(payload) = client.generate(&request).await else {
                tracing::error!(n = i + 1, link = %story.link, "generation failed, skipping item");
                continue;
            };

            let article = attach_validation(GeneratedArticle {
                title: payload.title,
                content: payload.content,
                extra: payload.extra,
                generated_at: Utc::now(),
                model_used: self.cfg.active_model,
                source_articles: vec![story.clone()],
                validation: None,
            });

            let path = store::save_article(&self.articles_dir, &article)?;
            tracing::info!(path = %path.display(), "article saved");
            saved.push(path);
        }

        tracing::info!(generated = saved.len(), "generation complete");
        Ok(saved)
    }
}
