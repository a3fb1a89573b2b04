// tests/generate_e2e.rs
// End-to-end generation runs against a scripted provider and a temp sink.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::anyhow;
use chrono::Utc;
use kona_news::config::{AppConfig, ModelKind};
use kona_news::generate::client::GenerationClient;
use kona_news::generate::provider::MockProvider;
use kona_news::generate::ArticleGenerator;
use kona_news::store::{load_articles, save_dataset, DatasetMetadata, NewsDataset, NewsItem};

fn cfg_with_key() -> AppConfig {
    AppConfig {
        claude_api_key: "test-key".to_string(),
        gpt4_api_key: String::new(),
        active_model: ModelKind::Claude,
        debug: false,
        max_articles_per_run: 5,
        calls_per_minute: 10,
    }
}

fn cfg_without_key() -> AppConfig {
    AppConfig {
        claude_api_key: String::new(),
        ..cfg_with_key()
    }
}

fn news_item(n: usize) -> NewsItem {
    NewsItem {
        title: format!("Story {n}"),
        link: format!("https://example.test/{n}"),
        description: format!("Description {n}"),
        published: "2026-08-01T00:00:00Z".to_string(),
        source: "Yonhap News Agency".to_string(),
        source_name: String::new(),
        category: String::new(),
    }
}

fn dataset(items: Vec<NewsItem>) -> NewsDataset {
    let mut categories = BTreeMap::new();
    categories.insert("all_news".to_string(), items);
    let mut news = BTreeMap::new();
    news.insert("yonhap".to_string(), categories);
    let total = news
        .values()
        .flat_map(|c: &BTreeMap<String, Vec<NewsItem>>| c.values())
        .map(Vec::len)
        .sum();
    NewsDataset {
        metadata: DatasetMetadata {
            collected_at: Utc::now(),
            total_articles: total,
        },
        news,
    }
}

fn valid_payload(title: &str) -> String {
    format!(
        "{{\"title\":\"{title}\",\"summary\":\"A summary\",\"content\":\"Body text.\",\"category\":\"general\"}}"
    )
}

struct Run {
    generator: ArticleGenerator,
    mock: Arc<MockProvider>,
    articles_dir: std::path::PathBuf,
    _tmp: tempfile::TempDir,
}

fn setup(cfg: AppConfig, items: Vec<NewsItem>, responses: Vec<anyhow::Result<String>>) -> Run {
    let tmp = tempfile::tempdir().expect("tempdir");
    let news_dir = tmp.path().join("news_data");
    let articles_dir = tmp.path().join("generated_articles");
    save_dataset(&news_dir, &dataset(items)).expect("seed dataset");

    let mock = Arc::new(MockProvider::new(responses));
    let client = GenerationClient::new(Box::new(mock.clone()), cfg.active_model, cfg.calls_per_minute);
    let generator = ArticleGenerator::with_client(cfg, client, news_dir, articles_dir.clone());
    Run {
        generator,
        mock,
        articles_dir,
        _tmp: tmp,
    }
}

#[tokio::test]
async fn generates_one_article_per_selected_item() {
    // 3 items in the dataset, max 2: the client is invoked exactly twice and
    // at most 2 files land in the sink.
    let run = setup(
        cfg_with_key(),
        vec![news_item(1), news_item(2), news_item(3)],
        vec![
            Ok(valid_payload("First generated")),
            // Second response arrives fenced; the client must unwrap it.
            Ok(format!(
                "Here is the article:\n```json\n{}\n```",
                valid_payload("Second generated")
            )),
        ],
    );

    let files = run.generator.run(2).await.expect("run");
    assert_eq!(run.mock.call_count(), 2);
    assert_eq!(files.len(), 2);

    let stored = load_articles(&run.articles_dir).expect("load articles");
    assert_eq!(stored.len(), 2);
    for (_, article) in &stored {
        assert_eq!(article.model_used, ModelKind::Claude);
        assert_eq!(article.source_articles.len(), 1);
        assert_eq!(article.source_articles[0].source_name, "yonhap");
        let validation = article.validation.as_ref().expect("validation attached");
        assert_eq!(validation.accuracy_score, 85);
    }
}

#[tokio::test]
async fn missing_credential_makes_no_provider_calls() {
    let run = setup(
        cfg_without_key(),
        vec![news_item(1)],
        vec![Ok(valid_payload("Never used"))],
    );

    let files = run.generator.run(5).await.expect("run");
    assert!(files.is_empty());
    assert_eq!(run.mock.call_count(), 0);
}

#[tokio::test]
async fn missing_dataset_yields_empty_run() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let mock = Arc::new(MockProvider::new(vec![]));
    let client = GenerationClient::new(Box::new(mock.clone()), ModelKind::Claude, 10);
    let generator = ArticleGenerator::with_client(
        cfg_with_key(),
        client,
        tmp.path().join("missing_news"),
        tmp.path().join("generated_articles"),
    );

    let files = generator.run(5).await.expect("run");
    assert!(files.is_empty());
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn bad_response_skips_item_but_run_continues() {
    // Item 1 yields junk, item 2 yields a valid payload: exactly one
    // article is persisted and the run still succeeds.
    let run = setup(
        cfg_with_key(),
        vec![news_item(1), news_item(2)],
        vec![
            Ok("I could not produce JSON today.".to_string()),
            Ok(valid_payload("Only survivor")),
        ],
    );

    let files = run.generator.run(2).await.expect("run");
    assert_eq!(run.mock.call_count(), 2);
    assert_eq!(files.len(), 1);

    let stored = load_articles(&run.articles_dir).expect("load articles");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].1.title, "Only survivor");
}

#[tokio::test]
async fn provider_error_is_skipped_not_fatal() {
    let run = setup(
        cfg_with_key(),
        vec![news_item(1), news_item(2)],
        vec![
            Err(anyhow!("connection reset by peer")),
            Ok(valid_payload("After the error")),
        ],
    );

    let files = run.generator.run(2).await.expect("run");
    assert_eq!(files.len(), 1);
}
