//! KONA pipeline binary entrypoint.
//! Three subcommands mirror the pipeline stages: `collect` pulls RSS feeds
//! into a timestamped dataset, `generate` turns top stories into AI-written
//! articles, `render` produces the static HTML site.

use std::path::Path;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kona_news::collect;
use kona_news::config::AppConfig;
use kona_news::generate::ArticleGenerator;
use kona_news::render;

const NEWS_DATA_DIR: &str = "news_data";
const ARTICLES_DIR: &str = "generated_articles";
const OUTPUT_DIR: &str = "output";

#[derive(Parser)]
#[command(name = "kona", about = "KONA: AI-generated news pipeline", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Collect news from the configured RSS feeds (no AI usage).
    Collect,
    /// Generate articles from the most recent news dataset.
    Generate {
        /// Override MAX_ARTICLES_PER_RUN for this run.
        #[arg(long)]
        max_articles: Option<usize>,
    },
    /// Render generated articles into static HTML.
    Render,
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let cfg = AppConfig::from_env();
    init_tracing(cfg.debug);

    match cli.command {
        Command::Collect => {
            let path = collect::run(Path::new(NEWS_DATA_DIR)).await?;
            println!("News data saved to: {}", path.display());
        }
        Command::Generate { max_articles } => {
            let max = max_articles.unwrap_or(cfg.max_articles_per_run);
            let generator = ArticleGenerator::from_config(
                cfg,
                Path::new(NEWS_DATA_DIR).to_path_buf(),
                Path::new(ARTICLES_DIR).to_path_buf(),
            );
            let files = generator.run(max).await?;
            if files.is_empty() {
                println!("No articles were generated. Check the logs for errors.");
            } else {
                println!("Successfully generated {} articles:", files.len());
                for file in &files {
                    println!("  - {}", file.display());
                }
            }
        }
        Command::Render => {
            let count = render::render_all(Path::new(ARTICLES_DIR), Path::new(OUTPUT_DIR))?;
            if count == 0 {
                println!("No articles found to render.");
            } else {
                println!("Rendered {count} articles to {OUTPUT_DIR}/");
            }
        }
    }

    Ok(())
}
