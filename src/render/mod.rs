// src/render/mod.rs
//! Static HTML rendering: an index page plus one page per persisted
//! article, written by substitution into embedded templates. Every
//! interpolated value is HTML-escaped; article content is split into
//! paragraphs on blank lines.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::store::{self, GeneratedArticle};
use crate::text::truncate_text;

const PAGE_TEMPLATE: &str = include_str!("templates/page.html");
const STYLE_CSS: &str = include_str!("templates/style.css");

const INDEX_SUMMARY_LEN: usize = 300;

/// Render all persisted articles into `output_dir`. Returns the number of
/// article pages written; an empty sink renders nothing and is not an error.
pub fn render_all(articles_dir: &Path, output_dir: &Path) -> Result<usize> {
    let mut articles = store::load_articles(articles_dir)?;
    if articles.is_empty() {
        tracing::info!("no articles found to render");
        return Ok(0);
    }

    // Newest first on the index.
    articles.sort_by(|a, b| b.1.generated_at.cmp(&a.1.generated_at));
    tracing::info!(count = articles.len(), "rendering articles");

    let pages_dir = output_dir.join("articles");
    let static_dir = output_dir.join("static");
    fs::create_dir_all(&pages_dir)
        .with_context(|| format!("creating {}", pages_dir.display()))?;
    fs::create_dir_all(&static_dir)
        .with_context(|| format!("creating {}", static_dir.display()))?;

    fs::write(static_dir.join("style.css"), STYLE_CSS).context("writing style.css")?;

    let index = page("KONA - Korean Open News by AI", "static/style.css", &index_body(&articles));
    fs::write(output_dir.join("index.html"), index).context("writing index.html")?;

    for (id, article) in &articles {
        let title = format!("{} - KONA", article.title);
        let html = page(&title, "../static/style.css", &article_body(article));
        let path = pages_dir.join(format!("{id}.html"));
        fs::write(&path, html).with_context(|| format!("writing {}", path.display()))?;
    }

    tracing::info!(count = articles.len(), output = %output_dir.display(), "rendering complete");
    Ok(articles.len())
}

fn page(title: &str, style_path: &str, body: &str) -> String {
    PAGE_TEMPLATE
        .replace("{{title}}", &esc(title))
        .replace("{{style_path}}", style_path)
        .replace("{{body}}", body)
}

fn index_body(articles: &[(String, GeneratedArticle)]) -> String {
    let mut out = String::from("<h2>Latest news</h2>\n<div class=\"articles\">\n");
    for (id, article) in articles {
        let summary = article
            .extra
            .get("summary")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| truncate_text(&article.content, INDEX_SUMMARY_LEN));
        out.push_str(&format!(
            "<article>\n<h3><a href=\"articles/{id}.html\">{title}</a></h3>\n\
             <p class=\"meta\">{meta}</p>\n<p>{summary}</p>\n</article>\n",
            id = esc(id),
            title = esc(&article.title),
            meta = esc(&article_meta(article)),
            summary = esc(&summary),
        ));
    }
    out.push_str("</div>\n");
    out
}

fn article_body(article: &GeneratedArticle) -> String {
    let mut out = String::from("<article class=\"full-article\">\n");
    out.push_str(&format!("<h2>{}</h2>\n", esc(&article.title)));
    out.push_str(&format!(
        "<p class=\"meta\">{}</p>\n",
        esc(&article_meta(article))
    ));

    out.push_str("<div class=\"content\">\n");
    for paragraph in article.content.split("\n\n").filter(|p| !p.trim().is_empty()) {
        out.push_str(&format!("<p>{}</p>\n", esc(paragraph.trim())));
    }
    out.push_str("</div>\n");

    let sources: Vec<_> = article
        .source_articles
        .iter()
        .filter(|s| !s.link.is_empty())
        .collect();
    if !sources.is_empty() {
        out.push_str("<div class=\"sources\">\n<h3>Sources</h3>\n<ul>\n");
        for source in sources {
            out.push_str(&format!(
                "<li><a href=\"{link}\" target=\"_blank\">{title}</a></li>\n",
                link = esc(&source.link),
                title = esc(&source.title),
            ));
        }
        out.push_str("</ul>\n</div>\n");
    }

    out.push_str("</article>\n<a href=\"../index.html\">&larr; Back to index</a>\n");
    out
}

fn article_meta(article: &GeneratedArticle) -> String {
    let date = article.generated_at.format("%Y-%m-%d %H:%M UTC").to_string();
    let category = article
        .extra
        .get("category")
        .and_then(|v| v.as_str())
        .unwrap_or("general");
    format!("{date} | {category} | {}", article.model_used.as_str())
}

fn esc(s: &str) -> String {
    html_escape::encode_text(s).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_escapes_title() {
        let html = page("<script>alert(1)</script>", "static/style.css", "body");
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
