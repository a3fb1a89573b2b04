// src/generate/prompt.rs
//! Turns a selection of news items into the provider request: a summary
//! block per item plus the ordered list of source links.

use serde::{Deserialize, Serialize};

use crate::store::NewsItem;
use crate::text::{clean_text, truncate_text};

/// Descriptions are trimmed before prompting; feeds routinely embed whole
/// article bodies there.
const MAX_DESCRIPTION_LEN: usize = 500;

/// Derived deterministically from a selection of news items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationRequest {
    pub news_summary: String,
    pub sources: Vec<String>,
}

/// One three-line block per item (cleaned title, cleaned description,
/// source), blocks separated by a blank line.
pub fn prepare_news_summary(items: &[NewsItem]) -> String {
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        let title = clean_text(&item.title);
        let description = truncate_text(&clean_text(&item.description), MAX_DESCRIPTION_LEN);
        parts.push(format!(
            "Title: {title}\nDescription: {description}\nSource: {}",
            item.source
        ));
    }
    parts.join("\n\n")
}

/// Summary plus all non-empty links, in item order.
pub fn build_request(items: &[NewsItem]) -> GenerationRequest {
    GenerationRequest {
        news_summary: prepare_news_summary(items),
        sources: items
            .iter()
            .filter(|i| !i.link.is_empty())
            .map(|i| i.link.clone())
            .collect(),
    }
}

/// The user-turn prompt sent to the provider.
pub fn render_prompt(request: &GenerationRequest) -> String {
    format!(
        "Write a news article synthesized from the following source items.\n\
         \n\
         News items:\n\
         {news_summary}\n\
         \n\
         Source links:\n\
         {sources}\n\
         \n\
         Respond with a single JSON object and nothing else, using this shape:\n\
         {{\n\
           \"title\": \"headline\",\n\
           \"summary\": \"one-paragraph summary\",\n\
           \"content\": \"full article body\",\n\
           \"category\": \"one of: politics, business, technology, entertainment, sports, general\"\n\
         }}",
        news_summary = request.news_summary,
        sources = request.sources.join("\n"),
    )
}

/// Per-provider system prompt, selected by the active model.
pub fn system_prompt(model: crate::config::ModelKind) -> &'static str {
    use crate::config::ModelKind;
    match model {
        ModelKind::Claude => {
            "You are a professional news writer. You synthesize accurate, neutral \
             news articles from the source items you are given, never inventing \
             facts that the sources do not support. You always answer with a \
             single JSON object and no surrounding prose."
        }
        ModelKind::Gpt4 => {
            "You are a professional news writer producing accurate, neutral \
             articles strictly grounded in the provided source items. Output a \
             single JSON object only, with no markdown or commentary around it."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, desc: &str, source: &str, link: &str) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            link: link.to_string(),
            description: desc.to_string(),
            published: String::new(),
            source: source.to_string(),
            source_name: String::new(),
            category: String::new(),
        }
    }

    #[test]
    fn summary_is_three_lines_per_item() {
        let items = vec![
            item("A <b>bold</b> title", "desc  one", "Yonhap", "https://a"),
            item("Second", "desc two", "Google News", "https://b"),
        ];
        let summary = prepare_news_summary(&items);
        let blocks: Vec<&str> = summary.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0],
            "Title: A bold title\nDescription: desc one\nSource: Yonhap"
        );
    }

    #[test]
    fn request_collects_non_empty_links_in_order() {
        let items = vec![
            item("a", "", "s", "https://one"),
            item("b", "", "s", ""),
            item("c", "", "s", "https://three"),
        ];
        let req = build_request(&items);
        assert_eq!(req.sources, vec!["https://one", "https://three"]);
    }

    #[test]
    fn prompt_embeds_summary_and_sources() {
        let req = build_request(&[item("Headline", "Body", "Yonhap", "https://x")]);
        let prompt = render_prompt(&req);
        assert!(prompt.contains("Title: Headline"));
        assert!(prompt.contains("https://x"));
        assert!(prompt.contains("\"title\""));
    }
}
