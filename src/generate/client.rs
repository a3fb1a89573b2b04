// src/generate/client.rs
//! Rate-limited wrapper around the active provider. Every failure mode
//! (transport error, non-2xx, missing or malformed JSON) is logged and
//! normalized to `None`; the caller treats `None` as "skip this item".
//! No retries: one failure drops the item for the run.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::ModelKind;
use crate::generate::prompt::{render_prompt, system_prompt, GenerationRequest};
use crate::generate::provider::Provider;
use crate::ratelimit::RateLimiter;

/// The shape a provider response must parse into to count as structurally
/// valid. Anything beyond title/content is kept as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticlePayload {
    pub title: String,
    pub content: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Extract the first fenced ```json block if present, else treat the whole
/// text as the payload. An opening fence without a closing fence is an
/// explicit failure, not a best-effort split.
pub fn extract_json_payload(text: &str) -> Result<&str> {
    match text.split_once("```json") {
        Some((_, rest)) => rest
            .split_once("```")
            .map(|(inner, _)| inner.trim())
            .ok_or_else(|| anyhow!("unterminated ```json fence in response")),
        None => Ok(text.trim()),
    }
}

/// Fence-extract and parse a provider response.
pub fn parse_article_payload(text: &str) -> Result<ArticlePayload> {
    let payload = extract_json_payload(text)?;
    serde_json::from_str(payload).context("parsing article payload json")
}

pub struct GenerationClient {
    provider: Box<dyn Provider>,
    limiter: RateLimiter,
    model: ModelKind,
}

impl GenerationClient {
    pub fn new(provider: Box<dyn Provider>, model: ModelKind, calls_per_minute: usize) -> Self {
        Self {
            provider,
            limiter: RateLimiter::new(calls_per_minute),
            model,
        }
    }

    pub fn model(&self) -> ModelKind {
        self.model
    }

    /// One generation attempt for one request. Waits for rate-limiter
    /// admission first; never returns an error, only `Some`/`None`.
    pub async fn generate(&self, request: &GenerationRequest) -> Option<ArticlePayload> {
        self.limiter.acquire().await;

        let prompt = render_prompt(request);
        let text = match self
            .provider
            .complete(system_prompt(self.model), &prompt)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, provider = self.provider.name(), "generation call failed");
                return None;
            }
        };

        match parse_article_payload(&text) {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::warn!(error = %e, provider = self.provider.name(), "unusable generation response");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfenced_text_is_the_payload() {
        assert_eq!(extract_json_payload(" {\"a\":1} ").unwrap(), "{\"a\":1}");
    }

    #[test]
    fn fenced_block_wins_over_surrounding_prose() {
        let text = "Here you go:\n```json\n{\"title\":\"t\",\"content\":\"c\"}\n```\nHope that helps!";
        assert_eq!(
            extract_json_payload(text).unwrap(),
            "{\"title\":\"t\",\"content\":\"c\"}"
        );
    }

    #[test]
    fn unterminated_fence_is_an_error() {
        assert!(extract_json_payload("```json\n{\"title\":\"t\"}").is_err());
    }

    #[test]
    fn payload_requires_title_and_content() {
        assert!(parse_article_payload("{\"title\":\"only\"}").is_err());
        assert!(parse_article_payload("").is_err());
        assert!(parse_article_payload("not json at all").is_err());

        let ok = parse_article_payload(
            "{\"title\":\"t\",\"content\":\"c\",\"summary\":\"s\",\"category\":\"business\"}",
        )
        .unwrap();
        assert_eq!(ok.title, "t");
        assert_eq!(ok.extra.get("summary").and_then(|v| v.as_str()), Some("s"));
    }
}
