// src/config.rs
use std::env;

use serde::{Deserialize, Serialize};

/// Default ceiling for outbound API calls per rolling minute.
pub const DEFAULT_CALLS_PER_MINUTE: usize = 10;

/// Default number of articles generated per run.
pub const DEFAULT_MAX_ARTICLES: usize = 5;

/// The LLM provider selected for generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Claude,
    Gpt4,
}

impl ModelKind {
    /// Parse the `AI_MODEL` value. `gpt-4.1-nano` is an accepted alias for
    /// the GPT-4 provider; anything unrecognized falls back to Claude.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "gpt4" | "gpt-4.1-nano" => ModelKind::Gpt4,
            _ => ModelKind::Claude,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Claude => "claude",
            ModelKind::Gpt4 => "gpt4",
        }
    }
}

/// Environment-driven configuration: credentials, active model, run limits.
///
/// Keys are never validated against the provider here; a bad key surfaces
/// only when the generation client actually calls the API.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub claude_api_key: String,
    pub gpt4_api_key: String,
    pub active_model: ModelKind,
    pub debug: bool,
    pub max_articles_per_run: usize,
    pub calls_per_minute: usize,
}

impl AppConfig {
    /// Read configuration from the environment. Missing variables resolve to
    /// empty credentials / defaults rather than errors.
    pub fn from_env() -> Self {
        let claude_api_key = env::var("CLAUDE_API_KEY").unwrap_or_default();
        let gpt4_api_key = env::var("GPT4_API_KEY").unwrap_or_default();
        let active_model = ModelKind::parse(&env::var("AI_MODEL").unwrap_or_default());
        let debug = env::var("DEBUG")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let max_articles_per_run = env::var("MAX_ARTICLES_PER_RUN")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_ARTICLES);

        Self {
            claude_api_key,
            gpt4_api_key,
            active_model,
            debug,
            max_articles_per_run,
            calls_per_minute: DEFAULT_CALLS_PER_MINUTE,
        }
    }

    /// The credential for the active model, or `None` when it is empty.
    pub fn active_key(&self) -> Option<&str> {
        let key = match self.active_model {
            ModelKind::Claude => self.claude_api_key.as_str(),
            ModelKind::Gpt4 => self.gpt4_api_key.as_str(),
        };
        if key.trim().is_empty() {
            None
        } else {
            Some(key)
        }
    }

    pub fn has_valid_key(&self) -> bool {
        self.active_key().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_parse_defaults_to_claude() {
        assert_eq!(ModelKind::parse(""), ModelKind::Claude);
        assert_eq!(ModelKind::parse("claude"), ModelKind::Claude);
        assert_eq!(ModelKind::parse("Claude"), ModelKind::Claude);
        assert_eq!(ModelKind::parse("something-else"), ModelKind::Claude);
    }

    #[test]
    fn model_parse_gpt4_and_alias() {
        assert_eq!(ModelKind::parse("gpt4"), ModelKind::Gpt4);
        assert_eq!(ModelKind::parse("GPT4"), ModelKind::Gpt4);
        assert_eq!(ModelKind::parse("gpt-4.1-nano"), ModelKind::Gpt4);
    }

    #[test]
    fn empty_key_is_not_valid() {
        let cfg = AppConfig {
            claude_api_key: "   ".to_string(),
            gpt4_api_key: String::new(),
            active_model: ModelKind::Claude,
            debug: false,
            max_articles_per_run: 5,
            calls_per_minute: 10,
        };
        assert!(!cfg.has_valid_key());
    }

    #[test]
    fn key_follows_active_model() {
        let cfg = AppConfig {
            claude_api_key: String::new(),
            gpt4_api_key: "sk-test".to_string(),
            active_model: ModelKind::Gpt4,
            debug: false,
            max_articles_per_run: 5,
            calls_per_minute: 10,
        };
        assert_eq!(cfg.active_key(), Some("sk-test"));

        let cfg = AppConfig {
            active_model: ModelKind::Claude,
            ..cfg
        };
        assert!(cfg.active_key().is_none());
    }
}
