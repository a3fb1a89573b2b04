// src/generate/provider.rs
//! Provider boundary: both chat-completion APIs reduced to a single
//! capability, `(system prompt, prompt) -> response text`. The provider is
//! chosen once at startup from the resolved model, so no call site branches
//! on a model tag.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, ModelKind};

/// Generation parameters shared by both providers.
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 2000;

/// The upstream call may otherwise hang indefinitely; cap it.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const CLAUDE_MODEL: &str = "claude-3-sonnet-20240229";
const GPT4_MODEL: &str = "gpt-4-turbo-preview";

const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

#[async_trait]
pub trait Provider: Send + Sync {
    /// Issue one chat/completion call and return the raw response text.
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

// Shared handles count as providers too; tests keep one side to inspect
// the call log while the client owns the other.
#[async_trait]
impl<T: Provider + ?Sized> Provider for std::sync::Arc<T> {
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String> {
        (**self).complete(system_prompt, prompt).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Build the provider for the active model, or `None` when its credential
/// is missing.
pub fn build_provider(cfg: &AppConfig) -> Option<Box<dyn Provider>> {
    let key = cfg.active_key()?.to_string();
    match cfg.active_model {
        ModelKind::Claude => Some(Box::new(ClaudeProvider::new(key))),
        ModelKind::Gpt4 => Some(Box::new(OpenAiProvider::new(key))),
    }
}

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("kona-news/0.1")
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("reqwest client")
}

// ---- Claude (messages API) ----

pub struct ClaudeProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl ClaudeProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            http: http_client(),
            api_key,
            model: CLAUDE_MODEL.to_string(),
        }
    }
}

#[async_trait]
impl Provider for ClaudeProvider {
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            max_tokens: u32,
            temperature: f32,
            system: &'a str,
            messages: Vec<Msg<'a>>,
        }
        #[derive(Deserialize)]
        struct Resp {
            content: Vec<Block>,
        }
        #[derive(Deserialize)]
        struct Block {
            text: String,
        }

        let req = Req {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system: system_prompt,
            messages: vec![Msg {
                role: "user",
                content: prompt,
            }],
        };

        let resp = self
            .http
            .post(CLAUDE_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&req)
            .send()
            .await
            .context("claude request failed")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("claude returned {status}"));
        }

        let body: Resp = resp.json().await.context("claude response body")?;
        body.content
            .first()
            .map(|b| b.text.clone())
            .ok_or_else(|| anyhow!("claude response had no content blocks"))
    }

    fn name(&self) -> &'static str {
        "claude"
    }
}

// ---- GPT-4 (chat completions API) ----

pub struct OpenAiProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            http: http_client(),
            api_key,
            model: GPT4_MODEL.to_string(),
        }
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: system_prompt,
                },
                Msg {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let resp = self
            .http
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("gpt4 request failed")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("gpt4 returned {status}"));
        }

        let body: Resp = resp.json().await.context("gpt4 response body")?;
        body.choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| anyhow!("gpt4 response had no choices"))
    }

    fn name(&self) -> &'static str {
        "gpt4"
    }
}

// ---- Test helper ----

/// Scripted provider for tests: pops one canned response per call and logs
/// every prompt it sees.
pub struct MockProvider {
    responses: Mutex<VecDeque<Result<String>>>,
    pub calls: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock calls mutex poisoned").len()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, _system_prompt: &str, prompt: &str) -> Result<String> {
        self.calls
            .lock()
            .expect("mock calls mutex poisoned")
            .push(prompt.to_string());
        self.responses
            .lock()
            .expect("mock responses mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("mock provider exhausted")))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
