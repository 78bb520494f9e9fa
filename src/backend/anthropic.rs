//! Anthropic Messages API backend.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{check_status, user_message};
use crate::core::TranslationBackend;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 8192;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    /// Concatenated text blocks.
    fn into_text(self) -> String {
        self.content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect()
    }
}

pub struct AnthropicBackend {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl AnthropicBackend {
    pub fn new(client: Client, base_url: String, api_key: String, model: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
            model,
        }
    }

    fn request<'a>(&'a self, prompt: &'a str, user: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: prompt,
            messages: vec![Message {
                role: "user",
                content: user,
            }],
        }
    }
}

#[async_trait]
impl TranslationBackend for AnthropicBackend {
    #[instrument(skip_all, fields(model = %self.model, targets = targets.len()))]
    async fn translate(&self, prompt: &str, payload: &str, targets: &[String]) -> Result<String> {
        let user = user_message(payload, targets);
        let url = format!("{}/v1/messages", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.request(prompt, &user))
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        let response: MessagesResponse = check_status(response, "Anthropic")
            .await?
            .json()
            .await
            .context("Unexpected Anthropic response body")?;

        let text = response.into_text();
        if text.trim().is_empty() {
            bail!("Anthropic response contained no text");
        }
        debug!(reply_len = text.len(), "received translation reply");
        Ok(text)
    }
}
