//! HTTP translation backends.
//!
//! Both adapters send the instruction as the system prompt and the JSON
//! payload as the user message, and return the model's text verbatim.

mod anthropic;
mod openai;

use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub use anthropic::AnthropicBackend;
pub use openai::OpenAiBackend;

use crate::core::TranslationBackend;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    #[value(name = "openai")]
    OpenAi,
    Anthropic,
}

impl Provider {
    pub fn api_key_env(self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o-mini",
            Provider::Anthropic => "claude-3-5-haiku-latest",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Anthropic => "https://api.anthropic.com",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    pub provider: Provider,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key: String,
}

impl BackendSettings {
    /// Settings with the API key taken from the provider's environment variable.
    pub fn from_env(provider: Provider, model: Option<String>, base_url: Option<String>) -> Result<Self> {
        let var = provider.api_key_env();
        let api_key = match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => bail!("{} is not set.", var),
        };
        Ok(Self {
            provider,
            model,
            base_url,
            api_key,
        })
    }

    fn model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }

    fn base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(self.provider.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }
}

pub fn create_backend(settings: &BackendSettings) -> Result<Box<dyn TranslationBackend>> {
    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    Ok(match settings.provider {
        Provider::OpenAi => Box::new(OpenAiBackend::new(
            client,
            settings.base_url(),
            settings.api_key.clone(),
            settings.model(),
        )),
        Provider::Anthropic => Box::new(AnthropicBackend::new(
            client,
            settings.base_url(),
            settings.api_key.clone(),
            settings.model(),
        )),
    })
}

/// User message: target list followed by the payload.
fn user_message(payload: &str, targets: &[String]) -> String {
    format!("Target locales: {}\n\n{}", targets.join(", "), payload)
}

/// Turn a non-success response into an error with status and body.
async fn check_status(response: reqwest::Response, provider: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    bail!("{} request failed with HTTP {}: {}", provider, status, body.trim());
}
