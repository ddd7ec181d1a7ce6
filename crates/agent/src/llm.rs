use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use lunchmate_core::config::AdvisorConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Client for the `generateContent` endpoint of the Gemini API.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build gemini http client")?;

        Ok(Self { client, base_url: base_url.into(), model: model.into(), api_key })
    }

    pub fn from_config(config: &AdvisorConfig) -> Result<Self> {
        let api_key =
            config.credential().cloned().ok_or_else(|| anyhow!("advisor api key is not set"))?;
        Self::new(
            config.base_url.clone(),
            config.model.clone(),
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = GenerateContentRequest {
            contents: [RequestContent { parts: [RequestPart { text: prompt }] }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .context("gemini request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("gemini endpoint returned {status}");
        }

        let payload: GenerateContentResponse =
            response.json().await.context("failed to decode gemini response")?;

        let text: String = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            bail!("gemini response contained no text");
        }

        Ok(text)
    }
}
