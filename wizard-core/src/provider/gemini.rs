use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    model::DailySummary,
    prompt::outfit_prompt,
};

use super::{SuggestionProvider, read_success_body};

/// Returned when the response carries no candidate text.
pub const NO_SUGGESTION: &str = "No fashion suggestions available.";

/// Client for Gemini `generateContent`.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    model: String,
    http: Client,
}

impl GeminiProvider {
    pub fn with_endpoint(api_key: String, base_url: &str, model: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            http: Client::new(),
        }
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    async fn generate(&self, prompt: &str) -> Result<GenerateResponse> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        tracing::debug!(url = %self.url(), prompt_len = prompt.len(), "requesting suggestion");

        let res = self
            .http
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Failed to send request to Gemini: {e}")))?;

        let body = read_success_body(res, "Gemini").await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[async_trait]
impl SuggestionProvider for GeminiProvider {
    async fn suggest(&self, summary: &DailySummary) -> Result<String> {
        let response = self.generate(&outfit_prompt(summary)).await?;

        Ok(response.first_text().unwrap_or_else(|| {
            tracing::info!("suggestion response had no candidate text");
            NO_SUGGESTION.to_string()
        }))
    }
}
