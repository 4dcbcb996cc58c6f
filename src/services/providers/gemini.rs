/// Google Gemini text generation provider
///
/// Uses the REST `generateContent` endpoint with a single user turn and
/// returns whatever text the first candidate produced.
use crate::{
    error::{AppError, AppResult},
    services::providers::TextGenerator,
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Clone)]
pub struct GeminiProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: Option<String>, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
        }
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Joins the text parts of the first candidate
    fn extract_text(response: GenerateResponse) -> AppResult<String> {
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AppError::UpstreamError(
                "Gemini returned no text".to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait::async_trait]
impl TextGenerator for GeminiProvider {
    fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let api_key = self.api_key().ok_or_else(|| {
            AppError::CredentialsMissing("Gemini API key not configured".to_string())
        })?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, self.model
        );
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamError(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let generated: GenerateResponse = response.json().await?;
        let text = Self::extract_text(generated)?;

        tracing::info!(
            model = %self.model,
            chars = text.len(),
            provider = "gemini",
            "Generation completed"
        );

        Ok(text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
