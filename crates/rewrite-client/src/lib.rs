//! Text rewrite client for the "Magic" input transform.
//!
//! Sends free-form user input to the Gemini `generateContent` endpoint with a
//! fixed instruction template and returns a URL-or-plain-text string suitable
//! for QR encoding. One request in, one response out; any remote failure
//! falls back to the caller's original input.

mod api;
mod prompt;

pub use api::DEFAULT_MODEL;

/// Unified error type for the rewrite-client crate.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("API key is missing. Please ensure it is configured.")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rewrite API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Client for the `generateContent` text-rewrite capability.
pub struct RewriteClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl RewriteClient {
    /// Create a client. Fails fast when no credential is available,
    /// before any network access is attempted.
    pub fn new(api_key: impl Into<String>) -> Result<Self, RewriteError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RewriteError::MissingApiKey);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: api::API_BASE.to_string(),
        })
    }

    /// Override the generation model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the endpoint base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Rewrite `input`, falling back to it unchanged on any failure.
    ///
    /// This never surfaces an error: the result is either an improved string
    /// or the original input.
    pub async fn rewrite(&self, input: &str) -> String {
        match self.try_rewrite(input).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Rewrite failed, keeping original input: {e}");
                input.to_string()
            }
        }
    }

    /// Fallible rewrite: one `generateContent` call, trimmed response text.
    ///
    /// An empty remote answer yields the original input. No retries,
    /// no streaming.
    pub async fn try_rewrite(&self, input: &str) -> Result<String, RewriteError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = api::GenerateContentRequest::for_prompt(prompt::build(input));

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(RewriteError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let parsed: api::GenerateContentResponse = serde_json::from_str(&text)?;
        let answer = parsed.text().map(str::trim).unwrap_or_default();
        if answer.is_empty() {
            return Ok(input.to_string());
        }
        Ok(answer.to_string())
    }
}
