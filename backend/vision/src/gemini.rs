//! Streaming client for the Generative Language API.

use async_trait::async_trait;
use media::DataUri;
use tracing::debug;

use crate::prompt::build_grading_contents;
use crate::sse::decode_stream;
use crate::types::GenerateContentRequest;
use crate::{TextStream, VisionError, VisionModel};

/// Client for `models/{model}:streamGenerateContent`.
///
/// Holds only connection-level state; every grade call is independent and
/// nothing is retried. The API key travels as a query parameter, which is
/// why request URLs must pass through redaction before logging.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: model.into(),
        }
    }

    /// Override the API base URL (self-hosted proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }
}

#[async_trait]
impl VisionModel for GeminiClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn stream_grade(&self, image: DataUri) -> Result<TextStream, VisionError> {
        let body = GenerateContentRequest {
            contents: build_grading_contents(&image),
        };

        debug!(model = %self.model, mime = %image.mime_type, "Opening model stream");

        let response = self
            .client
            .post(self.stream_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| VisionError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(VisionError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(decode_stream(response.bytes_stream()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_url_targets_the_sse_endpoint() {
        let client = GeminiClient::new("test-key", "gemini-2.0-flash");
        let url = client.stream_url();
        assert_eq!(
            url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:streamGenerateContent?alt=sse&key=test-key"
        );
    }

    #[test]
    fn base_url_override_tolerates_a_trailing_slash() {
        let client =
            GeminiClient::new("k", "gemini-2.0-flash").with_base_url("http://localhost:1234/");
        assert!(client
            .stream_url()
            .starts_with("http://localhost:1234/models/gemini-2.0-flash:"));
    }

    #[test]
    fn model_id_reports_the_configured_model() {
        let client = GeminiClient::new("k", "gemini-2.0-flash");
        assert_eq!(client.model_id(), "gemini-2.0-flash");
    }
}
