use async_trait::async_trait;
use serde::Deserialize;

use super::{SummarizeError, Summarizer, SummaryRequest};

const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";

/// OpenAI chat completions client.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str, endpoint: Option<&str>) -> Result<Self, SummarizeError> {
        let api_key = api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(SummarizeError::AuthFailure(
                "OpenAI API key is missing; set openai.api_key in the config or OPENAI_API_KEY"
                    .to_string(),
            ));
        }

        let endpoint = endpoint
            .map(|e| e.trim().trim_end_matches('/').to_string())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_OPENAI_ENDPOINT.to_string());

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| SummarizeError::TransportFailure(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key,
            endpoint,
        })
    }

    fn request_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }
}

#[async_trait]
impl Summarizer for OpenAiClient {
    async fn complete(&self, request: &SummaryRequest) -> Result<String, SummarizeError> {
        tracing::debug!(model = %request.model, "sending completion request");

        let response = self
            .http
            .post(self.request_url())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| SummarizeError::TransportFailure(format!("request failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            let detail = response.text().await.unwrap_or_default();
            return Err(SummarizeError::AuthFailure(format!("HTTP {status}: {detail}")));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(SummarizeError::TransportFailure(format!(
                "HTTP {status}: {detail}"
            )));
        }

        let payload: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| SummarizeError::TransportFailure(format!("malformed response: {e}")))?;

        extract_summary(payload)
    }
}

/// Pull the first non-empty completion out of the response, trimmed.
/// A response with zero choices (or only blank ones) is [`SummarizeError::EmptyResponse`],
/// distinct from a transport error.
fn extract_summary(payload: ChatCompletionResponse) -> Result<String, SummarizeError> {
    payload
        .choices
        .into_iter()
        .filter_map(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .find(|content| !content.is_empty())
        .ok_or(SummarizeError::EmptyResponse)
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
