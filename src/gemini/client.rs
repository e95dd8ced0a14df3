use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use super::types::{Content, GenerateContentRequest, GenerateContentResponse, Tool};
use super::{ModelError, ModelResult};

/// Stateless "generate next turn" call
///
/// Implementations receive the complete history on every call; nothing is
/// cached between calls.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, history: &[Content], tools: &[Tool]) -> ModelResult<Content>;
}

/// REST client for `models/{model}:generateContent`
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        model: impl Into<String>,
        request_timeout: Duration,
    ) -> ModelResult<Self> {
        let http = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            api_base: api_base.into(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, history: &[Content], tools: &[Tool]) -> ModelResult<Content> {
        let request = GenerateContentRequest {
            contents: history,
            tools,
        };

        debug!(
            "Calling {} with {} history entries",
            self.model,
            history.len()
        );

        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("Model API error: {} - {}", status, body);
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            ModelError::Decode(format!(
                "{}. Response: {}",
                e,
                body.chars().take(500).collect::<String>()
            ))
        })?;

        first_candidate(parsed)
    }
}

fn first_candidate(response: GenerateContentResponse) -> ModelResult<Content> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let feedback = response
            .prompt_feedback
            .map(|f| f.to_string())
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(ModelError::EmptyCandidate(feedback));
    };

    candidate.content.ok_or_else(|| {
        ModelError::EmptyCandidate(
            candidate
                .finish_reason
                .unwrap_or_else(|| "unspecified".to_string()),
        )
    })
}
