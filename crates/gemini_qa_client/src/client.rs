//! Answer client: send one question to generateContent, return the text verbatim.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{Config, Credential};
use crate::messages::{ErrorBody, GenerateContentRequest, GenerateContentResponse};
use crate::question::Question;

/// Why a question got no answer. Every variant displays the underlying cause.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AskError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
}

impl AskError {
    /// Classify a non-success HTTP response. `body` is `Err` with the read
    /// failure when the error body could not be read.
    fn from_status(status: reqwest::StatusCode, body: Result<&str, &str>) -> Self {
        let reason = status.canonical_reason().unwrap_or("unknown error");
        let text = body.unwrap_or_default();
        let parsed = ErrorBody::from_json(text).unwrap_or_default();
        let message = match body {
            Err(read_error) => format!("{} (error body unreadable: {})", reason, read_error),
            Ok(_) if !parsed.message.is_empty() => parsed.message,
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => reason.to_string(),
        };

        match (status.as_u16(), parsed.status.as_str()) {
            (401 | 403, _) | (_, "UNAUTHENTICATED" | "PERMISSION_DENIED") => {
                AskError::Unauthorized(message)
            }
            _ if message.contains("API key not valid") => AskError::Unauthorized(message),
            (429, _) | (_, "RESOURCE_EXHAUSTED") => AskError::RateLimited(message),
            (code, _) => AskError::Api {
                status: code,
                message,
            },
        }
    }
}

/// Render an error with its whole source chain; reqwest keeps the useful part
/// (e.g. "connection refused") in the sources.
fn describe(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Client for one model. Cheap to clone; the credential is shared.
#[derive(Debug, Clone)]
pub struct AnswerClient {
    http: reqwest::Client,
    credential: Arc<Credential>,
    endpoint: String,
    model: String,
}

impl AnswerClient {
    pub fn new(credential: Arc<Credential>, settings: &Config) -> Result<Self, AskError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AskError::Transport(describe(&e)))?;

        let endpoint = format!(
            "{}/models/{}:generateContent",
            settings.base_url().trim_end_matches('/'),
            settings.model()
        );
        Ok(Self {
            http,
            credential,
            endpoint,
            model: settings.model().to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `question` as-is and return the model's text. No retry.
    pub async fn ask(&self, question: &Question) -> Result<String, AskError> {
        debug!(model = %self.model, chars = question.as_str().len(), "Gemini API request");
        let result = self.generate(question.as_str()).await;
        match &result {
            Ok(answer) => debug!(chars = answer.len(), "Gemini API response"),
            Err(e) => warn!(error = %e, "question failed"),
        }
        result
    }

    async fn generate(&self, question: &str) -> Result<String, AskError> {
        let body = GenerateContentRequest::new(question);
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", self.credential.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| AskError::Transport(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(|e| describe(&e));
            return Err(AskError::from_status(
                status,
                body.as_deref().map_err(String::as_str),
            ));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AskError::MalformedResponse(describe(&e)))?;
        parsed.into_text().map_err(AskError::MalformedResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn status_classification() {
        let err = AskError::from_status(StatusCode::TOO_MANY_REQUESTS, Ok(""));
        assert_eq!(err, AskError::RateLimited("Too Many Requests".into()));

        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        let err = AskError::from_status(StatusCode::BAD_REQUEST, Ok(body));
        assert!(matches!(err, AskError::Unauthorized(ref m) if m.starts_with("API key not valid")));

        let body = r#"{"error":{"code":403,"message":"denied","status":"PERMISSION_DENIED"}}"#;
        let err = AskError::from_status(StatusCode::FORBIDDEN, Ok(body));
        assert_eq!(err, AskError::Unauthorized("denied".into()));

        let err = AskError::from_status(StatusCode::BAD_GATEWAY, Ok("upstream down"));
        assert_eq!(
            err,
            AskError::Api {
                status: 502,
                message: "upstream down".into()
            }
        );
    }

    #[test]
    fn unreadable_error_body_is_part_of_the_message() {
        let err = AskError::from_status(
            StatusCode::SERVICE_UNAVAILABLE,
            Err("error decoding response body: connection reset"),
        );
        assert_eq!(
            err,
            AskError::Api {
                status: 503,
                message: "Service Unavailable (error body unreadable: \
                          error decoding response body: connection reset)"
                    .into()
            }
        );

        let err = AskError::from_status(StatusCode::TOO_MANY_REQUESTS, Err("timed out"));
        assert!(matches!(err, AskError::RateLimited(ref m) if m.contains("timed out")));
    }

    #[test]
    fn display_contains_cause() {
        let err = AskError::Transport("connection refused".into());
        assert_eq!(err.to_string(), "transport error: connection refused");
        let err = AskError::Api {
            status: 500,
            message: "internal".into(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 500): internal");
    }

    #[test]
    fn endpoint_uses_configured_base_and_model() {
        let mut settings = Config::default();
        settings.api.base_url = Some("http://127.0.0.1:9/v1beta/".into());
        settings.api.model = Some("gemini-test".into());
        let cred = crate::config::load_credential_from(|_| Some("k".into()), None).unwrap();
        let client = AnswerClient::new(Arc::new(cred), &settings).unwrap();
        assert_eq!(
            client.endpoint,
            "http://127.0.0.1:9/v1beta/models/gemini-test:generateContent"
        );
        assert_eq!(client.model(), "gemini-test");
    }
}
