//! generateContent request and response bodies (Generative Language API, v1beta).

use serde::{Deserialize, Serialize};

/// Client → API: a single user turn holding the question text.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content<'a> {
    pub role: &'static str,
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Part<'a> {
    pub text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    pub fn new(question: &'a str) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: question }],
            }],
        }
    }
}

/// API → client: successful response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate with its parts concatenated.
    /// `Err` explains why the response carries no text.
    pub fn into_text(self) -> Result<String, String> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);
        let Some(first) = self.candidates.into_iter().next() else {
            return Err(match block_reason {
                Some(reason) => format!("prompt was blocked ({})", reason),
                None => "response contained no candidates".into(),
            });
        };

        let text: String = first
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.is_empty() {
            let reason = first.finish_reason.as_deref().unwrap_or("unknown");
            return Err(format!("response contained no text (finish reason: {})", reason));
        }
        Ok(text)
    }
}

/// API → client: error body, `{"error": {"code", "message", "status"}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

impl ErrorBody {
    pub fn from_json(body: &str) -> Option<Self> {
        serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .map(|e| e.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_wraps_question_in_single_user_part() {
        let json = serde_json::to_value(GenerateContentRequest::new("What is 2+2?")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{ "role": "user", "parts": [{ "text": "What is 2+2?" }] }]
            })
        );
    }

    #[test]
    fn parts_of_first_candidate_are_concatenated() {
        let resp: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                { "content": { "parts": [{ "text": "Four" }, { "text": "." }] }, "finishReason": "STOP" },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(resp.into_text().unwrap(), "Four.");
    }

    #[test]
    fn blocked_prompt_reports_reason() {
        let resp: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();
        assert_eq!(resp.into_text().unwrap_err(), "prompt was blocked (SAFETY)");
    }

    #[test]
    fn candidate_without_text_is_an_error() {
        let resp: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }))
        .unwrap();
        let err = resp.into_text().unwrap_err();
        assert!(err.contains("SAFETY"), "got {}", err);
    }

    #[test]
    fn error_body_parses_status_and_message() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = ErrorBody::from_json(body).unwrap();
        assert_eq!(err.code, 429);
        assert_eq!(err.message, "Quota exceeded");
        assert_eq!(err.status, "RESOURCE_EXHAUSTED");
        assert!(ErrorBody::from_json("<html>bad gateway</html>").is_none());
    }
}
