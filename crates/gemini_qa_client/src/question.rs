//! Question text that is safe to send: never empty or whitespace-only.

use std::fmt;

/// A non-blank question. The text is kept exactly as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question(String);

/// Rejected input: empty or whitespace-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Please enter a question.")]
pub struct BlankQuestion;

impl Question {
    pub fn new(text: impl Into<String>) -> Result<Self, BlankQuestion> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(BlankQuestion);
        }
        Ok(Question(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
