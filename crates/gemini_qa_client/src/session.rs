//! In-memory transcript of question/answer exchanges for one user session.

use serde::{Deserialize, Serialize};

/// One recorded question and its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    question: String,
    answer: String,
}

impl Exchange {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }
}

/// Insertion-ordered list of exchanges. Only successful answers are appended;
/// that is up to the caller.
#[derive(Debug, Clone, Default)]
pub struct Session {
    exchanges: Vec<Exchange>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.exchanges.push(Exchange::new(question, answer));
    }

    pub fn clear(&mut self) {
        self.exchanges.clear();
    }

    pub fn size(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Exchanges in the order they were appended.
    pub fn all(&self) -> &[Exchange] {
        &self.exchanges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_grows_by_one_and_keeps_values() {
        let mut session = Session::new();
        session.append("What is 2+2?", "4");
        assert_eq!(session.size(), 1);
        session.append("And 3+3?", "6");
        assert_eq!(session.size(), 2);
        assert_eq!(session.all()[1], Exchange::new("And 3+3?", "6"));
    }

    #[test]
    fn all_preserves_insertion_order_and_duplicates() {
        let mut session = Session::new();
        for q in ["b", "a", "c", "a"] {
            session.append(q, format!("answer to {}", q));
        }
        let questions: Vec<&str> = session.all().iter().map(|e| e.question()).collect();
        assert_eq!(questions, ["b", "a", "c", "a"]);
        // Reading is not consuming.
        assert_eq!(session.all().len(), 4);
        assert_eq!(session.size(), 4);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut session = Session::new();
        session.append("q", "a");
        session.clear();
        assert_eq!(session.size(), 0);
        assert!(session.is_empty());
        session.clear();
        assert_eq!(session.size(), 0);
        assert!(session.all().is_empty());
    }

    #[test]
    fn exchange_serializes_as_question_answer_object() {
        let json = serde_json::to_value(Exchange::new("q", "a")).unwrap();
        assert_eq!(json, serde_json::json!({ "question": "q", "answer": "a" }));
    }
}
