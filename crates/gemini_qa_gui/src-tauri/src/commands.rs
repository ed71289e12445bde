//! Tauri commands for the chat window.
//! The Tauri `#[command]` wrappers delegate to testable plain functions that
//! take the window's [`ChatState`] explicitly.

use gemini_qa_client::{AnswerClient, Exchange, Question, Session};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use tauri::State;

// ── Example questions ──────────────────────────────────────────────────

/// A canned question the user can send with one click.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ExampleQuestion {
    pub label: &'static str,
    pub question: &'static str,
}

pub const EXAMPLE_QUESTIONS: [ExampleQuestion; 4] = [
    ExampleQuestion {
        label: "🌍 What is climate change?",
        question: "What is climate change?",
    },
    ExampleQuestion {
        label: "💻 Explain Python",
        question: "Explain Python programming in simple terms",
    },
    ExampleQuestion {
        label: "🚀 Facts about space",
        question: "Tell me interesting facts about space",
    },
    ExampleQuestion {
        label: "🧠 What is AI?",
        question: "What is artificial intelligence?",
    },
];

// ── Window state ────────────────────────────────────────────────────────

/// State managed by Tauri for the chat window: the answer client and the
/// transcript. One request at a time.
pub struct ChatState {
    client: AnswerClient,
    session: Mutex<Session>,
    busy: AtomicBool,
}

impl ChatState {
    pub fn new(client: AnswerClient) -> Self {
        Self {
            client,
            session: Mutex::new(Session::new()),
            busy: AtomicBool::new(false),
        }
    }

    fn session(&self) -> Result<MutexGuard<'_, Session>, String> {
        self.session.lock().map_err(|e| e.to_string())
    }
}

/// Clears the busy flag on drop, so an early return or a dropped future
/// cannot leave the window stuck.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, String> {
        if flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err("Still thinking about the previous question".into());
        }
        Ok(Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// ── Testable backend functions ──────────────────────────────────────────

/// Result of one question returned to the frontend.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatReply {
    pub question: String,
    /// Answer text; empty when `error` is set.
    pub answer: String,
    /// Error text shown in place of the answer.
    pub error: Option<String>,
    /// Transcript size after this question.
    pub total_questions: usize,
}

/// Running statistic shown in the sidebar.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatStats {
    pub total_questions: usize,
}

/// Ask `question`. Blank input is rejected before any request is made.
/// A failed request is reported in `ChatReply::error` and not recorded.
pub async fn do_ask(state: &ChatState, question: &str) -> Result<ChatReply, String> {
    let question = Question::new(question).map_err(|e| e.to_string())?;
    let _busy = BusyGuard::acquire(&state.busy)?;

    let result = state.client.ask(&question).await;

    let mut session = state.session()?;
    let reply = match result {
        Ok(answer) => {
            session.append(question.as_str(), answer.clone());
            ChatReply {
                question: question.into_string(),
                answer,
                error: None,
                total_questions: session.size(),
            }
        }
        Err(e) => ChatReply {
            question: question.into_string(),
            answer: String::new(),
            error: Some(format!("Error: {}", e)),
            total_questions: session.size(),
        },
    };
    Ok(reply)
}

/// Ask the example question at `index` in [`EXAMPLE_QUESTIONS`].
pub async fn do_ask_example(state: &ChatState, index: usize) -> Result<ChatReply, String> {
    let example = EXAMPLE_QUESTIONS
        .get(index)
        .ok_or_else(|| format!("No example question {}", index))?;
    do_ask(state, example.question).await
}

pub fn do_clear(state: &ChatState) -> Result<(), String> {
    state.session()?.clear();
    tracing::debug!("chat history cleared");
    Ok(())
}

/// Transcript in insertion order.
pub fn do_history(state: &ChatState) -> Result<Vec<Exchange>, String> {
    Ok(state.session()?.all().to_vec())
}

pub fn do_stats(state: &ChatState) -> Result<ChatStats, String> {
    Ok(ChatStats {
        total_questions: state.session()?.size(),
    })
}

// ── Tauri command wrappers ──────────────────────────────────────────────

#[tauri::command]
pub async fn ask_question(
    state: State<'_, ChatState>,
    question: String,
) -> Result<ChatReply, String> {
    do_ask(&state, &question).await
}

#[tauri::command]
pub async fn ask_example(state: State<'_, ChatState>, index: usize) -> Result<ChatReply, String> {
    do_ask_example(&state, index).await
}

#[tauri::command]
pub fn clear_history(state: State<'_, ChatState>) -> Result<(), String> {
    do_clear(&state)
}

#[tauri::command]
pub fn history(state: State<'_, ChatState>) -> Result<Vec<Exchange>, String> {
    do_history(&state)
}

#[tauri::command]
pub fn stats(state: State<'_, ChatState>) -> Result<ChatStats, String> {
    do_stats(&state)
}

#[tauri::command]
pub fn example_questions() -> Vec<ExampleQuestion> {
    EXAMPLE_QUESTIONS.to_vec()
}
