//! Shared Gemini Q&A client library (credential, answer client, session).
//! Used by the Tauri GUI and the `gemini-qa` CLI.

pub mod client;
pub mod config;
pub mod logging;
pub mod messages;
pub mod question;
pub mod session;

pub use client::{AnswerClient, AskError};
pub use config::{default_config_path, ApiSection, Config, ConfigError, Credential};
pub use question::{BlankQuestion, Question};
pub use session::{Exchange, Session};
