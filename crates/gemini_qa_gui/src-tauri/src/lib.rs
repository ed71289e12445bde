//! Tauri application library: startup (settings + credential, loaded once)
//! and the chat window commands.

pub mod commands;

use std::sync::Arc;

use gemini_qa_client::{config, AnswerClient, AskError, Config, ConfigError};

use commands::ChatState;

/// Why the app stopped before opening a window.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to create HTTP client: {0}")]
    Client(#[from] AskError),
}

impl StartupError {
    pub fn guidance(&self) -> Option<&str> {
        match self {
            StartupError::Config(e) => e.guidance(),
            StartupError::Client(_) => None,
        }
    }
}

/// Load settings and the credential and build the window state.
pub fn load_state() -> Result<ChatState, StartupError> {
    let settings = match config::default_config_path() {
        Some(path) => config::load_or_default(&path)?,
        None => Config::default(),
    };
    let credential = config::load_credential(Some(&settings))?;
    let client = AnswerClient::new(Arc::new(credential), &settings)?;
    tracing::info!(model = client.model(), "chat window ready");
    Ok(ChatState::new(client))
}

pub fn run(state: ChatState) -> tauri::Result<()> {
    tauri::Builder::default()
        .manage(state)
        .invoke_handler(tauri::generate_handler![
            commands::ask_question,
            commands::ask_example,
            commands::clear_history,
            commands::history,
            commands::stats,
            commands::example_questions,
        ])
        .run(tauri::generate_context!())
}
