//! Tracing subscriber setup shared by the CLI and the GUI.

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count: warnings only by default, our crates
/// louder with each extra flag.
pub fn filter_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => return "warn".to_string(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("warn,gemini_qa_client={level},gemini_qa_gui_lib={level}")
}

/// Install the stderr subscriber. Safe to call more than once.
pub fn init(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter_directive(verbosity)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
