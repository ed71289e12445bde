// Prevents additional console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::process;

fn main() {
    let verbosity = std::env::args()
        .skip(1)
        .filter(|a| a == "-v" || a == "--verbose")
        .count();
    gemini_qa_client::logging::init(verbosity.min(u8::MAX as usize) as u8);

    let state = match gemini_qa_gui_lib::load_state() {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ {}", e);
            if let Some(steps) = e.guidance() {
                eprintln!("\nPlease follow these steps:");
                eprintln!("{}", steps);
            }
            process::exit(1);
        }
    };

    if let Err(e) = gemini_qa_gui_lib::run(state) {
        eprintln!("Error: failed to run the chat window: {}", e);
        process::exit(1);
    }
}
