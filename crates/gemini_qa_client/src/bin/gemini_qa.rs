//! gemini-qa: command-line Q&A against Google Gemini.
//! Runs an interactive question loop; a positional QUESTION asks once, prints
//! the answer to stdout and exits.

use clap::Parser;
use gemini_qa_client::{config, logging, AnswerClient, Config, ConfigError, Question, Session};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

const RULE_WIDTH: usize = 50;

/// Ask Google Gemini questions from the terminal
#[derive(Parser, Debug)]
#[command(name = "gemini-qa", version)]
#[command(after_help = r#"Interactive commands:
    /history   show this session's questions and answers
    /clear     clear the session history
    /stats     show how many questions were answered
    quit       leave (also: exit, q)

The API key is read from GEMINI_API_KEY (environment or .env) or from
api.api_key in the settings file."#)]
struct Cli {
    /// Settings file (default: ~/.gemini-qa/config.yaml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// API base URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Model name
    #[arg(long)]
    model: Option<String>,

    /// More log output on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Ask this question once and exit
    question: Option<String>,
}

/// One line typed at the prompt.
enum Input {
    Quit,
    Blank,
    History,
    Clear,
    Stats,
    Ask(Question),
}

fn classify(line: &str) -> Input {
    let text = line.trim();
    if ["quit", "exit", "q"]
        .iter()
        .any(|token| text.eq_ignore_ascii_case(token))
    {
        return Input::Quit;
    }
    match text {
        "/history" => Input::History,
        "/clear" => Input::Clear,
        "/stats" => Input::Stats,
        _ => match Question::new(text) {
            Ok(question) => Input::Ask(question),
            Err(_) => Input::Blank,
        },
    }
}

fn load_settings(cli: &Cli) -> Result<Config, ConfigError> {
    // 1. --config <path> must exist; 2. the default path is optional.
    let mut settings = match &cli.config {
        Some(path) => config::load(path)?,
        None => match config::default_config_path() {
            Some(path) => config::load_or_default(&path)?,
            None => Config::default(),
        },
    };
    if let Some(url) = &cli.base_url {
        settings.api.base_url = Some(url.clone());
    }
    if let Some(model) = &cli.model {
        settings.api.model = Some(model.clone());
    }
    Ok(settings)
}

fn exit_with_config_error(err: &ConfigError) -> ! {
    eprintln!("❌ Configuration Error: {}", err);
    if let Some(steps) = err.guidance() {
        eprintln!("\nPlease follow these steps:");
        eprintln!("{}", steps);
    }
    process::exit(1);
}

const THINKING: &str = "🤔 Thinking...";

/// Spinner on stderr. indicatif draws nothing when stderr is not a terminal;
/// callers print [`THINKING`] themselves in that case.
fn thinking_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(THINKING);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// One-shot mode. Returns the process exit code.
fn ask_once(rt: &tokio::runtime::Runtime, client: &AnswerClient, text: &str) -> i32 {
    let question = match Question::new(text) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 2;
        }
    };

    let pb = thinking_spinner();
    if pb.is_hidden() {
        // stdout carries only the answer in one-shot mode.
        eprintln!("{}", THINKING);
    }
    let result = rt.block_on(client.ask(&question));
    pb.finish_and_clear();

    match result {
        Ok(answer) => {
            println!("{}", answer);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn print_history(session: &Session) {
    if session.is_empty() {
        println!("No questions yet.\n");
        return;
    }
    for (i, exchange) in session.all().iter().enumerate() {
        println!("[{}] You: {}", i + 1, exchange.question());
        println!("    Bot: {}\n", exchange.answer());
    }
}

fn farewell(session: &Session) {
    println!("\n👋 Thank you for using AI Q&A Bot! Goodbye!");
    if !session.is_empty() {
        println!("Questions answered this session: {}", session.size());
    }
}

fn run_interactive(rt: &tokio::runtime::Runtime, client: &AnswerClient) -> io::Result<()> {
    println!("\n💬 Welcome to the AI Q&A Bot!");
    println!("Ask me anything, or type 'quit' to exit.\n");

    let mut session = Session::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("You: ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            farewell(&session);
            return Ok(());
        }

        match classify(&line) {
            Input::Quit => {
                farewell(&session);
                return Ok(());
            }
            Input::Blank => println!("Please enter a question.\n"),
            Input::History => print_history(&session),
            Input::Clear => {
                session.clear();
                println!("Chat history cleared.\n");
            }
            Input::Stats => println!("Total questions: {}\n", session.size()),
            Input::Ask(question) => {
                let pb = thinking_spinner();
                if pb.is_hidden() {
                    println!("\n{}", THINKING);
                }
                let result = rt.block_on(client.ask(&question));
                pb.finish_and_clear();

                match result {
                    Ok(answer) => {
                        println!("\nBot: {}\n", answer);
                        session.append(question.into_string(), answer);
                    }
                    Err(e) => println!("\nBot: Error: {}\n", e),
                }
                println!("{}\n", "-".repeat(RULE_WIDTH));
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let settings = load_settings(&cli).unwrap_or_else(|e| exit_with_config_error(&e));
    let credential =
        config::load_credential(Some(&settings)).unwrap_or_else(|e| exit_with_config_error(&e));

    let client = AnswerClient::new(Arc::new(credential), &settings).unwrap_or_else(|e| {
        eprintln!("Error: failed to create HTTP client: {}", e);
        process::exit(1);
    });

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error: failed to create runtime: {}", e);
            process::exit(1);
        });

    if let Some(text) = cli.question.as_deref() {
        process::exit(ask_once(&rt, &client, text));
    }

    println!("🤖 AI Q&A Bot initialized successfully! (model: {})", client.model());
    println!("{}", "=".repeat(RULE_WIDTH));

    if let Err(e) = run_interactive(&rt, &client) {
        eprintln!("\n\nInterrupted: {}", e);
        process::exit(1);
    }
}
