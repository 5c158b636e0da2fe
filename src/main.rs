//! # refbridge - one-shot bridge cycle from the command line
//!
//! Loads configuration, sends a single user message (or a saved runtime request) through
//! the bridge and prints the structured reply as JSON. Useful for checking that a local
//! model and the tool-call heuristics behave before wiring the bridge into an agent.
//!
//! ```bash
//! refbridge "I choose rock"
//! REFBRIDGE_MODEL=llama3 REFBRIDGE_STREAM=true refbridge paper
//! refbridge --request conversation.json
//! refbridge validate
//! ```
//!
//! Authors: Jaro <yarenty@gmail.com>
//!
//! Copyright (c) 2026 SkyCorp
//!

/* --- uses ------------------------------------------------------------------------------------ */

use std::env;
use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use refbridge::config::{Config, paths};
use refbridge::error::{BridgeError, Result};
use refbridge::{Bridge, ConversationTurn, LlmRequest, Part, SystemInstruction, TurnRole};

/* --- constants ------------------------------------------------------------------------------ */

/** the version as defined in cargo.toml */
const VERSION: &str = env!("CARGO_PKG_VERSION");

/** Referee instruction sent with ad-hoc messages */
const REFEREE_INSTRUCTION: &str = "\
You are the referee for Rock-Paper-Scissors-Plus.
Moves are ROCK, PAPER, SCISSORS and BOMB. BOMB beats everything and may be used once.
Do not decide the round yourself. Call the manage_game_state tool with the user's move
and your move, answering with JSON only, for example:
{\"tool_call\": \"manage_game_state\", \"args\": {\"user_move\": \"ROCK\", \"bot_move\": \"PAPER\"}}";

/* --- types ----------------------------------------------------------------------------------- */

/// What the binary was asked to do.
enum Command {
    /// Send one user message
    Message(String),
    /// Replay a runtime request stored as JSON
    Request(String),
}

/* --- start of code -------------------------------------------------------------------------- */

///
/// Main application entry point.
///
/// Errors are printed line by line and the process exits with status 1.
#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let command = handle_cli_args();

    if let Err(e) = run(command).await {
        let error_msg = format!("{}", e);
        eprintln!("Error:");
        for line in error_msg.lines() {
            eprintln!("{}", line);
        }
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<()> {
    let config = Config::load()?;
    initialize_logging(&config);

    let request = match command {
        Command::Message(text) => message_request(text),
        Command::Request(path) => load_request(&path)?,
    };

    info!(
        "refbridge v{} -> {} (model {}, stream {})",
        VERSION, config.endpoint.base_url, config.endpoint.model, config.endpoint.stream
    );

    let bridge = Bridge::from_config(&config.endpoint)?;
    let reply = bridge.generate(&request).await;

    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}

///
/// Handle command line arguments.
///
/// `--version`, `--help` and `validate` exit here; anything else is a message to send.
fn handle_cli_args() -> Command {
    let args: Vec<String> = env::args().skip(1).collect();

    let Some(first) = args.first() else {
        print_help();
        std::process::exit(1);
    };

    match first.as_str() {
        "--version" | "-V" => {
            println!("refbridge {}", VERSION);
            std::process::exit(0);
        }
        "--help" | "-h" => {
            print_help();
            std::process::exit(0);
        }
        "validate" => {
            std::process::exit(run_validate());
        }
        "--request" | "-r" => match args.get(1) {
            Some(path) => Command::Request(path.clone()),
            None => {
                eprintln!("Error: --request needs a path to a JSON request file");
                std::process::exit(1);
            }
        },
        option if option.starts_with('-') => {
            eprintln!("Error: Unknown option: {}", option);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
        _ => Command::Message(args.join(" ")),
    }
}

///
/// Print help information.
fn print_help() {
    println!("refbridge v{}", VERSION);
    println!("Bridge a structured agent conversation to an OpenAI-compatible local model");
    println!();
    println!("USAGE:");
    println!("    refbridge <MESSAGE>...        Send one user message and print the reply");
    println!("    refbridge --request <FILE>    Replay a runtime request stored as JSON");
    println!("    refbridge validate            Validate configuration and exit");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help          Print help information");
    println!("    -V, --version       Print version information");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    REFBRIDGE_CONFIG          Path to an explicit config file");
    println!("    REFBRIDGE_BASE_URL        Endpoint base URL (default: http://localhost:11434/v1)");
    println!("    REFBRIDGE_MODEL           Model identifier (default: gemma:2b)");
    println!("    REFBRIDGE_API_KEY         Bearer credential (default: ollama)");
    println!("    REFBRIDGE_STREAM          Request streamed replies (default: false)");
    println!("    REFBRIDGE_TIMEOUT_SECS    Request timeout in seconds (default: 300)");
    println!("    REFBRIDGE_LOG_LEVEL       trace, debug, info, warn, error (default: info)");
    println!("    RUST_LOG                  Overrides the log level with a full filter");
    println!();
    match paths::user_config_file() {
        Ok(path) => println!("User config file: {}", path.display()),
        Err(_) => println!("User config file: unavailable (no home directory)"),
    }
    println!();
    println!("EXAMPLE CONFIG:");
    print!("{}", Config::example_toml());
}

///
/// Run the validate command.
///
/// # Returns
///  * exit code 0 if the configuration loads and validates, 1 otherwise
fn run_validate() -> i32 {
    match Config::load() {
        Ok(config) => {
            println!("[OK] Configuration is valid");
            println!("  endpoint: {}", config.endpoint.completions_url());
            println!("  model:    {}", config.endpoint.model);
            println!("  stream:   {}", config.endpoint.stream);
            println!("  logging:  {}", config.logging.level.as_str());
            0
        }
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            1
        }
    }
}

///
/// Initialize logging; `RUST_LOG` wins over the configured level.
fn initialize_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            EnvFilter::default().add_directive(config.logging.level.to_tracing_level().into())
        });

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

/// Single user turn under the referee instruction.
fn message_request(text: String) -> LlmRequest {
    LlmRequest {
        system_instruction: Some(SystemInstruction::Text(REFEREE_INSTRUCTION.to_string())),
        contents: vec![ConversationTurn { role: TurnRole::User, parts: vec![Part::Text { text }] }],
    }
}

///
/// Load a runtime request from a JSON file.
fn load_request(path: &str) -> Result<LlmRequest> {
    let path = paths::expand_path(Path::new(path))?;
    let contents = std::fs::read_to_string(&path).map_err(|e| {
        BridgeError::Config(format!("Failed to read request file '{}': {}", path.display(), e))
    })?;
    Ok(serde_json::from_str(&contents)?)
}
