//! Moderant CLI: screen text for bias with an LLM classifier.
//!
//! Runs one moderation pass per invocation, from flags or from the
//! interactive paste/file prompt, and writes a spreadsheet report.

mod commands;
mod prompt;
mod run;

use clap::Parser;
use moderant_core::InputSource;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Moderant: screen text, PDFs, and CSV files for biased or unethical language
#[derive(Parser, Debug)]
#[command(name = "moderant", version, about, long_about = None)]
struct Cli {
    /// Text to analyse (skips the interactive prompt)
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// File to analyse: .txt, .pdf, or .csv (skips the interactive prompt)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Report path; the extension selects .xlsx or .csv output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// LLM model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Workspace directory
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Print the keyword severity rules
    Rules,
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Create a default configuration file
    Init,
    /// Show current configuration
    Show,
}

impl Cli {
    /// The input named on the command line, if any.
    fn input_source(&self) -> Option<InputSource> {
        if let Some(text) = &self.text {
            Some(InputSource::pasted(text.clone()))
        } else {
            self.file.as_ref().map(InputSource::file)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let mut cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    // Human-readable layer for stderr (always active)
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    // JSON file layer for structured logging
    let log_dir = directories::ProjectDirs::from("dev", "moderant", "moderant")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "moderant.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    // Resolve workspace
    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    // Handle subcommands
    if let Some(command) = cli.command.take() {
        commands::handle_command(command, &workspace).await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Load configuration
    let mut config = moderant_core::config::load_config(Some(&workspace))
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    run::apply_overrides(&mut config, cli.model.clone(), cli.output.clone());

    let source = match cli.input_source() {
        Some(source) => source,
        None => match prompt::ask_source()? {
            Some(source) => source,
            None => {
                println!("{}", prompt::INVALID_CHOICE);
                return Ok(ExitCode::SUCCESS);
            }
        },
    };

    match run::moderate(config, &source).await {
        Ok(summary) => {
            if !cli.quiet {
                println!("{}", run::describe_summary(&summary));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", run::user_message(&err));
            Ok(ExitCode::FAILURE)
        }
    }
}
