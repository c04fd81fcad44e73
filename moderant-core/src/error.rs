//! Error types for the Moderant core library.
//!
//! Uses `thiserror` for public API error types with structured error variants
//! covering input loading, LLM classification, report output, and configuration.
//! Every error is fatal to the run that produced it.

use std::path::PathBuf;

/// Top-level error type for the Moderant core library.
#[derive(Debug, thiserror::Error)]
pub enum ModerantError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Classification error: {0}")]
    Classification(#[from] LlmError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from resolving an input source into text records.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("CSV file {path} has no '{column}' column")]
    Schema { path: PathBuf, column: String },

    #[error("Unsupported file type '{extension}' for {path}")]
    UnsupportedType { path: PathBuf, extension: String },
}

/// Errors from LLM provider interactions.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API request failed: {message}")]
    ApiRequest { message: String },

    #[error("API response parse error: {message}")]
    ResponseParse { message: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Provider connection failed: {message}")]
    Connection { message: String },
}

/// Errors from writing the report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to write report {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("Unsupported report format '{extension}' for {path} (use .xlsx or .csv)")]
    UnsupportedFormat { path: PathBuf, extension: String },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::ParseError {
            message: err.to_string(),
        }
    }
}

/// A type alias for results using the top-level `ModerantError`.
pub type Result<T> = std::result::Result<T, ModerantError>;
