//! # Moderant Core
//!
//! Core library for the Moderant content moderation pipeline.
//! Provides input loading, the LLM classifier interface (brain), keyword
//! severity scoring, report output, configuration, and fundamental types.

pub mod brain;
pub mod classifier;
pub mod config;
pub mod error;
pub mod input;
pub mod pipeline;
pub mod providers;
pub mod report;
pub mod severity;
pub mod types;

// Re-export commonly used types at the crate root.
pub use brain::{LlmProvider, MockLlmProvider};
pub use classifier::{BIAS_RUBRIC, BiasClassifier};
pub use config::{InputConfig, LlmConfig, ModerantConfig, ReportConfig, load_config};
pub use error::{ConfigError, InputError, LlmError, ModerantError, ReportError, Result};
pub use input::{InputLoader, LopdfExtractor, PageTextExtractor};
pub use pipeline::{Moderator, RunSummary};
pub use providers::{OpenAiCompatibleProvider, create_provider};
pub use report::{Report, ReportFormat, write_report};
pub use severity::Severity;
pub use types::{
    CompletionRequest, CompletionResponse, InputKind, InputSource, Message, Record, Role,
    TokenUsage,
};
