//! Core type definitions for Moderant.
//!
//! Defines the fundamental data structures used throughout the pipeline:
//! chat messages exchanged with the classifier, input descriptors, and
//! the per-record results that end up in the report.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::severity::Severity;

/// Represents a participant role in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create an assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl TokenUsage {
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

/// A request for a chat completion.
///
/// Unset sampling fields fall back to the provider's configured values.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
    pub model: Option<String>,
}

/// The provider's answer to a `CompletionRequest`.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub message: Message,
    pub usage: TokenUsage,
    pub model: String,
    pub finish_reason: Option<String>,
}

/// What the caller wants analysed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Literal text, never interpreted as a path.
    PastedText(String),
    /// A `.txt`, `.pdf`, or `.csv` file on disk.
    FilePath(PathBuf),
}

impl InputSource {
    pub fn pasted(text: impl Into<String>) -> Self {
        InputSource::PastedText(text.into())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        InputSource::FilePath(path.into())
    }

    /// Short label for logs. Never includes pasted content.
    pub fn describe(&self) -> String {
        match self {
            InputSource::PastedText(text) => format!("pasted text ({} chars)", text.chars().count()),
            InputSource::FilePath(path) => path.display().to_string(),
        }
    }
}

/// Supported input file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Pdf,
    Csv,
}

impl InputKind {
    /// Match a file extension, ignoring case and a leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "txt" => Some(InputKind::Text),
            "pdf" => Some(InputKind::Pdf),
            "csv" => Some(InputKind::Csv),
            _ => None,
        }
    }

    /// Resolve the kind of a file from its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Text => write!(f, "txt"),
            InputKind::Pdf => write!(f, "pdf"),
            InputKind::Csv => write!(f, "csv"),
        }
    }
}

/// One analysed unit of text, as it appears in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub content: String,
    pub severity: Severity,
    pub category: String,
    pub explanation: String,
}
