//! One moderation run from the command line.

use moderant_core::error::{InputError, ModerantError};
use moderant_core::{InputSource, ModerantConfig, Moderator, RunSummary, create_provider, input};
use std::path::PathBuf;
use tracing::debug;

/// Message shown for any file type other than .txt, .pdf, or .csv.
pub const UNSUPPORTED_FILE_TYPE: &str =
    "Unsupported file type. Please provide a .txt, .pdf, or .csv file.";

/// Apply command-line flags on top of the loaded configuration.
pub fn apply_overrides(config: &mut ModerantConfig, model: Option<String>, output: Option<PathBuf>) {
    if let Some(model) = model {
        config.llm.model = model;
    }
    if let Some(output) = output {
        config.report.output_path = output;
    }
}

/// Build the provider and run the pipeline.
pub async fn moderate(
    config: ModerantConfig,
    source: &InputSource,
) -> Result<RunSummary, ModerantError> {
    // An unsupported file never needs an API key.
    if let InputSource::FilePath(path) = source {
        input::detect_kind(path)?;
    }
    let provider = create_provider(&config.llm)?;
    debug!(
        input = %source.describe(),
        output = %config.report.output_path.display(),
        "Resolved run"
    );
    Moderator::new(config, provider).run(source).await
}

/// Plain message for a failed run.
pub fn user_message(err: &ModerantError) -> String {
    match err {
        ModerantError::Input(InputError::UnsupportedType { .. }) => {
            UNSUPPORTED_FILE_TYPE.to_string()
        }
        other => other.to_string(),
    }
}

/// One-line summary printed after a successful run.
pub fn describe_summary(summary: &RunSummary) -> String {
    let severity = summary
        .max_severity
        .map(|s| format!("{} ({})", s, s.label()))
        .unwrap_or_else(|| "n/a".to_string());
    format!(
        "Report written to {} ({} record{}, highest severity {})",
        summary.output.display(),
        summary.records,
        if summary.records == 1 { "" } else { "s" },
        severity
    )
}
