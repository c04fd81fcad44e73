//! The moderation pipeline.
//!
//! `Moderator` ties the stages together: load the input, classify and score
//! each record in order, then write the report. Any failure aborts the run
//! before the report is written, so a failed run never leaves a partial file.

use crate::brain::LlmProvider;
use crate::classifier::BiasClassifier;
use crate::config::ModerantConfig;
use crate::error::Result;
use crate::input::{InputLoader, PageTextExtractor};
use crate::report::{Report, ReportFormat, write_report};
use crate::severity::{self, Severity};
use crate::types::{InputSource, Record};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Where the report was written.
    pub output: PathBuf,
    /// Number of data rows in the report.
    pub records: usize,
    /// Highest severity among the records; `None` for an empty CSV.
    pub max_severity: Option<Severity>,
}

/// Runs one input through load, classify, score and report.
pub struct Moderator {
    config: ModerantConfig,
    loader: InputLoader,
    classifier: BiasClassifier,
}

impl Moderator {
    pub fn new(config: ModerantConfig, provider: Arc<dyn LlmProvider>) -> Self {
        let loader = InputLoader::new(config.input.clone());
        Self {
            config,
            loader,
            classifier: BiasClassifier::new(provider),
        }
    }

    /// Replace the PDF text extractor.
    pub fn with_extractor(mut self, extractor: Box<dyn PageTextExtractor>) -> Self {
        self.loader = self.loader.with_extractor(extractor);
        self
    }

    pub fn config(&self) -> &ModerantConfig {
        &self.config
    }

    /// Analyse `source` and write the report.
    pub async fn run(&self, source: &InputSource) -> Result<RunSummary> {
        for warning in self.config.validate()? {
            warn!("Config warning: {}", warning);
        }

        // Reject an unusable output path before paying for any classification.
        let output = self.config.report.output_path.clone();
        ReportFormat::from_path(&output)?;

        let started = Instant::now();
        info!(
            input = %source.describe(),
            model = %self.classifier.model_name(),
            "Starting moderation run"
        );

        let texts = self.loader.load(source)?;
        let total = texts.len();
        let mut report = Report::new();

        for (index, text) in texts.into_iter().enumerate() {
            let explanation = self.classifier.analyze(&text).await?;
            let severity = severity::score(&text);
            info!(
                record = index + 1,
                total,
                severity = severity.value(),
                chars = text.chars().count(),
                "Record classified"
            );
            report.push(Record {
                content: text,
                severity,
                category: self.config.report.category.clone(),
                explanation,
            });
        }

        write_report(&output, &report)?;

        let summary = RunSummary {
            output,
            records: report.len(),
            max_severity: report.max_severity(),
        };
        info!(
            records = summary.records,
            output = %summary.output.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Moderation run complete"
        );
        Ok(summary)
    }
}
