//! Report output.
//!
//! A `Report` is the ordered list of records from one run. It is written once,
//! at the end of the run, as an `.xlsx` workbook or a `.csv` file depending on
//! the output path's extension. Existing files are overwritten.

use crate::error::ReportError;
use crate::severity::Severity;
use crate::types::Record;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::{info, warn};

/// Column headers, in order.
pub const HEADER: [&str; 4] = ["Content", "Severity", "Category", "Explanation"];

/// Excel's limit on characters per cell.
pub const XLSX_MAX_CELL_CHARS: usize = 32_767;

/// Records collected during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    records: Vec<Record>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Highest severity in the report, if any records exist.
    pub fn max_severity(&self) -> Option<Severity> {
        self.records.iter().map(|r| r.severity).max()
    }
}

impl From<Vec<Record>> for Report {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

/// Output file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Xlsx,
    Csv,
}

impl ReportFormat {
    /// Pick the format from the path's extension, ignoring case.
    pub fn from_path(path: &Path) -> Result<Self, ReportError> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "xlsx" => Ok(ReportFormat::Xlsx),
            "csv" => Ok(ReportFormat::Csv),
            _ => Err(ReportError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    extension
                },
            }),
        }
    }

    pub fn writer(self) -> Box<dyn ReportWriter> {
        match self {
            ReportFormat::Xlsx => Box::new(XlsxReportWriter),
            ReportFormat::Csv => Box::new(CsvReportWriter),
        }
    }
}

/// Serializes a report to a file.
pub trait ReportWriter: Send + Sync {
    fn write(&self, path: &Path, report: &Report) -> Result<(), ReportError>;
}

/// Writes a single-sheet Excel workbook.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxReportWriter;

impl ReportWriter for XlsxReportWriter {
    fn write(&self, path: &Path, report: &Report) -> Result<(), ReportError> {
        let xlsx_err = |e: rust_xlsxwriter::XlsxError| write_error(path, e);

        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();
        let sheet = workbook.add_worksheet();

        for (col, title) in HEADER.iter().enumerate() {
            sheet
                .write_string_with_format(0, col as u16, *title, &bold)
                .map_err(xlsx_err)?;
        }

        for (index, record) in report.records().iter().enumerate() {
            let row = index as u32 + 1;
            sheet
                .write_string(row, 0, fit_cell(&record.content, row, "Content"))
                .map_err(xlsx_err)?;
            sheet
                .write_number(row, 1, f64::from(record.severity.value()))
                .map_err(xlsx_err)?;
            sheet
                .write_string(row, 2, fit_cell(&record.category, row, "Category"))
                .map_err(xlsx_err)?;
            sheet
                .write_string(row, 3, fit_cell(&record.explanation, row, "Explanation"))
                .map_err(xlsx_err)?;
        }

        workbook.save(path).map_err(xlsx_err)
    }
}

/// Writes a CSV file with the same header and rows.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvReportWriter;

impl ReportWriter for CsvReportWriter {
    fn write(&self, path: &Path, report: &Report) -> Result<(), ReportError> {
        let mut writer = csv::Writer::from_path(path).map_err(|e| write_error(path, e))?;
        writer
            .write_record(HEADER)
            .map_err(|e| write_error(path, e))?;
        for record in report.records() {
            let severity = record.severity.to_string();
            writer
                .write_record([
                    record.content.as_str(),
                    severity.as_str(),
                    record.category.as_str(),
                    record.explanation.as_str(),
                ])
                .map_err(|e| write_error(path, e))?;
        }
        writer.flush().map_err(|e| write_error(path, e))
    }
}

/// Write `report` to `path` in the format its extension selects.
pub fn write_report(path: &Path, report: &Report) -> Result<(), ReportError> {
    let format = ReportFormat::from_path(path)?;
    format.writer().write(path, report)?;
    info!(path = %path.display(), rows = report.len(), format = ?format, "Report written");
    Ok(())
}

/// Truncate text to what one xlsx cell can hold.
fn fit_cell<'a>(text: &'a str, row: u32, column: &str) -> &'a str {
    match text.char_indices().nth(XLSX_MAX_CELL_CHARS) {
        Some((cut, _)) => {
            warn!(row, column, "Cell exceeds {} characters; truncating", XLSX_MAX_CELL_CHARS);
            &text[..cut]
        }
        None => text,
    }
}

fn write_error(path: &Path, err: impl std::fmt::Display) -> ReportError {
    ReportError::Write {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
