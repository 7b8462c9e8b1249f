/*!
 * # Ad-hoc File Analysis
 *
 * Accepts an uploaded table (`.csv`, `.xls` or `.xlsx`, chosen by file name
 * suffix) and returns descriptive statistics, a preview of the first rows,
 * and the column layout. Failures are reported as an `{ "error": ... }`
 * body instead of an error value, so the result can be forwarded as-is.
 */

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::config::DEFAULT_HEAD_ROWS;
use crate::dataset::{self, CellValue, ColumnSummary, Dataset};
use crate::errors::{ErrorResponse, ServiceError};

/// Uploaded file kinds, keyed by file name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Spreadsheet,
}

impl FileKind {
    /// Suffix match is case-sensitive: `DATA.CSV` is not recognized.
    pub fn from_filename(filename: &str) -> Option<Self> {
        if filename.ends_with(".csv") {
            Some(FileKind::Csv)
        } else if filename.ends_with(".xls") || filename.ends_with(".xlsx") {
            Some(FileKind::Spreadsheet)
        } else {
            None
        }
    }

    fn read(&self, bytes: &[u8]) -> Result<Dataset, ServiceError> {
        match self {
            FileKind::Csv => dataset::csv_source::read_csv(bytes),
            FileKind::Spreadsheet => dataset::excel_source::read_workbook(bytes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAnalysisResult {
    pub summary: IndexMap<String, ColumnSummary>,
    pub head: Vec<IndexMap<String, CellValue>>,
    pub columns: Vec<String>,
    pub row_count: usize,
}

impl FileAnalysisResult {
    pub fn from_dataset(data: &Dataset, head_rows: usize) -> Self {
        Self {
            summary: dataset::describe(data),
            head: data.head(head_rows),
            columns: data.column_names(),
            row_count: data.row_count(),
        }
    }
}

/// Either the analysis or an error body; serializes without a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileAnalysisOutcome {
    Success(FileAnalysisResult),
    Failure(ErrorResponse),
}

/// Analyzes `bytes` as the file named `filename`.
///
/// An unrecognized suffix fails with [`ServiceError::UnsupportedFormat`]
/// before the content is looked at.
#[instrument(skip(bytes), fields(size = bytes.len()))]
pub fn try_analyze_file(
    bytes: &[u8],
    filename: &str,
    head_rows: usize,
) -> Result<FileAnalysisResult, ServiceError> {
    let kind = FileKind::from_filename(filename).ok_or(ServiceError::UnsupportedFormat)?;
    let data = kind.read(bytes)?;
    Ok(FileAnalysisResult::from_dataset(&data, head_rows))
}

/// Like [`try_analyze_file`] with the default preview size, folding any
/// error into an [`ErrorResponse`].
pub fn analyze_file(bytes: &[u8], filename: &str) -> FileAnalysisOutcome {
    analyze_file_with(bytes, filename, DEFAULT_HEAD_ROWS)
}

pub fn analyze_file_with(bytes: &[u8], filename: &str, head_rows: usize) -> FileAnalysisOutcome {
    match try_analyze_file(bytes, filename, head_rows) {
        Ok(result) => FileAnalysisOutcome::Success(result),
        Err(e) => {
            warn!(filename, code = e.code(), error = %e, "File analysis failed");
            FileAnalysisOutcome::Failure(ErrorResponse::new(e.to_string()))
        }
    }
}
