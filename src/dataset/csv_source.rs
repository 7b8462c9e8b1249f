use tracing::debug;

use super::{Dataset, RawCell};
use crate::errors::ServiceError;

/// Parses comma-separated bytes whose first record is the header.
///
/// Blank lines are skipped. Records shorter than the header are padded with
/// missing values; longer records are a parse failure.
pub fn read_csv(bytes: &[u8]) -> Result<Dataset, ServiceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || (headers.len() == 1 && headers[0].trim().is_empty()) {
        return Err(ServiceError::ParseFailure(
            "No columns to parse from file".to_string(),
        ));
    }

    let width = headers.len();
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() > width {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(ServiceError::ParseFailure(format!(
                "Error tokenizing data. Expected {} fields in line {}, saw {}",
                width,
                line,
                record.len()
            )));
        }
        rows.push(
            record
                .iter()
                .map(|field| RawCell::Text(field.to_string()))
                .collect(),
        );
    }

    debug!(columns = width, rows = rows.len(), "parsed csv");
    Ok(Dataset::from_rows(headers, rows))
}
