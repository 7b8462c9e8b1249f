use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use tracing::debug;

use super::{CellValue, Dataset, RawCell};
use crate::errors::ServiceError;

/// Parses the first worksheet of an `.xls`/`.xlsx` workbook; its first row is
/// the header. An empty worksheet has no columns to parse and is rejected.
pub fn read_workbook(bytes: &[u8]) -> Result<Dataset, ServiceError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => {
            return Err(ServiceError::ParseFailure(
                "Workbook contains no worksheets".to_string(),
            ))
        }
    };

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(header_name).collect(),
        None => {
            return Err(ServiceError::ParseFailure(
                "No columns to parse from file".to_string(),
            ))
        }
    };

    let body: Vec<Vec<RawCell>> = rows
        .map(|row| {
            row.iter()
                .map(|cell| RawCell::Typed(cell_value(cell)))
                .collect()
        })
        .collect();

    debug!(columns = headers.len(), rows = body.len(), "parsed workbook");
    Ok(Dataset::from_rows(headers, body))
}

fn header_name(cell: &Data) -> String {
    match cell_value(cell) {
        CellValue::Null => String::new(),
        other => other.to_string(),
    }
}

/// Maps a spreadsheet cell onto a dataset value. Whole-number floats become
/// integers, since spreadsheets store every number as a float.
pub(crate) fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::Int(v) => CellValue::Int(*v),
        Data::Float(v) => {
            if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                CellValue::Int(*v as i64)
            } else {
                CellValue::Float(*v)
            }
        }
        Data::Bool(v) => CellValue::Bool(*v),
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Null
            } else {
                CellValue::Text(s.clone())
            }
        }
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) => CellValue::Text(ts.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Null,
    }
}
