/*!
 * # Report Tables
 *
 * Export-ready tables for the orders and inventory reports. A table is
 * homogeneous: every row carries a value for each header, in header order.
 * Turning a table into spreadsheet or PDF bytes is left to the caller; this
 * module only fixes the content, the title and the download metadata.
 */

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::errors::ServiceError;

/// Export format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
    Excel,
    Pdf,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Excel => "xlsx",
            ReportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ReportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ReportFormat::Pdf => "application/pdf",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ServiceError;

    /// Only the exact lowercase selectors are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "excel" => Ok(ReportFormat::Excel),
            "pdf" => Ok(ReportFormat::Pdf),
            other => Err(ServiceError::InvalidFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    pub title: String,
    /// File name stem, e.g. `orders` for `orders.xlsx`
    pub stem: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ReportTable {
    pub fn new(title: impl Into<String>, stem: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            title: title.into(),
            stem: stem.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Missing trailing cells are filled with `null` and
    /// extra cells are dropped so the table stays homogeneous.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.headers.len(), Value::Null);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn file_name(&self, format: ReportFormat) -> String {
        format!("{}.{}", self.stem, format.extension())
    }

    /// Rows as header -> value records, preserving header order.
    pub fn to_records(&self) -> Vec<IndexMap<String, Value>> {
        self.rows
            .iter()
            .map(|row| self.headers.iter().cloned().zip(row.iter().cloned()).collect())
            .collect()
    }

    /// Renders the table as CSV with a header line. Strings are written
    /// unquoted unless they need quoting; `null` becomes an empty field.
    pub fn to_csv(&self) -> Result<String, ServiceError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(cell_text))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ServiceError::InternalError(e.to_string()))
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn parses_known_formats_only() {
        assert_eq!("excel".parse::<ReportFormat>().unwrap(), ReportFormat::Excel);
        assert_eq!("pdf".parse::<ReportFormat>().unwrap(), ReportFormat::Pdf);
        assert_matches!("csv".parse::<ReportFormat>(), Err(ServiceError::InvalidFormat(f)) if f == "csv");
        assert_matches!("PDF".parse::<ReportFormat>(), Err(ServiceError::InvalidFormat(_)));
    }

    #[test]
    fn invalid_format_message() {
        let err = "docx".parse::<ReportFormat>().unwrap_err();
        assert_eq!(err.response_message(), "Invalid format. Use 'excel' or 'pdf'.");
        assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn rows_are_padded_to_header_width() {
        let mut table = ReportTable::new("T", "t", &["a", "b"]);
        table.push_row(vec![json!(1)]);
        table.push_row(vec![json!(1), json!(2), json!(3)]);
        assert!(table.rows.iter().all(|r| r.len() == 2));
        assert_eq!(table.rows[0][1], Value::Null);
    }

    #[test]
    fn file_name_and_mime_follow_format() {
        let table = ReportTable::new("Orders Report", "orders", &[]);
        assert_eq!(table.file_name(ReportFormat::Excel), "orders.xlsx");
        assert_eq!(table.file_name(ReportFormat::Pdf), "orders.pdf");
        assert_eq!(ReportFormat::Pdf.mime_type(), "application/pdf");
    }

    #[test]
    fn csv_rendering() {
        let mut table = ReportTable::new("T", "t", &["Name", "Qty"]);
        table.push_row(vec![json!("Bolt, M4"), json!(3)]);
        table.push_row(vec![json!("Nut"), Value::Null]);
        assert_eq!(table.to_csv().unwrap(), "Name,Qty\n\"Bolt, M4\",3\nNut,\n");
    }
}
