/*!
 * # Schema-free Datasets
 *
 * In-memory column store for arbitrary uploaded tables. Sources produce a
 * header row plus untyped rows; [`Dataset::from_rows`] infers one kind per
 * column the way spreadsheet tools do: all-integer, numeric, boolean, or
 * text.
 */

pub mod csv_source;
pub mod describe;
pub mod excel_source;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub use describe::{describe, CategoricalSummary, ColumnSummary, NumericSummary};

/// Strings read as a missing value in text sources.
pub const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];

/// A single cell. Serializes to the matching JSON primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(v) => Some(*v as f64),
            CellValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Reads a text field, recognizing missing markers, numbers and booleans.
    pub fn parse_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if MISSING_MARKERS.contains(&trimmed) {
            return CellValue::Null;
        }
        if let Ok(v) = trimmed.parse::<i64>() {
            return CellValue::Int(v);
        }
        if let Ok(v) = trimmed.parse::<f64>() {
            return CellValue::Float(v);
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return CellValue::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return CellValue::Bool(false);
        }
        CellValue::Text(raw.to_string())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(v) => write!(f, "{}", v),
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(v) => f.write_str(v),
        }
    }
}

/// Inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }
}

/// One raw cell as delivered by a source, before column inference.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    /// Unparsed text from a delimited file.
    Text(String),
    /// Already-typed value from a spreadsheet.
    Typed(CellValue),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Non-missing numeric values, in row order.
    pub fn numbers(&self) -> Vec<f64> {
        self.values.iter().filter_map(CellValue::as_f64).collect()
    }

    fn infer(name: String, raw: Vec<RawCell>) -> Self {
        let parsed: Vec<CellValue> = raw
            .iter()
            .map(|cell| match cell {
                RawCell::Text(s) => CellValue::parse_text(s),
                RawCell::Typed(v) => v.clone(),
            })
            .collect();

        let present = || parsed.iter().filter(|v| !v.is_null());
        let all_int = present().all(|v| matches!(v, CellValue::Int(_)));
        let all_num = present().all(|v| matches!(v, CellValue::Int(_) | CellValue::Float(_)));
        let all_bool = present().all(|v| matches!(v, CellValue::Bool(_)));
        let any_present = present().next().is_some();

        let (kind, values) = if !any_present {
            // An entirely missing column is a float column of missing values.
            (ColumnKind::Float, parsed)
        } else if all_int {
            (ColumnKind::Integer, parsed)
        } else if all_num {
            let values = parsed
                .into_iter()
                .map(|v| match v {
                    CellValue::Int(i) => CellValue::Float(i as f64),
                    other => other,
                })
                .collect();
            (ColumnKind::Float, values)
        } else if all_bool {
            (ColumnKind::Boolean, parsed)
        } else {
            // Mixed column: text sources keep their original spelling.
            let values = parsed
                .into_iter()
                .zip(raw)
                .map(|(v, cell)| match (v, cell) {
                    (CellValue::Null, _) => CellValue::Null,
                    (_, RawCell::Text(s)) => CellValue::Text(s),
                    (typed, RawCell::Typed(_)) => typed,
                })
                .collect();
            (ColumnKind::Text, values)
        };

        Self { name, kind, values }
    }
}

/// A parsed table with typed columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Builds a dataset from a header and row-major cells.
    ///
    /// Short rows are padded with missing values; callers reject long rows.
    /// Blank header names become `Unnamed: {index}` and repeated names gain a
    /// `.1`, `.2`, ... suffix.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<RawCell>>) -> Self {
        let names = normalize_headers(headers);
        let width = names.len();
        let row_count = rows.len();

        let mut cells: Vec<Vec<RawCell>> = (0..width)
            .map(|_| Vec::with_capacity(row_count))
            .collect();
        for row in rows {
            let mut row = row.into_iter();
            for column in cells.iter_mut() {
                column.push(row.next().unwrap_or(RawCell::Typed(CellValue::Null)));
            }
        }

        let columns = names
            .into_iter()
            .zip(cells)
            .map(|(name, raw)| Column::infer(name, raw))
            .collect();

        Self { columns, row_count }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.kind.is_numeric())
    }

    /// First `n` rows as ordered column -> value records.
    pub fn head(&self, n: usize) -> Vec<IndexMap<String, CellValue>> {
        (0..self.row_count.min(n))
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| (c.name.clone(), c.values[row].clone()))
                    .collect()
            })
            .collect()
    }
}

fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(headers.len());
    for (idx, raw) in headers.into_iter().enumerate() {
        let base = if raw.trim().is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            raw
        };
        let mut name = base.clone();
        if let Some(&last) = seen.get(&base) {
            let mut suffix = last;
            loop {
                suffix += 1;
                name = format!("{}.{}", base, suffix);
                if !seen.contains_key(&name) {
                    break;
                }
            }
            seen.insert(base, suffix);
        }
        seen.insert(name.clone(), 0);
        names.push(name);
    }
    names
}
