//! Per-column descriptive statistics.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{CellValue, Column, Dataset};

/// Statistics of a numeric column. Missing values are skipped; statistics
/// that are undefined for the sample size are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1 denominator)
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub p25: Option<f64>,
    #[serde(rename = "50%")]
    pub p50: Option<f64>,
    #[serde(rename = "75%")]
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

impl NumericSummary {
    pub fn of(values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return Self {
                count,
                mean: None,
                std: None,
                min: None,
                p25: None,
                p50: None,
                p75: None,
                max: None,
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = values.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            Some((ss / (count - 1) as f64).sqrt())
        } else {
            None
        };

        Self {
            count,
            mean: Some(mean),
            std,
            min: sorted.first().copied(),
            p25: Some(percentile(&sorted, 0.25)),
            p50: Some(percentile(&sorted, 0.50)),
            p75: Some(percentile(&sorted, 0.75)),
            max: sorted.last().copied(),
        }
    }
}

/// Linear interpolation between closest ranks. `sorted` must be non-empty.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * q;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Statistics of a non-numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalSummary {
    pub count: usize,
    pub unique: usize,
    /// Most frequent value; ties go to the value seen first
    pub top: CellValue,
    pub freq: Option<usize>,
}

impl CategoricalSummary {
    pub fn of(column: &Column) -> Self {
        // (first value, occurrences) keyed by a type-tagged rendering
        let mut tally: IndexMap<String, (&CellValue, usize)> = IndexMap::new();
        for value in column.values.iter().filter(|v| !v.is_null()) {
            tally
                .entry(format!("{:?}", value))
                .or_insert((value, 0))
                .1 += 1;
        }

        let count = tally.values().map(|(_, n)| n).sum();
        let mut top: Option<(&CellValue, usize)> = None;
        for &(value, n) in tally.values() {
            if top.map_or(true, |(_, best)| n > best) {
                top = Some((value, n));
            }
        }

        Self {
            count,
            unique: tally.len(),
            top: top.map(|(v, _)| v.clone()).unwrap_or(CellValue::Null),
            freq: top.map(|(_, n)| n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSummary {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

/// Summarizes numeric columns only. A dataset with no numeric columns is
/// summarized categorically over every column instead.
pub fn describe(dataset: &Dataset) -> IndexMap<String, ColumnSummary> {
    let numeric: IndexMap<String, ColumnSummary> = dataset
        .numeric_columns()
        .map(|c| {
            (
                c.name.clone(),
                ColumnSummary::Numeric(NumericSummary::of(&c.numbers())),
            )
        })
        .collect();
    if !numeric.is_empty() {
        return numeric;
    }

    dataset
        .columns()
        .iter()
        .map(|c| {
            (
                c.name.clone(),
                ColumnSummary::Categorical(CategoricalSummary::of(c)),
            )
        })
        .collect()
}
