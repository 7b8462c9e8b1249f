//! Read-only input records supplied by the caller's data store.

pub mod order;
pub mod product;
pub mod supplier;

pub use order::{Order, OrderStatus};
pub use product::{Product, DEFAULT_ANNUAL_DEMAND};
pub use supplier::{Supplier, DEFAULT_RELIABILITY_SCORE};

use std::collections::HashMap;
use validator::Validate;

use crate::errors::ServiceError;

/// Builds an id -> record lookup for explicit caller-side joins.
pub fn index_by_id<T, F>(records: &[T], id: F) -> HashMap<i64, &T>
where
    F: Fn(&T) -> i64,
{
    records.iter().map(|r| (id(r), r)).collect()
}

/// Validates every record, reporting the position of the first invalid one.
pub fn validate_records<T: Validate>(records: &[T]) -> Result<(), ServiceError> {
    for (idx, record) in records.iter().enumerate() {
        record
            .validate()
            .map_err(|e| ServiceError::ValidationError(format!("record {}: {}", idx, e)))?;
    }
    Ok(())
}
