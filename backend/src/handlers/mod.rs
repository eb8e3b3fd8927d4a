//! HTTP handlers for the café back-office API

pub mod expenses;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod reports;

pub use expenses::*;
pub use health::*;
pub use inventory::*;
pub use orders::*;
pub use products::*;
pub use reports::*;

use chrono::NaiveDate;
use serde::Deserialize;
use shared::DateRange;

use crate::error::{AppError, AppResult};

/// Inclusive date range taken from query parameters.
#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRangeQuery {
    pub fn into_range(self) -> AppResult<DateRange> {
        if self.start > self.end {
            return Err(AppError::Validation {
                field: "start".to_string(),
                message: "Start date is after end date".to_string(),
            });
        }
        Ok(DateRange {
            start: self.start,
            end: self.end,
        })
    }
}
