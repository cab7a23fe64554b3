//! Member login activity report.
//!
//! Filters the visit log by date window and member name, enriches each visit
//! with the member's name and first/last visit, optionally collapses to one
//! row per member, then sorts. Statistics always describe the filtered set
//! before any de-duplication or pagination.

mod params;
mod query;
mod rows;

use thiserror::Error;

use crate::storage::StorageError;

pub use params::{ReportParams, ReportRequest, SortDirection, SortField};
pub use query::{Report, VisitReportQuery};
pub use rows::{dedup_by_member, sort_rows, ReportRow, ReportStats};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid value for '{field}': {value}")]
    InvalidParameter { field: &'static str, value: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
}
