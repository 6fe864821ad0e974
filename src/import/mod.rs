//! CSV import and reconciliation engine
//!
//! The pipeline is: parse (`parser`) -> map columns (`mapper`) ->
//! materialize records (`materialize`) -> combine with the existing
//! collection (`resolve`). Canonicalizers (`canon`) keep every row
//! importable: unrecognized vocabulary defaults instead of failing, so the
//! only fatal conditions are empty input, header/mapping validation, and
//! storage failures.

pub mod canon;
pub mod mapper;
pub mod materialize;
pub mod parser;
pub mod resolve;

pub use mapper::ColumnMap;
pub use materialize::RowView;
pub use parser::CsvTable;
pub use resolve::ImportMode;

use thiserror::Error;

/// Fatal import conditions. All are detected before anything is written.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("empty CSV: no header row found")]
    EmptyCsv,

    #[error("CSV parse error at row {row}: {message}")]
    Parse { row: usize, message: String },

    #[error("missing required headers: {}", .0.join(", "))]
    MissingHeaders(Vec<String>),

    #[error("please map all required fields: {}", .0.join(", "))]
    UnmappedFields(Vec<String>),
}
