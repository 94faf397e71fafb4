//! # Hotel KPI Data Source
//!
//! This crate reads the application's inputs from disk and hands validated,
//! typed values to the analytics engine.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** All file-format knowledge (CSV columns, TOML statement
//!   books) lives here. The engine never sees a raw cell.
//! - **Validate at the Boundary:** Every record passes `HotelRecord::validate`
//!   before it leaves this crate. Invalid rows abort the load, or are counted
//!   and skipped in lenient mode.
//! - **Load Once:** The `Repository` memoizes each input so all callers share a
//!   single load-and-validate.
//!
//! ## Public API
//!
//! - `CsvRecordSource`: Reads hotel records, producing a `LoadReport`.
//! - `SyntheticGenerator` / `write_csv`: Seeded demo records and their CSV export.
//! - `StatementSource`: Reads a `StatementBook` from TOML.
//! - `Repository`: Memoized access to both, plus `RecordFilter` selection.
//! - `DataSourceError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod filter;
pub mod generator;
pub mod loader;
pub mod repository;
pub mod statements;

// Re-export the key components to create a clean, public-facing API.
pub use error::DataSourceError;
pub use filter::RecordFilter;
pub use generator::{write_csv, GeneratorConfig, SyntheticGenerator};
pub use loader::{CsvRecordSource, LoadReport, LoadedRecords, RejectedRow};
pub use repository::Repository;
pub use statements::StatementSource;
