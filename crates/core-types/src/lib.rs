//! # Hotel KPI Core Types
//!
//! Layer 0 of the workspace: the data shapes every other crate speaks.
//!
//! - `HotelRecord`: one row per (date, hotel, room type, channel) with capacity,
//!   occupancy and revenue/cost components.
//! - `StatementTable`: a named financial statement whose lines are addressed by
//!   label, each carrying a prior and a current period value.
//!
//! Nothing in here performs I/O or computes ratios.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Department, Dimension, Period, StatementKind};
pub use error::CoreError;
pub use structs::{HotelRecord, StatementBook, StatementLine, StatementTable};
