//! Test fixtures for loanscope crates.
//!
//! Fixtures are raw JSON rows, the same shape the dashboard loads from disk,
//! so any crate can depend on this one without a dependency cycle.

pub mod fixture;

pub use fixture::{arb_raw_row, sample_rows, RowBuilder};
