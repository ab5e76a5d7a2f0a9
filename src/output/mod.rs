//! Report output
//!
//! Human-readable console output and JSON reports.

pub mod json;
pub mod text;
