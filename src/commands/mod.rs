//! CLI command implementations for fgbamdiff.
//!
//! - [`compare`] - Compare two coordinate-sorted BAMs and report per-read differences
//! - [`index`] - Write `.bai` indexes so inputs can be compared by region

#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

pub mod command;
pub mod common;
pub mod compare;
pub mod index;
