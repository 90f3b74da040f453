//! Helper utilities for integration tests.

pub mod bam_generator;
pub mod runner;

pub use bam_generator::*;
pub use runner::*;
