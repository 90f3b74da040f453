//! SAM/BAM record utilities.
//!
//! - [`record_utils`] - Text rendering of record fields for diff tokens and output rows
//! - [`builder`] - Fluent record builder for tests and benchmarks

pub mod builder;
pub mod record_utils;

use noodles::sam::alignment::record::data::field::Tag;

/// Supplementary alignment descriptor.
pub const SA_TAG: Tag = Tag::new(b'S', b'A');

/// Mate CIGAR descriptor.
pub const MC_TAG: Tag = Tag::new(b'M', b'C');

/// Per-read consensus depth, present on reads produced by UMI consensus callers.
pub const DEFAULT_CONSENSUS_TAG: &str = "cD";

/// Marker placed on reads that a downstream process unmapped.
pub const DEFAULT_UNMAPPED_MARKER_TAG: &str = "UT";

pub use record_utils::{format_cigar, record_name, reference_name};
