//! Output rows describing each difference between the two inputs.

use std::fmt;

use noodles::sam::Header;
use noodles::sam::alignment::record_buf::RecordBuf;
use serde::{Deserialize, Serialize};

use crate::sam::record_utils::{
    alignment_start, format_cigar, mapping_quality, mate_alignment_start, record_name,
    reference_name, tag_text,
};
use crate::sam::SA_TAG;

/// How a read differs between the reference and new inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MismatchType {
    /// Present only in the reference input.
    RefOnly,
    /// Present only in the new input.
    NewOnly,
    /// Present in both with at least one field differing.
    Value,
}

impl fmt::Display for MismatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RefOnly => "REF_ONLY",
            Self::NewOnly => "NEW_ONLY",
            Self::Value => "VALUE",
        })
    }
}

/// Column names of the output file, in order.
pub const COLUMNS: [&str; 16] = [
    "read_id",
    "chromosome",
    "position",
    "mismatch_type",
    "diff",
    "mate_chromosome",
    "mate_position",
    "cigar",
    "flags",
    "map_qual",
    "paired",
    "first_in_pair",
    "negative_strand",
    "duplicate",
    "supplementary",
    "supplementary_data",
];

/// Separator between diff tokens in the `diff` column.
pub const DIFF_SEPARATOR: &str = ";";

/// Placeholder for an absent supplementary descriptor.
pub const NOT_AVAILABLE: &str = "N/A";

/// One row of the output: a read, its classification, and descriptive fields copied from
/// the record that produced it (the reference record for [`MismatchType::Value`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub read_id: String,
    pub chromosome: String,
    pub position: usize,
    pub mismatch_type: MismatchType,
    pub diff: String,
    pub mate_chromosome: String,
    pub mate_position: usize,
    pub cigar: String,
    pub flags: u16,
    pub map_qual: u8,
    pub paired: bool,
    pub first_in_pair: bool,
    pub negative_strand: bool,
    pub duplicate: bool,
    pub supplementary: bool,
    pub supplementary_data: String,
}

impl ComparisonRecord {
    /// Describe `record`, whose reference ids resolve against `header`.
    #[must_use]
    pub fn new(
        record: &RecordBuf,
        header: &Header,
        mismatch_type: MismatchType,
        diffs: &[String],
    ) -> Self {
        let flags = record.flags();
        Self {
            read_id: record_name(record),
            chromosome: reference_name(header, record.reference_sequence_id()),
            position: alignment_start(record),
            mismatch_type,
            diff: diffs.join(DIFF_SEPARATOR),
            mate_chromosome: reference_name(header, record.mate_reference_sequence_id()),
            mate_position: mate_alignment_start(record),
            cigar: format_cigar(record),
            flags: flags.bits(),
            map_qual: mapping_quality(record),
            paired: flags.is_segmented(),
            first_in_pair: flags.is_first_segment(),
            negative_strand: flags.is_reverse_complemented(),
            duplicate: flags.is_duplicate(),
            supplementary: flags.is_supplementary(),
            supplementary_data: tag_text(record, SA_TAG)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}
