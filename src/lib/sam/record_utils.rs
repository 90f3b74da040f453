//! Helpers for rendering alignment record fields as text.
//!
//! Diff tokens and output rows describe records with SAM-style text (`*` for absent values),
//! so these functions centralize that formatting.

use noodles::sam::Header;
use noodles::sam::alignment::record::Cigar as CigarTrait;
use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::RecordBuf;
use noodles::sam::alignment::record_buf::data::field::Value;
use noodles::sam::alignment::record_buf::data::field::value::Array;

use itertools::Itertools;

/// Convert CIGAR op kind to its SAM character representation.
#[must_use]
pub const fn cigar_kind_to_char(kind: Kind) -> char {
    match kind {
        Kind::Match => 'M',
        Kind::Insertion => 'I',
        Kind::Deletion => 'D',
        Kind::Skip => 'N',
        Kind::SoftClip => 'S',
        Kind::HardClip => 'H',
        Kind::Pad => 'P',
        Kind::SequenceMatch => '=',
        Kind::SequenceMismatch => 'X',
    }
}

/// Format a record's CIGAR as a string, `*` when empty.
#[must_use]
pub fn format_cigar(record: &RecordBuf) -> String {
    let cigar = record.cigar();
    let ops: String = cigar
        .iter()
        .flatten()
        .map(|op| format!("{}{}", op.len(), cigar_kind_to_char(op.kind())))
        .collect();
    if ops.is_empty() { "*".to_string() } else { ops }
}

/// Convert a record's name to a String, returning `*` if missing.
#[must_use]
pub fn record_name(record: &RecordBuf) -> String {
    record.name().map_or_else(|| "*".to_string(), ToString::to_string)
}

/// Look up a reference sequence name by index, returning `*` when absent.
#[must_use]
pub fn reference_name(header: &Header, id: Option<usize>) -> String {
    id.and_then(|id| header.reference_sequences().get_index(id).map(|(name, _)| name.to_string()))
        .unwrap_or_else(|| "*".to_string())
}

/// The 1-based alignment start, or 0 when the record is unplaced.
#[must_use]
pub fn alignment_start(record: &RecordBuf) -> usize {
    record.alignment_start().map_or(0, usize::from)
}

/// The 1-based mate alignment start, or 0 when absent.
#[must_use]
pub fn mate_alignment_start(record: &RecordBuf) -> usize {
    record.mate_alignment_start().map_or(0, usize::from)
}

/// The mapping quality, or 255 when unavailable.
#[must_use]
pub fn mapping_quality(record: &RecordBuf) -> u8 {
    record.mapping_quality().map_or(255, |q| q.get())
}

/// Describe a record's placement as `chrom:pos` for log and error messages.
#[must_use]
pub fn describe_location(header: &Header, record: &RecordBuf) -> String {
    format!("{}:{}", reference_name(header, record.reference_sequence_id()), alignment_start(record))
}

/// Format a tag value as SAM text.
#[must_use]
pub fn format_tag_value(value: &Value) -> String {
    match value {
        Value::Character(c) => char::from(*c).to_string(),
        Value::Int8(i) => i.to_string(),
        Value::UInt8(i) => i.to_string(),
        Value::Int16(i) => i.to_string(),
        Value::UInt16(i) => i.to_string(),
        Value::Int32(i) => i.to_string(),
        Value::UInt32(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) | Value::Hex(s) => s.to_string(),
        Value::Array(arr) => format_array(arr),
    }
}

fn format_array(arr: &Array) -> String {
    match arr {
        Array::Int8(v) => format!("c,{}", v.iter().join(",")),
        Array::UInt8(v) => format!("C,{}", v.iter().join(",")),
        Array::Int16(v) => format!("s,{}", v.iter().join(",")),
        Array::UInt16(v) => format!("S,{}", v.iter().join(",")),
        Array::Int32(v) => format!("i,{}", v.iter().join(",")),
        Array::UInt32(v) => format!("I,{}", v.iter().join(",")),
        Array::Float(v) => format!("f,{}", v.iter().join(",")),
    }
}

/// Get a tag's value rendered as text, if present.
#[must_use]
pub fn tag_text(record: &RecordBuf, tag: Tag) -> Option<String> {
    record.data().get(&tag).map(format_tag_value)
}

/// Whether the record carries the given tag.
#[must_use]
pub fn has_tag(record: &RecordBuf, tag: Tag) -> bool {
    record.data().get(&tag).is_some()
}

/// Render base qualities as Phred+33 text.
#[must_use]
pub fn format_qualities(quals: &[u8]) -> String {
    quals.iter().map(|&q| char::from(q.saturating_add(33))).collect()
}
