//! Field-level comparison of two matched records.
//!
//! Each check yields at most one `field(ref/new)` token. Checks run in a fixed order so the
//! `diff` column is stable across runs.

use std::fmt::Display;

use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::RecordBuf;

use crate::compare::config::CompareConfig;
use crate::dna::{reverse_complement, reversed};
use crate::sam::record_utils::{format_cigar, format_qualities, has_tag, mapping_quality, tag_text};
use crate::sam::{MC_TAG, SA_TAG};

/// Text used for an attribute that a record does not carry.
pub const MISSING: &str = "missing";

fn token(field: &str, reference: impl Display, new: impl Display) -> String {
    format!("{field}({reference}/{new})")
}

fn push_if_different<T: PartialEq + Display>(
    diffs: &mut Vec<String>,
    field: &str,
    reference: T,
    new: T,
) {
    if reference != new {
        diffs.push(token(field, reference, new));
    }
}

/// Compare two records that are the same read and list every reportable difference.
///
/// An empty result means the records are equivalent for reporting purposes.
#[must_use]
pub fn diff_records(reference: &RecordBuf, new: &RecordBuf, config: &CompareConfig) -> Vec<String> {
    let mut diffs = Vec::new();
    let (rf, nf) = (reference.flags(), new.flags());

    let unmapping_changed = rf.is_unmapped() != nf.is_unmapped()
        || rf.is_mate_unmapped() != nf.is_mate_unmapped();
    let compare_placement = !(config.ignore_unmapping && unmapping_changed);

    if compare_placement {
        push_if_different(
            &mut diffs,
            "insert_size",
            reference.template_length(),
            new.template_length(),
        );
        push_if_different(&mut diffs, "cigar", format_cigar(reference), format_cigar(new));
        push_if_different(&mut diffs, "map_qual", mapping_quality(reference), mapping_quality(new));
    }

    push_if_different(
        &mut diffs,
        "neg_strand",
        rf.is_reverse_complemented(),
        nf.is_reverse_complemented(),
    );

    if !config.ignore_duplicates {
        push_if_different(&mut diffs, "duplicate", rf.is_duplicate(), nf.is_duplicate());
    }

    if !config.ignore_unmapping {
        push_if_different(&mut diffs, "unmapped", rf.is_unmapped(), nf.is_unmapped());
        push_if_different(
            &mut diffs,
            "mate_unmapped",
            rf.is_mate_unmapped(),
            nf.is_mate_unmapped(),
        );
    }

    let marked_unmapped = has_tag(reference, config.unmapped_marker_tag)
        || has_tag(new, config.unmapped_marker_tag);
    if !config.ignore_supplementary_attribute && !marked_unmapped {
        push_if_different(&mut diffs, "SA", attribute(reference, SA_TAG), attribute(new, SA_TAG));
    }
    push_if_different(&mut diffs, "MC", attribute(reference, MC_TAG), attribute(new, MC_TAG));

    let strands_differ = rf.is_reverse_complemented() != nf.is_reverse_complemented();

    let ref_bases = reference.sequence().as_ref();
    let new_bases = new.sequence().as_ref();
    let bases_match = if strands_differ {
        ref_bases == reverse_complement(new_bases).as_slice()
    } else {
        ref_bases == new_bases
    };
    if !bases_match {
        diffs.push(token(
            "bases",
            String::from_utf8_lossy(ref_bases),
            String::from_utf8_lossy(new_bases),
        ));
    }

    let ref_quals = reference.quality_scores().as_ref();
    let new_quals = new.quality_scores().as_ref();
    let quals_match = if strands_differ {
        ref_quals == reversed(new_quals).as_slice()
    } else {
        ref_quals == new_quals
    };
    if !quals_match {
        diffs.push(token("base_quals", format_qualities(ref_quals), format_qualities(new_quals)));
    }

    diffs
}

fn attribute(record: &RecordBuf, tag: Tag) -> String {
    tag_text(record, tag).unwrap_or_else(|| MISSING.to_string())
}
