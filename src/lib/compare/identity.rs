//! Read identity and supplementary alignment ranking.
//!
//! Two records are "the same read" when they describe the same physical read segment, which is
//! looser than full equality so that field-level differences can be reported as such.

use std::cmp::Ordering;

use anyhow::{Context, Result, bail, ensure};
use log::warn;
use noodles::sam::Header;
use noodles::sam::alignment::record_buf::RecordBuf;

use crate::sam::record_utils::{alignment_start, format_cigar, reference_name, tag_text};
use crate::sam::{SA_TAG, record_name};

/// Whether two records are the same read.
///
/// Names, supplementary flags and unmapped flags must agree. For paired reads the
/// first-of-pair flags must agree as well.
#[must_use]
pub fn is_same_read(a: &RecordBuf, b: &RecordBuf) -> bool {
    let (fa, fb) = (a.flags(), b.flags());
    if a.name() != b.name()
        || fa.is_supplementary() != fb.is_supplementary()
        || fa.is_unmapped() != fb.is_unmapped()
    {
        return false;
    }
    if fa.is_segmented() || fb.is_segmented() {
        return fa.is_first_segment() == fb.is_first_segment();
    }
    true
}

/// One alignment of a read, as listed in an `SA` descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentLocus {
    pub chromosome: String,
    pub position: usize,
    pub negative_strand: bool,
    pub cigar: String,
}

impl Ord for AlignmentLocus {
    fn cmp(&self, other: &Self) -> Ordering {
        self.chromosome
            .cmp(&other.chromosome)
            .then(self.position.cmp(&other.position))
            .then(self.negative_strand.cmp(&other.negative_strand))
            .then_with(|| self.cigar.cmp(&other.cigar))
    }
}

impl PartialOrd for AlignmentLocus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl AlignmentLocus {
    /// The locus of a record's own alignment.
    #[must_use]
    pub fn of_record(record: &RecordBuf, header: &Header) -> Self {
        Self {
            chromosome: reference_name(header, record.reference_sequence_id()),
            position: alignment_start(record),
            negative_strand: record.flags().is_reverse_complemented(),
            cigar: format_cigar(record),
        }
    }
}

/// Parse an `SA` descriptor (`rname,pos,strand,CIGAR,mapQ,NM;...`).
///
/// # Errors
///
/// Returns an error if any entry has too few fields, a non-numeric position, or a strand
/// other than `+` or `-`.
pub fn parse_sa_descriptor(descriptor: &str) -> Result<Vec<AlignmentLocus>> {
    descriptor
        .split(';')
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let fields: Vec<&str> = entry.split(',').collect();
            ensure!(fields.len() >= 4, "SA entry '{entry}' has {} fields", fields.len());
            let position = fields[1]
                .parse::<usize>()
                .with_context(|| format!("SA entry '{entry}' has an invalid position"))?;
            let negative_strand = match fields[2] {
                "+" => false,
                "-" => true,
                other => bail!("SA entry '{entry}' has an invalid strand '{other}'"),
            };
            Ok(AlignmentLocus {
                chromosome: fields[0].to_string(),
                position,
                negative_strand,
                cigar: fields[3].to_string(),
            })
        })
        .collect()
}

/// The rank of a supplementary record among all alignments of its read.
///
/// The record's own locus and every `SA` entry are sorted, and the rank is the record's
/// position in that order, so it does not depend on the order of the `SA` entries.
/// Non-supplementary records, and records with an unreadable `SA` descriptor, rank 0.
#[must_use]
pub fn supplementary_rank(record: &RecordBuf, header: &Header) -> usize {
    if !record.flags().is_supplementary() {
        return 0;
    }
    let Some(descriptor) = tag_text(record, SA_TAG) else {
        return 0;
    };
    let mut loci = match parse_sa_descriptor(&descriptor) {
        Ok(loci) => loci,
        Err(e) => {
            warn!("Malformed SA attribute on read {}: {e:#}", record_name(record));
            return 0;
        }
    };

    let own = AlignmentLocus::of_record(record, header);
    if !loci.contains(&own) {
        loci.push(own.clone());
    }
    loci.sort();
    loci.iter().position(|locus| *locus == own).unwrap_or(0)
}
