//! The per-partition merge-join of reference and new records.
//!
//! The reference stream is read completely first and grouped by position into
//! [`ReadGroup`]s. The new stream is then walked one record at a time:
//!
//! 1. Groups positioned before the new record can no longer be matched and are flushed as
//!    `REF_ONLY`.
//! 2. A new record positioned before the head group, or arriving with no groups left, is
//!    `NEW_ONLY`.
//! 3. Otherwise the head group is searched for the same read. A match is diffed field by field
//!    and reported as `VALUE` when anything differs; no match is `NEW_ONLY`.
//!
//! Groups left over once the new stream is exhausted are flushed as `REF_ONLY`.

use std::collections::VecDeque;

use anyhow::{Context, Result};
use log::debug;
use noodles::sam::Header;
use noodles::sam::alignment::record_buf::RecordBuf;

use crate::bam_io::{PositionKey, RecordStream};
use crate::compare::config::CompareConfig;
use crate::compare::differ::diff_records;
use crate::compare::identity::supplementary_rank;
use crate::compare::read_group::ReadGroup;
use crate::compare::record::{ComparisonRecord, DIFF_SEPARATOR, MismatchType};
use crate::compare::stats::CompareStats;
use crate::errors::BamDiffError;
use crate::partition::{GenomeRegion, Partition};
use crate::sam::record_utils::{alignment_start, describe_location};
use crate::sam::{record_name, reference_name};

/// Compares the two record streams of one partition.
#[derive(Debug, Clone, Copy)]
pub struct PartitionComparator<'c> {
    config: &'c CompareConfig,
}

impl<'c> PartitionComparator<'c> {
    #[must_use]
    pub fn new(config: &'c CompareConfig) -> Self {
        Self { config }
    }

    /// Classify every read of the partition, handing each resulting row to `emit`.
    ///
    /// Returns the partition's counts.
    ///
    /// # Errors
    ///
    /// Returns an error if either stream fails to decode, is not coordinate sorted, or if
    /// `emit` fails.
    pub fn compare<F>(
        &self,
        partition: &Partition,
        reference: RecordStream<'_>,
        new: RecordStream<'_>,
        emit: F,
    ) -> Result<CompareStats>
    where
        F: FnMut(ComparisonRecord) -> Result<()>,
    {
        let region = match partition {
            Partition::Region(region) => Some(region),
            Partition::Unmapped | Partition::WholeFile => None,
        };
        let mut classifier = Classifier {
            config: self.config,
            ref_header: reference.header(),
            new_header: new.header(),
            stats: CompareStats::default(),
            emit,
        };

        let mut groups: VecDeque<ReadGroup> = VecDeque::new();
        let mut sort_check = SortCheck::new("Reference");
        for result in reference.keyed() {
            let (key, record) = result.context("Failed to read reference record")?;
            if !self.in_scope(&record, region) {
                continue;
            }
            sort_check.check(key, &record, classifier.ref_header)?;
            classifier.stats.reference_reads += 1;

            match groups.back_mut() {
                Some(group) if group.key() == key => group.push(record),
                _ => {
                    let mut group = ReadGroup::new(key);
                    group.push(record);
                    groups.push_back(group);
                }
            }
        }

        let mut sort_check = SortCheck::new("New");
        for result in new.keyed() {
            let (key, record) = result.context("Failed to read new record")?;
            if !self.in_scope(&record, region) {
                continue;
            }
            sort_check.check(key, &record, classifier.new_header)?;
            classifier.stats.new_reads += 1;

            while groups.front().is_some_and(|group| group.key() < key) {
                if let Some(group) = groups.pop_front() {
                    classifier.flush(group)?;
                }
            }

            let Some(head) = groups.front_mut() else {
                classifier.single_sided(&record, MismatchType::NewOnly)?;
                continue;
            };
            if key < head.key() {
                classifier.single_sided(&record, MismatchType::NewOnly)?;
                continue;
            }

            match classifier.take_match(head, &record) {
                Some(matched) => {
                    if head.is_empty() {
                        groups.pop_front();
                    }
                    classifier.matched(&matched, &record)?;
                }
                None => classifier.single_sided(&record, MismatchType::NewOnly)?,
            }
        }

        while let Some(group) = groups.pop_front() {
            classifier.flush(group)?;
        }

        Ok(classifier.stats)
    }

    /// Filters that apply to both inputs: the configured read filters, and for region
    /// partitions an alignment start within the region.
    fn in_scope(&self, record: &RecordBuf, region: Option<&GenomeRegion>) -> bool {
        self.config.is_comparable(record)
            && region.is_none_or(|region| {
                record.alignment_start().is_some_and(|start| region.contains(usize::from(start)))
            })
    }
}

/// Classification state of one partition.
struct Classifier<'a, F> {
    config: &'a CompareConfig,
    ref_header: &'a Header,
    new_header: &'a Header,
    stats: CompareStats,
    emit: F,
}

impl<F> Classifier<'_, F>
where
    F: FnMut(ComparisonRecord) -> Result<()>,
{
    /// Remove the head group's record that is the same read as `record`, preferring the
    /// candidate with the same supplementary rank when several qualify.
    fn take_match(&self, group: &mut ReadGroup, record: &RecordBuf) -> Option<RecordBuf> {
        let (ref_header, new_header) = (self.ref_header, self.new_header);
        group.take_match(record, |candidates| {
            let target = supplementary_rank(record, new_header);
            candidates
                .iter()
                .position(|candidate| supplementary_rank(candidate, ref_header) == target)
                .unwrap_or(0)
        })
    }

    fn matched(&mut self, reference: &RecordBuf, new: &RecordBuf) -> Result<()> {
        let diffs = diff_records(reference, new, self.config);
        if diffs.is_empty() {
            self.stats.identical += 1;
            if let Some(name) = self.traced_name(new) {
                debug!("Read {name} at {}: identical", describe_location(self.new_header, new));
            }
            return Ok(());
        }

        if let Some(name) = self.traced_name(reference) {
            debug!(
                "Read {name} at {}: VALUE {}",
                describe_location(self.ref_header, reference),
                diffs.join(DIFF_SEPARATOR)
            );
        }
        self.write(reference, self.ref_header, MismatchType::Value, &diffs)
    }

    fn single_sided(&mut self, record: &RecordBuf, mismatch_type: MismatchType) -> Result<()> {
        let header = match mismatch_type {
            MismatchType::NewOnly => self.new_header,
            MismatchType::RefOnly | MismatchType::Value => self.ref_header,
        };
        if let Some(name) = self.traced_name(record) {
            debug!("Read {name} at {}: {mismatch_type}", describe_location(header, record));
        }
        self.write(record, header, mismatch_type, &[])
    }

    fn flush(&mut self, group: ReadGroup) -> Result<()> {
        for record in group.drain() {
            self.single_sided(&record, MismatchType::RefOnly)?;
        }
        Ok(())
    }

    fn write(
        &mut self,
        record: &RecordBuf,
        header: &Header,
        mismatch_type: MismatchType,
        diffs: &[String],
    ) -> Result<()> {
        self.stats.record_mismatch(mismatch_type);
        (self.emit)(ComparisonRecord::new(record, header, mismatch_type, diffs))
    }

    fn traced_name(&self, record: &RecordBuf) -> Option<String> {
        if self.config.traced_reads.is_empty() {
            return None;
        }
        let name = record_name(record);
        self.config.is_traced(&name).then_some(name)
    }
}

/// Verifies that one stream's keys never decrease.
struct SortCheck {
    side: &'static str,
    last: Option<(PositionKey, Option<usize>, usize)>,
}

impl SortCheck {
    fn new(side: &'static str) -> Self {
        Self { side, last: None }
    }

    fn check(&mut self, key: PositionKey, record: &RecordBuf, header: &Header) -> Result<()> {
        if let Some((last_key, last_id, last_start)) = self.last {
            if key < last_key {
                return Err(BamDiffError::UnsortedInput {
                    side: self.side.to_string(),
                    read: record_name(record),
                    position: describe_location(header, record),
                    previous: format!("{}:{last_start}", reference_name(header, last_id)),
                }
                .into());
            }
        }
        self.last = Some((key, record.reference_sequence_id(), alignment_start(record)));
        Ok(())
    }
}
