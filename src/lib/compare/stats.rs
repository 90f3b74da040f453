//! Comparison counters, accumulated per worker and summed at the end of a run.

use std::iter::Sum;
use std::ops::AddAssign;

use log::info;

use crate::compare::record::MismatchType;
use crate::logging::{format_count, format_percent};

/// Counts of reads considered and differences found.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CompareStats {
    /// Reference reads that passed the filters.
    pub reference_reads: u64,
    /// New reads that passed the filters.
    pub new_reads: u64,
    /// Matched reads with no reportable difference.
    pub identical: u64,
    pub ref_only: u64,
    pub new_only: u64,
    pub value: u64,
}

impl CompareStats {
    pub fn record_mismatch(&mut self, mismatch_type: MismatchType) {
        match mismatch_type {
            MismatchType::RefOnly => self.ref_only += 1,
            MismatchType::NewOnly => self.new_only += 1,
            MismatchType::Value => self.value += 1,
        }
    }

    /// Total rows written: every classified read counts as one diff.
    #[must_use]
    pub fn diffs(&self) -> u64 {
        self.ref_only + self.new_only + self.value
    }

    /// Log the one-line summary followed by the per-type breakdown.
    pub fn log_summary(&self) {
        info!(
            "Compared {} reference reads and {} new reads: {} diffs",
            format_count(self.reference_reads),
            format_count(self.new_reads),
            format_count(self.diffs())
        );
        let denominator = self.reference_reads.max(self.new_reads);
        let line = |label: &str, n: u64| {
            let fraction = if denominator == 0 { 0.0 } else { n as f64 / denominator as f64 };
            info!("  {label:<10} {} ({})", format_count(n), format_percent(fraction, 2));
        };
        line("Identical:", self.identical);
        line("VALUE:", self.value);
        line("REF_ONLY:", self.ref_only);
        line("NEW_ONLY:", self.new_only);
    }
}

impl AddAssign for CompareStats {
    fn add_assign(&mut self, other: Self) {
        self.reference_reads += other.reference_reads;
        self.new_reads += other.new_reads;
        self.identical += other.identical;
        self.ref_only += other.ref_only;
        self.new_only += other.new_only;
        self.value += other.value;
    }
}

impl Sum for CompareStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut acc, stats| {
            acc += stats;
            acc
        })
    }
}
