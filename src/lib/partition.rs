//! Splitting the genome into units of comparison work.
//!
//! A [`Partition`] is either a coordinate [`GenomeRegion`], the set of unplaced unmapped reads,
//! or (when the inputs are not indexed) the whole file. Partitions are built once, up front, in
//! genome order and wrapped in sequentially numbered [`PartitionTask`]s.

use std::fmt;

use crate::errors::{BamDiffError, Result};
use crate::reference::Contig;

/// Default number of bases per region partition.
pub const DEFAULT_PARTITION_SIZE: usize = 1_000_000;

/// A 1-based, closed genomic interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenomeRegion {
    pub chromosome: String,
    pub start: usize,
    pub end: usize,
}

impl GenomeRegion {
    #[must_use]
    pub fn new(chromosome: impl Into<String>, start: usize, end: usize) -> Self {
        Self { chromosome: chromosome.into(), start, end }
    }

    /// Number of bases covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Whether a 1-based position falls within the region.
    #[must_use]
    pub fn contains(&self, position: usize) -> bool {
        (self.start..=self.end).contains(&position)
    }
}

impl fmt::Display for GenomeRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chromosome, self.start, self.end)
    }
}

/// One unit of work for a comparison worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Partition {
    /// Reads whose alignment start lies within the region.
    Region(GenomeRegion),
    /// Unplaced unmapped reads.
    Unmapped,
    /// Every read in the file, in file order.
    WholeFile,
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Region(region) => region.fmt(f),
            Self::Unmapped => f.write_str("unmapped"),
            Self::WholeFile => f.write_str("whole file"),
        }
    }
}

/// A partition paired with its sequential task id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionTask {
    pub id: usize,
    pub partition: Partition,
}

impl fmt::Display for PartitionTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "partition {} ({})", self.id, self.partition)
    }
}

fn invalid_region(spec: &str, reason: impl Into<String>) -> BamDiffError {
    BamDiffError::InvalidRegion { region: spec.to_string(), reason: reason.into() }
}

fn parse_coordinate(spec: &str, text: &str) -> Result<usize> {
    text.replace(',', "")
        .parse::<usize>()
        .map_err(|_| invalid_region(spec, format!("'{text}' is not a valid coordinate")))
}

/// Parse a region string against the contig dictionary.
///
/// Accepts `chr` (the whole contig), `chr:start` (start to the end of the contig) and
/// `chr:start-end`. Coordinates are 1-based and inclusive, and may contain thousands
/// separators. A string that exactly names a contig is always treated as the whole contig,
/// so contig names containing `:` are supported.
///
/// # Errors
///
/// Returns [`BamDiffError::InvalidRegion`] for unknown contigs, malformed coordinates,
/// `start < 1`, `start > end`, or an end beyond the contig.
///
/// # Example
/// ```
/// use fgbamdiff_lib::partition::{GenomeRegion, parse_region};
/// use fgbamdiff_lib::reference::Contig;
///
/// let contigs = vec![Contig::new("chr1", 5_000)];
/// assert_eq!(parse_region("chr1", &contigs).unwrap(), GenomeRegion::new("chr1", 1, 5_000));
/// assert_eq!(parse_region("chr1:1,001-2,000", &contigs).unwrap(), GenomeRegion::new("chr1", 1_001, 2_000));
/// assert!(parse_region("chr2", &contigs).is_err());
/// ```
pub fn parse_region(spec: &str, contigs: &[Contig]) -> Result<GenomeRegion> {
    let spec = spec.trim();
    if let Some(contig) = contigs.iter().find(|c| c.name == spec) {
        return Ok(GenomeRegion::new(&contig.name, 1, contig.length));
    }

    let Some((name, range)) = spec.rsplit_once(':') else {
        return Err(invalid_region(spec, "unknown contig"));
    };
    let contig = contigs
        .iter()
        .find(|c| c.name == name)
        .ok_or_else(|| invalid_region(spec, format!("unknown contig '{name}'")))?;

    let (start, end) = match range.split_once('-') {
        Some((start, end)) => (parse_coordinate(spec, start)?, parse_coordinate(spec, end)?),
        None => (parse_coordinate(spec, range)?, contig.length),
    };

    if start == 0 {
        return Err(invalid_region(spec, "start must be >= 1"));
    }
    if start > end {
        return Err(invalid_region(spec, format!("start {start} is after end {end}")));
    }
    if end > contig.length {
        return Err(invalid_region(
            spec,
            format!("end {end} is beyond the length of '{}' ({})", contig.name, contig.length),
        ));
    }

    Ok(GenomeRegion::new(&contig.name, start, end))
}

/// Restriction of the genome to compare.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegionFilter {
    /// Compare every contig plus the unmapped reads.
    #[default]
    All,
    /// Compare only the given regions; unplaced unmapped reads are skipped.
    Include(Vec<GenomeRegion>),
    /// Compare everything except the given regions.
    Exclude(Vec<GenomeRegion>),
}

impl RegionFilter {
    /// Build a filter from include and exclude region strings (at most one may be non-empty).
    ///
    /// # Errors
    ///
    /// Returns an error if both lists are given or any region fails to parse.
    pub fn from_specs(include: &[String], exclude: &[String], contigs: &[Contig]) -> Result<Self> {
        let parse_all = |specs: &[String]| -> Result<Vec<GenomeRegion>> {
            specs.iter().map(|s| parse_region(s, contigs)).collect()
        };

        match (include.is_empty(), exclude.is_empty()) {
            (true, true) => Ok(Self::All),
            (false, true) => Ok(Self::Include(parse_all(include)?)),
            (true, false) => Ok(Self::Exclude(parse_all(exclude)?)),
            (false, false) => Err(BamDiffError::InvalidParameter {
                parameter: "specific-regions/exclude-regions".to_string(),
                reason: "only one of --specific-regions and --exclude-regions may be given"
                    .to_string(),
            }),
        }
    }

    /// Whether any region restriction applies.
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        !matches!(self, Self::All)
    }

    fn includes_unmapped(&self) -> bool {
        !matches!(self, Self::Include(_))
    }

    /// The sorted, merged `(start, end)` intervals of a contig to compare.
    fn allowed_intervals(&self, contig: &Contig) -> Vec<(usize, usize)> {
        let on_contig = |regions: &[GenomeRegion]| {
            merge_intervals(
                regions
                    .iter()
                    .filter(|r| r.chromosome == contig.name)
                    .map(|r| (r.start, r.end))
                    .collect(),
            )
        };

        match self {
            Self::All => vec![(1, contig.length)],
            Self::Include(regions) => on_contig(regions),
            Self::Exclude(regions) => subtract_intervals((1, contig.length), &on_contig(regions)),
        }
    }
}

/// Sort closed intervals and merge those that overlap or abut.
fn merge_intervals(mut intervals: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    intervals.sort_unstable();
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(intervals.len());
    for (start, end) in intervals {
        match merged.last_mut() {
            Some(last) if start <= last.1.saturating_add(1) => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Remove sorted, merged closed intervals from `whole`.
fn subtract_intervals(whole: (usize, usize), removed: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let mut result = Vec::new();
    let mut cursor = whole.0;
    for &(start, end) in removed {
        if start > cursor {
            result.push((cursor, (start - 1).min(whole.1)));
        }
        cursor = cursor.max(end + 1);
        if cursor > whole.1 {
            return result;
        }
    }
    result.push((cursor, whole.1));
    result
}

/// Build the ordered list of partition tasks covering the genome.
///
/// Each allowed interval of each contig is cut into chunks of at most `partition_size` bases.
/// Task ids are assigned in genome order, and an [`Partition::Unmapped`] task is appended
/// unless the filter restricts the comparison to specific regions.
///
/// # Errors
///
/// Returns an error if `partition_size` is zero.
pub fn build_partitions(
    contigs: &[Contig],
    filter: &RegionFilter,
    partition_size: usize,
) -> Result<Vec<PartitionTask>> {
    crate::validation::validate_positive(partition_size, "partition-size")?;

    let mut partitions = Vec::new();
    for contig in contigs {
        for (start, end) in filter.allowed_intervals(contig) {
            let mut chunk_start = start;
            while chunk_start <= end {
                let chunk_end = chunk_start.saturating_add(partition_size - 1).min(end);
                partitions.push(Partition::Region(GenomeRegion::new(
                    &contig.name,
                    chunk_start,
                    chunk_end,
                )));
                chunk_start = chunk_end + 1;
            }
        }
    }
    if filter.includes_unmapped() {
        partitions.push(Partition::Unmapped);
    }

    Ok(partitions
        .into_iter()
        .enumerate()
        .map(|(id, partition)| PartitionTask { id, partition })
        .collect())
}

/// The single task used when the inputs cannot be queried by region.
#[must_use]
pub fn whole_file_partitions() -> Vec<PartitionTask> {
    vec![PartitionTask { id: 0, partition: Partition::WholeFile }]
}
