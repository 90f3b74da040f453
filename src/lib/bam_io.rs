//! BAM reading for the comparison engine.
//!
//! Each comparison worker owns one [`AlignmentReader`] per input. The reader wraps either an
//! indexed BAM reader (for [`Partition::Region`] and [`Partition::Unmapped`] partitions) or a
//! sequential reader (for [`Partition::WholeFile`]), and hands out [`RecordStream`]s that carry
//! the header and the contig ordering needed to compare positions across the two inputs.

use anyhow::{Context, Result, bail};
use noodles::bam;
use noodles::bam::bai;
use noodles::bgzf;
use noodles::core::{Position, Region};
use noodles::sam::Header;
use noodles::sam::alignment::record_buf::RecordBuf;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::partition::Partition;

/// Indexed BAM reader over a file.
pub type IndexedBamReader = bam::io::IndexedReader<bgzf::io::Reader<File>>;

/// Sequential BAM reader over a file.
pub type SequentialBamReader = bam::io::Reader<bgzf::io::Reader<File>>;

/// Path of the BAI index expected next to a BAM (`<bam>.bai`).
#[must_use]
pub fn bai_path(bam_path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.bai", bam_path.display()))
}

/// Whether a BAM has a BAI index next to it.
#[must_use]
pub fn has_index(bam_path: &Path) -> bool {
    bai_path(bam_path).exists()
}

/// Build a BAI index for a coordinate-sorted BAM and write it to `<bam>.bai`.
///
/// # Errors
///
/// Returns an error if the BAM cannot be indexed (e.g. it is not coordinate sorted) or the
/// index cannot be written.
pub fn write_bai_index(bam_path: &Path) -> Result<PathBuf> {
    let index = bam::fs::index(bam_path)
        .with_context(|| format!("Failed to index BAM: {}", bam_path.display()))?;
    let index_path = bai_path(bam_path);
    let file = File::create(&index_path)
        .with_context(|| format!("Failed to create BAI index: {}", index_path.display()))?;
    let mut writer = bai::io::Writer::new(file);
    writer
        .write_index(&index)
        .with_context(|| format!("Failed to write BAI index: {}", index_path.display()))?;
    Ok(index_path)
}

/// Read only the header of a BAM file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or its header cannot be parsed.
pub fn read_bam_header(path: &Path) -> Result<Header> {
    let mut reader = bam::io::reader::Builder
        .build_from_path(path)
        .with_context(|| format!("Failed to open input BAM: {}", path.display()))?;
    reader.read_header().with_context(|| format!("Failed to read BAM header: {}", path.display()))
}

/// Sort key of a record in coordinate order.
///
/// Placed records order by contig rank then alignment start; unplaced records order last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PositionKey {
    contig: usize,
    position: usize,
}

impl PositionKey {
    /// Key shared by all unplaced records.
    pub const UNPLACED: Self = Self { contig: usize::MAX, position: 0 };

    #[must_use]
    pub const fn new(contig: usize, position: usize) -> Self {
        Self { contig, position }
    }
}

/// Maps one header's reference sequence ids onto a shared contig ranking.
///
/// The ranking is the reference BAM's header order. Contigs that only exist in the other
/// header rank after every shared contig, in their own header order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContigOrder {
    ranks: Vec<usize>,
}

impl ContigOrder {
    /// The ranking of a header against itself.
    #[must_use]
    pub fn identity(header: &Header) -> Self {
        Self { ranks: (0..header.reference_sequences().len()).collect() }
    }

    /// The ranking of `header`'s contigs in `canonical`'s order.
    #[must_use]
    pub fn relative_to(header: &Header, canonical: &Header) -> Self {
        let canonical_refs = canonical.reference_sequences();
        let ranks = header
            .reference_sequences()
            .keys()
            .enumerate()
            .map(|(id, name)| {
                canonical_refs.get_index_of(name).unwrap_or(canonical_refs.len() + id)
            })
            .collect();
        Self { ranks }
    }

    /// The coordinate sort key of a record.
    #[must_use]
    pub fn key(&self, record: &RecordBuf) -> PositionKey {
        match record.reference_sequence_id() {
            Some(id) => PositionKey {
                contig: self.ranks.get(id).copied().unwrap_or(usize::MAX - 1),
                position: record.alignment_start().map_or(0, usize::from),
            },
            None => PositionKey::UNPLACED,
        }
    }
}

/// A stream of records from one input for one partition.
pub struct RecordStream<'a> {
    records: Box<dyn Iterator<Item = io::Result<RecordBuf>> + 'a>,
    header: &'a Header,
    order: &'a ContigOrder,
}

impl<'a> RecordStream<'a> {
    pub fn new(
        records: Box<dyn Iterator<Item = io::Result<RecordBuf>> + 'a>,
        header: &'a Header,
        order: &'a ContigOrder,
    ) -> Self {
        Self { records, header, order }
    }

    /// A stream over records already in memory.
    pub fn from_records(
        records: Vec<RecordBuf>,
        header: &'a Header,
        order: &'a ContigOrder,
    ) -> Self {
        Self::new(Box::new(records.into_iter().map(Ok)), header, order)
    }

    #[must_use]
    pub fn header(&self) -> &'a Header {
        self.header
    }

    /// Pair each record with its sort key.
    pub fn keyed(self) -> impl Iterator<Item = io::Result<(PositionKey, RecordBuf)>> + 'a {
        let order = self.order;
        self.records.map(move |result| result.map(|record| (order.key(&record), record)))
    }
}

impl Iterator for RecordStream<'_> {
    type Item = io::Result<RecordBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.next()
    }
}

enum ReaderKind {
    Indexed(Box<IndexedBamReader>),
    Sequential(Box<SequentialBamReader>),
}

/// A BAM reader owned by a single worker for the lifetime of a run.
pub struct AlignmentReader {
    kind: ReaderKind,
    header: Header,
    order: ContigOrder,
    path: PathBuf,
}

impl AlignmentReader {
    /// Open a BAM with its index so partitions can be fetched by region.
    ///
    /// # Errors
    ///
    /// Returns an error if the BAM or its index cannot be opened.
    pub fn open_indexed(path: &Path) -> Result<Self> {
        let mut reader = bam::io::indexed_reader::Builder::default()
            .build_from_path(path)
            .with_context(|| format!("Failed to open indexed BAM: {}", path.display()))?;
        let header = reader
            .read_header()
            .with_context(|| format!("Failed to read BAM header: {}", path.display()))?;
        Ok(Self::new(ReaderKind::Indexed(Box::new(reader)), header, path))
    }

    /// Open a BAM for reading from start to end.
    ///
    /// # Errors
    ///
    /// Returns an error if the BAM cannot be opened.
    pub fn open_sequential(path: &Path) -> Result<Self> {
        let mut reader = bam::io::reader::Builder
            .build_from_path(path)
            .with_context(|| format!("Failed to open input BAM: {}", path.display()))?;
        let header = reader
            .read_header()
            .with_context(|| format!("Failed to read BAM header: {}", path.display()))?;
        Ok(Self::new(ReaderKind::Sequential(Box::new(reader)), header, path))
    }

    fn new(kind: ReaderKind, header: Header, path: &Path) -> Self {
        let order = ContigOrder::identity(&header);
        Self { kind, header, order, path: path.to_path_buf() }
    }

    /// Rank this file's contigs in the order of another header.
    #[must_use]
    pub fn with_contig_order_from(mut self, canonical: &Header) -> Self {
        self.order = ContigOrder::relative_to(&self.header, canonical);
        self
    }

    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Stream the records of a partition.
    ///
    /// Region partitions return every record overlapping the region, in coordinate order. A
    /// region on a contig this file's header does not contain yields an empty stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the partition kind does not match how the reader
    /// was opened.
    pub fn fetch(&mut self, partition: &Partition) -> Result<RecordStream<'_>> {
        let Self { kind, header, order, path } = self;
        let header: &Header = header;

        let records: Box<dyn Iterator<Item = io::Result<RecordBuf>> + '_> = match (kind, partition)
        {
            (ReaderKind::Indexed(reader), Partition::Region(region)) => {
                if header.reference_sequences().contains_key(region.chromosome.as_bytes()) {
                    let start = Position::try_from(region.start)?;
                    let end = Position::try_from(region.end)?;
                    let query_region = Region::new(region.chromosome.as_str(), start..=end);
                    let query = reader.query(header, &query_region).with_context(|| {
                        format!("Failed to query {region} in {}", path.display())
                    })?;
                    Box::new(query.map(move |result| {
                        result.and_then(|record| {
                            RecordBuf::try_from_alignment_record(header, &record)
                        })
                    }))
                } else {
                    Box::new(std::iter::empty())
                }
            }
            (ReaderKind::Indexed(reader), Partition::Unmapped) => {
                let query = reader.query_unmapped().with_context(|| {
                    format!("Failed to query unmapped reads in {}", path.display())
                })?;
                Box::new(query.map(move |result| {
                    result.and_then(|record| RecordBuf::try_from_alignment_record(header, &record))
                }))
            }
            (ReaderKind::Sequential(reader), Partition::WholeFile) => {
                Box::new(reader.record_bufs(header))
            }
            (ReaderKind::Indexed(_), Partition::WholeFile) => {
                bail!("Indexed reader for {} cannot stream the whole file", path.display())
            }
            (ReaderKind::Sequential(_), partition) => {
                bail!("Sequential reader for {} cannot fetch {partition}", path.display())
            }
        };

        Ok(RecordStream::new(records, header, order))
    }
}
