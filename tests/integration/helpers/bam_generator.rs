//! Utilities for generating test BAM data programmatically.

#![allow(dead_code)]

use std::fs::File;
use std::path::{Path, PathBuf};

use fgbamdiff_lib::bam_io::write_bai_index;
use fgbamdiff_lib::sam::builder::RecordBuilder;
use noodles::bam;
use noodles::sam::Header;
use noodles::sam::alignment::io::Write as AlignmentWrite;
use noodles::sam::alignment::record_buf::RecordBuf;

/// Length of every contig in [`two_contig_header`].
pub const CONTIG_LENGTH: usize = 10_000;

/// A coordinate-sorted header with `chr1` and `chr2`.
pub fn two_contig_header() -> Header {
    format!(
        "@HD\tVN:1.6\tSO:coordinate\n@SQ\tSN:chr1\tLN:{CONTIG_LENGTH}\n@SQ\tSN:chr2\tLN:{CONTIG_LENGTH}\n"
    )
    .parse()
    .expect("valid header")
}

/// Writes `records` in the given order to a BAM at `path`.
pub fn write_bam(path: &Path, records: &[RecordBuf]) {
    let header = two_contig_header();
    let mut writer = bam::io::Writer::new(File::create(path).expect("Failed to create BAM file"));
    writer.write_header(&header).expect("Failed to write header");
    for record in records {
        writer.write_alignment_record(&header, record).expect("Failed to write record");
    }
    writer.finish(&header).expect("Failed to finish BAM");
}

/// Writes `records` to a BAM at `path` and indexes it.
pub fn write_indexed_bam(path: &Path, records: &[RecordBuf]) -> PathBuf {
    write_bam(path, records);
    write_bai_index(path).expect("Failed to index BAM")
}

/// A mapped, unpaired 10bp forward read.
pub fn mapped(name: &str, contig: usize, start: usize) -> RecordBuilder {
    RecordBuilder::mapped_read()
        .name(name)
        .reference_sequence_id(contig)
        .alignment_start(start)
        .sequence("ACGTACGTAC")
        .cigar("10M")
}

/// An unplaced, unmapped read.
pub fn unplaced(name: &str) -> RecordBuilder {
    RecordBuilder::new().name(name).unmapped(true).sequence("ACGTACGTAC")
}

/// A baseline set of coordinate-sorted reads spread over both contigs.
pub fn baseline_records() -> Vec<RecordBuf> {
    vec![
        mapped("r1", 0, 100).build(),
        mapped("r2", 0, 2_500).build(),
        mapped("r3", 0, 7_000).reverse_complement(true).build(),
        mapped("r4", 1, 10).build(),
        mapped("r5", 1, 9_000).build(),
        unplaced("u1").build(),
    ]
}
