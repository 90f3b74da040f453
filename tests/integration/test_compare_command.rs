//! Integration tests for the compare command.

use fgbamdiff_lib::compare::{ComparisonRecord, MismatchType};
use noodles::sam::alignment::record_buf::RecordBuf;
use rstest::rstest;
use tempfile::TempDir;

use crate::helpers::{
    assert_success, baseline_records, mapped, read_rows, run_compare, unplaced, write_bam,
    write_indexed_bam,
};

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self { dir: TempDir::new().expect("Failed to create temp dir") }
    }

    /// Writes both inputs, indexed or not, and runs compare with `extra` args.
    fn compare(
        &self,
        reference: &[RecordBuf],
        new: &[RecordBuf],
        indexed: bool,
        extra: &[&str],
    ) -> Vec<ComparisonRecord> {
        let ref_bam = self.dir.path().join("ref.bam");
        let new_bam = self.dir.path().join("new.bam");
        let output = self.dir.path().join("diffs.tsv");
        if indexed {
            write_indexed_bam(&ref_bam, reference);
            write_indexed_bam(&new_bam, new);
        } else {
            write_bam(&ref_bam, reference);
            write_bam(&new_bam, new);
        }
        let result = run_compare(&ref_bam, &new_bam, &output, extra);
        assert_success(&result);
        read_rows(&output)
    }
}

/// Reads that differ in every way the comparison recognizes.
fn altered_pair() -> (Vec<RecordBuf>, Vec<RecordBuf>) {
    let reference = baseline_records();
    let new = vec![
        mapped("r1", 0, 100).mapping_quality(10).build(),
        mapped("r3", 0, 7_000).reverse_complement(true).build(),
        mapped("r4", 1, 10).build(),
        mapped("r6", 1, 5_000).build(),
        mapped("r5", 1, 9_000).cigar("5M5S").build(),
        unplaced("u1").build(),
    ];
    (reference, new)
}

#[test]
fn test_identical_inputs_produce_header_only_output() {
    let fixture = Fixture::new();
    let records = baseline_records();
    let rows = fixture.compare(&records, &records, true, &["--threads", "2"]);
    assert!(rows.is_empty());

    let text = std::fs::read_to_string(fixture.dir.path().join("diffs.tsv")).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(text.starts_with("read_id\tchromosome\tposition\tmismatch_type\tdiff\t"));
}

#[rstest]
#[case::indexed_one_thread(true, &["--threads", "1"])]
#[case::indexed_small_partitions(true, &["--threads", "4", "--partition-size", "700"])]
#[case::unindexed(false, &["--threads", "4"])]
fn test_reports_each_kind_of_difference(#[case] indexed: bool, #[case] extra: &[&str]) {
    let (reference, new) = altered_pair();
    let rows = Fixture::new().compare(&reference, &new, indexed, extra);

    let summary: Vec<(&str, MismatchType, &str)> =
        rows.iter().map(|r| (r.read_id.as_str(), r.mismatch_type, r.diff.as_str())).collect();
    assert_eq!(
        summary,
        vec![
            ("r1", MismatchType::Value, "map_qual(60/10)"),
            ("r2", MismatchType::RefOnly, ""),
            ("r5", MismatchType::Value, "cigar(10M/5M5S)"),
            ("r6", MismatchType::NewOnly, ""),
        ]
    );

    let r2 = &rows[1];
    assert_eq!(r2.chromosome, "chr1");
    assert_eq!(r2.position, 2_500);
    assert_eq!(r2.cigar, "10M");
    assert_eq!(r2.map_qual, 60);
    assert_eq!(r2.supplementary_data, "N/A");

    let r6 = &rows[3];
    assert_eq!(r6.chromosome, "chr2");
    assert_eq!(r6.position, 5_000);
}

#[test]
fn test_value_row_describes_reference_record() {
    let reference = vec![mapped("r1", 0, 100).mapping_quality(42).duplicate(true).build()];
    let new = vec![mapped("r1", 0, 100).mapping_quality(7).build()];
    let rows = Fixture::new().compare(&reference, &new, true, &[]);

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.mismatch_type, MismatchType::Value);
    assert_eq!(row.diff, "map_qual(42/7);duplicate(true/false)");
    assert_eq!(row.map_qual, 42);
    assert!(row.duplicate);
}

#[test]
fn test_opposite_strands_compare_bases_in_common_orientation() {
    let reference = vec![mapped("r1", 0, 100).sequence("AACCGGTTAC").build()];
    let new = vec![
        mapped("r1", 0, 100).sequence("GTAACCGGTT").reverse_complement(true).build(),
    ];
    let rows = Fixture::new().compare(&reference, &new, true, &[]);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].diff, "neg_strand(false/true)");
}

#[rstest]
#[case::reported(&[], 1)]
#[case::ignored(&["--ignore-duplicates"], 0)]
#[case::ignored_with_alterations(&["--ignore-alterations"], 0)]
fn test_duplicate_flag_toggle(#[case] extra: &[&str], #[case] expected_rows: usize) {
    let reference = vec![mapped("r1", 0, 100).build()];
    let new = vec![mapped("r1", 0, 100).duplicate(true).build()];
    let rows = Fixture::new().compare(&reference, &new, true, extra);
    assert_eq!(rows.len(), expected_rows);
}

#[rstest]
#[case::reported(&[], true)]
#[case::ignored(&["--ignore-supplementary-attribute"], false)]
fn test_supplementary_attribute_toggle(#[case] extra: &[&str], #[case] reported: bool) {
    let reference = vec![mapped("r1", 0, 100).tag("SA", "chr1,500,+,5M5S,60,0;").build()];
    let new = vec![mapped("r1", 0, 100).build()];
    let rows = Fixture::new().compare(&reference, &new, true, extra);

    if reported {
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].diff, "SA(chr1,500,+,5M5S,60,0;/missing)");
        assert_eq!(rows[0].supplementary_data, "chr1,500,+,5M5S,60,0;");
    } else {
        assert!(rows.is_empty(), "unexpected rows: {rows:?}");
    }
}

#[test]
fn test_ignore_unmapping_hides_placement_changes_when_mate_unmapped() {
    let reference = vec![
        mapped("r1", 0, 100)
            .paired(true)
            .first_segment(true)
            .mapping_quality(30)
            .template_length(250)
            .build(),
    ];
    let new = vec![
        mapped("r1", 0, 100)
            .paired(true)
            .first_segment(true)
            .mate_unmapped(true)
            .mapping_quality(0)
            .build(),
    ];

    let fixture = Fixture::new();
    let rows = fixture.compare(&reference, &new, true, &[]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].diff, "insert_size(250/0);map_qual(30/0);mate_unmapped(false/true)");

    let rows = fixture.compare(&reference, &new, true, &["--ignore-unmapping"]);
    assert!(rows.is_empty(), "unexpected rows: {rows:?}");
}

#[rstest]
#[case::skipped_by_default(&[], 0)]
#[case::compared_when_enabled(&["--ignore-consensus-reads", "false"], 1)]
fn test_consensus_reads(#[case] extra: &[&str], #[case] expected_rows: usize) {
    let reference = vec![mapped("r1", 0, 100).build()];
    let new = vec![mapped("r1", 0, 100).build(), mapped("c1", 0, 200).tag("cD", 5i32).build()];
    let rows = Fixture::new().compare(&reference, &new, true, extra);
    assert_eq!(rows.len(), expected_rows);
}

#[test]
fn test_custom_consensus_tag() {
    let reference = vec![mapped("c1", 0, 200).tag("XC", 3i32).build()];
    let new: Vec<RecordBuf> = Vec::new();

    let fixture = Fixture::new();
    assert_eq!(fixture.compare(&reference, &new, true, &[]).len(), 1);
    assert!(fixture.compare(&reference, &new, true, &["--consensus-tag", "XC"]).is_empty());
}

#[rstest]
#[case::default(&[], 1)]
#[case::ignored(&["--ignore-supplementary-reads"], 0)]
fn test_supplementary_reads(#[case] extra: &[&str], #[case] expected_rows: usize) {
    let reference = vec![mapped("r1", 0, 100).build()];
    let new = vec![mapped("r1", 0, 100).build(), mapped("r1", 0, 300).supplementary(true).build()];
    let rows = Fixture::new().compare(&reference, &new, true, extra);
    assert_eq!(rows.len(), expected_rows);
}

#[test]
fn test_secondary_alignments_are_never_compared() {
    let reference = vec![mapped("r1", 0, 100).build()];
    let new = vec![mapped("r1", 0, 100).build(), mapped("r1", 0, 400).secondary(true).build()];
    assert!(Fixture::new().compare(&reference, &new, true, &[]).is_empty());
}

#[test]
fn test_specific_regions_limit_comparison() {
    let (reference, new) = altered_pair();
    let rows = Fixture::new().compare(&reference, &new, true, &["--specific-regions", "chr2"]);

    let ids: Vec<&str> = rows.iter().map(|r| r.read_id.as_str()).collect();
    assert_eq!(ids, vec!["r5", "r6"]);
}

#[test]
fn test_specific_regions_accept_coordinates() {
    let (reference, new) = altered_pair();
    let rows = Fixture::new().compare(
        &reference,
        &new,
        true,
        &["--specific-regions", "chr1:1-1,000", "chr2:4,000-6,000"],
    );

    let ids: Vec<&str> = rows.iter().map(|r| r.read_id.as_str()).collect();
    assert_eq!(ids, vec!["r1", "r6"]);
}

#[test]
fn test_exclude_regions_skip_comparison() {
    let (reference, new) = altered_pair();
    let rows = Fixture::new().compare(&reference, &new, true, &["--exclude-regions", "chr1"]);

    let ids: Vec<&str> = rows.iter().map(|r| r.read_id.as_str()).collect();
    assert_eq!(ids, vec!["r5", "r6"]);
}

#[test]
fn test_unplaced_reads_are_compared() {
    let reference = vec![mapped("r1", 0, 100).build(), unplaced("u1").build()];
    let new = vec![mapped("r1", 0, 100).build(), unplaced("u2").build()];
    let rows = Fixture::new().compare(&reference, &new, true, &["--threads", "3"]);

    let summary: Vec<(&str, MismatchType)> =
        rows.iter().map(|r| (r.read_id.as_str(), r.mismatch_type)).collect();
    assert_eq!(summary, vec![("u1", MismatchType::RefOnly), ("u2", MismatchType::NewOnly)]);
}

#[test]
fn test_log_read_ids_does_not_change_output() {
    let (reference, new) = altered_pair();
    let fixture = Fixture::new();
    let plain = fixture.compare(&reference, &new, true, &[]);
    let traced = fixture.compare(&reference, &new, true, &["--log-read-ids", "r1,r6"]);
    assert_eq!(plain, traced);
}
