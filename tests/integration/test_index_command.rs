//! Integration tests for the index command.

use fgbamdiff_lib::bam_io::{bai_path, has_index};
use tempfile::TempDir;

use crate::helpers::{
    assert_success, baseline_records, mapped, read_rows, run_compare, run_fgbamdiff, write_bam,
};

#[test]
fn test_index_writes_bai_next_to_each_input() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.bam");
    let second = dir.path().join("second.bam");
    write_bam(&first, &baseline_records());
    write_bam(&second, &baseline_records());

    let output =
        run_fgbamdiff(&["index", "-i", first.to_str().unwrap(), second.to_str().unwrap()]);
    assert_success(&output);

    for bam in [&first, &second] {
        assert!(has_index(bam));
        assert!(bai_path(bam).metadata().unwrap().len() > 0);
    }
}

#[test]
fn test_indexed_inputs_support_region_comparison() {
    let dir = TempDir::new().unwrap();
    let reference = dir.path().join("ref.bam");
    let new = dir.path().join("new.bam");
    let tsv = dir.path().join("diffs.tsv");
    write_bam(&reference, &baseline_records());
    let mut altered = baseline_records();
    altered[3] = mapped("r4", 1, 10).mapping_quality(3).build();
    write_bam(&new, &altered);

    let output = run_compare(&reference, &new, &tsv, &["--specific-regions", "chr2"]);
    assert!(!output.status.success());

    assert_success(&run_fgbamdiff(&[
        "index",
        "-i",
        reference.to_str().unwrap(),
        new.to_str().unwrap(),
    ]));
    assert_success(&run_compare(&reference, &new, &tsv, &["--specific-regions", "chr2"]));

    let rows = read_rows(&tsv);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].read_id, "r4");
    assert_eq!(rows[0].diff, "map_qual(60/3)");
}

#[test]
fn test_index_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let output = run_fgbamdiff(&["index", "-i", dir.path().join("absent.bam").to_str().unwrap()]);
    assert!(!output.status.success());
}
