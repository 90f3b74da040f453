//! Failure modes of the command line: usage errors, bad inputs and unsorted data.

use rstest::rstest;
use tempfile::TempDir;

use crate::helpers::{
    baseline_records, mapped, run_compare, run_fgbamdiff, write_bam, write_indexed_bam,
};

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_help_exits_zero() {
    let output = run_fgbamdiff(&["compare", "--help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("--reference"));
}

#[rstest]
#[case::no_arguments(&["compare"])]
#[case::missing_new(&["compare", "-r", "ref.bam", "-o", "out.tsv"])]
#[case::unknown_flag(&["compare", "-r", "a.bam", "-n", "b.bam", "-o", "o.tsv", "--bogus"])]
#[case::bad_thread_count(&["compare", "-r", "a.bam", "-n", "b.bam", "-o", "o.tsv", "-t", "x"])]
#[case::unknown_subcommand(&["frobnicate"])]
fn test_usage_errors_exit_one(#[case] args: &[&str]) {
    let output = run_fgbamdiff(args);
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));
}

#[test]
fn test_include_and_exclude_regions_conflict() {
    let output = run_fgbamdiff(&[
        "compare",
        "-r",
        "a.bam",
        "-n",
        "b.bam",
        "-o",
        "o.tsv",
        "--specific-regions",
        "chr1",
        "--exclude-regions",
        "chr2",
    ]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let reference = dir.path().join("ref.bam");
    write_indexed_bam(&reference, &baseline_records());

    let output =
        run_compare(&reference, &dir.path().join("absent.bam"), &dir.path().join("o.tsv"), &[]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("absent.bam"));
}

#[test]
fn test_missing_output_directory_fails() {
    let dir = TempDir::new().unwrap();
    let bam = dir.path().join("ref.bam");
    write_indexed_bam(&bam, &baseline_records());

    let output = run_compare(&bam, &bam, &dir.path().join("nope").join("o.tsv"), &[]);
    assert!(!output.status.success());
}

#[rstest]
#[case::zero_partition_size(&["--partition-size", "0"])]
#[case::zero_threads(&["--threads", "0"])]
#[case::bad_tag(&["--consensus-tag", "TOOLONG"])]
#[case::unknown_contig(&["--specific-regions", "chr9"])]
#[case::reversed_region(&["--specific-regions", "chr1:500-100"])]
fn test_invalid_parameters_fail(#[case] extra: &[&str]) {
    let dir = TempDir::new().unwrap();
    let bam = dir.path().join("ref.bam");
    write_indexed_bam(&bam, &baseline_records());

    let output = run_compare(&bam, &bam, &dir.path().join("o.tsv"), extra);
    assert!(!output.status.success(), "expected failure for {extra:?}");
}

#[test]
fn test_regions_require_indexes() {
    let dir = TempDir::new().unwrap();
    let reference = dir.path().join("ref.bam");
    let new = dir.path().join("new.bam");
    write_indexed_bam(&reference, &baseline_records());
    write_bam(&new, &baseline_records());

    let output =
        run_compare(&reference, &new, &dir.path().join("o.tsv"), &["--specific-regions", "chr1"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains(".bai"), "stderr: {}", stderr(&output));
}

#[rstest]
#[case::reference_unsorted(true, "Reference")]
#[case::new_unsorted(false, "New")]
fn test_unsorted_input_fails(#[case] reference_unsorted: bool, #[case] side: &str) {
    let dir = TempDir::new().unwrap();
    let sorted = dir.path().join("sorted.bam");
    let unsorted = dir.path().join("unsorted.bam");
    write_bam(&sorted, &[mapped("a", 0, 100).build(), mapped("b", 0, 500).build()]);
    write_bam(&unsorted, &[mapped("b", 0, 500).build(), mapped("a", 0, 100).build()]);

    let (reference, new) =
        if reference_unsorted { (&unsorted, &sorted) } else { (&sorted, &unsorted) };
    let output = run_compare(reference, new, &dir.path().join("o.tsv"), &[]);

    assert!(!output.status.success());
    let message = stderr(&output);
    assert!(message.contains("not coordinate sorted"), "stderr: {message}");
    assert!(message.contains(side), "stderr: {message}");
}
