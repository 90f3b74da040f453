//! Running the binary and reading its output.

#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

use fgbamdiff_lib::compare::ComparisonRecord;
use fgoxide::io::DelimFile;

/// Runs `fgbamdiff` with the given arguments.
pub fn run_fgbamdiff(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fgbamdiff"))
        .args(args)
        .output()
        .expect("Failed to run fgbamdiff")
}

/// Runs `fgbamdiff compare` on `reference` and `new` writing to `output`, plus `extra` args.
pub fn run_compare(reference: &Path, new: &Path, output: &Path, extra: &[&str]) -> Output {
    let mut args = vec![
        "compare",
        "-r",
        reference.to_str().unwrap(),
        "-n",
        new.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ];
    args.extend_from_slice(extra);
    run_fgbamdiff(&args)
}

/// Reads every row of a comparison output file, sorted by read name then type.
pub fn read_rows(path: &Path) -> Vec<ComparisonRecord> {
    let mut rows: Vec<ComparisonRecord> =
        DelimFile::default().read_tsv(&path).expect("Failed to read output");
    rows.sort_by(|a, b| (&a.read_id, a.mismatch_type).cmp(&(&b.read_id, b.mismatch_type)));
    rows
}

/// Asserts the process succeeded, printing stderr otherwise.
pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "fgbamdiff failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}
