//! Integration tests for the fgbamdiff binary.
//!
//! Each test writes small BAMs into a temporary directory, runs the binary and inspects
//! the tab-delimited output.

mod helpers;
mod test_compare_command;
mod test_error_paths;
mod test_index_command;
