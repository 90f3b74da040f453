//! Input validation utilities
//!
//! Common validation functions for command-line parameters and file paths with consistent
//! error messages. All functions return structured errors from [`crate::errors`].

use crate::errors::{BamDiffError, Result};
use noodles::sam::alignment::record::data::field::Tag;
use std::fmt::Display;
use std::path::Path;

/// Validate that a file exists
///
/// # Arguments
/// * `path` - Path to validate
/// * `description` - Human-readable description of the file (e.g., "Reference BAM")
///
/// # Errors
/// Returns an error if the file does not exist
///
/// # Example
/// ```
/// use fgbamdiff_lib::validation::validate_file_exists;
///
/// let result = validate_file_exists("/nonexistent/file.bam", "Reference BAM");
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        return Err(BamDiffError::InvalidFileFormat {
            file_type: description.to_string(),
            path: path_ref.display().to_string(),
            reason: "File does not exist".to_string(),
        });
    }
    Ok(())
}

/// Validate that multiple files exist
///
/// # Errors
/// Returns an error for the first file that doesn't exist
pub fn validate_files_exist<P: AsRef<Path>>(files: &[(P, &str)]) -> Result<()> {
    for (path, desc) in files {
        validate_file_exists(path, desc)?;
    }
    Ok(())
}

/// Validate that the directory an output file will be written into exists
///
/// # Errors
/// Returns an error if the parent directory is missing
pub fn validate_output_parent_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    match path_ref.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            Err(BamDiffError::InvalidParameter {
                parameter: description.to_string(),
                reason: format!("Output directory does not exist: {}", parent.display()),
            })
        }
        _ => Ok(()),
    }
}

/// Validate that a SAM tag is exactly 2 characters
///
/// # Errors
/// Returns an error if the tag is not exactly 2 characters
///
/// # Example
/// ```
/// use fgbamdiff_lib::validation::validate_tag;
///
/// assert_eq!(validate_tag("cD", "consensus tag").unwrap(), [b'c', b'D']);
/// assert!(validate_tag("ABC", "consensus tag").is_err());
/// ```
pub fn validate_tag(tag: &str, name: &str) -> Result<[u8; 2]> {
    match tag.as_bytes() {
        &[a, b] => Ok([a, b]),
        _ => Err(BamDiffError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("Tag must be exactly 2 characters, got: '{tag}'"),
        }),
    }
}

/// Convert a validated string tag to a noodles [`Tag`]
///
/// # Errors
/// Returns an error if the tag is not exactly 2 characters
pub fn string_to_tag(tag: &str, name: &str) -> Result<Tag> {
    Ok(Tag::from(validate_tag(tag, name)?))
}

/// Validate that a value is positive (> 0)
///
/// # Errors
/// Returns an error if the value is zero or negative
///
/// # Example
/// ```
/// use fgbamdiff_lib::validation::validate_positive;
///
/// assert!(validate_positive(4, "threads").is_ok());
/// assert!(validate_positive(0, "threads").is_err());
/// ```
pub fn validate_positive<T: Ord + Display + Default>(value: T, name: &str) -> Result<()> {
    if value <= T::default() {
        return Err(BamDiffError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("Must be positive (> 0), got: {value}"),
        });
    }
    Ok(())
}
