//! Custom error types for fgbamdiff operations.

use thiserror::Error;

/// Result type alias for fgbamdiff operations
pub type Result<T> = std::result::Result<T, BamDiffError>;

/// Error type for fgbamdiff operations
#[derive(Error, Debug)]
pub enum BamDiffError {
    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "BAM", "FASTA index")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// A region string could not be parsed or does not fit the genome
    #[error("Invalid region '{region}': {reason}")]
    InvalidRegion {
        /// The region as given on the command line
        region: String,
        /// Explanation of the problem
        reason: String,
    },

    /// Records were not in coordinate order
    #[error("{side} input is not coordinate sorted: '{read}' at {position} follows {previous}")]
    UnsortedInput {
        /// Which input ("Reference" or "New")
        side: String,
        /// Name of the out-of-order read
        read: String,
        /// Location of the out-of-order read
        position: String,
        /// Location of the preceding read
        previous: String,
    },
}
