//! The shared, write-serialized output file.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use parking_lot::Mutex;

use crate::compare::record::{COLUMNS, ComparisonRecord};

/// Tab-delimited writer of [`ComparisonRecord`] rows that any number of workers may append to.
///
/// Each call to [`ResultSink::write`] appends one whole row under a lock. Rows from different
/// workers interleave in no particular order. Fields are never quoted, so the `diff` column
/// holds the tokens exactly as rendered even when quality text contains `"`.
pub struct ResultSink {
    writer: Mutex<csv::Writer<BufWriter<File>>>,
    path: PathBuf,
    rows: AtomicU64,
}

impl ResultSink {
    /// Create the output file and write the header line.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or the header cannot be written.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .has_headers(false)
            .from_writer(BufWriter::new(file));
        writer
            .write_record(COLUMNS)
            .with_context(|| format!("Failed to write header to: {}", path.display()))?;
        Ok(Self { writer: Mutex::new(writer), path: path.to_path_buf(), rows: AtomicU64::new(0) })
    }

    /// Append one row.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be serialized or written.
    pub fn write(&self, row: &ComparisonRecord) -> Result<()> {
        self.writer
            .lock()
            .serialize(row)
            .with_context(|| format!("Failed to write row to: {}", self.path.display()))?;
        self.rows.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    #[must_use]
    pub fn rows_written(&self) -> u64 {
        self.rows.load(Ordering::Relaxed)
    }

    /// Flush buffered rows and close the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffered rows cannot be flushed.
    pub fn finish(self) -> Result<()> {
        let mut writer = self.writer.into_inner();
        writer.flush().with_context(|| format!("Failed to flush: {}", self.path.display()))
    }
}
