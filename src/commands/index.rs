//! Write `.bai` indexes so BAMs can be compared partition by partition.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fgbamdiff_lib::bam_io::write_bai_index;
use fgbamdiff_lib::logging::OperationTimer;
use fgbamdiff_lib::validation::validate_file_exists;
use log::info;

use crate::commands::command::Command;

/// Index coordinate-sorted BAM files.
#[derive(Debug, Parser)]
#[command(
    name = "index",
    about = "\x1b[38;5;72m[UTILITIES]\x1b[0m      \x1b[36mWrite .bai indexes for coordinate-sorted BAMs\x1b[0m",
    long_about = r#"
Write a BAI index next to each input BAM (`<input>.bai`).

`fgbamdiff compare` splits the genome into partitions only when both inputs are indexed.

Example usage:
  fgbamdiff index -i ref.bam new.bam
"#
)]
pub struct Index {
    /// Coordinate-sorted BAM files to index
    #[arg(short = 'i', long = "input", num_args = 1.., required = true)]
    pub inputs: Vec<PathBuf>,
}

impl Command for Index {
    fn execute(&self, _command_line: &str) -> Result<()> {
        for input in &self.inputs {
            validate_file_exists(input, "Input BAM")?;
        }

        let timer = OperationTimer::new("Indexing BAMs", "BAMs");
        for input in &self.inputs {
            let index = write_bai_index(input)?;
            info!("Wrote {}", index.display());
        }
        timer.log_completion(self.inputs.len() as u64);
        Ok(())
    }
}
