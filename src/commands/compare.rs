//! Compare a reference BAM against a new BAM and report every per-read difference.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fgbamdiff_lib::compare::ComparisonJob;
use fgbamdiff_lib::logging::OperationTimer;
use fgbamdiff_lib::validation::{
    validate_files_exist, validate_output_parent_exists, validate_positive,
};
use log::info;

use crate::commands::command::Command;
use crate::commands::common::{InputPairOptions, PartitionOptions, ToleranceOptions};

/// Compare two coordinate-sorted BAM files read by read.
#[derive(Debug, Parser)]
#[command(
    name = "compare",
    about = "\x1b[38;5;166m[COMPARISON]\x1b[0m     \x1b[36mReport per-read differences between two BAMs\x1b[0m",
    long_about = r#"
Compare a reference BAM and a new BAM of the same sample, read by read.

Both inputs must be coordinate sorted. The genome is split into partitions that are compared
concurrently. Within a partition, reads are matched by name, supplementary flag, unmapped flag
and (for pairs) first-of-pair flag among the reads that start at the same position.

Every difference is written as one row of a tab-delimited file:

  VALUE     the read is present in both inputs and at least one field differs; the `diff`
            column lists `field(reference/new)` tokens separated by `;`
  REF_ONLY  the read is only present in the reference input
  NEW_ONLY  the read is only present in the new input

Compared fields, in order: insert_size, cigar, map_qual, neg_strand, duplicate, unmapped,
mate_unmapped, SA, MC, bases, base_quals. Bases and base qualities are compared in a common
orientation when the two reads are on different strands.

Secondary alignments are never compared. Consensus reads are skipped by default.

Region partitions require a .bai index next to each BAM (see `fgbamdiff index`). Without
indexes the whole files are compared as a single partition.

Example usage:
  fgbamdiff compare -r ref.bam -n new.bam -o diffs.tsv --threads 8
  fgbamdiff compare -r ref.bam -n new.bam -o diffs.tsv --ignore-alterations
  fgbamdiff compare -r ref.bam -n new.bam -o diffs.tsv --specific-regions chr1:1-5,000,000
"#
)]
pub struct Compare {
    /// The reference and new BAMs
    #[command(flatten)]
    pub inputs: InputPairOptions,

    /// Output tab-delimited file of differences
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Number of worker threads
    #[arg(short = 't', long = "threads", default_value_t = 1)]
    pub threads: usize,

    /// Partitioning options
    #[command(flatten)]
    pub partitions: PartitionOptions,

    /// Read filters and tolerated differences
    #[command(flatten)]
    pub tolerance: ToleranceOptions,
}

impl Compare {
    fn job(&self) -> ComparisonJob {
        ComparisonJob {
            reference_bam: self.inputs.reference.clone(),
            new_bam: self.inputs.new.clone(),
            output: self.output.clone(),
            ref_genome: self.partitions.ref_genome.clone(),
            partition_size: self.partitions.partition_size,
            threads: self.threads,
            include_regions: self.partitions.specific_regions.clone(),
            exclude_regions: self.partitions.exclude_regions.clone(),
        }
    }
}

impl Command for Compare {
    fn execute(&self, _command_line: &str) -> Result<()> {
        validate_files_exist(&[
            (&self.inputs.reference, "Reference BAM"),
            (&self.inputs.new, "New BAM"),
        ])?;
        if let Some(fasta) = &self.partitions.ref_genome {
            validate_files_exist(&[(fasta, "Reference FASTA")])?;
        }
        validate_output_parent_exists(&self.output, "Output file")?;
        self.partitions.validate()?;
        validate_positive(self.threads, "threads")?;
        let config = self.tolerance.to_config()?;

        let timer = OperationTimer::new("Comparing BAMs", "reads");
        info!("Reference: {}", self.inputs.reference.display());
        info!("New: {}", self.inputs.new.display());
        info!("Output: {}", self.output.display());
        info!("Threads: {}", self.threads);
        if config.ignore_duplicates {
            info!("Ignoring duplicate flag differences");
        }
        if config.ignore_unmapping {
            info!("Ignoring downstream unmapping differences");
        }
        if config.ignore_supplementary_attribute {
            info!("Ignoring SA attribute differences");
        }
        if config.ignore_supplementary_reads {
            info!("Skipping supplementary alignments");
        }
        if !config.ignore_consensus_reads {
            info!("Comparing consensus reads");
        }

        let stats = self.job().run(&config)?;
        timer.log_completion(stats.reference_reads + stats.new_reads);
        Ok(())
    }
}
