//! Common CLI options shared across commands.
//!
//! These argument structures are composed into command structs using `#[command(flatten)]`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use fgbamdiff_lib::compare::CompareConfig;
use fgbamdiff_lib::partition::DEFAULT_PARTITION_SIZE;
use fgbamdiff_lib::sam::{DEFAULT_CONSENSUS_TAG, DEFAULT_UNMAPPED_MARKER_TAG};
use fgbamdiff_lib::validation::validate_positive;

/// The two BAM files being compared.
#[derive(Debug, Clone, Args)]
pub struct InputPairOptions {
    /// Coordinate-sorted BAM from the reference (baseline) run
    #[arg(short = 'r', long = "reference")]
    pub reference: PathBuf,

    /// Coordinate-sorted BAM from the new run
    #[arg(short = 'n', long = "new")]
    pub new: PathBuf,
}

/// How the genome is split into units of work.
#[derive(Debug, Clone, Args)]
pub struct PartitionOptions {
    /// Reference FASTA whose contigs define the partitions (uses its .fai when present).
    /// Defaults to the contigs of the reference BAM header. Contigs in either BAM header that
    /// are missing from this list are partitioned as well.
    #[arg(short = 'R', long = "ref-genome")]
    pub ref_genome: Option<PathBuf>,

    /// Number of bases per partition
    #[arg(short = 'p', long = "partition-size", default_value_t = DEFAULT_PARTITION_SIZE)]
    pub partition_size: usize,

    /// Only compare these regions (`chr` or `chr:start-end`, 1-based inclusive)
    #[arg(long = "specific-regions", num_args = 1.., conflicts_with = "exclude_regions")]
    pub specific_regions: Vec<String>,

    /// Compare everything except these regions (`chr` or `chr:start-end`)
    #[arg(long = "exclude-regions", num_args = 1..)]
    pub exclude_regions: Vec<String>,
}

impl PartitionOptions {
    /// Validates the partitioning options.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition size is zero.
    pub fn validate(&self) -> Result<()> {
        validate_positive(self.partition_size, "partition-size")?;
        Ok(())
    }
}

/// Which reads are compared and which differences are reported.
#[derive(Debug, Clone, Args)]
pub struct ToleranceOptions {
    /// Do not report duplicate flag differences
    #[arg(long = "ignore-duplicates", default_value_t = false)]
    pub ignore_duplicates: bool,

    /// Do not report unmapped/mate-unmapped differences, nor insert size, CIGAR and mapping
    /// quality differences of reads whose unmapping changed
    #[arg(long = "ignore-unmapping", default_value_t = false)]
    pub ignore_unmapping: bool,

    /// Do not report SA attribute differences
    #[arg(long = "ignore-supplementary-attribute", default_value_t = false)]
    pub ignore_supplementary_attribute: bool,

    /// Ignore every alteration a downstream process may make: implies --ignore-duplicates,
    /// --ignore-unmapping and --ignore-supplementary-attribute
    #[arg(long = "ignore-alterations", default_value_t = false)]
    pub ignore_alterations: bool,

    /// Exclude consensus reads (reads carrying --consensus-tag) from both inputs
    #[arg(
        long = "ignore-consensus-reads",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub ignore_consensus_reads: bool,

    /// Exclude supplementary alignments from both inputs
    #[arg(long = "ignore-supplementary-reads", default_value_t = false)]
    pub ignore_supplementary_reads: bool,

    /// Attribute marking a consensus read
    #[arg(long = "consensus-tag", default_value = DEFAULT_CONSENSUS_TAG)]
    pub consensus_tag: String,

    /// Attribute marking a read unmapped by a downstream process
    #[arg(long = "unmapped-marker-tag", default_value = DEFAULT_UNMAPPED_MARKER_TAG)]
    pub unmapped_marker_tag: String,

    /// Comma-separated read names whose classification is logged at debug level
    #[arg(long = "log-read-ids", value_delimiter = ',')]
    pub log_read_ids: Vec<String>,
}

impl ToleranceOptions {
    /// Builds the comparison settings from the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if either tag is not exactly two characters.
    pub fn to_config(&self) -> Result<CompareConfig> {
        let mut config = CompareConfig {
            ignore_duplicates: self.ignore_duplicates,
            ignore_unmapping: self.ignore_unmapping,
            ignore_supplementary_attribute: self.ignore_supplementary_attribute,
            ignore_consensus_reads: self.ignore_consensus_reads,
            ignore_supplementary_reads: self.ignore_supplementary_reads,
            ..CompareConfig::default()
        }
        .with_tags(&self.consensus_tag, &self.unmapped_marker_tag)?
        .with_traced_reads(self.log_read_ids.iter().filter(|id| !id.is_empty()).cloned());
        if self.ignore_alterations {
            config = config.ignoring_alterations();
        }
        Ok(config)
    }
}
