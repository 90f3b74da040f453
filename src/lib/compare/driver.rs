//! Planning and running a whole comparison.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::bam_io::{bai_path, has_index, read_bam_header};
use crate::compare::config::CompareConfig;
use crate::compare::sink::ResultSink;
use crate::compare::stats::CompareStats;
use crate::compare::worker::{ComparisonInputs, ReadMode, run_partitions};
use crate::errors::BamDiffError;
use crate::logging::format_count;
use crate::partition::{PartitionTask, RegionFilter, build_partitions, whole_file_partitions};
use crate::reference::{Contig, header_contigs, merge_contigs, read_fasta_contigs};

/// Inputs, output and partitioning of one comparison run.
#[derive(Debug, Clone)]
pub struct ComparisonJob {
    pub reference_bam: PathBuf,
    pub new_bam: PathBuf,
    pub output: PathBuf,
    /// FASTA whose contigs define the partitions; the reference BAM header is used otherwise.
    /// Contigs named by either BAM header but missing here are partitioned too.
    pub ref_genome: Option<PathBuf>,
    pub partition_size: usize,
    pub threads: usize,
    pub include_regions: Vec<String>,
    pub exclude_regions: Vec<String>,
}

/// How a job will read its inputs and the tasks it will run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonPlan {
    pub mode: ReadMode,
    pub tasks: Vec<PartitionTask>,
}

impl ComparisonJob {
    /// The contigs to partition: the FASTA's or the reference header's, then any other contig
    /// either BAM header names.
    fn contigs(&self) -> Result<Vec<Contig>> {
        let reference = header_contigs(&read_bam_header(&self.reference_bam)?);
        let new = header_contigs(&read_bam_header(&self.new_bam)?);

        match &self.ref_genome {
            Some(fasta) => {
                let mut contigs = read_fasta_contigs(fasta)?;
                let mut missing = merge_contigs(&mut contigs, &reference);
                missing.extend(merge_contigs(&mut contigs, &new));
                if !missing.is_empty() {
                    warn!(
                        "{} BAM contig(s) not in {}, partitioned from the BAM headers: {}",
                        missing.len(),
                        fasta.display(),
                        missing.join(", ")
                    );
                }
                Ok(contigs)
            }
            None => {
                let mut contigs = reference;
                let added = merge_contigs(&mut contigs, &new);
                if !added.is_empty() {
                    info!(
                        "{} contig(s) only in the new BAM header: {}",
                        added.len(),
                        added.join(", ")
                    );
                }
                Ok(contigs)
            }
        }
    }

    /// Decide how the inputs are read and build the partition tasks.
    ///
    /// Both inputs must be indexed for region partitions. Otherwise the whole files are
    /// compared as a single task, which is an error when regions were requested.
    ///
    /// # Errors
    ///
    /// Returns an error if the contigs cannot be read, a region is invalid, or regions were
    /// requested for unindexed inputs.
    pub fn plan(&self) -> Result<ComparisonPlan> {
        let contigs = self.contigs()?;
        let filter =
            RegionFilter::from_specs(&self.include_regions, &self.exclude_regions, &contigs)?;

        let unindexed: Vec<&Path> = [self.reference_bam.as_path(), self.new_bam.as_path()]
            .into_iter()
            .filter(|path| !has_index(path))
            .collect();

        if unindexed.is_empty() {
            let tasks = build_partitions(&contigs, &filter, self.partition_size)?;
            return Ok(ComparisonPlan { mode: ReadMode::Indexed, tasks });
        }

        let missing =
            unindexed.iter().map(|p| bai_path(p).display().to_string()).collect::<Vec<_>>();
        if filter.is_restricted() {
            return Err(BamDiffError::InvalidParameter {
                parameter: "specific-regions/exclude-regions".to_string(),
                reason: format!("region restrictions require BAM indexes: {}", missing.join(", ")),
            }
            .into());
        }
        warn!(
            "No index found ({}); comparing whole files in a single partition",
            missing.join(", ")
        );
        Ok(ComparisonPlan { mode: ReadMode::Sequential, tasks: whole_file_partitions() })
    }

    /// Plan and run the comparison, writing every difference to the output file.
    ///
    /// # Errors
    ///
    /// Returns an error if planning fails, the output cannot be created, or any partition
    /// fails to compare.
    pub fn run(&self, config: &CompareConfig) -> Result<CompareStats> {
        let plan = self.plan()?;
        info!(
            "Comparing {} against {} ({} tasks, {:?} reads)",
            self.new_bam.display(),
            self.reference_bam.display(),
            format_count(plan.tasks.len() as u64),
            plan.mode
        );

        let sink = ResultSink::create(&self.output)?;
        let inputs =
            ComparisonInputs { reference: &self.reference_bam, new: &self.new_bam, mode: plan.mode };
        let stats = run_partitions(&inputs, plan.tasks, config, &sink, self.threads)?;

        let rows = sink.rows_written();
        sink.finish().with_context(|| format!("Failed to close {}", self.output.display()))?;
        info!("Wrote {} rows to {}", format_count(rows), self.output.display());
        stats.log_summary();
        Ok(stats)
    }
}
