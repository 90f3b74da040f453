//! Concurrent execution of partition comparisons.
//!
//! All tasks are queued before any worker starts. Each worker opens its own pair of readers
//! once, then pops and compares partitions until the queue is empty or another worker has
//! failed. The first failure is kept and returned once every worker has stopped.

use std::any::Any;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use anyhow::{Result, anyhow};
use crossbeam_queue::SegQueue;
use log::{debug, info};
use parking_lot::Mutex;

use crate::bam_io::AlignmentReader;
use crate::compare::comparator::PartitionComparator;
use crate::compare::config::CompareConfig;
use crate::compare::sink::ResultSink;
use crate::compare::stats::CompareStats;
use crate::logging::format_count;
use crate::partition::PartitionTask;
use crate::progress::ProgressTracker;

/// FIFO of partition tasks shared by all workers.
#[derive(Debug, Default)]
pub struct WorkQueue {
    tasks: SegQueue<PartitionTask>,
}

impl WorkQueue {
    #[must_use]
    pub fn new(tasks: impl IntoIterator<Item = PartitionTask>) -> Self {
        let queue = Self::default();
        for task in tasks {
            queue.enqueue(task);
        }
        queue
    }

    pub fn enqueue(&self, task: PartitionTask) {
        self.tasks.push(task);
    }

    /// Take the next task, or `None` once the queue is empty.
    pub fn try_dequeue(&self) -> Option<PartitionTask> {
        self.tasks.pop()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// How workers open the input BAMs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Random access through `.bai` indexes; partitions are regions and unmapped reads.
    Indexed,
    /// Sequential reads of the whole file.
    Sequential,
}

/// The pair of inputs every worker opens.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonInputs<'a> {
    pub reference: &'a Path,
    pub new: &'a Path,
    pub mode: ReadMode,
}

/// Number of workers for a run: the configured thread count capped at the number of tasks,
/// and at least one.
#[must_use]
pub fn worker_count(threads: usize, tasks: usize) -> usize {
    threads.min(tasks).max(1)
}

/// Readers and counters owned by one worker for its lifetime.
struct WorkerContext {
    reference: AlignmentReader,
    new: AlignmentReader,
    stats: CompareStats,
}

impl WorkerContext {
    fn open(inputs: &ComparisonInputs<'_>) -> Result<Self> {
        let open = |path: &Path| match inputs.mode {
            ReadMode::Indexed => AlignmentReader::open_indexed(path),
            ReadMode::Sequential => AlignmentReader::open_sequential(path),
        };
        let reference = open(inputs.reference)?;
        let new = open(inputs.new)?.with_contig_order_from(reference.header());
        Ok(Self { reference, new, stats: CompareStats::default() })
    }

    fn process(
        &mut self,
        task: &PartitionTask,
        comparator: &PartitionComparator<'_>,
        sink: &ResultSink,
    ) -> Result<()> {
        let reference = self.reference.fetch(&task.partition)?;
        let new = self.new.fetch(&task.partition)?;
        let stats = comparator.compare(&task.partition, reference, new, |row| sink.write(&row))?;
        debug!(
            "Compared {task}: {} reference reads, {} new reads, {} diffs",
            stats.reference_reads,
            stats.new_reads,
            stats.diffs()
        );
        self.stats += stats;
        Ok(())
    }
}

/// The first error raised by any worker, and a flag the others poll between partitions.
#[derive(Default)]
struct FailureState {
    failed: AtomicBool,
    first: Mutex<Option<anyhow::Error>>,
}

impl FailureState {
    fn set_error(&self, error: anyhow::Error) {
        self.failed.store(true, Ordering::SeqCst);
        let mut guard = self.first.lock();
        if guard.is_none() {
            *guard = Some(error);
        }
    }

    fn has_failed(&self) -> bool {
        self.failed.load(Ordering::Relaxed)
    }

    fn take_error(&self) -> Option<anyhow::Error> {
        self.first.lock().take()
    }
}

/// Extract a human-readable message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn progress_interval(tasks: usize) -> u64 {
    (tasks as u64 / 10).clamp(1, 100)
}

/// Compare every task, writing rows to `sink`, and return the merged counts.
///
/// # Errors
///
/// Returns the first error raised by any worker, with the failing partition as context.
/// Workers stop before their next partition once any worker has failed.
pub fn run_partitions(
    inputs: &ComparisonInputs<'_>,
    tasks: Vec<PartitionTask>,
    config: &CompareConfig,
    sink: &ResultSink,
    threads: usize,
) -> Result<CompareStats> {
    let total = tasks.len();
    let workers = worker_count(threads, total);
    info!("Comparing {} partitions with {workers} worker(s)", format_count(total as u64));

    let queue = WorkQueue::new(tasks);
    let failure = FailureState::default();
    let progress = ProgressTracker::new("Compared partitions")
        .with_interval(progress_interval(total))
        .with_total(total as u64);
    let comparator = PartitionComparator::new(config);

    let worker_stats: Vec<CompareStats> = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|worker_id| {
                let (queue, failure, progress) = (&queue, &failure, &progress);
                thread::Builder::new().name(format!("compare-{worker_id}")).spawn_scoped(
                    scope,
                    move || run_worker(inputs, &comparator, sink, queue, failure, progress),
                )
            })
            .collect();

        handles
            .into_iter()
            .enumerate()
            .filter_map(|(worker_id, handle)| match handle {
                Ok(handle) => handle.join().unwrap_or_else(|payload| {
                    failure.set_error(anyhow!(
                        "Comparison worker {worker_id} panicked: {}",
                        panic_message(payload.as_ref())
                    ));
                    None
                }),
                Err(e) => {
                    failure.set_error(
                        anyhow::Error::new(e).context("Failed to spawn comparison worker"),
                    );
                    None
                }
            })
            .collect()
    });

    if let Some(error) = failure.take_error() {
        return Err(error);
    }
    progress.log_final();
    Ok(worker_stats.into_iter().sum())
}

/// One worker's loop. Returns `None` after recording an error in `failure`.
fn run_worker(
    inputs: &ComparisonInputs<'_>,
    comparator: &PartitionComparator<'_>,
    sink: &ResultSink,
    queue: &WorkQueue,
    failure: &FailureState,
    progress: &ProgressTracker,
) -> Option<CompareStats> {
    let mut context = match WorkerContext::open(inputs) {
        Ok(context) => context,
        Err(e) => {
            failure.set_error(e);
            return None;
        }
    };

    while !failure.has_failed() {
        let Some(task) = queue.try_dequeue() else {
            break;
        };
        if let Err(e) = context.process(&task, comparator, sink) {
            failure.set_error(e.context(format!("Failed to compare {task}")));
            return None;
        }
        progress.log_if_needed(1);
    }
    Some(context.stats)
}
