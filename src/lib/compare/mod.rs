//! The partitioned comparison engine.
//!
//! A [`ComparisonJob`] plans the partitions of a run and hands them to a pool of workers
//! ([`worker`]). Each worker runs the [`PartitionComparator`] merge-join on its own readers and
//! appends [`ComparisonRecord`] rows to a shared [`ResultSink`]. Matched reads are diffed by
//! [`differ::diff_records`], and per-worker [`CompareStats`] are summed at the end.

pub mod comparator;
pub mod config;
pub mod differ;
pub mod driver;
pub mod identity;
pub mod read_group;
pub mod record;
pub mod sink;
pub mod stats;
pub mod worker;

pub use comparator::PartitionComparator;
pub use config::CompareConfig;
pub use driver::{ComparisonJob, ComparisonPlan};
pub use record::{ComparisonRecord, MismatchType};
pub use sink::ResultSink;
pub use stats::CompareStats;
pub use worker::{ReadMode, WorkQueue};
