//! Tolerance toggles and read filters for a comparison run.

use ahash::AHashSet;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::RecordBuf;

use crate::errors::Result;
use crate::sam::{DEFAULT_CONSENSUS_TAG, DEFAULT_UNMAPPED_MARKER_TAG};
use crate::validation::string_to_tag;

/// Settings that control which reads are compared and which differences are reported.
#[derive(Debug, Clone)]
pub struct CompareConfig {
    /// Do not report `duplicate` flag differences.
    pub ignore_duplicates: bool,
    /// Do not report `unmapped`/`mate_unmapped` differences, nor placement differences
    /// (`insert_size`, `cigar`, `map_qual`) of reads whose unmapping state changed.
    pub ignore_unmapping: bool,
    /// Do not report `SA` attribute differences.
    pub ignore_supplementary_attribute: bool,
    /// Drop consensus reads from both inputs.
    pub ignore_consensus_reads: bool,
    /// Drop supplementary alignments from both inputs.
    pub ignore_supplementary_reads: bool,
    /// Attribute that marks a consensus read.
    pub consensus_tag: Tag,
    /// Attribute that marks a read unmapped by a downstream process.
    pub unmapped_marker_tag: Tag,
    /// Read names whose classification is logged at debug level.
    pub traced_reads: AHashSet<String>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        let [c1, c2] = *DEFAULT_CONSENSUS_TAG.as_bytes() else { unreachable!() };
        let [u1, u2] = *DEFAULT_UNMAPPED_MARKER_TAG.as_bytes() else { unreachable!() };
        Self {
            ignore_duplicates: false,
            ignore_unmapping: false,
            ignore_supplementary_attribute: false,
            ignore_consensus_reads: true,
            ignore_supplementary_reads: false,
            consensus_tag: Tag::new(c1, c2),
            unmapped_marker_tag: Tag::new(u1, u2),
            traced_reads: AHashSet::new(),
        }
    }
}

impl CompareConfig {
    /// Ignore every difference that downstream alterations are expected to introduce:
    /// duplicate marking, unmapping, and supplementary attributes.
    #[must_use]
    pub fn ignoring_alterations(mut self) -> Self {
        self.ignore_duplicates = true;
        self.ignore_unmapping = true;
        self.ignore_supplementary_attribute = true;
        self
    }

    /// Set the marker tags from their two-character names.
    ///
    /// # Errors
    ///
    /// Returns an error if either tag is not exactly two characters.
    pub fn with_tags(mut self, consensus_tag: &str, unmapped_marker_tag: &str) -> Result<Self> {
        self.consensus_tag = string_to_tag(consensus_tag, "consensus-tag")?;
        self.unmapped_marker_tag = string_to_tag(unmapped_marker_tag, "unmapped-marker-tag")?;
        Ok(self)
    }

    #[must_use]
    pub fn with_traced_reads<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.traced_reads = names.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a read's classification should be logged.
    #[must_use]
    pub fn is_traced(&self, name: &str) -> bool {
        !self.traced_reads.is_empty() && self.traced_reads.contains(name)
    }

    /// Whether a record takes part in the comparison at all.
    ///
    /// Secondary alignments never do; consensus reads and supplementary alignments are
    /// dropped when the corresponding toggle is on.
    #[must_use]
    pub fn is_comparable(&self, record: &RecordBuf) -> bool {
        let flags = record.flags();
        if flags.is_secondary() {
            return false;
        }
        if self.ignore_supplementary_reads && flags.is_supplementary() {
            return false;
        }
        !(self.ignore_consensus_reads && record.data().get(&self.consensus_tag).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sam::builder::RecordBuilder;

    #[test]
    fn test_defaults() {
        let config = CompareConfig::default();
        assert!(config.ignore_consensus_reads);
        assert!(!config.ignore_duplicates);
        assert!(!config.ignore_unmapping);
        assert!(!config.ignore_supplementary_attribute);
        assert!(!config.ignore_supplementary_reads);
        assert_eq!(config.consensus_tag, Tag::new(b'c', b'D'));
        assert_eq!(config.unmapped_marker_tag, Tag::new(b'U', b'T'));
    }

    #[test]
    fn test_ignoring_alterations() {
        let config = CompareConfig::default().ignoring_alterations();
        assert!(config.ignore_duplicates);
        assert!(config.ignore_unmapping);
        assert!(config.ignore_supplementary_attribute);
        assert!(!config.ignore_supplementary_reads);
    }

    #[test]
    fn test_with_tags() {
        let config = CompareConfig::default().with_tags("XC", "XU").unwrap();
        assert_eq!(config.consensus_tag, Tag::new(b'X', b'C'));
        assert_eq!(config.unmapped_marker_tag, Tag::new(b'X', b'U'));
        assert!(CompareConfig::default().with_tags("XCX", "XU").is_err());
    }

    #[test]
    fn test_traced_reads() {
        let config = CompareConfig::default().with_traced_reads(["q1", "q2"]);
        assert!(config.is_traced("q1"));
        assert!(!config.is_traced("q3"));
        assert!(!CompareConfig::default().is_traced("q1"));
    }

    #[test]
    fn test_is_comparable() {
        let config = CompareConfig::default();
        let plain = RecordBuilder::mapped_read().sequence("ACGT").build();
        let secondary = RecordBuilder::mapped_read().sequence("ACGT").secondary(true).build();
        let consensus = RecordBuilder::mapped_read().sequence("ACGT").tag("cD", 5i32).build();
        let supplementary =
            RecordBuilder::mapped_read().sequence("ACGT").supplementary(true).build();

        assert!(config.is_comparable(&plain));
        assert!(!config.is_comparable(&secondary));
        assert!(!config.is_comparable(&consensus));
        assert!(config.is_comparable(&supplementary));

        let keep_consensus = CompareConfig { ignore_consensus_reads: false, ..config.clone() };
        assert!(keep_consensus.is_comparable(&consensus));

        let drop_supplementary = CompareConfig { ignore_supplementary_reads: true, ..config };
        assert!(!drop_supplementary.is_comparable(&supplementary));
    }
}
