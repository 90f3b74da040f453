//! Fluent builder for alignment records used in tests and benchmarks.
//!
//! ```rust
//! use fgbamdiff_lib::sam::builder::RecordBuilder;
//!
//! let record = RecordBuilder::mapped_read()
//!     .name("read1")
//!     .sequence("ACGTACGT")
//!     .alignment_start(100)
//!     .tag("MC", "8M")
//!     .build();
//! assert_eq!(record.sequence().len(), 8);
//! ```

use noodles::core::Position;
use noodles::sam::alignment::record::cigar::Op;
use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record::{Flags, MappingQuality};
use noodles::sam::alignment::record_buf::data::field::Value as BufValue;
use noodles::sam::alignment::record_buf::{QualityScores, RecordBuf, Sequence};

/// Base quality assigned when a sequence is set without explicit qualities.
pub const DEFAULT_BASE_QUALITY: u8 = 30;

/// Default mapping quality for built records.
pub const DEFAULT_MAPQ: u8 = 60;

/// Parses a CIGAR string into operations.
///
/// # Panics
///
/// Panics if the CIGAR string contains invalid characters or formatting.
#[must_use]
pub fn parse_cigar(cigar_str: &str) -> Vec<Op> {
    let mut ops = Vec::new();
    let mut num_str = String::new();

    for c in cigar_str.chars() {
        if c.is_ascii_digit() {
            num_str.push(c);
        } else {
            let len: usize = num_str.parse().expect("Invalid CIGAR: expected number");
            let kind = match c {
                'M' => Kind::Match,
                'I' => Kind::Insertion,
                'D' => Kind::Deletion,
                'N' => Kind::Skip,
                'S' => Kind::SoftClip,
                'H' => Kind::HardClip,
                'P' => Kind::Pad,
                '=' => Kind::SequenceMatch,
                'X' => Kind::SequenceMismatch,
                _ => panic!("Unknown CIGAR operation: {c}"),
            };
            ops.push(Op::new(kind, len));
            num_str.clear();
        }
    }

    ops
}

fn cigar_read_len(cigar: &str) -> usize {
    parse_cigar(cigar)
        .iter()
        .filter(|op| op.kind().consumes_read())
        .map(|op| op.len())
        .sum()
}

/// Builder for a single [`RecordBuf`].
#[derive(Debug)]
pub struct RecordBuilder {
    name: Option<Vec<u8>>,
    flags: Flags,
    reference_sequence_id: Option<usize>,
    alignment_start: Option<usize>,
    mapping_quality: Option<u8>,
    cigar: Option<String>,
    sequence: Vec<u8>,
    qualities: Vec<u8>,
    tags: Vec<(Tag, BufValue)>,
    mate_reference_sequence_id: Option<usize>,
    mate_alignment_start: Option<usize>,
    template_length: Option<i32>,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordBuilder {
    /// Creates a new builder with no placement and a mapping quality of 60.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: None,
            flags: Flags::empty(),
            reference_sequence_id: None,
            alignment_start: None,
            mapping_quality: Some(DEFAULT_MAPQ),
            cigar: None,
            sequence: Vec::new(),
            qualities: Vec::new(),
            tags: Vec::new(),
            mate_reference_sequence_id: None,
            mate_alignment_start: None,
            template_length: None,
        }
    }

    /// Creates a builder placed on reference sequence 0; the CIGAR defaults to `{len}M`.
    #[must_use]
    pub fn mapped_read() -> Self {
        Self { reference_sequence_id: Some(0), ..Self::new() }
    }

    /// Sets the read name.
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.as_bytes().to_vec());
        self
    }

    /// Sets the sequence, generating default qualities if none were set.
    #[must_use]
    pub fn sequence(mut self, seq: &str) -> Self {
        self.sequence = seq.as_bytes().to_vec();
        if self.qualities.is_empty() {
            self.qualities = vec![DEFAULT_BASE_QUALITY; seq.len()];
        }
        self
    }

    /// Sets the raw (non-offset) Phred quality scores.
    #[must_use]
    pub fn qualities(mut self, quals: &[u8]) -> Self {
        self.qualities = quals.to_vec();
        self
    }

    /// Sets all flags at once.
    #[must_use]
    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the paired flag.
    #[must_use]
    pub fn paired(mut self, paired: bool) -> Self {
        self.flags.set(Flags::SEGMENTED, paired);
        self
    }

    /// Sets the first segment (R1) flag. Implies paired.
    #[must_use]
    pub fn first_segment(mut self, is_first: bool) -> Self {
        self.flags.set(Flags::SEGMENTED, true);
        self.flags.set(Flags::FIRST_SEGMENT, is_first);
        self.flags.set(Flags::LAST_SEGMENT, !is_first);
        self
    }

    /// Sets the unmapped flag.
    #[must_use]
    pub fn unmapped(mut self, unmapped: bool) -> Self {
        self.flags.set(Flags::UNMAPPED, unmapped);
        self
    }

    /// Sets the mate unmapped flag.
    #[must_use]
    pub fn mate_unmapped(mut self, unmapped: bool) -> Self {
        self.flags.set(Flags::MATE_UNMAPPED, unmapped);
        self
    }

    /// Sets the reverse complement flag.
    #[must_use]
    pub fn reverse_complement(mut self, reverse: bool) -> Self {
        self.flags.set(Flags::REVERSE_COMPLEMENTED, reverse);
        self
    }

    /// Sets the duplicate flag.
    #[must_use]
    pub fn duplicate(mut self, duplicate: bool) -> Self {
        self.flags.set(Flags::DUPLICATE, duplicate);
        self
    }

    /// Sets the secondary alignment flag.
    #[must_use]
    pub fn secondary(mut self, secondary: bool) -> Self {
        self.flags.set(Flags::SECONDARY, secondary);
        self
    }

    /// Sets the supplementary alignment flag.
    #[must_use]
    pub fn supplementary(mut self, supplementary: bool) -> Self {
        self.flags.set(Flags::SUPPLEMENTARY, supplementary);
        self
    }

    /// Sets the reference sequence ID (0-based).
    #[must_use]
    pub fn reference_sequence_id(mut self, id: usize) -> Self {
        self.reference_sequence_id = Some(id);
        self
    }

    /// Sets the alignment start position (1-based).
    #[must_use]
    pub fn alignment_start(mut self, pos: usize) -> Self {
        self.alignment_start = Some(pos);
        self
    }

    /// Sets the mapping quality.
    #[must_use]
    pub fn mapping_quality(mut self, mapq: u8) -> Self {
        self.mapping_quality = Some(mapq);
        self
    }

    /// Sets the CIGAR string.
    #[must_use]
    pub fn cigar(mut self, cigar: &str) -> Self {
        self.cigar = Some(cigar.to_string());
        self
    }

    /// Sets the mate reference sequence ID (0-based).
    #[must_use]
    pub fn mate_reference_sequence_id(mut self, id: usize) -> Self {
        self.mate_reference_sequence_id = Some(id);
        self
    }

    /// Sets the mate alignment start position (1-based).
    #[must_use]
    pub fn mate_alignment_start(mut self, pos: usize) -> Self {
        self.mate_alignment_start = Some(pos);
        self
    }

    /// Sets the template length (insert size).
    #[must_use]
    pub fn template_length(mut self, tlen: i32) -> Self {
        self.template_length = Some(tlen);
        self
    }

    /// Adds a SAM tag. Tags that are not two characters long are ignored.
    #[must_use]
    pub fn tag<V: Into<BufValue>>(mut self, tag: &str, value: V) -> Self {
        if let &[a, b] = tag.as_bytes() {
            self.tags.push((Tag::new(a, b), value.into()));
        }
        self
    }

    /// Builds the `RecordBuf`.
    ///
    /// # Panics
    ///
    /// Panics on an invalid CIGAR, a zero position or an invalid mapping quality.
    #[must_use]
    pub fn build(self) -> RecordBuf {
        let mut record = RecordBuf::default();

        if let Some(name) = self.name {
            *record.name_mut() = Some(name.into());
        }
        *record.flags_mut() = self.flags;
        *record.reference_sequence_id_mut() = self.reference_sequence_id;
        if let Some(pos) = self.alignment_start {
            *record.alignment_start_mut() =
                Some(Position::try_from(pos).expect("alignment_start must be >= 1"));
        }
        *record.mate_reference_sequence_id_mut() = self.mate_reference_sequence_id;
        if let Some(mate_pos) = self.mate_alignment_start {
            *record.mate_alignment_start_mut() =
                Some(Position::try_from(mate_pos).expect("mate_alignment_start must be >= 1"));
        }
        if let Some(tlen) = self.template_length {
            *record.template_length_mut() = tlen;
        }
        if let Some(mapq) = self.mapping_quality {
            *record.mapping_quality_mut() =
                Some(MappingQuality::try_from(mapq).expect("mapping_quality must be valid"));
        }

        // Fill in whichever of CIGAR and sequence is missing from the other. Unplaced records
        // only get a CIGAR when one was given explicitly.
        let placed = self.reference_sequence_id.is_some();
        let (cigar_str, sequence) = match (self.cigar, self.sequence.is_empty()) {
            (Some(cigar), true) => {
                let generated = b"ACGT".iter().copied().cycle().take(cigar_read_len(&cigar));
                (cigar, generated.collect())
            }
            (Some(cigar), false) => (cigar, self.sequence),
            (None, false) if placed => (format!("{}M", self.sequence.len()), self.sequence),
            (None, _) => (String::new(), self.sequence),
        };

        if !cigar_str.is_empty() {
            *record.cigar_mut() = parse_cigar(&cigar_str).into_iter().collect();
        }

        let qualities = if self.qualities.is_empty() && !sequence.is_empty() {
            vec![DEFAULT_BASE_QUALITY; sequence.len()]
        } else {
            self.qualities
        };
        *record.sequence_mut() = Sequence::from(sequence);
        *record.quality_scores_mut() = QualityScores::from(qualities);

        for (tag, value) in self.tags {
            record.data_mut().insert(tag, value);
        }

        record
    }
}
