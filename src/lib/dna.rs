//! DNA sequence utilities used when comparing reads aligned to opposite strands.

/// Complements a single DNA base, preserving case.
///
/// Returns the Watson-Crick complement: A<->T, C<->G. `N` and any other byte are returned
/// unchanged.
#[inline]
#[must_use]
pub const fn complement_base(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'a' => b't',
        b't' => b'a',
        b'c' => b'g',
        b'g' => b'c',
        _ => base,
    }
}

/// Reverse complements a DNA sequence.
///
/// # Examples
///
/// ```
/// use fgbamdiff_lib::dna::reverse_complement;
///
/// assert_eq!(reverse_complement(b"ACGT"), b"ACGT".to_vec());
/// assert_eq!(reverse_complement(b"AAAC"), b"GTTT".to_vec());
/// assert_eq!(reverse_complement(b"ACGTN"), b"NACGT".to_vec());
/// ```
#[must_use]
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&base| complement_base(base)).collect()
}

/// Returns a reversed copy of a byte slice (used for base qualities, which are not
/// complemented).
#[must_use]
pub fn reversed(values: &[u8]) -> Vec<u8> {
    values.iter().rev().copied().collect()
}
