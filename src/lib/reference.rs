//! Reference genome contig dictionaries.
//!
//! Partitions are laid over the contigs of the reference genome. The contig list comes from a
//! FASTA index (`.fai`) when one is available, otherwise from a sequential scan of the FASTA,
//! or from the reference BAM header when no FASTA is given. Contigs named only by a BAM header
//! are merged in with [`merge_contigs`] so that no aligned read falls outside every partition.

use anyhow::{Context, Result};
use log::debug;
use noodles::fasta;
use noodles::fasta::fai;
use noodles::sam::Header;
use std::path::{Path, PathBuf};

/// A named reference sequence and its length in bases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contig {
    pub name: String,
    pub length: usize,
}

impl Contig {
    #[must_use]
    pub fn new(name: impl Into<String>, length: usize) -> Self {
        Self { name: name.into(), length }
    }
}

/// Find FAI index path for a FASTA file.
fn find_fai_path(fasta_path: &Path) -> Option<PathBuf> {
    let fai_path = fasta_path.with_extension("fa.fai");
    if fai_path.exists() {
        return Some(fai_path);
    }

    let fai_path = PathBuf::from(format!("{}.fai", fasta_path.display()));
    if fai_path.exists() {
        return Some(fai_path);
    }

    None
}

/// Read the contig dictionary of a FASTA file.
///
/// # Errors
///
/// Returns an error if the index or FASTA cannot be read.
pub fn read_fasta_contigs(fasta_path: &Path) -> Result<Vec<Contig>> {
    if let Some(fai_path) = find_fai_path(fasta_path) {
        debug!("Reading contigs from FAI index: {}", fai_path.display());
        let index = fai::fs::read(&fai_path)
            .with_context(|| format!("Failed to read FAI index: {}", fai_path.display()))?;
        let records: &[fai::Record] = index.as_ref();
        return Ok(records
            .iter()
            .map(|r| Contig::new(String::from_utf8_lossy(r.name().as_ref()), r.length() as usize))
            .collect());
    }

    debug!("No FAI index found, scanning FASTA: {}", fasta_path.display());
    let mut reader = fasta::io::reader::Builder
        .build_from_path(fasta_path)
        .with_context(|| format!("Failed to open FASTA: {}", fasta_path.display()))?;

    let mut contigs = Vec::new();
    for result in reader.records() {
        let record = result
            .with_context(|| format!("Failed to read FASTA record: {}", fasta_path.display()))?;
        let name = String::from_utf8_lossy(record.name().as_ref()).into_owned();
        contigs.push(Contig::new(name, record.sequence().len()));
    }
    Ok(contigs)
}

/// The contig dictionary of a SAM/BAM header, in header order.
#[must_use]
pub fn header_contigs(header: &Header) -> Vec<Contig> {
    header
        .reference_sequences()
        .iter()
        .map(|(name, map)| Contig::new(name.to_string(), map.length().get()))
        .collect()
}

/// Append the contigs of `others` that `contigs` lacks, in their order, and return their names.
///
/// A contig present in both keeps its position and takes the larger of the two lengths.
pub fn merge_contigs(contigs: &mut Vec<Contig>, others: &[Contig]) -> Vec<String> {
    let mut added = Vec::new();
    for other in others {
        match contigs.iter_mut().find(|c| c.name == other.name) {
            Some(existing) => existing.length = existing.length.max(other.length),
            None => {
                contigs.push(other.clone());
                added.push(other.name.clone());
            }
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use bstr::BString;
    use noodles::sam::header::record::value::Map;
    use noodles::sam::header::record::value::map::ReferenceSequence;
    use std::num::NonZeroUsize;
    use tempfile::TempDir;

    #[test]
    fn test_read_fasta_contigs_from_fai() {
        let dir = TempDir::new().unwrap();
        let fasta = dir.path().join("ref.fa");
        std::fs::write(&fasta, ">chr1\nACGT\n>chr2\nAC\n").unwrap();
        std::fs::write(dir.path().join("ref.fa.fai"), "chr1\t4\t6\t4\t5\nchr2\t2\t17\t2\t3\n")
            .unwrap();

        let contigs = read_fasta_contigs(&fasta).unwrap();
        assert_eq!(contigs, vec![Contig::new("chr1", 4), Contig::new("chr2", 2)]);
    }

    #[test]
    fn test_read_fasta_contigs_without_fai() {
        let dir = TempDir::new().unwrap();
        let fasta = dir.path().join("genome.fasta");
        std::fs::write(&fasta, ">chrA description\nACGTACGT\nAC\n>chrB\nGGG\n").unwrap();

        let contigs = read_fasta_contigs(&fasta).unwrap();
        assert_eq!(contigs, vec![Contig::new("chrA", 10), Contig::new("chrB", 3)]);
    }

    #[test]
    fn test_read_fasta_contigs_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(read_fasta_contigs(&dir.path().join("missing.fa")).is_err());
    }

    #[test]
    fn test_header_contigs() {
        let header = Header::builder()
            .add_reference_sequence(
                BString::from("chr1"),
                Map::<ReferenceSequence>::new(NonZeroUsize::new(1000).unwrap()),
            )
            .add_reference_sequence(
                BString::from("chrM"),
                Map::<ReferenceSequence>::new(NonZeroUsize::new(16569).unwrap()),
            )
            .build();
        assert_eq!(
            header_contigs(&header),
            vec![Contig::new("chr1", 1000), Contig::new("chrM", 16569)]
        );
    }

    #[test]
    fn test_merge_contigs_appends_missing_in_order() {
        let mut contigs = vec![Contig::new("chr1", 1000), Contig::new("chr2", 500)];
        let others =
            vec![Contig::new("chr2", 500), Contig::new("chrUn", 40), Contig::new("chrEBV", 70)];
        let added = merge_contigs(&mut contigs, &others);
        assert_eq!(added, vec!["chrUn", "chrEBV"]);
        assert_eq!(
            contigs,
            vec![
                Contig::new("chr1", 1000),
                Contig::new("chr2", 500),
                Contig::new("chrUn", 40),
                Contig::new("chrEBV", 70),
            ]
        );
    }

    #[test]
    fn test_merge_contigs_keeps_longest_length() {
        let mut contigs = vec![Contig::new("chr1", 10)];
        let added = merge_contigs(&mut contigs, &[Contig::new("chr1", 2500)]);
        assert!(added.is_empty());
        assert_eq!(contigs, vec![Contig::new("chr1", 2500)]);

        merge_contigs(&mut contigs, &[Contig::new("chr1", 5)]);
        assert_eq!(contigs, vec![Contig::new("chr1", 2500)]);
    }
}
