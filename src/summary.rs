use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::collection::{ProteinSequences, ProteinSequencesOnFile, SequenceCollection};

/// Aggregate properties of a FASTA file's sequences, as reported by `protseq summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub path: String,
    pub count: usize,
    pub aligned: bool,
    pub fixed_length: bool,
    pub width: Option<usize>,
    pub has_gaps: bool,
    /// Only present for aligned collections.
    pub mutated_positions: Option<Vec<usize>>,
}

impl CollectionSummary {
    pub fn of<C: SequenceCollection + ?Sized>(path: &Path, collection: &C) -> Result<Self> {
        let mutated_positions = if collection.aligned() {
            Some(collection.mutated_positions()?)
        } else {
            None
        };

        Ok(CollectionSummary {
            path: path.display().to_string(),
            count: collection.len(),
            aligned: collection.aligned(),
            fixed_length: collection.fixed_length(),
            width: collection.width(),
            has_gaps: collection.has_gaps(),
            mutated_positions,
        })
    }
}

/// Summarises the sequences in the FASTA file at `path`.
///
/// By default the file is indexed and read on demand; with `in_memory` every record is
/// loaded first. Both give the same summary.
pub fn summarize(path: &Path, in_memory: bool) -> Result<CollectionSummary> {
    info!("Summarising sequences in {}", path.display());

    let summary = if in_memory {
        let seqs = ProteinSequences::from_fasta(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        CollectionSummary::of(path, &seqs)?
    } else {
        let seqs = ProteinSequencesOnFile::open(path)
            .with_context(|| format!("Could not index {}", path.display()))?;
        CollectionSummary::of(path, &seqs)?
    };

    if summary.count == 0 {
        warn!("{} contains no sequences", path.display());
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn both_variants_agree() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b">a\nACDE\n>b\nAC-E\n").unwrap();
        file.flush().unwrap();

        let on_file = summarize(file.path(), false).unwrap();
        let in_memory = summarize(file.path(), true).unwrap();
        assert_eq!(on_file, in_memory);

        assert_eq!(on_file.count, 2);
        assert!(on_file.aligned);
        assert_eq!(on_file.width, Some(4));
        assert_eq!(on_file.mutated_positions, Some(vec![2]));
    }

    #[test]
    fn unaligned_has_no_mutations() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b">a\nACDE\n>b\nACE\n").unwrap();
        file.flush().unwrap();

        let summary = summarize(file.path(), false).unwrap();
        assert!(!summary.aligned);
        assert_eq!(summary.mutated_positions, None);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["width"], serde_json::Value::Null);
        assert_eq!(json["count"], 2);
    }
}
