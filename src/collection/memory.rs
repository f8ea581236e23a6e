use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Read};
use std::ops::Index;
use std::path::Path;

use itertools::Itertools;

use crate::collection::{BatchIter, ProteinSequencesOnFile, SequenceCollection, SequenceIter};
use crate::error::{Result, SequenceError};
use crate::seq::ProteinSequence;

/// An ordered, in-memory collection of protein sequences.
///
/// Aggregate properties are recomputed on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProteinSequences {
    sequences: Vec<ProteinSequence>,
}

impl ProteinSequences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every record of a FASTA file.
    pub fn from_fasta(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from(crate::io::read_fasta_file(path.as_ref())?))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self::from(crate::io::read_fasta(reader)?))
    }

    /// Writes the collection to `path` and opens the result as a file-backed collection.
    pub fn to_on_file(&self, path: impl AsRef<Path>) -> Result<ProteinSequencesOnFile> {
        self.write_fasta(path.as_ref())?;
        ProteinSequencesOnFile::open(path)
    }

    pub fn push(&mut self, seq: ProteinSequence) {
        self.sequences.push(seq);
    }

    pub fn get(&self, index: usize) -> Option<&ProteinSequence> {
        self.sequences.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProteinSequence> {
        self.sequences.iter()
    }

    pub fn as_slice(&self) -> &[ProteinSequence] {
        &self.sequences
    }

    pub fn into_inner(self) -> Vec<ProteinSequence> {
        self.sequences
    }
}

impl SequenceCollection for ProteinSequences {
    fn len(&self) -> usize {
        self.sequences.len()
    }

    fn sequence_at(&self, index: usize) -> Result<ProteinSequence> {
        self.sequences
            .get(index)
            .cloned()
            .ok_or(SequenceError::OutOfRange {
                index,
                len: self.sequences.len(),
            })
    }

    fn sequence_by_id(&self, id: &str) -> Result<ProteinSequence> {
        self.sequences
            .iter()
            .find(|seq| seq.id() == Some(id))
            .cloned()
            .ok_or_else(|| SequenceError::NotFound(id.to_string()))
    }

    fn sequences(&self) -> SequenceIter<'_> {
        Box::new(self.sequences.iter().cloned().map(Ok))
    }

    fn aligned(&self) -> bool {
        self.width().is_some()
    }

    fn fixed_length(&self) -> bool {
        self.sequences
            .iter()
            .map(ProteinSequence::base_length)
            .all_equal_value()
            .is_ok()
    }

    fn width(&self) -> Option<usize> {
        self.sequences
            .iter()
            .map(ProteinSequence::len)
            .all_equal_value()
            .ok()
    }

    fn has_gaps(&self) -> bool {
        self.sequences.iter().any(ProteinSequence::has_gaps)
    }

    fn iter_batches(&self, batch_size: usize) -> Result<BatchIter<'_>> {
        if batch_size == 0 {
            return Err(SequenceError::InvalidBatchSize);
        }
        Ok(Box::new(
            self.sequences
                .chunks(batch_size)
                .map(|batch| Ok(Self::from(batch.to_vec()))),
        ))
    }

    fn to_memory(&self) -> Result<ProteinSequences> {
        Ok(self.clone())
    }

    fn write_fasta(&self, path: &Path) -> Result<()> {
        crate::io::write_fasta(BufWriter::new(File::create(path)?), &self.sequences)
    }
}

impl From<Vec<ProteinSequence>> for ProteinSequences {
    fn from(sequences: Vec<ProteinSequence>) -> Self {
        Self { sequences }
    }
}

impl FromIterator<ProteinSequence> for ProteinSequences {
    fn from_iter<I: IntoIterator<Item = ProteinSequence>>(iter: I) -> Self {
        Self {
            sequences: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ProteinSequences {
    type Item = ProteinSequence;
    type IntoIter = std::vec::IntoIter<ProteinSequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sequences.into_iter()
    }
}

impl<'a> IntoIterator for &'a ProteinSequences {
    type Item = &'a ProteinSequence;
    type IntoIter = std::slice::Iter<'a, ProteinSequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sequences.iter()
    }
}

impl Index<usize> for ProteinSequences {
    type Output = ProteinSequence;

    fn index(&self, index: usize) -> &ProteinSequence {
        &self.sequences[index]
    }
}

impl fmt::Display for ProteinSequences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProteinSequences(count={}, aligned={}, fixed_length={})",
            self.len(),
            self.aligned(),
            self.fixed_length()
        )
    }
}
