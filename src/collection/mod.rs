//! Collections of protein sequences.
//!
//! Two implementations share the `SequenceCollection` contract:
//! - `ProteinSequences` keeps every sequence in memory and computes its aggregate
//!   properties on demand, so they always reflect the current members.
//! - `ProteinSequencesOnFile` indexes a FASTA file once and materialises sequences on
//!   access. Its aggregate properties are computed at construction.
//!
//! Callers which only need iteration, indexed access and the aggregate properties should
//! take `&dyn SequenceCollection` (or a generic bound) and never special-case the variant.

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::{Result, SequenceError};
use crate::mapping::AlignmentMapping;
use crate::seq::{ProteinCharacter, ProteinSequence};

pub mod memory;
pub mod on_file;

pub use self::memory::ProteinSequences;
pub use self::on_file::ProteinSequencesOnFile;

pub type SequenceIter<'a> = Box<dyn Iterator<Item = Result<ProteinSequence>> + 'a>;
pub type BatchIter<'a> = Box<dyn Iterator<Item = Result<ProteinSequences>> + 'a>;

pub trait SequenceCollection {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The member at position `index`.
    ///
    /// # Errors
    ///
    /// `SequenceError::OutOfRange` if `index >= len()`.
    fn sequence_at(&self, index: usize) -> Result<ProteinSequence>;

    /// The first member whose identifier is `id`.
    ///
    /// # Errors
    ///
    /// `SequenceError::NotFound` if no member has that identifier.
    fn sequence_by_id(&self, id: &str) -> Result<ProteinSequence>;

    /// A fresh pass over all members in order.
    fn sequences(&self) -> SequenceIter<'_>;

    /// Whether all members share the same length, gaps included. Empty collections are
    /// not aligned.
    fn aligned(&self) -> bool;

    /// Whether all members share the same length excluding gaps. Empty collections are
    /// not fixed length.
    fn fixed_length(&self) -> bool;

    /// The common length of the members, if aligned.
    fn width(&self) -> Option<usize>;

    fn has_gaps(&self) -> bool;

    /// Contiguous, non-overlapping batches of at most `batch_size` members, in order.
    ///
    /// # Errors
    ///
    /// `SequenceError::InvalidBatchSize` if `batch_size` is zero.
    fn iter_batches(&self, batch_size: usize) -> Result<BatchIter<'_>>;

    /// Columns holding more than one distinct symbol across the members.
    ///
    /// # Errors
    ///
    /// `SequenceError::NotAligned` if the collection is not aligned.
    fn mutated_positions(&self) -> Result<Vec<usize>> {
        let width = self
            .width()
            .ok_or(SequenceError::NotAligned("determine mutated positions"))?;

        let mut columns: Vec<HashSet<ProteinCharacter>> = vec![HashSet::new(); width];
        for seq in self.sequences() {
            for (symbols, c) in columns.iter_mut().zip(seq?.iter()) {
                symbols.insert(c);
            }
        }

        Ok(columns
            .iter()
            .enumerate()
            .filter_map(|(i, symbols)| (symbols.len() > 1).then_some(i))
            .collect())
    }

    /// Identifier (or content hash) to sequence text, in member order.
    fn to_dict(&self) -> Result<IndexMap<String, String>> {
        self.sequences()
            .map(|seq| seq.map(|seq| (seq.key(), seq.to_string())))
            .collect()
    }

    fn write_fasta(&self, path: &Path) -> Result<()> {
        crate::io::write_fasta_file_from_iter(path, self.sequences())
    }

    fn to_memory(&self) -> Result<ProteinSequences> {
        self.sequences().collect()
    }

    fn with_no_gaps(&self) -> Result<ProteinSequences> {
        self.sequences()
            .map(|seq| seq.map(|seq| seq.with_no_gaps()))
            .collect()
    }

    /// A dense grid of symbols, one row per member and one column per aligned position.
    ///
    /// # Errors
    ///
    /// `SequenceError::NotAligned` if the collection is not aligned.
    fn to_array(&self) -> Result<SymbolGrid> {
        let width = self
            .width()
            .ok_or(SequenceError::NotAligned("convert them to an array"))?;

        let mut data = Vec::with_capacity(width * self.len());
        let mut rows = 0;
        for seq in self.sequences() {
            data.extend(seq?.iter());
            rows += 1;
        }

        Ok(SymbolGrid { rows, width, data })
    }

    fn get_alignment_mapping(&self) -> Result<AlignmentMapping> {
        AlignmentMapping::derive(self)
    }

    fn apply_alignment_mapping(&self, mapping: &AlignmentMapping) -> Result<ProteinSequences> {
        mapping.apply(self)
    }

    /// Aligns the members with MAFFT.
    ///
    /// # Errors
    ///
    /// * `SequenceError::AlreadyGapped` if any member contains gaps.
    /// * Any error from `align::mafft_align`.
    fn align_all(&self, output: Option<&Path>) -> Result<AlignmentOutput> {
        if self.has_gaps() {
            return Err(SequenceError::AlreadyGapped("align them"));
        }
        crate::align::mafft_align(self, None, false, output)
    }

    /// Aligns the members against an existing alignment with MAFFT.
    ///
    /// # Errors
    ///
    /// * `SequenceError::AlreadyGapped` if any member contains gaps.
    /// * `SequenceError::NotAligned` if `existing` is not aligned.
    /// * Any error from `align::mafft_align`.
    fn align_to(
        &self,
        existing: &dyn SequenceCollection,
        realign: bool,
        output: Option<&Path>,
    ) -> Result<AlignmentOutput> {
        if self.has_gaps() {
            return Err(SequenceError::AlreadyGapped("align them"));
        }
        if !existing.aligned() {
            return Err(SequenceError::NotAligned("serve as an alignment target"));
        }
        crate::align::mafft_align(self, Some(existing), realign, output)
    }
}

/// The result of an alignment, held in memory or on file depending on whether an output
/// path was requested.
#[derive(Debug)]
pub enum AlignmentOutput {
    InMemory(ProteinSequences),
    OnFile(ProteinSequencesOnFile),
}

impl AlignmentOutput {
    pub fn as_collection(&self) -> &dyn SequenceCollection {
        match self {
            AlignmentOutput::InMemory(seqs) => seqs,
            AlignmentOutput::OnFile(seqs) => seqs,
        }
    }

    pub fn into_memory(self) -> Result<ProteinSequences> {
        match self {
            AlignmentOutput::InMemory(seqs) => Ok(seqs),
            AlignmentOutput::OnFile(seqs) => seqs.to_memory(),
        }
    }
}

/// A row-major grid of symbols from an aligned collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolGrid {
    rows: usize,
    width: usize,
    data: Vec<ProteinCharacter>,
}

impl SymbolGrid {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn get(&self, row: usize, col: usize) -> Option<ProteinCharacter> {
        if row >= self.rows || col >= self.width {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    pub fn row(&self, row: usize) -> Option<&[ProteinCharacter]> {
        if row >= self.rows {
            return None;
        }
        Some(&self.data[row * self.width..(row + 1) * self.width])
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = ProteinCharacter> + '_ {
        self.data
            .iter()
            .skip(col)
            .step_by(self.width.max(1))
            .take(if col < self.width { self.rows } else { 0 })
            .copied()
    }
}
