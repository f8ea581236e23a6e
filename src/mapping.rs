use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::collection::{ProteinSequences, SequenceCollection};
use crate::error::{Result, SequenceError};
use crate::seq::{ProteinCharacter, ProteinSequence};

/// For each member of an aligned collection, the aligned columns occupied by its
/// non-gap symbols, in order.
///
/// A mapping derived from an alignment can be applied to the gap-free form of the same
/// sequences to reproduce the alignment. It serializes as a JSON object keyed by member
/// index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlignmentMapping(BTreeMap<usize, Vec<usize>>);

impl AlignmentMapping {
    /// # Errors
    ///
    /// `SequenceError::NotAligned` if `collection` is not aligned.
    pub fn derive<C: SequenceCollection + ?Sized>(collection: &C) -> Result<Self> {
        if !collection.aligned() {
            return Err(SequenceError::NotAligned("derive an alignment mapping"));
        }

        let mut mapping = BTreeMap::new();
        for (i, seq) in collection.sequences().enumerate() {
            let columns = seq?
                .iter()
                .enumerate()
                .filter_map(|(col, c)| (!c.is_gap()).then_some(col))
                .collect();
            mapping.insert(i, columns);
        }

        debug!("Derived alignment mapping for {} sequences", mapping.len());
        Ok(AlignmentMapping(mapping))
    }

    /// Places the symbols of each gap-free member of `collection` at its mapped columns,
    /// filling the remaining columns with gaps.
    ///
    /// Each output sequence is as long as its last mapped column; members with an empty
    /// mapping become empty sequences.
    ///
    /// # Errors
    ///
    /// * `SequenceError::AlreadyGapped` if any member contains gaps.
    /// * `SequenceError::MissingMapping` if a member index has no mapping.
    /// * `SequenceError::MappingOutOfRange` if a member's mapping does not hold exactly
    ///   one column per symbol.
    pub fn apply<C: SequenceCollection + ?Sized>(&self, collection: &C) -> Result<ProteinSequences> {
        if collection.has_gaps() {
            return Err(SequenceError::AlreadyGapped("apply an alignment mapping"));
        }

        collection
            .sequences()
            .enumerate()
            .map(|(i, seq)| -> Result<ProteinSequence> {
                let seq = seq?;
                let columns = self.0.get(&i).ok_or(SequenceError::MissingMapping(i))?;

                if columns.len() != seq.len() {
                    return Err(SequenceError::MappingOutOfRange {
                        index: i,
                        mapped: columns.len(),
                        len: seq.len(),
                    });
                }

                let width = columns.iter().max().map_or(0, |&last| last + 1);
                let mut aligned = vec![ProteinCharacter::gap(); width];
                for (&col, c) in columns.iter().zip(seq.iter()) {
                    aligned[col] = c;
                }

                Ok(seq.with_same_identity(aligned))
            })
            .collect()
    }

    /// The mapped columns of the member at `index`.
    pub fn get(&self, index: usize) -> Option<&[usize]> {
        self.0.get(&index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, usize, Vec<usize>> {
        self.0.iter()
    }
}

impl From<BTreeMap<usize, Vec<usize>>> for AlignmentMapping {
    fn from(mapping: BTreeMap<usize, Vec<usize>>) -> Self {
        AlignmentMapping(mapping)
    }
}
