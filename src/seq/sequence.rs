use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, SequenceError};
use crate::seq::character::ProteinCharacter;

/// An immutable, validated protein sequence with an optional identifier and an optional
/// reference to a structure file.
///
/// Two sequences are equal when both their characters and their identifiers match; the
/// structure path takes no part in equality or hashing.
#[derive(Clone, Debug)]
pub struct ProteinSequence {
    chars: Vec<ProteinCharacter>,
    id: Option<String>,
    structure: Option<PathBuf>,
}

impl ProteinSequence {
    /// Validates every symbol of `raw`, failing on the first invalid one.
    ///
    /// # Errors
    ///
    /// Returns `SequenceError::InvalidCharacter` with the offending position.
    pub fn new(raw: &str) -> Result<Self> {
        Self::from_bytes(raw.as_bytes())
    }

    pub fn from_bytes(raw: &[u8]) -> Result<Self> {
        let chars = raw
            .iter()
            .enumerate()
            .map(|(position, &b)| {
                ProteinCharacter::try_from(b).map_err(|_| SequenceError::InvalidCharacter {
                    symbol: b as char,
                    position: Some(position),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            chars,
            id: None,
            structure: None,
        })
    }

    fn from_chars(chars: Vec<ProteinCharacter>) -> Self {
        Self {
            chars,
            id: None,
            structure: None,
        }
    }

    /// A new sequence over `chars` carrying this sequence's identifier and structure.
    pub(crate) fn with_same_identity(&self, chars: Vec<ProteinCharacter>) -> Self {
        Self {
            chars,
            id: self.id.clone(),
            structure: self.structure.clone(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attaches a structure file, which must exist.
    pub fn with_structure(mut self, structure: impl AsRef<Path>) -> Result<Self> {
        self.set_structure(structure)?;
        Ok(self)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn structure(&self) -> Option<&Path> {
        self.structure.as_deref()
    }

    pub fn set_structure(&mut self, structure: impl AsRef<Path>) -> Result<()> {
        let structure = structure.as_ref();
        if !structure.exists() {
            return Err(SequenceError::StructureNotFound(structure.to_path_buf()));
        }
        self.structure = Some(structure.to_path_buf());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn has_gaps(&self) -> bool {
        self.chars.iter().any(|c| c.is_gap())
    }

    pub fn has_non_canonical(&self) -> bool {
        self.chars.iter().any(|c| c.is_non_canonical())
    }

    pub fn num_gaps(&self) -> usize {
        self.chars.iter().filter(|c| c.is_gap()).count()
    }

    /// Length of the sequence excluding gaps.
    pub fn base_length(&self) -> usize {
        self.len() - self.num_gaps()
    }

    pub fn get(&self, position: usize) -> Result<ProteinCharacter> {
        self.chars
            .get(position)
            .copied()
            .ok_or(SequenceError::OutOfRange {
                index: position,
                len: self.len(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = ProteinCharacter> + '_ {
        self.chars.iter().copied()
    }

    pub fn characters(&self) -> &[ProteinCharacter] {
        &self.chars
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        self.chars.iter().map(|c| c.as_byte()).collect()
    }

    /// Returns a copy with the symbol at `position` replaced.
    ///
    /// The result is a derived variant, so the identifier is not carried over. The
    /// structure is kept.
    pub fn mutate(&self, position: usize, symbol: char) -> Result<Self> {
        if position >= self.len() {
            return Err(SequenceError::OutOfRange {
                index: position,
                len: self.len(),
            });
        }
        let symbol = ProteinCharacter::new(symbol)?;

        let mut chars = self.chars.clone();
        chars[position] = symbol;

        Ok(Self {
            chars,
            id: None,
            structure: self.structure.clone(),
        })
    }

    /// Indices at which `self` and `other` differ, compared up to the shorter length.
    pub fn mutated_positions(&self, other: &ProteinSequence) -> Vec<usize> {
        self.chars
            .iter()
            .zip(other.chars.iter())
            .enumerate()
            .filter_map(|(i, (a, b))| (a != b).then_some(i))
            .collect()
    }

    pub fn with_no_gaps(&self) -> Self {
        self.with_same_identity(self.chars.iter().copied().filter(|c| !c.is_gap()).collect())
    }

    /// The half-open range `[start, end)` as a new sequence with the same identity.
    pub fn slice(&self, start: usize, end: usize) -> Result<Self> {
        if end > self.len() {
            return Err(SequenceError::OutOfRange {
                index: end,
                len: self.len(),
            });
        }
        if start > end {
            return Err(SequenceError::OutOfRange {
                index: start,
                len: end,
            });
        }

        Ok(self.with_same_identity(self.chars[start..end].to_vec()))
    }

    /// Globally aligns the gap-free forms of `self` and `other`.
    pub fn align(&self, other: &ProteinSequence) -> Result<(Self, Self)> {
        let (a, b) = crate::align::pairwise_global(
            &self.with_no_gaps().as_bytes(),
            &other.with_no_gaps().as_bytes(),
        );

        Ok((
            self.with_same_identity(Self::from_bytes(&a)?.chars),
            other.with_same_identity(Self::from_bytes(&b)?.chars),
        ))
    }

    /// A stable hash over the characters and identifier.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// The identifier, or the content hash when no identifier is set. Used as the
    /// record name whenever sequences are exported.
    pub fn key(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => self.content_hash().to_string(),
        }
    }
}

impl PartialEq for ProteinSequence {
    fn eq(&self, other: &Self) -> bool {
        self.chars == other.chars && self.id == other.id
    }
}

impl Eq for ProteinSequence {}

impl Hash for ProteinSequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chars.hash(state);
        self.id.hash(state);
    }
}

impl FromStr for ProteinSequence {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl FromIterator<ProteinCharacter> for ProteinSequence {
    fn from_iter<I: IntoIterator<Item = ProteinCharacter>>(iter: I) -> Self {
        Self::from_chars(iter.into_iter().collect())
    }
}

impl fmt::Display for ProteinSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.chars {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
