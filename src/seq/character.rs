use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SequenceError};

/// The twenty standard amino acids.
pub const CANONICAL_AMINO_ACIDS: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

/// Ambiguity and modified-residue codes which are accepted but not canonical.
pub const NON_CANONICAL_AMINO_ACIDS: &[u8] = b"BXZJUO";

/// Symbols marking an alignment gap.
pub const GAP_CHARACTERS: &[u8] = b"-.";

/// The symbol written into alignment columns with no residue.
pub const GAP: u8 = b'-';

#[inline]
pub fn is_gap_symbol(b: u8) -> bool {
    GAP_CHARACTERS.contains(&b)
}

#[inline]
pub fn is_non_canonical_symbol(b: u8) -> bool {
    NON_CANONICAL_AMINO_ACIDS.contains(&b.to_ascii_uppercase())
}

/// Whether `b` belongs to any of the recognised alphabets, ignoring case.
#[inline]
pub fn is_valid_symbol(b: u8) -> bool {
    let upper = b.to_ascii_uppercase();
    CANONICAL_AMINO_ACIDS.contains(&upper)
        || NON_CANONICAL_AMINO_ACIDS.contains(&upper)
        || GAP_CHARACTERS.contains(&b)
}

/// A single validated symbol of a protein sequence.
///
/// Lowercase residues are kept as-is; they mark columns which are not in focus
/// (for example insert states of an alignment against a reference).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProteinCharacter(u8);

impl ProteinCharacter {
    pub fn new(c: char) -> Result<Self> {
        Self::try_from(c)
    }

    pub fn gap() -> Self {
        Self(GAP)
    }

    pub fn as_char(self) -> char {
        self.0 as char
    }

    pub fn as_byte(self) -> u8 {
        self.0
    }

    pub fn is_gap(self) -> bool {
        is_gap_symbol(self.0)
    }

    pub fn is_non_canonical(self) -> bool {
        is_non_canonical_symbol(self.0)
    }

    /// Gaps and lowercase residues are not in focus.
    pub fn is_not_focus(self) -> bool {
        self.is_gap() || self.0.is_ascii_lowercase()
    }
}

impl TryFrom<u8> for ProteinCharacter {
    type Error = SequenceError;

    fn try_from(b: u8) -> Result<Self> {
        if is_valid_symbol(b) {
            Ok(Self(b))
        } else {
            Err(SequenceError::InvalidCharacter {
                symbol: b as char,
                position: None,
            })
        }
    }
}

impl TryFrom<char> for ProteinCharacter {
    type Error = SequenceError;

    fn try_from(c: char) -> Result<Self> {
        if !c.is_ascii() {
            return Err(SequenceError::InvalidCharacter {
                symbol: c,
                position: None,
            });
        }
        Self::try_from(c as u8)
    }
}

impl FromStr for ProteinCharacter {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::try_from(c),
            _ => Err(SequenceError::InvalidSymbolCount(s.to_string())),
        }
    }
}

impl fmt::Display for ProteinCharacter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl From<ProteinCharacter> for char {
    fn from(c: ProteinCharacter) -> char {
        c.as_char()
    }
}
