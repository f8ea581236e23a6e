use serde::{Deserialize, Serialize};

use crate::collection::{ProteinSequences, SequenceCollection};
use crate::error::{Result, SequenceError};

/// Input capabilities a consumer of sequence collections depends on.
///
/// Consumers such as models declare these flags and validate collections against them
/// before use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    /// Inputs must be aligned (equal length including gaps).
    #[serde(default)]
    pub requires_msa: bool,
    /// Inputs must share the same length excluding gaps.
    #[serde(default)]
    pub requires_fixed_length: bool,
}

impl Requirements {
    /// # Errors
    ///
    /// * `SequenceError::NotAligned` if alignment is required and `collection` is not aligned.
    /// * `SequenceError::NotFixedLength` if fixed length is required and not satisfied.
    pub fn check<C: SequenceCollection + ?Sized>(&self, collection: &C) -> Result<()> {
        if self.requires_msa && !collection.aligned() {
            return Err(SequenceError::NotAligned("satisfy the consumer's requirements"));
        }
        if self.requires_fixed_length && !collection.fixed_length() {
            return Err(SequenceError::NotFixedLength(
                "satisfy the consumer's requirements",
            ));
        }
        Ok(())
    }

    /// Returns `collection` unchanged if it is aligned, otherwise aligns it in memory.
    pub fn enforce_aligned(collection: ProteinSequences) -> Result<ProteinSequences> {
        if collection.aligned() {
            return Ok(collection);
        }
        warn!(
            "{} sequences are not aligned; aligning them before use",
            collection.len()
        );
        collection.align_all(None)?.into_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq::ProteinSequence;

    fn seqs(raw: &[&str]) -> ProteinSequences {
        raw.iter().map(|s| ProteinSequence::new(s).unwrap()).collect()
    }

    #[test]
    fn no_requirements_accept_anything() {
        let r = Requirements::default();
        assert!(r.check(&seqs(&["ACDE", "A"])).is_ok());
    }

    #[test]
    fn msa_requirement() {
        let r = Requirements {
            requires_msa: true,
            ..Default::default()
        };
        assert!(r.check(&seqs(&["ACDE", "AC-E"])).is_ok());
        assert!(matches!(
            r.check(&seqs(&["ACDE", "ACE"])),
            Err(SequenceError::NotAligned(_))
        ));
    }

    #[test]
    fn fixed_length_requirement() {
        let r = Requirements {
            requires_fixed_length: true,
            ..Default::default()
        };
        assert!(r.check(&seqs(&["AC-DE", "ACDE"])).is_ok());
        assert!(matches!(
            r.check(&seqs(&["ACDE", "AC-E"])),
            Err(SequenceError::NotFixedLength(_))
        ));
    }

    #[test]
    fn aligned_input_is_returned_unchanged() {
        let input = seqs(&["ACDE", "AC-E"]);
        let out = Requirements::enforce_aligned(input.clone()).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn flags_deserialize_with_defaults() {
        let r: Requirements = serde_json::from_str(r#"{"requires_msa": true}"#).unwrap();
        assert!(r.requires_msa);
        assert!(!r.requires_fixed_length);
    }
}
