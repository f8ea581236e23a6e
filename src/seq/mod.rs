pub mod character;
pub mod sequence;

pub use self::character::ProteinCharacter;
pub use self::sequence::ProteinSequence;
