#[macro_use]
extern crate log;

pub mod align;
pub mod collection;
pub mod error;
pub mod index;
pub mod io;
pub mod mapping;
pub mod requirements;
pub mod seq;
pub mod summary;

pub use collection::{
    AlignmentOutput, ProteinSequences, ProteinSequencesOnFile, SequenceCollection, SymbolGrid,
};
pub use error::{Result, SequenceError};
pub use mapping::AlignmentMapping;
pub use requirements::Requirements;
pub use seq::{ProteinCharacter, ProteinSequence};
