use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use bio::io::fasta;
use itertools::Itertools;

use crate::collection::{BatchIter, ProteinSequences, SequenceCollection, SequenceIter};
use crate::error::{Result, SequenceError};
use crate::index::{FileIndex, IndexEntry};
use crate::io::{read_symbols_at, record_to_sequence};
use crate::seq::ProteinSequence;

/// A collection backed by a FASTA file, read on demand through a byte-offset index.
///
/// The file is indexed once when the collection is opened; the aggregate properties are
/// computed from the index at the same time. The file is assumed not to change while the
/// collection is alive.
#[derive(Debug, Clone)]
pub struct ProteinSequencesOnFile {
    index: FileIndex,
    aligned: bool,
    fixed_length: bool,
    width: Option<usize>,
    has_gaps: bool,
}

impl ProteinSequencesOnFile {
    /// Indexes the FASTA file at `path`.
    ///
    /// # Errors
    ///
    /// Any error from `FileIndex::build`, such as malformed FASTA or invalid symbols.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let index = FileIndex::build(path)?;

        let width = index
            .entries()
            .map(|(_, entry)| entry.length)
            .all_equal_value()
            .ok();
        let fixed_length = index
            .entries()
            .map(|(_, entry)| entry.base_length)
            .all_equal_value()
            .is_ok();
        let has_gaps = index.entries().any(|(_, entry)| entry.has_gaps);

        Ok(ProteinSequencesOnFile {
            index,
            aligned: width.is_some(),
            fixed_length,
            width,
            has_gaps,
        })
    }

    pub fn path(&self) -> &Path {
        self.index.path()
    }

    pub fn index(&self) -> &FileIndex {
        &self.index
    }

    fn read_entry(file: &mut File, id: &str, entry: &IndexEntry) -> Result<ProteinSequence> {
        let symbols = read_symbols_at(file, entry)?;
        Ok(ProteinSequence::from_bytes(&symbols)?.with_id(id))
    }
}

impl SequenceCollection for ProteinSequencesOnFile {
    fn len(&self) -> usize {
        self.index.len()
    }

    fn sequence_at(&self, index: usize) -> Result<ProteinSequence> {
        let (id, entry) = self.index.get_index(index).ok_or(SequenceError::OutOfRange {
            index,
            len: self.index.len(),
        })?;
        let mut file = File::open(self.path())?;
        Self::read_entry(&mut file, id, entry)
    }

    fn sequence_by_id(&self, id: &str) -> Result<ProteinSequence> {
        let entry = self
            .index
            .get(id)
            .ok_or_else(|| SequenceError::NotFound(id.to_string()))?;
        let mut file = File::open(self.path())?;
        Self::read_entry(&mut file, id, entry)
    }

    fn sequences(&self) -> SequenceIter<'_> {
        match File::open(self.path()) {
            Ok(file) => Box::new(
                fasta::Reader::from_bufread(BufReader::new(file))
                    .records()
                    .map(|record| record_to_sequence(&record?)),
            ),
            Err(e) => Box::new(std::iter::once(Err(SequenceError::Io(e)))),
        }
    }

    fn aligned(&self) -> bool {
        self.aligned
    }

    fn fixed_length(&self) -> bool {
        self.fixed_length
    }

    fn width(&self) -> Option<usize> {
        self.width
    }

    fn has_gaps(&self) -> bool {
        self.has_gaps
    }

    fn iter_batches(&self, batch_size: usize) -> Result<BatchIter<'_>> {
        if batch_size == 0 {
            return Err(SequenceError::InvalidBatchSize);
        }

        let batch_starts = (0..self.index.len()).step_by(batch_size);
        Ok(Box::new(batch_starts.map(move |start| -> Result<ProteinSequences> {
            let end = (start + batch_size).min(self.index.len());
            let mut file = File::open(self.path())?;
            (start..end)
                .map(|i| {
                    let (id, entry) = self.index.get_index(i).ok_or(SequenceError::OutOfRange {
                        index: i,
                        len: self.index.len(),
                    })?;
                    Self::read_entry(&mut file, id, entry)
                })
                .collect()
        })))
    }
}

impl fmt::Display for ProteinSequencesOnFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProteinSequencesOnFile(path={}, count={}, aligned={}, fixed_length={})",
            self.path().display(),
            self.len(),
            self.aligned,
            self.fixed_length
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fasta_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn properties_from_index() {
        let file = fasta_file(">a\nACDE\n>b\nAC-E\n");
        let c = ProteinSequencesOnFile::open(file.path()).unwrap();

        assert_eq!(c.len(), 2);
        assert!(c.aligned());
        assert_eq!(c.width(), Some(4));
        assert!(c.has_gaps());
        assert!(!c.fixed_length());
        assert_eq!(c.mutated_positions().unwrap(), vec![2]);
    }

    #[test]
    fn random_access() {
        let file = fasta_file(">z desc\nMK\nTA\n>a\nAC-E\n>m\nw\n");
        let c = ProteinSequencesOnFile::open(file.path()).unwrap();

        let z = c.sequence_at(0).unwrap();
        assert_eq!(z.to_string(), "MKTA");
        assert_eq!(z.id(), Some("z"));

        assert_eq!(c.sequence_by_id("m").unwrap().to_string(), "w");
        assert_eq!(c.sequence_at(1).unwrap().to_string(), "AC-E");

        assert!(matches!(
            c.sequence_at(3),
            Err(SequenceError::OutOfRange { index: 3, len: 3 })
        ));
        assert!(matches!(
            c.sequence_by_id("q"),
            Err(SequenceError::NotFound(_))
        ));
    }

    #[test]
    fn iteration_is_repeatable() {
        let file = fasta_file(">a\nACDE\n>b\nAC-E\n>c\nKKKK\n");
        let c = ProteinSequencesOnFile::open(file.path()).unwrap();

        let first: Vec<ProteinSequence> = c.sequences().collect::<Result<_>>().unwrap();
        let second: Vec<ProteinSequence> = c.sequences().collect::<Result<_>>().unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.iter().map(|s| s.id().unwrap()).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn batches_match_iteration() {
        let content: String = (0..5).map(|i| format!(">s{i}\nACD{}\n", "E".repeat(i))).collect();
        let file = fasta_file(&content);
        let c = ProteinSequencesOnFile::open(file.path()).unwrap();

        let batches: Vec<ProteinSequences> = c
            .iter_batches(2)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(batches.iter().map(|b| b.len()).collect::<Vec<_>>(), vec![2, 2, 1]);

        let rejoined: ProteinSequences = batches.into_iter().flatten().collect();
        assert_eq!(rejoined, c.to_memory().unwrap());

        assert!(matches!(
            c.iter_batches(0).err(),
            Some(SequenceError::InvalidBatchSize)
        ));
    }

    #[test]
    fn duplicate_ids_are_kept() {
        let file = fasta_file(">a\nACDE\n>a\nAC-E\n");
        let c = ProteinSequencesOnFile::open(file.path()).unwrap();

        assert_eq!(c.len(), 2);
        assert_eq!(c.sequence_by_id("a").unwrap().to_string(), "ACDE");
        assert_eq!(c.sequence_at(1).unwrap().to_string(), "AC-E");
        assert_eq!(c.to_memory().unwrap().len(), 2);
    }

    #[test]
    fn leading_blank_line_fails_to_open() {
        let file = fasta_file("\n>a\nACDE\n");
        assert!(matches!(
            ProteinSequencesOnFile::open(file.path()),
            Err(SequenceError::MalformedFasta { line: 1, .. })
        ));
    }

    #[test]
    fn empty_file() {
        let file = fasta_file("");
        let c = ProteinSequencesOnFile::open(file.path()).unwrap();
        assert!(c.is_empty());
        assert!(!c.aligned());
        assert!(!c.fixed_length());
        assert_eq!(c.sequences().count(), 0);
    }

    #[test]
    fn missing_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ProteinSequencesOnFile::open(dir.path().join("nope.fasta")),
            Err(SequenceError::Io(_))
        ));
    }

    #[test]
    fn display_names_the_file() {
        let file = fasta_file(">a\nACDE\n");
        let c = ProteinSequencesOnFile::open(file.path()).unwrap();
        let shown = c.to_string();
        assert!(shown.starts_with("ProteinSequencesOnFile(path="));
        assert!(shown.ends_with("count=1, aligned=true, fixed_length=true)"));
    }
}
