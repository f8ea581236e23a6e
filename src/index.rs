use std::collections::HashMap;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{Result, SequenceError};
use crate::seq::character::{is_gap_symbol, is_valid_symbol};

/// Location and shape of a single record within a FASTA file.
///
/// # Fields
///
/// * `offset` - The byte position of the first sequence byte, directly after the header line
/// * `span` - The bytes consumed by the record's sequence lines in the file (the _length_ on
///   _file_), including line terminators
/// * `length` - The number of symbols in the sequence, gaps included
/// * `base_length` - The number of symbols excluding gaps
/// * `has_gaps` - Whether any symbol is a gap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub offset: u64,
    pub span: u64,
    pub length: usize,
    pub base_length: usize,
    pub has_gaps: bool,
}

impl IndexEntry {
    fn starting_at(offset: u64) -> Self {
        IndexEntry {
            offset,
            span: 0,
            length: 0,
            base_length: 0,
            has_gaps: false,
        }
    }
}

/// A random-access index of a FASTA file, in file order.
///
/// Identifiers may repeat; lookup by identifier resolves to the first record carrying it.
#[derive(Debug, Clone)]
pub struct FileIndex {
    path: PathBuf,
    entries: Vec<(String, IndexEntry)>,
    first_by_id: HashMap<String, usize>,
}

impl FileIndex {
    /// Builds the index with a single forward scan of the file at `path`.
    ///
    /// Every symbol is validated during the scan, so a file which indexes successfully can
    /// be read back without character errors.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// * The file cannot be opened or read.
    /// * Any line, blank or not, precedes the first header.
    /// * A symbol is outside the protein alphabets.
    pub fn build(path: impl AsRef<Path>) -> Result<Self> {
        // time everything!
        let now = std::time::Instant::now();

        let path = path.as_ref().to_path_buf();
        let mut reader = BufReader::new(File::open(&path)?);

        let mut entries: Vec<(String, IndexEntry)> = Vec::new();
        let mut first_by_id: HashMap<String, usize> = HashMap::new();
        let mut current: Option<(String, IndexEntry)> = None;

        let mut line = Vec::new();
        let mut file_pos = 0u64;
        let mut line_number = 0;

        loop {
            line.clear();
            let n = reader.read_until(b'\n', &mut line)?;
            if n == 0 {
                break;
            }
            line_number += 1;

            if line.first() == Some(&b'>') {
                if let Some((id, entry)) = current.take() {
                    push_entry(&mut entries, &mut first_by_id, id, entry);
                }

                let id = parse_header_id(&line[1..]);
                current = Some((id, IndexEntry::starting_at(file_pos + n as u64)));
            } else {
                match current.as_mut() {
                    Some((_, entry)) => {
                        entry.span += n as u64;
                        scan_sequence_line(&line, entry)?;
                    }
                    // FASTA readers expect `>` on the very first line
                    None => {
                        return Err(SequenceError::MalformedFasta {
                            line: line_number,
                            reason: "expected a `>` header before any other line".to_string(),
                        })
                    }
                }
            }

            file_pos += n as u64;
        }

        if let Some((id, entry)) = current.take() {
            push_entry(&mut entries, &mut first_by_id, id, entry);
        }

        entries.shrink_to_fit();

        if first_by_id.len() < entries.len() {
            warn!(
                "{} contains {} records with a repeated identifier; lookups by identifier \
                resolve to the first occurrence",
                path.display(),
                entries.len() - first_by_id.len()
            );
        }

        info!(
            "Indexed {} sequences from {} ({} bytes) in {:.2}s",
            entries.len(),
            path.display(),
            file_pos,
            now.elapsed().as_secs_f64()
        );

        Ok(FileIndex {
            path,
            entries,
            first_by_id,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry of the first record with identifier `id`.
    pub fn get(&self, id: &str) -> Option<&IndexEntry> {
        self.first_by_id
            .get(id)
            .map(|&position| &self.entries[position].1)
    }

    /// The identifier and entry at position `index` in file order.
    pub fn get_index(&self, index: usize) -> Option<(&str, &IndexEntry)> {
        self.entries
            .get(index)
            .map(|(id, entry)| (id.as_str(), entry))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &IndexEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }
}

/// Extracts the identifier of a header line, without the leading `>`: everything up to the
/// first whitespace character, which may be empty.
fn parse_header_id(header: &[u8]) -> String {
    let header = String::from_utf8_lossy(header);
    header
        .trim_end()
        .split(char::is_whitespace)
        .next()
        .unwrap_or_default()
        .to_string()
}

fn scan_sequence_line(line: &[u8], entry: &mut IndexEntry) -> Result<()> {
    for &b in line.iter().filter(|b| !b.is_ascii_whitespace()) {
        if !is_valid_symbol(b) {
            return Err(SequenceError::InvalidCharacter {
                symbol: b as char,
                position: Some(entry.length),
            });
        }

        entry.length += 1;
        if is_gap_symbol(b) {
            entry.has_gaps = true;
        } else {
            entry.base_length += 1;
        }
    }
    Ok(())
}

fn push_entry(
    entries: &mut Vec<(String, IndexEntry)>,
    first_by_id: &mut HashMap<String, usize>,
    id: String,
    entry: IndexEntry,
) {
    debug!("Indexed `{id}` at byte {} ({} symbols)", entry.offset, entry.length);
    first_by_id.entry(id.clone()).or_insert(entries.len());
    entries.push((id, entry));
}
