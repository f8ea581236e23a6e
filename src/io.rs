use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use bio::io::fasta;

use crate::error::Result;
use crate::index::IndexEntry;
use crate::seq::ProteinSequence;

/// Reads every record of a FASTA stream into validated sequences, in file order.
///
/// Whitespace embedded in sequence lines is dropped.
///
/// # Errors
///
/// This function will return an error if:
/// * The stream is not valid FASTA (for example, content before the first header).
/// * A record contains a symbol outside the protein alphabets.
pub fn read_fasta<R: Read>(reader: R) -> Result<Vec<ProteinSequence>> {
    fasta::Reader::new(reader)
        .records()
        .map(|record| record_to_sequence(&record?))
        .collect()
}

pub fn read_fasta_file(path: &Path) -> Result<Vec<ProteinSequence>> {
    read_fasta(File::open(path)?)
}

pub(crate) fn record_to_sequence(record: &fasta::Record) -> Result<ProteinSequence> {
    let seq: Vec<u8> = record
        .seq()
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    Ok(ProteinSequence::from_bytes(&seq)?.with_id(record.id()))
}

/// Writes sequences as FASTA, one line per sequence. Sequences without an identifier
/// are written under their content hash.
pub fn write_fasta<'a, W: Write>(
    writer: W,
    sequences: impl IntoIterator<Item = &'a ProteinSequence>,
) -> Result<()> {
    let mut writer = fasta::Writer::new(writer);
    for seq in sequences {
        writer.write(&seq.key(), None, &seq.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Like `write_fasta`, but for sequences produced by a fallible iterator, such as a
/// pass over a file-backed collection.
pub fn write_fasta_file_from_iter(
    path: &Path,
    sequences: impl Iterator<Item = Result<ProteinSequence>>,
) -> Result<()> {
    let mut writer = fasta::Writer::new(File::create(path)?);
    for seq in sequences {
        let seq = seq?;
        writer.write(&seq.key(), None, &seq.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Retrieves the raw symbols of one record from a file at the position given by its
/// index entry.
///
/// # Errors
///
/// This function will return an error if the file cannot be seeked to the start of the
/// record or fewer than `entry.span` bytes could be read.
pub fn read_symbols_at(file: &mut File, entry: &IndexEntry) -> Result<Vec<u8>> {
    // go to the first byte after the header
    file.seek(SeekFrom::Start(entry.offset))?;

    let mut buf = Vec::with_capacity(entry.span as usize);
    let read = Read::by_ref(file).take(entry.span).read_to_end(&mut buf)?;
    if (read as u64) < entry.span {
        return Err(std::io::Error::new(
            ErrorKind::UnexpectedEof,
            format!("expected {} bytes at offset {}, found {read}", entry.span, entry.offset),
        )
        .into());
    }

    buf.retain(|b| !b.is_ascii_whitespace());
    Ok(buf)
}
