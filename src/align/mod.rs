use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};

use bio::alignment::pairwise::Aligner;
use bio::alignment::AlignmentOperation;

use crate::collection::{AlignmentOutput, ProteinSequences, ProteinSequencesOnFile, SequenceCollection};
use crate::error::{Result, SequenceError};
use crate::seq::character::GAP;

const GAP_OPEN: i32 = -10;
const GAP_EXTEND: i32 = -1;

// symbols with a row in the BLOSUM62 table
const BLOSUM_SYMBOLS: &[u8] = b"ARNDCQEGHILKMFPSTWYVBZX";

fn score(a: u8, b: u8) -> i32 {
    let (a, b) = (a.to_ascii_uppercase(), b.to_ascii_uppercase());
    if BLOSUM_SYMBOLS.contains(&a) && BLOSUM_SYMBOLS.contains(&b) {
        bio::scores::blosum62(a, b)
    } else if a == b {
        1
    } else {
        -1
    }
}

/// Global pairwise alignment of two gap-free residue strings.
///
/// Returns both inputs padded with gaps so that they have equal length. The original
/// case of each residue is kept; only scoring is case-insensitive.
pub fn pairwise_global(x: &[u8], y: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut aligner = Aligner::with_capacity(x.len(), y.len(), GAP_OPEN, GAP_EXTEND, &score);
    let alignment = aligner.global(x, y);

    let mut aligned_x = Vec::with_capacity(x.len() + y.len());
    let mut aligned_y = Vec::with_capacity(x.len() + y.len());
    let (mut i, mut j) = (0, 0);

    for op in alignment.operations.iter() {
        match op {
            AlignmentOperation::Match | AlignmentOperation::Subst => {
                aligned_x.push(x[i]);
                aligned_y.push(y[j]);
                i += 1;
                j += 1;
            }
            // a residue of x which is absent in y
            AlignmentOperation::Ins => {
                aligned_x.push(x[i]);
                aligned_y.push(GAP);
                i += 1;
            }
            AlignmentOperation::Del => {
                aligned_x.push(GAP);
                aligned_y.push(y[j]);
                j += 1;
            }
            AlignmentOperation::Xclip(n) => {
                aligned_x.extend_from_slice(&x[i..i + n]);
                aligned_y.extend(std::iter::repeat(GAP).take(*n));
                i += n;
            }
            AlignmentOperation::Yclip(n) => {
                aligned_x.extend(std::iter::repeat(GAP).take(*n));
                aligned_y.extend_from_slice(&y[j..j + n]);
                j += n;
            }
        }
    }

    (aligned_x, aligned_y)
}

fn mafft_path() -> String {
    match env::var("MAFFT_PATH") {
        Ok(v) => v,
        Err(_) => String::from("mafft"),
    }
}

/// Runs MAFFT over `sequences`, optionally adding them to an `existing` alignment.
///
/// With an existing alignment, `realign = false` keeps its columns fixed
/// (`--keeplength`), while `realign = true` lets MAFFT rebuild the whole alignment.
/// The output contains the existing members followed by the new ones.
///
/// If `output` is given, the alignment is written there and returned as a file-backed
/// collection; otherwise it is parsed into memory.
///
/// # Errors
///
/// * `SequenceError::ToolNotFound` if the executable could not be started.
/// * `SequenceError::ToolFailed` if MAFFT exits with a non-zero status.
pub fn mafft_align<S: SequenceCollection + ?Sized>(
    sequences: &S,
    existing: Option<&dyn SequenceCollection>,
    realign: bool,
    output: Option<&Path>,
) -> Result<AlignmentOutput> {
    let mafft = mafft_path();

    // temporary files are removed when they go out of scope
    let input = tempfile::Builder::new().suffix(".fasta").tempfile()?;
    sequences.write_fasta(input.path())?;

    let existing_file = match existing {
        Some(existing) => {
            let file = tempfile::Builder::new().suffix(".fasta").tempfile()?;
            existing.write_fasta(file.path())?;
            Some(file)
        }
        None => None,
    };

    let mut command = Command::new(&mafft);
    command.stdout(Stdio::piped()).stderr(Stdio::piped());

    match &existing_file {
        None => {
            command.arg("--auto").arg(input.path());
        }
        Some(file) => {
            command.arg("--add").arg(input.path());
            if !realign {
                command.arg("--keeplength");
            }
            command.arg(file.path());
        }
    }

    info!(
        "Aligning {} sequences with {mafft}{}",
        sequences.len(),
        if existing.is_some() { " against an existing alignment" } else { "" }
    );

    let child = command.spawn().map_err(|e| match e.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => SequenceError::ToolNotFound {
            tool: "mafft",
            path: mafft.clone(),
        },
        _ => SequenceError::Io(e),
    })?;

    let result = child.wait_with_output()?;

    if !result.status.success() {
        return Err(SequenceError::ToolFailed {
            tool: "mafft",
            status: result.status,
            stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
        });
    }

    match output {
        Some(path) => {
            fs::write(path, &result.stdout)?;
            Ok(AlignmentOutput::OnFile(ProteinSequencesOnFile::open(path)?))
        }
        None => Ok(AlignmentOutput::InMemory(ProteinSequences::from_reader(
            result.stdout.as_slice(),
        )?)),
    }
}
