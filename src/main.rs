extern crate env_logger;
#[macro_use]
extern crate log;
use std::{
    fs::File,
    io::{prelude::*, stdout, BufReader, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use protseq::{
    summary, AlignmentMapping, AlignmentOutput, ProteinSequences, ProteinSequencesOnFile,
    SequenceCollection,
};

mod cli;

use cli::{Cli, Commands};

/// Creates a `BufWriter` for the given output option. This allows for an output file to be passed
/// or otherwise will default to using standard output.
fn get_writer(output: &Option<PathBuf>) -> Result<impl Write> {
    // get output as a BufWriter - equal to stdout if None
    let writer = BufWriter::new(match output {
        Some(ref x) => {
            let file = File::create(x)
                .with_context(|| format!("Could not create output file {}", x.display()))?;
            Box::new(file) as Box<dyn Write + Send>
        }
        None => Box::new(stdout()) as Box<dyn Write + Send>,
    });
    Ok(writer)
}

fn open_collection(file: &Path) -> Result<ProteinSequencesOnFile> {
    ProteinSequencesOnFile::open(file).with_context(|| format!("Could not index {}", file.display()))
}

fn try_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();

    info!("protseq v{}", cli::VERSION);

    match &cli.command {
        Commands::Summary { file, in_memory } => {
            let summary = summary::summarize(file, *in_memory)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("Should be serialisable")?
            );
        }
        Commands::Mutations { file } => {
            let seqs = open_collection(file)?;
            let positions = seqs.mutated_positions()?;
            info!("Found {} mutated positions", positions.len());

            let mut writer = get_writer(&None)?;
            for position in positions {
                writeln!(writer, "{position}")?;
            }
            writer.flush()?;
        }
        Commands::Mapping { file, output } => {
            let seqs = open_collection(file)?;
            let mapping = seqs.get_alignment_mapping()?;

            let mut writer = get_writer(output)?;
            serde_json::to_writer_pretty(&mut writer, &mapping)?;
            writeln!(writer)?;
            writer.flush()?;

            info!("Derived an alignment mapping for {} sequences", mapping.len());
        }
        Commands::Apply {
            file,
            mapping,
            output,
        } => {
            let mapping_file = File::open(mapping)
                .with_context(|| format!("Could not open mapping {}", mapping.display()))?;
            let mapping: AlignmentMapping = serde_json::from_reader(BufReader::new(mapping_file))
                .context("Could not parse the alignment mapping")?;

            let seqs = open_collection(file)?;
            let aligned = seqs.apply_alignment_mapping(&mapping)?;

            protseq::io::write_fasta(get_writer(output)?, &aligned)?;
            info!("Applied the alignment mapping to {} sequences", aligned.len());
        }
        Commands::Align {
            file,
            existing,
            realign,
            output,
        } => {
            // time everything!
            let now = std::time::Instant::now();

            let seqs = open_collection(file)?;
            let result = match existing {
                Some(existing) => {
                    let existing = open_collection(existing)?;
                    seqs.align_to(&existing, *realign, output.as_deref())?
                }
                None => seqs.align_all(output.as_deref())?,
            };

            match result {
                AlignmentOutput::OnFile(aligned) => {
                    info!("Wrote {aligned}");
                }
                AlignmentOutput::InMemory(aligned) => {
                    write_alignment(&aligned)?;
                }
            }

            info!(
                "Completed alignment in {:.2}s",
                now.elapsed().as_secs_f64()
            );
        }
    };
    Ok(())
}

fn write_alignment(aligned: &ProteinSequences) -> Result<()> {
    protseq::io::write_fasta(get_writer(&None)?, aligned)?;
    Ok(())
}

fn main() {
    if let Err(err) = try_main() {
        error!("{}", err);

        // report any errors that are produced
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));

        std::process::exit(1);
    }
}
