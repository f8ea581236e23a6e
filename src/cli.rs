use std::path::PathBuf;

use clap::builder::styling::AnsiColor;
use clap::builder::Styles;
use clap::{Parser, Subcommand};

const fn extra_build_info() -> &'static str {
    match option_env!("CARGO_BUILD_DESC") {
        Some(e) => e,
        None => env!("CARGO_PKG_VERSION"),
    }
}
pub const VERSION: &str = extra_build_info();
const INFO_STRING: &str = "
protseq version ";
const AFTER_STRING: &str = "
   ──────────────────────────────────
   validated protein sequence collections, indexed FASTA access
   and alignment coordinate mappings";

// colouring of the help
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::BrightMagenta.on_default().bold())
    .literal(AnsiColor::BrightMagenta.on_default())
    .placeholder(AnsiColor::White.on_default());

#[derive(Parser)]
#[command(
    version = VERSION,
    about = format!("{}{}{}", INFO_STRING, VERSION, AFTER_STRING),
    arg_required_else_help = true,
    flatten_help = true,
    styles = STYLES
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the properties of a FASTA file's sequences as JSON
    #[command(arg_required_else_help = true)]
    Summary {
        /// the input .fasta file
        file: PathBuf,

        /// load every sequence into memory instead of indexing the file
        #[arg(long)]
        in_memory: bool,
    },

    /// Print the columns of an alignment which hold more than one distinct symbol
    #[command(arg_required_else_help = true)]
    Mutations {
        /// the aligned .fasta file
        file: PathBuf,
    },

    /// Derive an alignment mapping from an aligned .fasta file
    #[command(arg_required_else_help = true)]
    Mapping {
        /// the aligned .fasta file
        file: PathBuf,

        /// the output .json mapping
        #[arg(short)]
        output: Option<PathBuf>,
    },

    /// Re-align unaligned sequences using a previously derived mapping
    #[command(arg_required_else_help = true)]
    Apply {
        /// the unaligned .fasta file, in the same order as the mapped alignment
        file: PathBuf,

        /// the .json mapping produced by `protseq mapping`
        #[arg(long)]
        mapping: PathBuf,

        /// the output .fasta
        #[arg(short)]
        output: Option<PathBuf>,
    },

    /// Align the sequences of a .fasta file with MAFFT.
    /// set the MAFFT_PATH environment variable to use a specific executable.
    #[command(arg_required_else_help = true, verbatim_doc_comment)]
    Align {
        /// the input .fasta file, without gaps
        file: PathBuf,

        /// an existing alignment to add the sequences to
        #[arg(long)]
        existing: Option<PathBuf>,

        /// with --existing, let MAFFT rebuild the existing alignment's columns
        #[arg(long, requires = "existing")]
        realign: bool,

        /// the output .fasta; printed to standard output otherwise
        #[arg(short)]
        output: Option<PathBuf>,
    },
}
