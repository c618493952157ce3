use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::selection::Selection;

#[derive(Debug, Parser)]
#[command(
    name = "cotools",
    about = "Browse, search and download the CORD-19 paper corpus"
)]
pub struct Cli {
    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download and unpack the CORD-19 archives and metadata table
    Download(DownloadArgs),
    /// Print the number of papers in a directory
    Count(DirArgs),
    /// Print papers by position or slice as JSON
    Get(GetArgs),
    /// Print the body text (or abstract) of every paper
    Texts(TextsArgs),
    /// Find papers whose text or abstract contains any query
    Search(SearchArgs),
    /// Print the metadata rows for the papers in a directory as CSV
    Meta(MetaArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Download --

#[derive(Debug, Parser)]
pub struct DownloadArgs {
    /// Target directory (defaults to $COTOOLS_DATA_DIR, then ".")
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

// -- Paper directory --

#[derive(Debug, Parser)]
pub struct DirArgs {
    /// Directory of paper JSON files
    pub dir: PathBuf,

    /// Order papers by filename instead of directory listing order
    #[arg(long)]
    pub sorted: bool,
}

// -- Get --

#[derive(Debug, Parser)]
pub struct GetArgs {
    #[command(flatten)]
    pub paperset: DirArgs,

    /// Position ("3", "-1") or slice ("1:5", "::2", "5:1:-1")
    #[arg(allow_hyphen_values = true)]
    pub selection: Selection,
}

// -- Texts --

#[derive(Debug, Parser)]
pub struct TextsArgs {
    #[command(flatten)]
    pub paperset: DirArgs,

    /// Print abstracts instead of body text
    #[arg(long)]
    pub abstracts: bool,
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    #[command(flatten)]
    pub paperset: DirArgs,

    /// Substrings to look for (case-insensitive; any may match)
    #[arg(required = true)]
    pub queries: Vec<String>,

    /// Output results as JSON
    #[arg(long, conflicts_with = "files")]
    pub json: bool,

    /// Output only file paths (one per line)
    #[arg(long)]
    pub files: bool,
}

// -- Meta --

#[derive(Debug, Parser)]
pub struct MetaArgs {
    /// Directory of paper JSON files containing meta_data.csv
    pub dir: PathBuf,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "cotools",
            &mut std::io::stdout(),
        );
    }
}
