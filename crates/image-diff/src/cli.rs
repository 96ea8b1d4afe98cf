use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::SearchConfig;

#[derive(Parser)]
#[command(
    name = "image-diff",
    version,
    about = "Align two images by integer translation and show the pixels that still differ"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search for the best offset between two images and write the difference mask (exit 0/1)
    Compare {
        /// First image; this one is shifted during the search
        file1: PathBuf,
        /// Second image
        file2: PathBuf,
        /// Difference mask output path [default: diff.png]
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Config file (defaults to ./image-diff.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Resize FILE2 to FILE1 without asking when the sizes differ
        #[arg(long)]
        yes: bool,
        /// Print a JSON summary instead of the human-readable one
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        search: SearchConfig,
    },

    /// Create image-diff.toml with every setting commented out
    Init {
        /// Overwrite an existing config
        #[arg(long, short = 'f')]
        force: bool,
    },
}
