//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Exchange files with a remote FileTransfer endpoint over NTLM.
#[derive(Parser, Debug)]
#[command(name = "fileferry")]
#[command(author, version, about)]
pub struct Args {
    /// Base server address, e.g. https://files.example.net
    #[arg(short, long)]
    pub server: String,

    /// Account name, optionally domain-qualified (DOMAIN\user)
    #[arg(short, long)]
    pub username: String,

    /// Account password
    #[arg(short, long)]
    pub password: String,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download the next pending file into a directory
    Download {
        /// Fetch the server-side bundle of all pending files instead
        #[arg(long)]
        all: bool,

        /// Directory to save into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Upload local files matching a glob pattern
    Upload {
        /// Glob pattern, relative to --path
        #[arg(long, default_value = "*")]
        glob: String,

        /// Local directory to match files under
        #[arg(long, default_value = ".")]
        path: PathBuf,

        /// Remote destination folder ("" is the root folder)
        #[arg(long, default_value = "")]
        dir: String,
    },
}
