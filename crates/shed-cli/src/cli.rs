//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Tool shed - extract and version repository metadata
#[derive(Parser, Debug)]
#[command(name = "shed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (.toml, .json or .yaml)
    #[arg(long, global = true, env = "SHED_CONFIG", default_value = "shed.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// The hosted repository a command works on.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RepoTarget {
    /// Working copy of the repository
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Owner of the repository, used in tool guids
    #[arg(long, env = "SHED_OWNER")]
    pub owner: String,

    /// Repository name; defaults to the working copy's directory name
    #[arg(long)]
    pub name: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Extract metadata for a revision and store it
    ///
    /// Examples:
    ///   shed set-metadata --owner alice            # the tip
    ///   shed set-metadata --owner alice 3f2a9c01bd44
    SetMetadata {
        #[command(flatten)]
        target: RepoTarget,

        /// Revision to process; defaults to the tip
        revision: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show stored metadata for a revision
    Show {
        #[command(flatten)]
        target: RepoTarget,

        /// Revision to show; defaults to the latest record
        revision: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List changesets and whether they are installable
    Revisions {
        #[command(flatten)]
        target: RepoTarget,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Encode a value with the configured secret
    Encode {
        value: String,

        /// Treat the value as a JSON document
        #[arg(long)]
        json: bool,
    },

    /// Verify and decode a value produced by `encode`
    Decode { value: String },
}
