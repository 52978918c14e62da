//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use romaudit_lib::HashAlgorithm;

#[derive(Parser)]
#[command(name = "romaudit")]
#[command(about = "Audit ROM files and archives against a DAT catalog", long_about = None)]
pub(crate) struct Cli {
    /// DAT file to audit against (overrides `datfile` in settings.toml)
    #[arg(short, long, global = true)]
    pub datfile: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments shared by every command that hashes files.
#[derive(Args, Clone, Debug, Default)]
pub(crate) struct HashArgs {
    /// Hash algorithm: sha1, md5 or crc
    #[arg(short, long)]
    pub method: Option<HashAlgorithm>,

    /// Number of concurrent workers
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Skip files with this extension (repeatable, e.g. -e txt -e nfo)
    #[arg(short, long)]
    pub exclude: Vec<String>,
}

/// Which report sections `check` prints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Show {
    Files,
    Sets,
    #[default]
    All,
}

impl Show {
    pub fn files(self) -> bool {
        matches!(self, Show::Files | Show::All)
    }

    pub fn sets(self) -> bool {
        matches!(self, Show::Sets | Show::All)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum LookupMode {
    #[default]
    Rom,
    Game,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum LookupKey {
    #[default]
    Name,
    Crc,
    Md5,
    Sha1,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Check files and archives against the catalog
    Check {
        /// Files or archives to check (defaults to every file in the current directory)
        files: Vec<PathBuf>,

        #[command(flatten)]
        hash: HashArgs,

        /// Rename misnamed files and single-game archives
        #[arg(short, long)]
        rename: bool,

        /// Report every set in the catalog, not just those referenced
        #[arg(short, long)]
        allsets: bool,

        /// Sort the set summary by name instead of catalog order
        #[arg(short, long)]
        sort: bool,

        /// Report sections to print
        #[arg(long, value_enum, default_value_t = Show::All)]
        show: Show,

        /// Print file lines sorted by path after the run
        #[arg(long)]
        sort_files: bool,
    },

    /// Write a full sorted audit report of every set to a file
    Audit {
        /// Report file (default: audit_<date>_<time>.txt)
        output: Option<PathBuf>,

        #[command(flatten)]
        hash: HashArgs,

        /// Rename misnamed files and single-game archives
        #[arg(short, long)]
        rename: bool,
    },

    /// Look up roms or games in the catalog
    Lookup {
        /// Names or hashes to look up
        #[arg(required = true)]
        keys: Vec<String>,

        /// What to search for
        #[arg(short, long, value_enum, default_value_t = LookupMode::Rom)]
        mode: LookupMode,

        /// Rom attribute to match (rom mode only)
        #[arg(short, long, value_enum, default_value_t = LookupKey::Name)]
        key: LookupKey,

        /// Match names exactly instead of by substring
        #[arg(short = 'x', long)]
        exact: bool,
    },

    /// Pack complete sets of loose files into <game>.zip archives
    Zip {
        /// Loose files to pack (defaults to every file in the current directory)
        files: Vec<PathBuf>,

        #[command(flatten)]
        hash: HashArgs,

        /// Directory for the written archives
        #[arg(short, long, default_value = ".")]
        outdir: PathBuf,

        /// Delete source files after their archive is written
        #[arg(long)]
        remove: bool,
    },

    /// Manage settings.toml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the effective settings and their sources
    Show,

    /// Print the settings file path
    Path,
}
