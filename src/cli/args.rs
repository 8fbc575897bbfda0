//! CLI argument definitions using clap
//!
//! Commands:
//! - georange import --config <path> [--format registry|geolite] <PATH>...
//! - georange lookup --config <path> <ADDRESS> <DATE>
//! - georange info --config <path> [--limit N]

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// georange - A temporal IPv4 range database built from registry snapshots
#[derive(Parser, Debug)]
#[command(name = "georange")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Input format of an import
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImportFormat {
    /// Regional registry statistics files, dated by file name
    #[default]
    Registry,
    /// GeoLite City blocks/location CSV pairs, dated by modification time
    Geolite,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import registry files or directories into the combined database
    Import {
        /// Path to configuration file
        #[arg(long, default_value = "./georange.json")]
        config: PathBuf,

        /// Input format
        #[arg(long, value_enum, default_value_t = ImportFormat::Registry)]
        format: ImportFormat,

        /// Files or directories to import
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Look up the code of an address on a date
    Lookup {
        /// Path to configuration file
        #[arg(long, default_value = "./georange.json")]
        config: PathBuf,

        /// Dotted-quad IPv4 address
        address: String,

        /// Date as yyyymmdd
        date: String,
    },

    /// Summarize the combined database
    Info {
        /// Path to configuration file
        #[arg(long, default_value = "./georange.json")]
        config: PathBuf,

        /// Number of records to list (defaults to summary_limit)
        #[arg(long)]
        limit: Option<usize>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
