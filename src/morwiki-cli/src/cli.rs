//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "morwiki",
    version,
    about = "Wiki data generator for Return to Moria table exports"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve every table and write per-entity wiki data documents
    Generate {
        /// Exported data directory (contains the DT_*.json tables)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Output directory for wiki data and audit logs
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Categories to generate (default: all)
        #[arg(short, long)]
        category: Vec<String>,

        /// Unlock-override file (display name -> campaign/sandbox text)
        #[arg(long)]
        overrides: Option<PathBuf>,
    },

    /// Save default paths to the config file
    Configure {
        /// Exported data directory to remember
        #[arg(long)]
        source: Option<PathBuf>,

        /// Output directory to remember
        #[arg(long)]
        output: Option<PathBuf>,

        /// Unlock-override file to remember
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Show the current configuration
        #[arg(long)]
        show: bool,
    },

    /// Probe the merged string catalog for a key
    Lookup {
        /// Exact key, or a suffix with --suffix
        key: String,

        /// List every key ending with the given suffix
        #[arg(long)]
        suffix: bool,

        /// Exported data directory
        #[arg(short, long)]
        source: Option<PathBuf>,
    },

    /// Show the recipe join for one entity
    Recipe {
        /// Internal row name (e.g. Night_Brew)
        name: String,

        /// Category whose join rules apply
        #[arg(short, long, default_value = "items")]
        category: String,

        /// Exported data directory
        #[arg(short, long)]
        source: Option<PathBuf>,
    },

    /// List the recipes that consume a material
    Usage {
        /// Material display name (e.g. "Iron Ingot")
        name: String,

        /// Exported data directory
        #[arg(short, long)]
        source: Option<PathBuf>,
    },
}
