use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch today's image from a provider and install it
    Run {
        /// Provider id (see `potd list`)
        provider: String,

        /// Directory to keep deduplicated backups in
        backup_dir: Option<PathBuf>,

        /// Extra key appended to backup file names
        backup_suffix: Option<String>,

        /// Destination directory (repeatable; defaults to the KDE POTD
        /// cache directories)
        #[clap(long)]
        target: Vec<PathBuf>,
    },

    /// List the supported providers
    List,
}
