use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vidcursor")]
#[command(author, version, about = "Inspect local and remote video files")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the reader buffer capacity in bytes
    #[arg(long, global = true)]
    pub max_buffer_length: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the first bytes of a file or URL as hex
    Head {
        /// Local path or http(s) URL
        #[arg(required = true)]
        location: String,

        /// Number of bytes to show
        #[arg(short = 'n', long, default_value = "16")]
        bytes: usize,
    },

    /// Detect the container and read header metadata
    Probe {
        /// Local path or http(s) URL
        #[arg(required = true)]
        location: String,

        /// Stop looking for the movie header after this many bytes
        #[arg(long, default_value = "67108864")]
        scan_limit: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
