//! SegBuf CLI
//!
//! Command-line harness for segment buffers. Each run ingests a byte stream
//! (a file or stdin) into a fresh buffer, the way a live producer would, and
//! then serves the resulting window.
//!
//! # Commands
//!
//! - `inspect` - Display the retained window
//! - `dump` - Write one segment to stdout
//! - `tail` - Write the newest segments to stdout

mod commands;

use clap::{Args, Parser, Subcommand};
use segbuf_core::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// SegBuf command-line stream buffer tools.
#[derive(Parser)]
#[command(name = "segbuf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    buffer: BufferArgs,

    /// Input stream (stdin if omitted)
    #[arg(global = true, short, long)]
    input: Option<PathBuf>,

    /// Producer read size in bytes (defaults to one segment)
    #[arg(global = true, long)]
    chunk: Option<usize>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Buffer configuration flags.
#[derive(Args)]
struct BufferArgs {
    /// Bytes per segment (0 = default)
    #[arg(global = true, short, long, default_value = "1024")]
    segment_size: usize,

    /// Maximum retained segments (0 = default)
    #[arg(global = true, short, long, default_value = "8")]
    max_segments: usize,

    /// ID of the first segment
    #[arg(global = true, long, default_value = "0", allow_hyphen_values = true)]
    start_id: i64,

    /// Accept writes larger than the window and trim them
    #[arg(global = true, long)]
    allow_overflow: bool,
}

impl From<&BufferArgs> for Config {
    fn from(args: &BufferArgs) -> Self {
        Config::new()
            .segment_size(args.segment_size)
            .max_segments(args.max_segments)
            .start_id(args.start_id)
            .allow_overflow(args.allow_overflow)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Display the retained window
    Inspect {
        /// Show per-segment details
        #[arg(long)]
        segments: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Write one segment to stdout
    Dump {
        /// Segment ID
        #[arg(long, allow_hyphen_values = true)]
        id: i64,
    },

    /// Write the newest segments to stdout, oldest first
    Tail {
        /// Number of segments
        #[arg(short, long, default_value = "1")]
        count: usize,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so segment bytes on stdout stay clean
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let load = || {
        let config = Config::from(&cli.buffer);
        commands::ingest::run(cli.input.as_deref(), config, cli.chunk)
    };

    match cli.command {
        Commands::Inspect { segments, format } => {
            let buffer = load()?;
            commands::inspect::run(&buffer, segments, &format)?;
        }
        Commands::Dump { id } => {
            let buffer = load()?;
            commands::dump::run(&buffer, id)?;
        }
        Commands::Tail { count } => {
            let buffer = load()?;
            commands::tail::run(&buffer, count)?;
        }
        Commands::Version => {
            println!("SegBuf CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("SegBuf Core v{}", segbuf_core::VERSION);
        }
    }

    Ok(())
}
