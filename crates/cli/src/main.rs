// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracebuf::config::DEFAULT_BUFFER_SIZE;
use tracebuf_cli::commands::{inspect, record};
use tracebuf_cli::telemetry;

#[derive(Parser)]
#[command(name = "tracebuf")]
#[command(about = "tracebuf - inspect and record framed event buffers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the events in a dumped buffer file
    Inspect {
        file: PathBuf,

        /// Show at most this many rows
        #[arg(long, short)]
        limit: Option<usize>,
    },
    /// Run a synthetic writer and dump everything it committed
    Record {
        file: PathBuf,

        /// Number of events to write
        #[arg(long, short)]
        events: u64,

        /// Capacity of each buffer in bytes
        #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
        buffer_size: usize,

        /// Raw payload bytes per event
        #[arg(long, short, default_value_t = 16)]
        payload: usize,
    },
}

fn main() -> anyhow::Result<()> {
    telemetry::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { file, limit } => inspect::run(&file, limit).map(|_| ()),
        Commands::Record {
            file,
            events,
            buffer_size,
            payload,
        } => record::run(
            &file,
            &record::RecordOptions {
                events,
                buffer_size,
                payload,
            },
        )
        .map(|_| ()),
    }
}
