//! Capture replay: rebuild book and instrument state from a recorded feed
//!
//! Reads `<timestamp>\t<json>` lines, applies every message and writes the
//! `status` snapshot lines every `--interval` of feed time and once more at
//! end of input.
//!
//! Run: cargo run --bin bitmex-replay -- capture.tsv --interval 60000000000

use anyhow::Context;
use bitmex_book::{DispatcherConfig, MissingKeyPolicy, SnapshotEmitter, DEFAULT_BOOK_TABLE};
use bitmex_demos::{Replayer, StatusSchedule};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Replay a BitMEX capture file and emit state snapshots
#[derive(Debug, Parser)]
#[command(version, about)]
struct ReplayConfig {
    /// Capture file (stdin when omitted)
    input: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Snapshot period in capture timestamp units; 0 snapshots only at the end
    #[arg(short, long, default_value_t = 0)]
    interval: u64,

    /// Table reconstructed as the L2 book
    #[arg(long, default_value = DEFAULT_BOOK_TABLE)]
    book_table: String,

    /// Subscribed tables to accept without reconstructing
    #[arg(long = "passthrough", value_name = "TABLE")]
    passthrough_tables: Vec<String>,

    /// Log and skip updates for unknown keys instead of counting them as errors
    #[arg(long)]
    ignore_missing: bool,
}

impl ReplayConfig {
    fn dispatcher_config(&self) -> DispatcherConfig {
        let policy = if self.ignore_missing {
            MissingKeyPolicy::Ignore
        } else {
            MissingKeyPolicy::Error
        };
        DispatcherConfig::default()
            .with_book_table(self.book_table.clone())
            .with_passthrough_tables(self.passthrough_tables.iter().cloned())
            .with_missing_key_policy(policy)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = ReplayConfig::parse();

    let input: Box<dyn BufRead> = match &config.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("open capture {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let mut output: Box<dyn Write> = match &config.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("create output {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut replayer = Replayer::new(config.dispatcher_config())?;
    let mut schedule = StatusSchedule::new(config.interval);

    replayer.run(input, |replayer, ts| {
        if let Some(ts) = ts.filter(|&ts| schedule.due(ts)) {
            SnapshotEmitter::write_dispatcher_status(ts, replayer.dispatcher(), &mut output)?;
        }
        Ok(())
    })?;

    if let Some(ts) = replayer.last_timestamp() {
        SnapshotEmitter::write_dispatcher_status(ts, replayer.dispatcher(), &mut output)?;
    }
    output.flush()?;

    let stats = replayer.stats();
    info!(
        messages = stats.messages,
        applied = stats.applied,
        passthrough = stats.passthrough,
        rejected = stats.rejected,
        "replay finished"
    );
    Ok(())
}
