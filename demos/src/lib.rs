//! Capture-file replay shared by the demo binaries
//!
//! A capture file holds one feed message per line, prefixed by the time it
//! was received: `<timestamp>\t<json>`. Blank lines are skipped.

use bitmex_book::{BookStore, Dispatcher, DispatcherConfig, InstrumentStore, Outcome};
use bitmex_types::StateError;
use std::io::BufRead;
use std::sync::Arc;
use tracing::{debug, warn};

/// Error reading a capture line
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// No tab between timestamp and message
    #[error("line {line}: expected <timestamp>\\t<message>")]
    MissingSeparator { line: u64 },

    /// Timestamp is not an unsigned integer
    #[error("line {line}: invalid timestamp {value:?}")]
    InvalidTimestamp { line: u64, value: String },
}

/// Split one capture line into timestamp and raw message
pub fn parse_line(line_no: u64, line: &str) -> Result<(u64, &str), CaptureError> {
    let (ts, message) = line
        .split_once('\t')
        .ok_or(CaptureError::MissingSeparator { line: line_no })?;
    let ts = ts
        .trim()
        .parse()
        .map_err(|_| CaptureError::InvalidTimestamp {
            line: line_no,
            value: ts.to_string(),
        })?;
    Ok((ts, message))
}

/// Counters for one replay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Messages read
    pub messages: u64,
    /// Messages applied to a store
    pub applied: u64,
    /// Control and pass-through messages
    pub passthrough: u64,
    /// Messages rejected by the dispatcher or the capture parser
    pub rejected: u64,
}

/// Decides when a periodic status snapshot is due
///
/// The first timestamp seen starts the clock; a snapshot is due once feed
/// time reaches the start plus `interval`, then every `interval` after the
/// snapshot. An interval of 0 never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusSchedule {
    interval: u64,
    next: Option<u64>,
}

impl StatusSchedule {
    /// Create a schedule firing every `interval` timestamp units
    pub fn new(interval: u64) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    /// Returns true when a snapshot is due at `ts`, and rearms the schedule
    pub fn due(&mut self, ts: u64) -> bool {
        if self.interval == 0 {
            return false;
        }
        let next = *self.next.get_or_insert(ts.saturating_add(self.interval));
        if ts < next {
            return false;
        }
        self.next = Some(ts.saturating_add(self.interval));
        true
    }
}

/// Feeds capture lines through a dispatcher
pub struct Replayer {
    dispatcher: Dispatcher,
    stats: ReplayStats,
    last_timestamp: Option<u64>,
}

impl Replayer {
    /// Create a replayer over fresh stores
    pub fn new(config: DispatcherConfig) -> anyhow::Result<Self> {
        let dispatcher = Dispatcher::with_config(
            Arc::new(BookStore::new()),
            Arc::new(InstrumentStore::new()),
            config,
        )?;
        Ok(Self {
            dispatcher,
            stats: ReplayStats::default(),
            last_timestamp: None,
        })
    }

    /// Underlying dispatcher
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Counters so far
    pub fn stats(&self) -> ReplayStats {
        self.stats
    }

    /// Timestamp of the last line read
    pub fn last_timestamp(&self) -> Option<u64> {
        self.last_timestamp
    }

    /// Process one capture line, returning its timestamp when it had one
    ///
    /// Bad lines are logged and counted; they never stop the replay.
    pub fn feed(&mut self, line_no: u64, line: &str) -> Option<u64> {
        if line.trim().is_empty() {
            return None;
        }
        self.stats.messages += 1;

        let (ts, message) = match parse_line(line_no, line) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("{e}");
                self.stats.rejected += 1;
                return None;
            }
        };
        self.last_timestamp = Some(ts);

        match self.dispatcher.dispatch_str(message) {
            Ok(dispatched) => {
                debug!(line = line_no, channel = %dispatched.channel, "dispatched");
                match dispatched.outcome {
                    Outcome::Applied { .. } => self.stats.applied += 1,
                    Outcome::Passthrough => self.stats.passthrough += 1,
                }
            }
            Err(e) => self.reject(line_no, &e),
        }
        Some(ts)
    }

    fn reject(&mut self, line_no: u64, e: &StateError) {
        warn!(line = line_no, recovery = ?e.recovery(), "message ignored: {e}");
        self.stats.rejected += 1;
    }

    /// Process every line of a reader, calling `on_line` after each one
    pub fn run<R, F>(&mut self, reader: R, mut on_line: F) -> anyhow::Result<()>
    where
        R: BufRead,
        F: FnMut(&Self, Option<u64>) -> anyhow::Result<()>,
    {
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let ts = self.feed(idx as u64 + 1, &line);
            on_line(self, ts)?;
        }
        Ok(())
    }
}
