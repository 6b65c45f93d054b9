//! State summary: replay a capture and print what the stores hold
//!
//! Showcases: per-symbol book views, instrument field merging
//!
//! Run: cargo run --bin state_summary -- capture.tsv

use anyhow::Context;
use bitmex_book::DispatcherConfig;
use bitmex_demos::Replayer;
use bitmex_types::Side;
use colored::*;
use std::fs::File;
use std::io::BufReader;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let path = std::env::args()
        .nth(1)
        .context("usage: state_summary <capture-file>")?;
    let file = File::open(&path).with_context(|| format!("open capture {path}"))?;

    let mut replayer = Replayer::new(DispatcherConfig::default())?;
    replayer.run(BufReader::new(file), |_, _| Ok(()))?;

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  BITMEX STATE SUMMARY".cyan().bold());
    println!("{}", "═".repeat(60).cyan());

    let stats = replayer.stats();
    println!(
        "  {} {}  {} {}  {} {}  {} {}",
        "messages:".dimmed(),
        stats.messages,
        "applied:".dimmed(),
        stats.applied.to_string().green(),
        "passthrough:".dimmed(),
        stats.passthrough,
        "rejected:".dimmed(),
        stats.rejected.to_string().red()
    );
    println!();

    let book = replayer.dispatcher().book();
    println!(
        "  {:<12} {:>8} {:>8} {:>12} {:>12}",
        "SYMBOL".white().bold(),
        "SELL".white().bold(),
        "BUY".white().bold(),
        "SELL SIZE".white().bold(),
        "BUY SIZE".white().bold()
    );
    println!("  {}", "─".repeat(56));
    for symbol in book.symbols() {
        let levels = book.levels_for(symbol.as_str());
        let (sells, buys): (Vec<_>, Vec<_>) = levels.iter().partition(|l| l.side == Side::Sell);
        let sell_size: u64 = sells.iter().map(|l| l.size).sum();
        let buy_size: u64 = buys.iter().map(|l| l.size).sum();
        println!(
            "  {:<12} {:>8} {:>8} {:>12} {:>12}",
            symbol.as_str().yellow(),
            sells.len().to_string().red(),
            buys.len().to_string().green(),
            sell_size,
            buy_size
        );
    }
    println!();

    let instruments = replayer.dispatcher().instruments();
    println!("  {} {}", "instruments:".dimmed(), instruments.len());
    for record in instruments.snapshot() {
        let symbol = record
            .get("symbol")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let state = record
            .get("state")
            .and_then(|v| v.as_str())
            .unwrap_or("-");
        println!(
            "  {:<12} {:>8} {} fields",
            symbol.yellow(),
            state,
            record.len()
        );
    }

    Ok(())
}
