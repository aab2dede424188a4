//! `citecorpus build` - build a corpus store from JSONL records

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use citecorpus_core::{SharedProgress, fmt_num};
use citecorpus_store::hash::short_hash;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Source records (JSON lines, optionally .gz)
    #[arg(short, long)]
    pub source: PathBuf,

    /// Store file to create (existing tables are replaced)
    #[arg(short, long)]
    pub target: PathBuf,

    /// Documents per write batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// DuckDB memory limit (e.g. "8GB")
    #[arg(long)]
    pub memory_limit: Option<String>,
}

pub fn run(args: BuildArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let mut build_config = config.build.to_build_config();
    if let Some(n) = args.batch_size {
        build_config.batch_size = n;
    }
    if let Some(limit) = args.memory_limit {
        build_config.memory_limit = limit;
    }

    let summary =
        citecorpus_store::build_with_progress(&args.target, &args.source, &build_config, progress)
            .with_context(|| format!("Failed to build {}", args.target.display()))?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Build").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);
    table.add_row(vec!["Store", &args.target.display().to_string()]);
    table.add_row(vec!["Lines scanned", &fmt_num(summary.lines_scanned)]);
    table.add_row(vec!["Documents", &fmt_num(summary.documents_written)]);
    table.add_row(vec!["Duplicates skipped", &fmt_num(summary.duplicates)]);
    table.add_row(vec![
        "Self-citations removed",
        &fmt_num(summary.self_citations_removed),
    ]);
    table.add_row(vec!["Batches", &summary.batches.to_string()]);
    table.add_row(vec!["Source hash", short_hash(&summary.source_hash)]);
    table.add_row(vec![
        "Elapsed",
        &format!("{:.1}s", summary.elapsed.as_secs_f64()),
    ]);

    eprintln!("\n{table}");
    Ok(())
}
