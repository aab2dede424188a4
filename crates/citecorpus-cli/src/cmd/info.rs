//! `citecorpus info` - open a store and report its partitions

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use citecorpus_core::{SharedProgress, fmt_num};
use citecorpus_store::hash::short_hash;
use citecorpus_store::{Corpus, Split};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Store file to open
    #[arg(short, long)]
    pub target: PathBuf,

    /// Fraction of documents in the training partition
    #[arg(long)]
    pub train_frac: Option<f64>,
}

pub fn run(args: InfoArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let mut open_config = config.open.to_open_config();
    if let Some(frac) = args.train_frac {
        open_config.train_frac = frac;
    }

    let corpus = Corpus::open_with_progress(&args.target, &open_config, progress)
        .with_context(|| format!("Failed to open {}", args.target.display()))?;
    let info = corpus.build_info();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Store").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);
    table.add_row(vec!["Path", &args.target.display().to_string()]);
    table.add_row(vec!["Format version", &info.format_version.to_string()]);
    table.add_row(vec!["Documents", &fmt_num(corpus.len())]);
    table.add_row(vec![
        "Duplicates skipped",
        &fmt_num(info.n_duplicates as usize),
    ]);
    for split in Split::ALL {
        table.add_row(vec![
            split.name(),
            &fmt_num(corpus.split_ids(split).len()),
        ]);
    }
    table.add_row(vec!["Train fraction", &format!("{}", corpus.train_frac())]);
    let years = match corpus.year_range() {
        Some((lo, hi)) => format!("{lo}-{hi}"),
        None => "-".to_string(),
    };
    table.add_row(vec!["Years", &years]);
    table.add_row(vec!["Source hash", short_hash(&info.source_hash)]);
    table.add_row(vec!["Built at", &info.built_at]);

    eprintln!("\n{table}");
    Ok(())
}
