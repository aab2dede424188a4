//! citecorpus - build and inspect chronologically split paper corpora
//!
//! Loads JSON-lines paper records into a DuckDB store and opens stores
//! as train/validation/test partitions ordered by publication year.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "citecorpus")]
#[command(about = "Build and inspect chronologically split paper corpora")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./citecorpus.toml or ~/.config/citecorpus/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Build a store from JSON-lines records
    Build(cmd::build::BuildArgs),
    /// Open a store and show its partitions
    Info(cmd::info::InfoArgs),
    /// Print one stored document as JSON
    Get(cmd::get::GetArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let progress = Arc::new(citecorpus_core::ProgressContext::new());

    // TTY: quiet unless --debug, bars show activity. Otherwise logs are the only signal.
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    citecorpus_core::init_logging(quiet, cli.debug, multi);

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Build(args) => cmd::build::run(args, &config, &progress),
        Command::Info(args) => cmd::info::run(args, &config, &progress),
        Command::Get(args) => cmd::get::run(args),
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec!["Batch size", &config.build.batch_size.to_string()]);
            table.add_row(vec!["Memory limit", &config.build.memory_limit]);
            table.add_row(vec!["Threads", &config.build.threads.to_string()]);
            table.add_row(vec![
                "Checkpoint threshold",
                &config.build.checkpoint_threshold,
            ]);
            table.add_row(vec!["Train fraction", &config.open.train_frac.to_string()]);
            table.add_row(vec!["Decode chunk", &config.open.decode_chunk.to_string()]);

            eprintln!("\n{table}");
            Ok(())
        }
    }
}
