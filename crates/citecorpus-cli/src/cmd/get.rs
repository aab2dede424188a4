//! `citecorpus get` - print one document as JSON

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use citecorpus_store::StoreReader;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Store file to read
    #[arg(short, long)]
    pub target: PathBuf,

    /// Document id
    pub id: String,
}

pub fn run(args: GetArgs) -> Result<()> {
    let reader = StoreReader::open(&args.target)
        .with_context(|| format!("Failed to open {}", args.target.display()))?;
    let doc = reader.fetch(&args.id)?;
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
