//! Run the patrol planner over an estate layout file without a server.

use anyhow::Result;
use clap::Parser;
use patrol_cli::{check_layout, read_layout, DEFAULT_MAX_CELLS};
use patrol_core::{calculate_patrol_distance, DEFAULT_SCALE_FACTOR};
use std::path::PathBuf;

/// Plan a serpentine patrol over an estate layout
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON layout: {"length": L, "width": W, "trees": [{"x", "y", "height"}]}
    #[arg(long)]
    layout: PathBuf,

    /// Distance units per horizontal cell move
    #[arg(
        long,
        default_value_t = DEFAULT_SCALE_FACTOR,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    scale_factor: u32,

    /// Refuse layouts with more cells than this
    #[arg(long, default_value_t = DEFAULT_MAX_CELLS)]
    max_cells: u64,

    /// Stop once this travel budget would be exceeded
    #[arg(long)]
    max_distance: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let layout = read_layout(&args.layout)?;
    check_layout(&layout, args.max_cells)?;

    println!(
        "Planning {}x{} estate with {} trees (scale factor {})",
        layout.estate.length,
        layout.estate.width,
        layout.trees.len(),
        args.scale_factor
    );

    let result = calculate_patrol_distance(Some(&layout), args.scale_factor, args.max_distance)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
