//! Populate a running patrol server with a randomly planted estate.

use anyhow::Result;
use clap::Parser;
use patrol_cli::{random_trees, PatrolClient};
use patrol_core::Estate;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Create an estate on a patrol server and plant random trees on it
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Patrol Server URL
    #[arg(long, default_value = "http://localhost:1323")]
    url: String,

    /// Estate length (X axis)
    #[arg(long, default_value_t = 10)]
    length: u32,

    /// Estate width (Y axis)
    #[arg(long, default_value_t = 10)]
    width: u32,

    /// Number of trees to plant
    #[arg(long, default_value_t = 10)]
    trees: usize,

    /// RNG seed for reproducible layouts
    #[arg(long)]
    seed: Option<u64>,

    /// Budget to request a partial plan with
    #[arg(long)]
    max_distance: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let client = PatrolClient::new(args.url);

    let estate_id = client.create_estate(args.length, args.width).await?;
    println!("Created estate {} ({}x{})", estate_id, args.length, args.width);

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let trees = random_trees(&mut rng, Estate::new(args.length, args.width), args.trees);

    let mut planted = 0;
    for tree in &trees {
        match client.plant_tree(&estate_id, tree).await {
            Ok(_) => planted += 1,
            Err(e) => eprintln!("Skipped tree at ({}, {}): {}", tree.x, tree.y, e),
        }
    }
    println!("Planted {}/{} trees", planted, trees.len());

    let stats = client.stats(&estate_id).await?;
    println!(
        "Stats: count={} max={} min={} median={}",
        stats.count, stats.max, stats.min, stats.median
    );

    let plan = client.drone_plan(&estate_id, None).await?;
    println!("Full patrol distance: {}", plan.distance);

    if let Some(budget) = args.max_distance {
        let partial = client.drone_plan(&estate_id, Some(budget)).await?;
        match partial.rest {
            Some(rest) => println!("With budget {}: reaches ({}, {})", budget, rest.x, rest.y),
            None => println!("With budget {}: no reach reported", budget),
        }
    }

    Ok(())
}
