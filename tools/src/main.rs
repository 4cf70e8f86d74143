//! nerve-runner: headless driver for the Nerve recommendation engine.
//!
//! Usage:
//!   nerve-runner --db nerve.db --data-dir ./data --once
//!   nerve-runner --db nerve.db --data-dir ./data --interval-secs 10
//!   nerve-runner --db nerve.db --data-dir ./data --client client-0001

use anyhow::Result;
use nerve_core::{
    config::EngineConfig, engine::RecommendationEngine, processor::AutoProcessor,
    processor::PassOutcome, store::EngineStore,
};
use std::env;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let interval_secs = parse_arg(&args, "--interval-secs", 10u64);
    let once = args.iter().any(|a| a == "--once");
    let db = str_arg(&args, "--db").unwrap_or(":memory:");
    let data_dir = str_arg(&args, "--data-dir").unwrap_or("./data");
    let client_id = str_arg(&args, "--client");

    println!("nerve-runner — bureau enrichment & product recommendations");
    println!("  db:        {db}");
    println!("  data_dir:  {data_dir}");
    println!("  seed:      {seed}");
    println!("  started:   {}", chrono::Utc::now().to_rfc3339());
    println!();

    let store = EngineStore::open(db)?;
    store.migrate()?;

    let config = EngineConfig::load(data_dir)?;
    if store.product_count()? == 0 {
        config.seed_catalog(&store)?;
        log::info!("seeded {} catalog products", config.products.len());
    }
    if store.client_count()? == 0 {
        config.seed_clients(&store)?;
        log::info!("seeded {} demo clients", config.seed_clients.len());
    }

    let mut engine = RecommendationEngine::build(store, seed);

    // One-shot request path: process a single client and print the summary.
    if let Some(id) = client_id {
        let summary = engine.process_client(id)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let mut processor =
        AutoProcessor::new(engine).with_interval(Duration::from_secs(interval_secs));

    if once {
        let outcome = processor.run_pass();
        print_summary(&processor, &outcome)?;
        Ok(())
    } else {
        processor.run_forever()
    }
}

fn print_summary(processor: &AutoProcessor, outcome: &PassOutcome) -> Result<()> {
    let store = processor.engine().store();
    println!("=== PASS SUMMARY ===");
    println!("  clients:          {}", store.client_count()?);
    println!("  bureau profiles:  {}", store.bureau_profile_count()?);
    println!("  recommendations:  {}", store.recommendation_count()?);
    println!("  processed:        {}", outcome.processed);
    println!("  failed:           {}", outcome.failed);
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
