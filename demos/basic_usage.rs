//! Basic usage of the cache with the in-memory backend.
//!
//! Run with `cargo run --example basic_usage`.

use counted_cache::{backend::InMemoryBackend, error::Result, Cache, Json};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
struct Employment {
    employer_name: String,
    salary: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .try_init()
        .ok();

    println!("\n=== Counted Cache - Basic Example ===\n");

    // 1. Create the cache (flushes the backend)
    println!("1. Initializing in-memory cache...");
    let cache = Cache::new(InMemoryBackend::new()).await?;
    println!("   ✓ Cache ready\n");

    // 2. Store a few values of different kinds
    println!("2. Storing values:");
    let greeting = cache.store("hello").await?;
    let answer = cache.store(42).await?;
    let ratio = cache.store(0.75).await?;
    let job = cache
        .store(Json(Employment {
            employer_name: "Acme Corp".to_string(),
            salary: 75000.0,
        }))
        .await?;
    println!("   ✓ \"hello\" -> {}", greeting);
    println!("   ✓ 42      -> {}", answer);
    println!("   ✓ 0.75    -> {}", ratio);
    println!("   ✓ json    -> {}\n", job);

    // 3. Typed reads
    println!("3. Reading back:");
    println!("   get_str   = {:?}", cache.get_str(&greeting).await?);
    println!("   get_int   = {:?}", cache.get_int(&answer).await?);
    println!("   get_float = {:?}", cache.get_float(&ratio).await?);
    println!("   get_json  = {:?}", cache.get_json::<Employment>(&job).await?);
    println!("   get (raw) = {:?}\n", cache.get(&greeting).await?);

    // 4. Missing keys are not errors
    println!("4. Missing key:");
    println!("   get_str(\"nonexistent-key\") = {:?}\n", cache.get_str("nonexistent-key").await?);

    // 5. Conversion failures surface to the caller
    println!("5. Wrong converter:");
    match cache.get_int(&greeting).await {
        Ok(value) => println!("   unexpected value: {:?}\n", value),
        Err(e) => println!("   ✓ {}\n", e),
    }

    // 6. Call counters
    println!("6. Call statistics:");
    let stats = cache.call_stats(&["store"]).await?;
    println!("{}\n", stats);

    println!("=== Example Complete ===\n");

    Ok(())
}
