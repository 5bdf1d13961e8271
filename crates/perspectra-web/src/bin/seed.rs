//! Reload the concept graph and problem catalogue.
//!
//! Run with: cargo run -p perspectra-web --bin perspectra-seed

use tracing::info;

use perspectra_config::Config;
use perspectra_kg::path::shortest_path;
use perspectra_web::{bootstrap, seed::seed, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let config = Config::load()?;
    let store = bootstrap::connect_store(&config).await?;

    info!("🌱 Seeding catalog into the {} store", store.backend());
    let report = seed(&store).await?;
    info!(
        concepts = report.concepts,
        edges = report.edges,
        problems = report.problems,
        "✅ Seed verified"
    );

    let graph = bootstrap::load_graph(&store).await?;
    match shortest_path(&graph, "Arrays", "Dynamic Programming") {
        Some(found) => {
            let names: Vec<&str> = found.path.iter().map(|n| n.name.as_str()).collect();
            info!("🧭 Sample path ({} hops): {}", found.hops, names.join(" → "));
        }
        None => info!("No path between Arrays and Dynamic Programming"),
    }
    Ok(())
}
