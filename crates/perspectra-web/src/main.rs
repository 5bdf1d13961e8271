//! Perspectra API server
//!
//! Run with: cargo run -p perspectra-web --bin perspectra

use tracing::info;

use perspectra_config::Config;
use perspectra_web::{bootstrap, router::build_router, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    info!("Starting Perspectra API...");
    let config = Config::load()?;
    config.validate()?;
    info!(env = %config.server.env, "⚙️  Configuration loaded");

    let llm = bootstrap::build_llm(&config.llm)?;
    let state = bootstrap::build_state(&config, llm).await?;
    info!(
        store = state.store.backend(),
        concepts = state.graph.concepts().len(),
        "📚 Knowledge graph ready"
    );

    let app = build_router(state);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
