//! Dark Factory service binary.
//!
//! Resolves the Judge backend configuration, then serves the warp
//! application on 0.0.0.0:8080. Services are cluster-internal only; there
//! is no port override.

use df_judge::{backend_from_config, JudgeConfig};
use df_service::{app, AppState, VERSION};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // An invalid judge configuration aborts startup, never a mid-request 500.
    let config = JudgeConfig::from_env()?;
    tracing::info!("Judge backend mode: {}", config.mode_name());

    let state = Arc::new(AppState::new(backend_from_config(&config)));
    tracing::info!("Starting dark-factory {} on 0.0.0.0:8080", VERSION);

    let (_addr, server) =
        warp::serve(app(state)).bind_with_graceful_shutdown(([0, 0, 0, 0], 8080), async {
            let _ = tokio::signal::ctrl_c().await;
        });
    server.await;

    tracing::info!("Shutting down");
    Ok(())
}
