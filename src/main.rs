use anyhow::Context;
use std::sync::Arc;

use marquee::catalog::{Catalog, TmdbCatalog};
use marquee::config::{AppConfig, RecorderBackend};
use marquee::recorder::{AppwriteRecorder, MemoryRecorder, UsageRecorder};
use marquee::{Ctx, app, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Hold the guard so file output is flushed on exit
    let _guard = telemetry::init(&config.log);
    for warning in config.warnings() {
        tracing::warn!("{}", warning);
    }

    tracing::info!("Starting Marquee v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Catalog: {:?}", config.catalog);

    let catalog: Arc<dyn Catalog> =
        Arc::new(TmdbCatalog::new(&config.catalog).context("Failed to create catalog client")?);

    let recorder = build_recorder(&config);
    let addr = config.server_addr();
    let router = app(Ctx::new(config, catalog, recorder));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Marquee listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Marquee stopped");
    Ok(())
}

fn build_recorder(config: &AppConfig) -> Option<Arc<dyn UsageRecorder>> {
    match config.recorder.backend {
        RecorderBackend::Memory => {
            tracing::info!("Recording searches in memory");
            Some(Arc::new(MemoryRecorder::new()))
        }
        RecorderBackend::Appwrite => match AppwriteRecorder::new(&config.recorder.appwrite) {
            Ok(recorder) => {
                tracing::info!("Recording searches to Appwrite");
                Some(Arc::new(recorder))
            }
            Err(e) => {
                tracing::error!("Failed to create Appwrite recorder: {}", e);
                None
            }
        },
        RecorderBackend::Disabled => {
            tracing::warn!("Search recording disabled");
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
