//! Synoptic - apparatus diagram state synchronization and history replay
//!
//! Keeps a rendered synoptic diagram consistent with the authoritative
//! backend snapshot under periodic polling, submits operator toggles with
//! optimistic feedback, and replays historical snapshots from the
//! append-only event log.

pub mod backend;
pub mod calendar;
pub mod color;
pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod io;
pub mod player;
pub mod reconciler;
pub mod registry;
pub mod session;
pub mod surface;
pub mod toggle;

pub use config::{load_config, Config};
pub use error::{Result, SynopticError};

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::backend::BackendClient;
use crate::engine::Engine;
use crate::io::ReqwestHttpClient;
use crate::reconciler::Reconciler;
use crate::registry::Registry;
use crate::session::{Mode, Session};
use crate::surface::{ConsoleSurface, DiagramSurface};

/// Run the engine with the given configuration
pub async fn run(config: Config) -> Result<()> {
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::default());
    let backend = Arc::new(BackendClient::new(config.backend_url.clone(), http));

    let specs = backend.fetch_registry().await?;
    let registry = Arc::new(Registry::from_specs(specs)?);
    if registry.is_empty() {
        tracing::warn!("Empty component registry, engine disabled");
        return Ok(());
    }
    tracing::debug!("Loaded {} components", registry.len());

    let surface = Arc::new(ConsoleSurface::default());
    let session = Session::new(config.mode);
    let reconciler = Arc::new(Reconciler::new(
        Arc::clone(&registry),
        Arc::clone(&surface) as Arc<dyn DiagramSurface>,
        Arc::clone(&backend),
        Arc::clone(&session),
    ));
    let engine = Engine::new(
        Arc::clone(&surface) as Arc<dyn DiagramSurface>,
        Arc::clone(&backend),
        Arc::clone(&reconciler),
    );

    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            cancel_for_signal.cancel();
        }
    });

    match config.mode {
        Mode::Live => {
            tracing::info!(
                "Live session started, polling every {}s",
                config.poll_interval_seconds
            );
            console::run_live(
                engine,
                registry,
                surface,
                backend,
                session,
                Duration::from_secs(config.poll_interval_seconds),
                cancel,
            )
            .await?;
            tracing::info!("Live session stopped");
        }
        Mode::History => {
            tracing::info!("History session started");
            console::run_history(engine, registry, surface, cancel).await?;
            tracing::info!("History session stopped");
        }
    }

    Ok(())
}
