//! State reconciliation: the single funnel for rendering snapshots

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::backend::BackendClient;
use crate::color::Status;
use crate::registry::Registry;
use crate::session::SessionHandle;
use crate::surface::DiagramSurface;

/// Full per-component status snapshot; ids absent default to inactive
pub type Snapshot = HashMap<String, Status>;

/// Renders snapshots onto the surface and arbitrates between poll-driven
/// refresh and in-flight user edits.
pub struct Reconciler {
    registry: Arc<Registry>,
    surface: Arc<dyn DiagramSurface>,
    backend: Arc<BackendClient>,
    session: SessionHandle,
}

impl Reconciler {
    pub fn new(
        registry: Arc<Registry>,
        surface: Arc<dyn DiagramSurface>,
        backend: Arc<BackendClient>,
        session: SessionHandle,
    ) -> Self {
        Self {
            registry,
            surface,
            backend,
            session,
        }
    }

    /// Render a snapshot: every registered component gets its palette color
    /// for the snapshot status, defaulting to inactive when absent.
    ///
    /// Idempotent; the poll path and the history path both funnel through
    /// here.
    pub fn apply_state(&self, snapshot: &Snapshot) {
        for component in self.registry.iter() {
            let status = snapshot
                .get(&component.id)
                .copied()
                .unwrap_or(Status::Inactive);
            self.surface
                .set_fill(&component.id, component.palette.color_for(status));
        }
    }

    /// Fetch the latest snapshot and render it, unless a user interaction is
    /// in flight, in which case this is a no-op; the next scheduled refresh
    /// picks up the latest state.
    pub async fn refresh(&self) -> crate::Result<()> {
        if self.session.is_suppressed() {
            tracing::debug!("Skipping state refresh during user interaction");
            return Ok(());
        }

        let payload = self.backend.fetch_state().await?;
        let snapshot: Snapshot = payload
            .into_iter()
            .map(|(id, value)| (id, value.to_status()))
            .collect();
        self.apply_state(&snapshot);
        Ok(())
    }

    /// Refresh immediately, then on a fixed period until cancelled.
    ///
    /// Fetch failures are logged and swallowed; the next tick is the retry.
    pub async fn run_poll_loop(&self, interval: Duration, cancel: CancellationToken) {
        loop {
            if let Err(e) = self.refresh().await {
                tracing::warn!("Live state refresh failed: {}", e);
            }

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = cancel.cancelled() => {
                    tracing::debug!("Poll loop cancelled");
                    break;
                }
            }
        }
    }
}
