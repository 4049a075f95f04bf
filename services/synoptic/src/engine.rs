//! Engine: runs one session in live or history mode

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::backend::BackendClient;
use crate::player::HistoryPlayer;
use crate::reconciler::Reconciler;
use crate::surface::DiagramSurface;

/// Orchestrates one session: live polling with auth-gated toggling, or an
/// inert history view with replay. The mode is chosen once at start; a
/// session never transitions between the two.
#[derive(Clone)]
pub struct Engine {
    surface: Arc<dyn DiagramSurface>,
    backend: Arc<BackendClient>,
    reconciler: Arc<Reconciler>,
}

impl Engine {
    pub fn new(
        surface: Arc<dyn DiagramSurface>,
        backend: Arc<BackendClient>,
        reconciler: Arc<Reconciler>,
    ) -> Self {
        Self {
            surface,
            backend,
            reconciler,
        }
    }

    /// Run a live session: gate interaction on the auth status, then poll
    /// until cancelled. An unauthenticated session (or a failed auth fetch)
    /// gets a read-only live view.
    pub async fn run_live(&self, interval: Duration, cancel: CancellationToken) {
        match self.backend.fetch_is_authenticated().await {
            Ok(true) => {
                tracing::info!("Authenticated session, toggling enabled");
                self.surface.set_interactive(true);
            }
            Ok(false) => {
                tracing::info!("Unauthenticated session, read-only live view");
                self.surface.set_interactive(false);
            }
            Err(e) => {
                tracing::warn!("Fetching auth status failed: {}", e);
                self.surface.set_interactive(false);
            }
        }

        self.reconciler.run_poll_loop(interval, cancel).await;
    }

    /// Prepare a history session: the diagram is inert and never polled
    pub async fn start_history(&self) -> crate::Result<HistoryPlayer> {
        self.surface.set_interactive(false);
        HistoryPlayer::load(Arc::clone(&self.backend), Arc::clone(&self.reconciler)).await
    }
}
