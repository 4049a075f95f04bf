//! History replay: renders historical snapshots through the reconciler

use std::sync::Arc;

use crate::backend::{BackendClient, HistoryEvent};
use crate::color::Status;
use crate::reconciler::{Reconciler, Snapshot};

/// Replays historical states through the same reconciler used for live
/// polling. Holds the session's read-only copy of the event log.
pub struct HistoryPlayer {
    events: Vec<HistoryEvent>,
    selected: Option<usize>,
    backend: Arc<BackendClient>,
    reconciler: Arc<Reconciler>,
}

impl HistoryPlayer {
    /// Fetch the event log once and build the player
    pub async fn load(
        backend: Arc<BackendClient>,
        reconciler: Arc<Reconciler>,
    ) -> crate::Result<Self> {
        let events = backend.fetch_events().await?;
        tracing::debug!("Loaded {} history events", events.len());
        Ok(Self {
            events,
            selected: None,
            backend,
            reconciler,
        })
    }

    pub fn events(&self) -> &[HistoryEvent] {
        &self.events
    }

    /// Currently selected event index, if any
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Select an event and render the apparatus as it was at that point.
    ///
    /// Out-of-range indices are ignored. The backend owns the
    /// log-to-snapshot projection; the client only converts the
    /// boolean-per-component payload and applies it.
    pub async fn select_event(&mut self, index: usize) -> crate::Result<()> {
        if index >= self.events.len() {
            tracing::debug!("Ignoring out-of-range history index {}", index);
            return Ok(());
        }

        self.selected = Some(index);

        let state = self.backend.fetch_state_at(index).await?;
        let snapshot: Snapshot = state
            .into_iter()
            .map(|(id, active)| {
                let status = if active { Status::Active } else { Status::Inactive };
                (id, status)
            })
            .collect();
        self.reconciler.apply_state(&snapshot);
        Ok(())
    }
}
