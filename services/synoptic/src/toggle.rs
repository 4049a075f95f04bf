//! Toggle controller: confirmed, optimistic status flips

use std::sync::Arc;

use crate::backend::BackendClient;
use crate::color::{self, Status};
use crate::registry::Registry;
use crate::session::SessionHandle;
use crate::surface::{Confirmer, DiagramSurface};

/// Turns a user interaction on a component into a confirmed status flip:
/// optimistic render, backend submit, and suppression of poll-driven
/// refresh for the duration of the round trip.
pub struct ToggleController {
    registry: Arc<Registry>,
    surface: Arc<dyn DiagramSurface>,
    backend: Arc<BackendClient>,
    confirmer: Arc<dyn Confirmer>,
    session: SessionHandle,
}

impl ToggleController {
    pub fn new(
        registry: Arc<Registry>,
        surface: Arc<dyn DiagramSurface>,
        backend: Arc<BackendClient>,
        confirmer: Arc<dyn Confirmer>,
        session: SessionHandle,
    ) -> Self {
        Self {
            registry,
            surface,
            backend,
            confirmer,
            session,
        }
    }

    /// Resolve a click on the surface to a registered component and toggle
    /// it. Clicks that resolve to no registered component are ignored.
    pub async fn handle_click<'a, I>(&self, ancestors: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let Some(id) = self
            .registry
            .resolve_clicked(ancestors)
            .map(|component| component.id.clone())
        else {
            return;
        };
        self.request_toggle(&id).await;
    }

    /// Flip a component's status: confirm if required, render the flip
    /// immediately, submit it, and lift refresh suppression once the round
    /// trip completes, successfully or not.
    ///
    /// A failed submit is logged, never rolled back visually; the next
    /// refresh reconciles any divergence.
    pub async fn request_toggle(&self, component_id: &str) {
        let Some(component) = self.registry.get(component_id) else {
            tracing::debug!("Ignoring toggle for unregistered id '{}'", component_id);
            return;
        };

        self.session.begin_interaction();

        if component.confirm_toggle {
            let prompt = format!("Confirm opening/closing of {}?", component.id);
            if !self.confirmer.confirm(&prompt) {
                tracing::info!("{} toggle cancelled", component.id);
                self.session.end_interaction();
                return;
            }
        }

        let current = self
            .surface
            .fill(&component.id)
            .map(|fill| color::status_for(&fill, &component.palette))
            .unwrap_or(Status::Inactive);
        let target = current.flipped();

        let new_fill = component.palette.color_for(target);
        self.surface.set_fill(&component.id, new_fill);
        tracing::debug!("{} fill changed to {}", component.id, new_fill);

        let result = self.backend.submit_toggle(&component.id, target).await;
        self.session.end_interaction();

        if let Err(e) = result {
            tracing::warn!("Submitting toggle for '{}' failed: {}", component.id, e);
        }
    }
}
