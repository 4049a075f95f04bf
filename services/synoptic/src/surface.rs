//! Rendering surface and confirmation prompt boundaries

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Abstraction over the diagram rendering surface.
///
/// The engine only ever sets a component's fill, reads it back, and switches
/// pointer interaction for the whole surface on or off.
#[cfg_attr(test, mockall::automock)]
pub trait DiagramSurface: Send + Sync {
    /// Set a component's visual fill color
    fn set_fill(&self, id: &str, color: &str);

    /// Read a component's current rendered fill, if it has one
    fn fill(&self, id: &str) -> Option<String>;

    /// Enable or disable pointer interaction for the whole surface
    fn set_interactive(&self, enabled: bool);
}

/// Synchronous yes/no confirmation prompt
#[cfg_attr(test, mockall::automock)]
pub trait Confirmer: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// In-memory surface for the headless console: tracks fills and logs
/// transitions instead of painting them.
#[derive(Debug)]
pub struct ConsoleSurface {
    fills: Mutex<HashMap<String, String>>,
    interactive: AtomicBool,
}

impl Default for ConsoleSurface {
    fn default() -> Self {
        Self {
            fills: Mutex::new(HashMap::new()),
            interactive: AtomicBool::new(true),
        }
    }
}

impl ConsoleSurface {
    /// Whether pointer interaction is currently enabled
    pub fn is_interactive(&self) -> bool {
        self.interactive.load(Ordering::SeqCst)
    }
}

impl DiagramSurface for ConsoleSurface {
    fn set_fill(&self, id: &str, color: &str) {
        let previous = {
            let mut fills = self.fills.lock().unwrap_or_else(PoisonError::into_inner);
            fills.insert(id.to_string(), color.to_string())
        };
        if previous.as_deref() != Some(color) {
            tracing::info!("{} fill changed to {}", id, color);
        }
    }

    fn fill(&self, id: &str) -> Option<String> {
        self.fills
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn set_interactive(&self, enabled: bool) {
        self.interactive.store(enabled, Ordering::SeqCst);
        tracing::debug!(
            "Surface interaction {}",
            if enabled { "enabled" } else { "disabled" }
        );
    }
}
