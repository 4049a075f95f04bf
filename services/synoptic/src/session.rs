//! Session context shared across the engine

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Mode the engine runs in, chosen once at session start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Poll the live snapshot and allow toggling
    Live,
    /// Replay historical snapshots; polling and interaction stay off
    History,
}

/// Shared session state: the mode and the interaction suppression flag.
///
/// The flag is true exactly while one user-initiated toggle round trip is
/// outstanding. Only the toggle controller mutates it; the reconciler reads
/// it to skip a scheduled refresh. The flag is global to the session, not
/// per component, and has no timeout.
#[derive(Debug)]
pub struct Session {
    mode: Mode,
    suppressed: AtomicBool,
}

/// Thread-safe shared session handle
pub type SessionHandle = Arc<Session>;

impl Session {
    pub fn new(mode: Mode) -> SessionHandle {
        Arc::new(Self {
            mode,
            suppressed: AtomicBool::new(false),
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Mark a user interaction as in flight
    pub fn begin_interaction(&self) {
        self.suppressed.store(true, Ordering::SeqCst);
    }

    /// Mark the in-flight interaction as finished, successful or not
    pub fn end_interaction(&self) {
        self.suppressed.store(false, Ordering::SeqCst);
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed.load(Ordering::SeqCst)
    }
}
