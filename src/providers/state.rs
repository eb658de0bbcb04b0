//! Provider request lifecycle

use crate::error::BackendKind;
use std::fmt;
use tracing::{debug, warn};

/// Where one provider invocation is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderState {
    Idle,
    Dispatched,
    Streaming,
    Completed,
    Cancelled,
    Failed,
}

impl ProviderState {
    fn can_advance_to(&self, next: ProviderState) -> bool {
        use ProviderState::*;
        matches!(
            (self, next),
            (Idle, Dispatched)
                | (Idle, Completed)
                | (Idle, Cancelled)
                | (Dispatched, Streaming)
                | (Dispatched, Cancelled)
                | (Dispatched, Failed)
                | (Streaming, Completed)
                | (Streaming, Cancelled)
        )
    }
}

impl fmt::Display for ProviderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Dispatched => "dispatched",
            Self::Streaming => "streaming",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// State machine for a single invocation against one backend
#[derive(Debug)]
pub struct Lifecycle {
    backend: BackendKind,
    state: ProviderState,
}

impl Lifecycle {
    pub fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            state: ProviderState::Idle,
        }
    }

    pub fn state(&self) -> ProviderState {
        self.state
    }

    /// Move to `next`; illegal transitions are logged and ignored
    pub fn advance(&mut self, next: ProviderState) -> bool {
        if !self.state.can_advance_to(next) {
            warn!(
                backend = %self.backend,
                "Ignoring provider transition {} -> {}",
                self.state,
                next
            );
            return false;
        }

        debug!(backend = %self.backend, "Provider {} -> {}", self.state, next);
        self.state = next;
        true
    }
}
