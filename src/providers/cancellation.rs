//! Host cancellation to transport abort bridge

use tokio_util::sync::CancellationToken;

/// Per-request link from the host's cancellation token to the abort signal
/// handed to a transport client
///
/// The abort signal is registered as a child of the host token: cancelling
/// the host token fires it once, and dropping the bridge unregisters it, so
/// nothing outlives the request it was created for.
#[derive(Debug)]
pub struct CancellationBridge {
    abort: CancellationToken,
}

impl CancellationBridge {
    pub fn new(host: &CancellationToken) -> Self {
        Self {
            abort: host.child_token(),
        }
    }

    /// Signal to pass to transport calls
    pub fn abort_signal(&self) -> &CancellationToken {
        &self.abort
    }

    /// Whether the host asked to stop
    pub fn is_cancelled(&self) -> bool {
        self.abort.is_cancelled()
    }
}
