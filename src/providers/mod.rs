//! Search providers
//!
//! Two independent providers, one per host capability: the standard provider
//! serves text search from the keyword backend, the AI provider serves the
//! semantic section from the embedding backend. They share no mutable state.

mod cancellation;
mod semantic;
mod standard;
mod state;

pub use cancellation::CancellationBridge;
pub use semantic::SemanticSearchProvider;
pub use standard::StandardSearchProvider;
pub use state::{Lifecycle, ProviderState};

use crate::error::{BackendError, BackendKind};
use crate::host::{Notifier, ProgressSink, SearchOutcome, TextSearchComplete};
use crate::results::HostMatch;
use tracing::{debug, info};

/// Report adapted matches in backend order until done or cancelled
///
/// Cancellation is checked before every emit, so nothing reaches the sink
/// once the host has asked to stop.
fn stream_matches<I>(
    lifecycle: &mut Lifecycle,
    bridge: &CancellationBridge,
    progress: &dyn ProgressSink,
    matches: I,
    limit_hit: bool,
) -> TextSearchComplete
where
    I: IntoIterator<Item = HostMatch>,
{
    lifecycle.advance(ProviderState::Streaming);

    let mut emitted = 0;
    let mut matches = matches.into_iter();
    loop {
        if bridge.is_cancelled() {
            lifecycle.advance(ProviderState::Cancelled);
            debug!("Cancelled after emitting {} matches", emitted);
            return TextSearchComplete {
                limit_hit: false,
                emitted,
                outcome: SearchOutcome::Cancelled,
            };
        }

        match matches.next() {
            Some(result) => {
                progress.report(result);
                emitted += 1;
            }
            None => break,
        }
    }

    lifecycle.advance(ProviderState::Completed);
    TextSearchComplete {
        limit_hit,
        emitted,
        outcome: SearchOutcome::Completed,
    }
}

/// Fold a transport error into a normal completion
///
/// Cancellation is silent; anything else produces one notification naming
/// the backend.
fn complete_with_error(
    lifecycle: &mut Lifecycle,
    backend: BackendKind,
    error: BackendError,
    notifier: &dyn Notifier,
) -> TextSearchComplete {
    if error.is_cancelled() {
        lifecycle.advance(ProviderState::Cancelled);
        info!("{} search cancelled", backend);
        return TextSearchComplete::empty(SearchOutcome::Cancelled);
    }

    lifecycle.advance(ProviderState::Failed);
    notifier.show_error(format!("{} search failed: {}", backend, error));
    TextSearchComplete::empty(SearchOutcome::Failed(backend))
}

/// Whether a response filled the requested cap
fn reached_limit(returned: usize, max_results: usize) -> bool {
    max_results > 0 && returned >= max_results
}
