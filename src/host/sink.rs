//! In-process sink and notifier implementations

use super::{Notifier, ProgressSink};
use crate::results::HostMatch;
use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// Keeps every reported match, in report order
#[derive(Debug, Default)]
pub struct CollectingSink {
    matches: Mutex<Vec<HostMatch>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.matches.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take the collected matches, leaving the sink empty
    pub fn take(&self) -> Vec<HostMatch> {
        std::mem::take(&mut *self.matches.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl ProgressSink for CollectingSink {
    fn report(&self, result: HostMatch) {
        self.matches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(result);
    }
}

/// Logs notifications and keeps them for later display
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show_error(&self, message: String) {
        warn!("{}", message);
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
    }
}
