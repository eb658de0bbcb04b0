//! Configuration module for dualsearch
//!
//! Handles loading settings from YAML files and environment variables, and
//! sharing them as live configuration that providers read at dispatch time.

mod settings;

pub use settings::*;

use std::sync::{Arc, PoisonError, RwLock};

/// Shared, live view of the current settings
///
/// Readers take a snapshot per search, so a replacement is only observed by
/// searches dispatched after it.
#[derive(Debug, Clone, Default)]
pub struct SettingsHandle {
    inner: Arc<RwLock<Settings>>,
}

impl SettingsHandle {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Copy of the settings as they are right now
    pub fn snapshot(&self) -> Settings {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the settings wholesale
    pub fn replace(&self, settings: Settings) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = settings;
    }

    /// Edit the settings in place
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }
}
