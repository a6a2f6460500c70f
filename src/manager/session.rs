//! manager::session
//!
//! The per-session context that owns the merged namespaces.
//!
//! # Lifecycle
//!
//! A [`Session`] is created with a configuration and nothing else. The
//! manager is built and loaded on first access, rebuilt by
//! [`Session::reload`], and dropped by [`Session::clear`]. Consumers receive
//! the session explicitly; there is no process-wide instance.

use crate::core::config::Config;

use super::{AovManager, MergeReport};

/// Lazily constructed manager plus the configuration that drives it.
#[derive(Debug, Default)]
pub struct Session {
    config: Config,
    manager: Option<AovManager>,
    last_report: Option<MergeReport>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            manager: None,
            last_report: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The manager, constructed and loaded on first use.
    pub fn manager(&mut self) -> &mut AovManager {
        if self.manager.is_none() {
            self.reload();
        }
        self.manager.get_or_insert_with(AovManager::default)
    }

    /// Rebuild the manager from disk and return its report.
    pub fn reload(&mut self) -> &MergeReport {
        let mut manager = AovManager::from_config(&self.config);
        let report = manager.reload();
        self.manager = Some(manager);
        self.last_report.insert(report)
    }

    /// Drop the manager; the next access reloads.
    pub fn clear(&mut self) {
        self.manager = None;
        self.last_report = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.manager.is_some()
    }

    /// Report of the most recent reload.
    pub fn last_report(&self) -> Option<&MergeReport> {
        self.last_report.as_ref()
    }
}
