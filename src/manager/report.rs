//! manager::report
//!
//! Diagnostics produced while merging definition files.
//!
//! Collisions, dropped includes and skipped files are soft failures: the
//! merge carries on. They are recorded here so callers and tests can see
//! what was discarded.

use std::fmt;
use std::path::{Path, PathBuf};

/// Which namespace a diagnostic concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Aov,
    Group,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Aov => write!(f, "aov"),
            EntityKind::Group => write!(f, "group"),
        }
    }
}

/// One merge event worth reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A later definition with strictly greater priority replaced an earlier one.
    Replaced {
        kind: EntityKind,
        name: String,
        previous_priority: i32,
        priority: i32,
        path: Option<PathBuf>,
    },

    /// A definition lost to an existing one of equal or greater priority.
    Discarded {
        kind: EntityKind,
        name: String,
        kept_priority: i32,
        priority: i32,
        path: Option<PathBuf>,
    },

    /// A group include named no known AOV.
    DroppedInclude { group: String, include: String },

    /// A discovered file could not be read and was left out of the merge.
    FileSkipped { path: PathBuf, error: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Replaced {
                kind,
                name,
                previous_priority,
                priority,
                path,
            } => write!(
                f,
                "{} '{}' replaced (priority {} > {}) by {}",
                kind,
                name,
                priority,
                previous_priority,
                display_path(path.as_deref())
            ),
            Diagnostic::Discarded {
                kind,
                name,
                kept_priority,
                priority,
                path,
            } => write!(
                f,
                "{} '{}' from {} ignored (priority {} <= {})",
                kind,
                name,
                display_path(path.as_deref()),
                priority,
                kept_priority
            ),
            Diagnostic::DroppedInclude { group, include } => {
                write!(f, "group '{}' includes unknown aov '{}'", group, include)
            }
            Diagnostic::FileSkipped { path, error } => {
                write!(f, "skipped '{}': {}", path.display(), error)
            }
        }
    }
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "<memory>".to_string())
}

/// Outcome of a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Files merged, in processing order.
    pub files: Vec<PathBuf>,
    /// Everything discarded or replaced along the way.
    pub diagnostics: Vec<Diagnostic>,
}

impl MergeReport {
    /// Includes that did not resolve, as `(group, include)` pairs.
    pub fn dropped_includes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::DroppedInclude { group, include } => {
                Some((group.as_str(), include.as_str()))
            }
            _ => None,
        })
    }

    /// Files that were skipped.
    pub fn skipped_files(&self) -> impl Iterator<Item = &Path> {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::FileSkipped { path, .. } => Some(path.as_path()),
            _ => None,
        })
    }

    /// True if nothing was discarded, replaced, dropped or skipped.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
