//! core::reader
//!
//! Reads one definition file into candidate AOVs and groups.
//!
//! # File Format
//!
//! ```json
//! {
//!   "definitions": [
//!     {"variable": "N", "vextype": "vector", "quantize": "float"}
//!   ],
//!   "groups": {
//!     "diag": {"include": ["N", "P"], "comment": "diagnostics"}
//!   }
//! }
//! ```
//!
//! Both top-level keys are optional. Groups come back unresolved: only their
//! `includes` are populated. Every record is stamped with the file's path.
//!
//! A malformed definition fails the whole file; the reader does not try to
//! salvage the remaining entries.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::aov::Aov;
use super::group::AovGroup;
use super::types::AovError;

/// Errors from reading a definition file.
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("failed to read definition file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse definition file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid definition in '{path}': {source}")]
    Definition { path: PathBuf, source: AovError },
}

impl ReaderError {
    /// Path of the file that failed.
    pub fn path(&self) -> &Path {
        match self {
            ReaderError::Io { path, .. }
            | ReaderError::Parse { path, .. }
            | ReaderError::Definition { path, .. } => path,
        }
    }
}

/// Raw top-level layout of a definition file.
#[derive(Debug, Default, Deserialize)]
struct RawFile {
    #[serde(default)]
    definitions: Vec<Map<String, Value>>,
    #[serde(default)]
    groups: Map<String, Value>,
}

/// Raw group entry.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawGroup {
    include: Vec<String>,
    comment: Option<String>,
    icon: Option<String>,
    priority: Option<i32>,
}

/// Candidate records read from one file.
#[derive(Debug, Clone, Default)]
pub struct FileContents {
    /// The file the records came from.
    pub path: PathBuf,
    /// Definitions, in file order.
    pub aovs: Vec<Aov>,
    /// Groups, in file order, with unresolved membership.
    pub groups: Vec<AovGroup>,
}

/// Read and parse a definition file.
///
/// # Errors
///
/// Returns `ReaderError` if the file cannot be read, is not valid JSON of
/// the expected shape, or contains an invalid definition.
pub fn read_file(path: &Path) -> Result<FileContents, ReaderError> {
    let contents = fs::read_to_string(path).map_err(|e| ReaderError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    read_str(&contents, path)
}

/// Parse definition-file text as if it were read from `path`.
pub fn read_str(contents: &str, path: &Path) -> Result<FileContents, ReaderError> {
    let raw: RawFile = serde_json::from_str(contents).map_err(|e| ReaderError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let path_value = Value::String(path.display().to_string());

    let aovs = raw
        .definitions
        .into_iter()
        .map(|mut definition| {
            definition.insert("path".to_string(), path_value.clone());
            Aov::from_data(&definition).map_err(|e| ReaderError::Definition {
                path: path.to_path_buf(),
                source: e,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let groups = raw
        .groups
        .into_iter()
        .map(|(name, value)| {
            let raw: RawGroup = serde_json::from_value(value).map_err(|e| ReaderError::Parse {
                path: path.to_path_buf(),
                message: format!("group '{}': {}", name, e),
            })?;

            let mut group = AovGroup::new(name);
            group.set_includes(raw.include);
            if let Some(comment) = raw.comment {
                group.set_comment(comment);
            }
            if let Some(icon) = raw.icon {
                group.set_icon(icon);
            }
            if let Some(priority) = raw.priority {
                group.set_priority(priority);
            }
            group.set_path(path);
            Ok(group)
        })
        .collect::<Result<Vec<_>, ReaderError>>()?;

    tracing::debug!(
        path = %path.display(),
        aovs = aovs.len(),
        groups = groups.len(),
        "read definition file"
    );

    Ok(FileContents {
        path: path.to_path_buf(),
        aovs,
        groups,
    })
}
