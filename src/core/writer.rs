//! core::writer
//!
//! Writes AOVs and groups into definition files.
//!
//! # Merge Semantics
//!
//! Writing never discards what a file already holds:
//! - a definition whose variable already appears in `definitions` replaces
//!   that entry in place; others are appended
//! - groups are inserted into `groups` by name, replacing an entry of the
//!   same name
//! - any other top-level keys are preserved
//!
//! Files are written atomically (temp file in the same directory, then rename).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use super::aov::Aov;
use super::group::AovGroup;

/// Errors from writing a definition file.
#[derive(Debug, Error)]
pub enum WriterError {
    #[error("failed to read existing definition file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("existing definition file '{path}' is not a JSON object: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write definition file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Accumulates records and writes them into a definition file.
///
/// # Example
///
/// ```no_run
/// use aovkit::core::aov::Aov;
/// use aovkit::core::types::VexType;
/// use aovkit::core::writer::AovWriter;
/// use std::path::Path;
///
/// let mut writer = AovWriter::new();
/// writer.add_aov(&Aov::builder("N", VexType::Vector).build());
/// writer.write_to_file(Path::new("/studio/config/aovs/base.json")).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct AovWriter {
    definitions: Vec<Map<String, Value>>,
    groups: Map<String, Value>,
}

impl AovWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a definition for writing.
    pub fn add_aov(&mut self, aov: &Aov) {
        self.definitions.push(aov.to_data());
    }

    /// Queue a group for writing.
    pub fn add_group(&mut self, group: &AovGroup) {
        self.groups
            .insert(group.name().to_string(), Value::Object(group.to_data()));
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty() && self.groups.is_empty()
    }

    /// The document that writing into `existing` would produce.
    pub fn merge_into(&self, existing: Map<String, Value>) -> Map<String, Value> {
        let mut document = existing;

        if !self.definitions.is_empty() {
            let entry = document
                .entry("definitions")
                .or_insert_with(|| Value::Array(Vec::new()));
            if !entry.is_array() {
                *entry = Value::Array(Vec::new());
            }
            if let Value::Array(definitions) = entry {
                for definition in &self.definitions {
                    let variable = definition.get("variable");
                    match definitions
                        .iter_mut()
                        .find(|d| d.get("variable") == variable)
                    {
                        Some(slot) => *slot = Value::Object(definition.clone()),
                        None => definitions.push(Value::Object(definition.clone())),
                    }
                }
            }
        }

        if !self.groups.is_empty() {
            let entry = document
                .entry("groups")
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(groups) = entry {
                for (name, data) in &self.groups {
                    groups.insert(name.clone(), data.clone());
                }
            }
        }

        document
    }

    /// Merge queued records into the file at `path`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `WriterError` if an existing file cannot be read or is not a
    /// JSON object, or if writing fails.
    pub fn write_to_file(&self, path: &Path) -> Result<(), WriterError> {
        let existing = if path.exists() {
            let contents = fs::read_to_string(path).map_err(|e| WriterError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })?;
            match serde_json::from_str::<Value>(&contents) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    return Err(WriterError::ParseError {
                        path: path.to_path_buf(),
                        message: "top level is not an object".to_string(),
                    })
                }
                Err(e) => {
                    return Err(WriterError::ParseError {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })
                }
            }
        } else {
            Map::new()
        };

        let document = Value::Object(self.merge_into(existing));
        write_atomic(path, &document)?;

        tracing::info!(
            path = %path.display(),
            definitions = self.definitions.len(),
            groups = self.groups.len(),
            "wrote definition file"
        );
        Ok(())
    }
}

/// Write a JSON document atomically.
fn write_atomic(path: &Path, document: &Value) -> Result<(), WriterError> {
    let write_error = |path: &Path, e: std::io::Error| WriterError::WriteError {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| write_error(path, e))?;
    }

    let mut contents = serde_json::to_string_pretty(document)
        .map_err(|e| write_error(path, std::io::Error::other(e)))?;
    contents.push('\n');

    let temp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&temp_path).map_err(|e| write_error(&temp_path, e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| write_error(&temp_path, e))?;
    file.sync_all().map_err(|e| write_error(&temp_path, e))?;

    fs::rename(&temp_path, path).map_err(|e| write_error(path, e))?;

    Ok(())
}
