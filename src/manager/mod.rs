//! manager
//!
//! The merge and resolution engine for AOV definitions.
//!
//! # Architecture
//!
//! [`AovManager`] owns two namespaces: AOVs keyed by variable and groups
//! keyed by name. It fills them from definition files found through a
//! [`DirectorySearch`]:
//!
//! 1. **Discover**: list `*.json` files in search order
//! 2. **Read**: parse each file; unreadable files are skipped and reported
//! 3. **Merge AOVs**: every file's definitions, in file order
//! 4. **Merge groups**: every file's groups, after all AOVs are known
//! 5. **Resolve**: rebuild each group's members from its includes
//!
//! # Collision Rule
//!
//! When a name is already taken, the newcomer replaces the existing entry
//! only if its priority is strictly greater. Ties keep the first-processed
//! definition. [`AovManager::add_aov`] and [`AovManager::add_group`] are
//! explicit user actions and overwrite unconditionally.
//!
//! # Group Membership
//!
//! Groups keep their authored `includes` and a resolved member list of
//! shared handles into the AOV namespace. Every change to the AOV namespace
//! through the manager re-resolves all groups, so members never point at
//! replaced or removed records.
//!
//! # Example
//!
//! ```no_run
//! use aovkit::core::config::Config;
//! use aovkit::manager::AovManager;
//!
//! let config = Config::load().unwrap().config;
//! let mut manager = AovManager::from_config(&config);
//! let report = manager.reload();
//!
//! for diagnostic in &report.diagnostics {
//!     eprintln!("warning: {}", diagnostic);
//! }
//!
//! let elements = manager.get_aovs_from_string("N P @diagnostics");
//! ```

pub mod element;
pub mod report;
pub mod session;

pub use element::{flatten_list, list_as_string, AovElement, GROUP_PREFIX};
pub use report::{Diagnostic, EntityKind, MergeReport};
pub use session::Session;

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::core::aov::Aov;
use crate::core::config::Config;
use crate::core::group::AovGroup;
use crate::core::paths::{find_aov_files, DirectorySearch, StaticSearch};
use crate::core::reader::{read_file, FileContents, ReaderError};

/// Merged AOV and group namespaces.
pub struct AovManager {
    aovs: BTreeMap<String, Arc<Aov>>,
    groups: BTreeMap<String, AovGroup>,
    search: Box<dyn DirectorySearch>,
}

impl fmt::Debug for AovManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AovManager")
            .field("aovs", &self.aovs.keys().collect::<Vec<_>>())
            .field("groups", &self.groups.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Default for AovManager {
    fn default() -> Self {
        Self::new(StaticSearch::default())
    }
}

impl AovManager {
    /// Create an empty manager that discovers files through `search`.
    ///
    /// Nothing is loaded until [`AovManager::reload`] is called.
    pub fn new(search: impl DirectorySearch + 'static) -> Self {
        Self {
            aovs: BTreeMap::new(),
            groups: BTreeMap::new(),
            search: Box::new(search),
        }
    }

    /// Create an empty manager using the configured search directories.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.search())
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Discover and merge every definition file from scratch.
    ///
    /// Files that cannot be read are skipped; the report lists them.
    pub fn reload(&mut self) -> MergeReport {
        self.clear();

        let mut skipped = Vec::new();
        let mut files = Vec::new();

        for path in find_aov_files(self.search.as_ref()) {
            match read_file(&path) {
                Ok(contents) => files.push(contents),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "skipping definition file"
                    );
                    skipped.push(Diagnostic::FileSkipped {
                        path,
                        error: e.to_string(),
                    });
                }
            }
        }

        let mut report = self.merge(files);
        skipped.append(&mut report.diagnostics);
        report.diagnostics = skipped;

        tracing::info!(
            files = report.files.len(),
            aovs = self.aovs.len(),
            groups = self.groups.len(),
            "loaded aov definitions"
        );
        report
    }

    /// Merge one more file into the current namespaces.
    ///
    /// # Errors
    ///
    /// Returns the reader's error; the namespaces are left untouched.
    pub fn load(&mut self, path: &Path) -> Result<MergeReport, ReaderError> {
        let contents = read_file(path)?;
        Ok(self.merge(vec![contents]))
    }

    /// Merge already-read files, in order.
    ///
    /// All files' AOVs are merged before any group so that groups can
    /// include AOVs defined in any of the files.
    pub fn merge(&mut self, files: Vec<FileContents>) -> MergeReport {
        let mut report = MergeReport::default();
        let mut pending_groups = Vec::new();

        for file in files {
            report.files.push(file.path);
            for aov in file.aovs {
                self.merge_aov(aov, &mut report);
            }
            pending_groups.push(file.groups);
        }

        let mut touched = HashSet::new();
        for group in pending_groups.into_iter().flatten() {
            touched.insert(group.name().to_string());
            self.merge_group(group, &mut report);
        }

        // Every group is re-resolved, but only groups from these files report
        // dropped includes; earlier groups reported theirs when they merged.
        report.diagnostics.extend(
            self.resolve_groups()
                .into_iter()
                .filter(|d| match d {
                    Diagnostic::DroppedInclude { group, .. } => touched.contains(group),
                    _ => true,
                }),
        );
        report
    }

    fn merge_aov(&mut self, aov: Aov, report: &mut MergeReport) {
        match self.aovs.entry(aov.variable().to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(aov));
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get().priority();
                if aov.priority() > existing {
                    tracing::debug!(
                        variable = aov.variable(),
                        existing,
                        priority = aov.priority(),
                        "aov replaced"
                    );
                    report.diagnostics.push(Diagnostic::Replaced {
                        kind: EntityKind::Aov,
                        name: slot.key().clone(),
                        previous_priority: existing,
                        priority: aov.priority(),
                        path: aov.path().map(Path::to_path_buf),
                    });
                    slot.insert(Arc::new(aov));
                } else {
                    tracing::debug!(
                        variable = aov.variable(),
                        existing,
                        priority = aov.priority(),
                        "aov discarded"
                    );
                    report.diagnostics.push(Diagnostic::Discarded {
                        kind: EntityKind::Aov,
                        name: slot.key().clone(),
                        kept_priority: existing,
                        priority: aov.priority(),
                        path: aov.path().map(Path::to_path_buf),
                    });
                }
            }
        }
    }

    fn merge_group(&mut self, group: AovGroup, report: &mut MergeReport) {
        match self.groups.entry(group.name().to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(group);
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get().priority();
                if group.priority() > existing {
                    report.diagnostics.push(Diagnostic::Replaced {
                        kind: EntityKind::Group,
                        name: slot.key().clone(),
                        previous_priority: existing,
                        priority: group.priority(),
                        path: group.path().map(Path::to_path_buf),
                    });
                    slot.insert(group);
                } else {
                    report.diagnostics.push(Diagnostic::Discarded {
                        kind: EntityKind::Group,
                        name: slot.key().clone(),
                        kept_priority: existing,
                        priority: group.priority(),
                        path: group.path().map(Path::to_path_buf),
                    });
                }
            }
        }
    }

    /// Rebuild every group's members from its includes.
    ///
    /// Returns a diagnostic per include that did not resolve.
    pub fn resolve_groups(&mut self) -> Vec<Diagnostic> {
        let aovs = &self.aovs;
        let mut diagnostics = Vec::new();

        for group in self.groups.values_mut() {
            for include in group.resolve(aovs) {
                tracing::debug!(
                    group = group.name(),
                    include = %include,
                    "dropping unresolved include"
                );
                diagnostics.push(Diagnostic::DroppedInclude {
                    group: group.name().to_string(),
                    include,
                });
            }
        }

        diagnostics
    }

    // =========================================================================
    // Direct edits
    // =========================================================================

    /// Insert an AOV, replacing any entry with the same variable regardless
    /// of priority.
    ///
    /// Returns the replaced entry, if any.
    pub fn add_aov(&mut self, aov: Aov) -> Option<Arc<Aov>> {
        let previous = self
            .aovs
            .insert(aov.variable().to_string(), Arc::new(aov));
        self.resolve_groups();
        previous
    }

    /// Insert a group, replacing any entry with the same name regardless of
    /// priority. Its members are resolved against the current AOVs.
    ///
    /// Returns the replaced entry, if any.
    pub fn add_group(&mut self, mut group: AovGroup) -> Option<AovGroup> {
        for include in group.resolve(&self.aovs) {
            tracing::debug!(
                group = group.name(),
                include = %include,
                "dropping unresolved include"
            );
        }
        self.groups.insert(group.name().to_string(), group)
    }

    /// Remove an AOV. Groups including it lose it as a member.
    pub fn remove_aov(&mut self, variable: &str) -> Option<Arc<Aov>> {
        let removed = self.aovs.remove(variable);
        if removed.is_some() {
            self.resolve_groups();
        }
        removed
    }

    /// Remove a group.
    pub fn remove_group(&mut self, name: &str) -> Option<AovGroup> {
        self.groups.remove(name)
    }

    /// Empty both namespaces. Files on disk are untouched.
    pub fn clear(&mut self) {
        self.aovs.clear();
        self.groups.clear();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// All AOVs, sorted by variable.
    pub fn aovs(&self) -> impl Iterator<Item = &Arc<Aov>> {
        self.aovs.values()
    }

    /// All groups, sorted by name.
    pub fn groups(&self) -> impl Iterator<Item = &AovGroup> {
        self.groups.values()
    }

    pub fn get_aov(&self, variable: &str) -> Option<&Arc<Aov>> {
        self.aovs.get(variable)
    }

    pub fn get_group(&self, name: &str) -> Option<&AovGroup> {
        self.groups.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.aovs.is_empty() && self.groups.is_empty()
    }

    /// Resolve a compact string of AOV variables and `@group` references.
    ///
    /// Tokens are separated by whitespace or commas. Unknown tokens are
    /// skipped. Elements come back in input order.
    ///
    /// # Example
    ///
    /// ```
    /// use aovkit::core::aov::Aov;
    /// use aovkit::core::types::VexType;
    /// use aovkit::manager::AovManager;
    ///
    /// let mut manager = AovManager::default();
    /// manager.add_aov(Aov::builder("N", VexType::Vector).build());
    ///
    /// let elements = manager.get_aovs_from_string("N, unknown @nogroup");
    /// assert_eq!(elements.len(), 1);
    /// assert_eq!(elements[0].name(), "N");
    /// ```
    pub fn get_aovs_from_string(&self, text: &str) -> Vec<AovElement<'_>> {
        text.replace(',', " ")
            .split_whitespace()
            .filter_map(|token| match token.strip_prefix(GROUP_PREFIX) {
                Some(name) => self.groups.get(name).map(AovElement::Group),
                None => self
                    .aovs
                    .get(token)
                    .map(|aov| AovElement::Aov(aov.as_ref())),
            })
            .collect()
    }

    /// Entries for a parameter menu: groups as `@name`, then AOV variables.
    pub fn menu_items(&self) -> Vec<String> {
        self.groups
            .keys()
            .map(|name| format!("{}{}", GROUP_PREFIX, name))
            .chain(self.aovs.keys().cloned())
            .collect()
    }
}
