//! core::group
//!
//! Named, ordered collections of AOVs.
//!
//! # Membership
//!
//! A group's `includes` are the member variable names as authored. The
//! resolved `aovs` list is rebuilt from `includes` against an AOV namespace
//! by [`AovGroup::resolve`]; names that do not resolve are dropped and
//! returned to the caller. Resolved members are shared handles to the
//! namespace's records, never copies.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use super::aov::{Aov, NO_PRIORITY};
use super::paths::expand_vars;

/// A named group of AOVs, referenced in compact strings as `@name`.
#[derive(Debug, Clone)]
pub struct AovGroup {
    name: String,
    aovs: Vec<Arc<Aov>>,
    includes: Vec<String>,
    comment: String,
    icon: Option<String>,
    path: Option<PathBuf>,
    priority: i32,
}

impl AovGroup {
    /// Create an empty group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aovs: Vec::new(),
            includes: Vec::new(),
            comment: String::new(),
            icon: None,
            path: None,
            priority: NO_PRIORITY,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved members, in include order.
    pub fn aovs(&self) -> &[Arc<Aov>] {
        &self.aovs
    }

    /// Member names as authored, resolved or not.
    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Icon path with environment variables expanded.
    pub fn icon(&self) -> Option<String> {
        self.icon.as_deref().map(expand_vars)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn set_includes<I, S>(&mut self, includes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes = includes.into_iter().map(Into::into).collect();
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    /// Set the icon path as authored; `$VAR` and `${VAR}` references are
    /// expanded on read by [`AovGroup::icon`].
    pub fn set_icon(&mut self, icon: impl Into<String>) {
        self.icon = Some(icon.into());
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    /// Remove every member.
    pub fn clear(&mut self) {
        self.aovs.clear();
        self.includes.clear();
    }

    /// Append resolved members; their variables are appended to `includes`.
    pub fn extend<I>(&mut self, aovs: I)
    where
        I: IntoIterator<Item = Arc<Aov>>,
    {
        for aov in aovs {
            self.includes.push(aov.variable().to_string());
            self.aovs.push(aov);
        }
    }

    /// Rebuild `aovs` from `includes` against a namespace.
    ///
    /// Returns the include names that were not found.
    pub fn resolve(&mut self, namespace: &BTreeMap<String, Arc<Aov>>) -> Vec<String> {
        let mut dropped = Vec::new();
        self.aovs = self
            .includes
            .iter()
            .filter_map(|name| match namespace.get(name) {
                Some(aov) => Some(Arc::clone(aov)),
                None => {
                    dropped.push(name.clone());
                    None
                }
            })
            .collect();
        dropped
    }

    /// Serialize to the `groups` entry of a definition file.
    pub fn to_data(&self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("include".into(), self.includes.clone().into());
        if !self.comment.is_empty() {
            data.insert("comment".into(), self.comment.clone().into());
        }
        if let Some(icon) = &self.icon {
            data.insert("icon".into(), icon.clone().into());
        }
        if self.priority > NO_PRIORITY {
            data.insert("priority".into(), self.priority.into());
        }
        data
    }
}

impl PartialEq for AovGroup {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for AovGroup {}

impl PartialOrd for AovGroup {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AovGroup {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for AovGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
