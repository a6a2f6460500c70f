//! core::paths
//!
//! Discovery of AOV definition files.
//!
//! # Architecture
//!
//! Definition files live in `config/aovs/` subdirectories of a host path
//! list (for Houdini, `HOUDINI_PATH`). The lookup of those directories is a
//! host primitive, abstracted here as [`DirectorySearch`]. A search that the
//! host does not support yields no directories rather than an error.
//!
//! Within each directory, `*.json` files are returned in sorted order, and
//! directories are visited in search order. Merge results depend on that
//! order when priorities tie, so it must stay deterministic.
//!
//! # Example
//!
//! ```
//! use aovkit::core::paths::{find_aov_files, StaticSearch};
//!
//! let search = StaticSearch::new(Vec::new());
//! assert!(find_aov_files(&search).is_empty());
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default subdirectory of each search path holding definition files.
pub const AOV_SUBDIRECTORY: &str = "config/aovs";

/// Path list entry meaning "the host's default paths".
const DEFAULT_PATH_MARKER: &str = "&";

/// Errors from directory search.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// The host has no way to resolve search directories.
    #[error("directory search not supported: {0}")]
    Unsupported(String),
}

/// Host primitive returning directories to scan for definition files.
pub trait DirectorySearch {
    /// Directories, in priority order.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Unsupported` when the host cannot search.
    fn find_directories(&self) -> Result<Vec<PathBuf>, SearchError>;
}

/// A fixed list of directories.
#[derive(Debug, Clone, Default)]
pub struct StaticSearch {
    directories: Vec<PathBuf>,
}

impl StaticSearch {
    pub fn new(directories: Vec<PathBuf>) -> Self {
        Self { directories }
    }
}

impl DirectorySearch for StaticSearch {
    fn find_directories(&self) -> Result<Vec<PathBuf>, SearchError> {
        Ok(self.directories.clone())
    }
}

/// Searches explicit directories followed by a path-list environment
/// variable, joining each path-list entry with a subdirectory.
///
/// Only existing directories are returned, each once.
#[derive(Debug, Clone)]
pub struct PathListSearch {
    /// Directories scanned as-is, before the path list
    pub extra: Vec<PathBuf>,
    /// Environment variable holding the path list
    pub env_var: String,
    /// Subdirectory joined onto each path-list entry
    pub subdirectory: PathBuf,
}

impl PathListSearch {
    pub fn new(env_var: impl Into<String>, subdirectory: impl Into<PathBuf>) -> Self {
        Self {
            extra: Vec::new(),
            env_var: env_var.into(),
            subdirectory: subdirectory.into(),
        }
    }

    pub fn with_extra(mut self, extra: Vec<PathBuf>) -> Self {
        self.extra = extra;
        self
    }
}

impl DirectorySearch for PathListSearch {
    fn find_directories(&self) -> Result<Vec<PathBuf>, SearchError> {
        let mut candidates: Vec<PathBuf> = self.extra.clone();

        match std::env::var_os(&self.env_var) {
            Some(list) => candidates.extend(
                std::env::split_paths(&list)
                    .filter(|p| !p.as_os_str().is_empty() && p.as_os_str() != DEFAULT_PATH_MARKER)
                    .map(|p| p.join(&self.subdirectory)),
            ),
            None if self.extra.is_empty() => {
                return Err(SearchError::Unsupported(format!(
                    "${} is not set",
                    self.env_var
                )));
            }
            None => {}
        }

        let mut seen = HashSet::new();
        Ok(candidates
            .into_iter()
            .filter(|p| p.is_dir())
            .filter(|p| seen.insert(p.clone()))
            .collect())
    }
}

/// List every `*.json` file under the directories a search returns.
///
/// An unsupported search is treated as an empty directory list. Unreadable
/// directories are skipped.
pub fn find_aov_files(search: &dyn DirectorySearch) -> Vec<PathBuf> {
    let directories = match search.find_directories() {
        Ok(directories) => directories,
        Err(e) => {
            tracing::debug!(error = %e, "no aov search directories");
            Vec::new()
        }
    };

    directories
        .iter()
        .flat_map(|dir| json_files_in(dir))
        .collect()
}

/// Sorted `*.json` files directly inside `dir`.
fn json_files_in(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot read aov directory");
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

/// Expand `$VAR` and `${VAR}` references from the environment.
///
/// Unset variables are left untouched.
pub fn expand_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        let value = if name.is_empty() {
            None
        } else {
            std::env::var(name).ok()
        };
        match value {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[pos..pos + 1 + consumed]),
        }
        rest = &after[consumed..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Unsupported;

    impl DirectorySearch for Unsupported {
        fn find_directories(&self) -> Result<Vec<PathBuf>, SearchError> {
            Err(SearchError::Unsupported("test".into()))
        }
    }

    #[test]
    fn unsupported_search_is_empty() {
        assert!(find_aov_files(&Unsupported).is_empty());
    }

    #[test]
    fn files_sorted_within_directory_in_search_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join("b.json"), "{}").unwrap();
        fs::write(first.path().join("a.json"), "{}").unwrap();
        fs::write(first.path().join("notes.txt"), "").unwrap();
        fs::write(second.path().join("0.json"), "{}").unwrap();

        let search = StaticSearch::new(vec![first.path().into(), second.path().into()]);
        let files = find_aov_files(&search);

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["a.json", "b.json", "0.json"]);
    }

    #[test]
    fn path_list_joins_subdirectory_and_skips_missing() {
        let root = TempDir::new().unwrap();
        let with_aovs = root.path().join("pkg");
        fs::create_dir_all(with_aovs.join("config/aovs")).unwrap();
        let without = root.path().join("other");
        fs::create_dir_all(&without).unwrap();

        let list = std::env::join_paths([with_aovs.as_path(), without.as_path(), Path::new("&")])
            .unwrap();
        std::env::set_var("AOVKIT_TEST_PATH_LIST", &list);

        let search = PathListSearch::new("AOVKIT_TEST_PATH_LIST", AOV_SUBDIRECTORY);
        let dirs = search.find_directories().unwrap();
        std::env::remove_var("AOVKIT_TEST_PATH_LIST");

        assert_eq!(dirs, vec![with_aovs.join("config/aovs")]);
    }

    #[test]
    fn path_list_unset_is_unsupported() {
        let search = PathListSearch::new("AOVKIT_TEST_UNSET_PATH_LIST", AOV_SUBDIRECTORY);
        assert!(matches!(
            search.find_directories(),
            Err(SearchError::Unsupported(_))
        ));
    }

    #[test]
    fn path_list_extra_dirs_without_env() {
        let root = TempDir::new().unwrap();
        let search = PathListSearch::new("AOVKIT_TEST_UNSET_PATH_LIST_2", AOV_SUBDIRECTORY)
            .with_extra(vec![root.path().to_path_buf(), root.path().to_path_buf()]);
        assert_eq!(search.find_directories().unwrap(), vec![root.path().to_path_buf()]);
    }

    #[test]
    fn expand_vars_forms() {
        std::env::set_var("AOVKIT_TEST_HOME", "/home/artist");
        assert_eq!(expand_vars("$AOVKIT_TEST_HOME/icons"), "/home/artist/icons");
        assert_eq!(expand_vars("${AOVKIT_TEST_HOME}x"), "/home/artistx");
        assert_eq!(expand_vars("$AOVKIT_TEST_NOPE/a"), "$AOVKIT_TEST_NOPE/a");
        assert_eq!(expand_vars("cost $"), "cost $");
        assert_eq!(expand_vars("${open"), "${open");
        assert_eq!(expand_vars("plain"), "plain");
        std::env::remove_var("AOVKIT_TEST_HOME");
    }
}
