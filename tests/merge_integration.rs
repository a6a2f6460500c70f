//! Integration tests for discovery and priority merging.
//!
//! These tests write definition files into temporary directories and load
//! them through the manager the way a render session would.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use aovkit::core::aov::Aov;
use aovkit::core::group::AovGroup;
use aovkit::core::paths::{find_aov_files, StaticSearch};
use aovkit::core::types::VexType;
use aovkit::core::writer::AovWriter;
use aovkit::manager::{AovManager, Diagnostic};

// =============================================================================
// Test Helpers
// =============================================================================

/// A set of search directories, each a fresh temp dir.
struct SearchDirs {
    dirs: Vec<TempDir>,
}

impl SearchDirs {
    fn new(count: usize) -> Self {
        Self {
            dirs: (0..count)
                .map(|_| TempDir::new().expect("create temp dir"))
                .collect(),
        }
    }

    fn paths(&self) -> Vec<PathBuf> {
        self.dirs.iter().map(|d| d.path().to_path_buf()).collect()
    }

    fn write(&self, index: usize, name: &str, contents: &str) -> PathBuf {
        let path = self.dirs[index].path().join(name);
        fs::write(&path, contents).expect("write definition file");
        path
    }

    fn manager(&self) -> AovManager {
        AovManager::new(StaticSearch::new(self.paths()))
    }
}

fn definition(variable: &str, channel: &str, priority: Option<i32>) -> String {
    let priority = priority
        .map(|p| format!(r#", "priority": {p}"#))
        .unwrap_or_default();
    format!(
        r#"{{"definitions": [
            {{"variable": "{variable}", "vextype": "vector", "channel": "{channel}"{priority}}}
        ]}}"#
    )
}

// =============================================================================
// Merge Tests
// =============================================================================

#[test]
fn files_are_found_in_search_order_and_sorted_within_a_directory() {
    let dirs = SearchDirs::new(2);
    let b = dirs.write(0, "b.json", "{}");
    let a = dirs.write(0, "a.json", "{}");
    let c = dirs.write(1, "c.json", "{}");
    dirs.write(1, "notes.txt", "ignored");

    let files = find_aov_files(&StaticSearch::new(dirs.paths()));

    assert_eq!(files, vec![a, b, c]);
}

#[test]
fn higher_priority_wins_regardless_of_file_order() {
    for (first, second) in [(Some(5), None), (None, Some(5))] {
        let dirs = SearchDirs::new(2);
        dirs.write(0, "n.json", &definition("N", "first", first));
        dirs.write(1, "n.json", &definition("N", "second", second));

        let mut manager = dirs.manager();
        let report = manager.reload();

        let expected = if first.is_some() { "first" } else { "second" };
        assert_eq!(manager.get_aov("N").unwrap().channel(), expected);
        assert_eq!(report.files.len(), 2);
    }
}

#[test]
fn equal_priority_keeps_first_definition() {
    let dirs = SearchDirs::new(2);
    dirs.write(0, "n.json", &definition("N", "first", Some(1)));
    dirs.write(1, "n.json", &definition("N", "second", Some(1)));

    let mut manager = dirs.manager();
    let report = manager.reload();

    assert_eq!(manager.get_aov("N").unwrap().channel(), "first");
    assert!(report
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::Discarded { .. })));
}

#[test]
fn groups_resolve_against_aovs_from_later_files() {
    let dirs = SearchDirs::new(1);
    dirs.write(
        0,
        "a_groups.json",
        r#"{"groups": {"lighting": {"include": ["direct", "indirect", "nope"]}}}"#,
    );
    dirs.write(
        0,
        "b_defs.json",
        r#"{"definitions": [
            {"variable": "direct", "vextype": "vector"},
            {"variable": "indirect", "vextype": "vector"}
        ]}"#,
    );

    let mut manager = dirs.manager();
    let report = manager.reload();

    let group = manager.get_group("lighting").unwrap();
    let members: Vec<_> = group.aovs().iter().map(|a| a.variable()).collect();
    assert_eq!(members, ["direct", "indirect"]);
    assert_eq!(group.includes().len(), 3);
    assert_eq!(
        report.dropped_includes().collect::<Vec<_>>(),
        [("lighting", "nope")]
    );
}

#[test]
fn unreadable_file_is_skipped_and_reported() {
    let dirs = SearchDirs::new(1);
    let bad = dirs.write(0, "a_bad.json", "{ not json");
    dirs.write(0, "b_good.json", &definition("N", "N", None));

    let mut manager = dirs.manager();
    let report = manager.reload();

    assert!(manager.get_aov("N").is_some());
    let skipped: Vec<&Path> = report.skipped_files().collect();
    assert_eq!(skipped, [bad.as_path()]);
    assert!(!report.is_clean());
}

#[test]
fn written_definitions_reload_through_manager() {
    let dirs = SearchDirs::new(1);
    let dir = dirs.dirs[0].path().join("nested");
    let file = dir.join("user.json");

    let mut writer = AovWriter::new();
    writer.add_aov(&Aov::builder("Pz", VexType::Float).comment("depth").build());
    writer.write_to_file(&file).unwrap();

    let mut writer = AovWriter::new();
    let mut group = AovGroup::new("geo");
    group.set_includes(["Pz"]);
    writer.add_group(&group);
    writer.write_to_file(&file).unwrap();

    let mut manager = AovManager::new(StaticSearch::new(vec![dir]));
    let report = manager.reload();

    assert!(report.is_clean());
    assert_eq!(manager.get_aov("Pz").unwrap().comment(), "depth");
    let geo = manager.get_group("geo").unwrap();
    assert_eq!(geo.aovs()[0].variable(), "Pz");
    assert_eq!(geo.path(), Some(file.as_path()));
}

#[test]
fn reload_discards_runtime_additions() {
    let dirs = SearchDirs::new(1);
    dirs.write(0, "n.json", &definition("N", "N", None));

    let mut manager = dirs.manager();
    manager.reload();
    manager.add_aov(Aov::builder("extra", VexType::Float).build());
    assert!(manager.get_aov("extra").is_some());

    manager.reload();
    assert!(manager.get_aov("extra").is_none());
    assert!(manager.get_aov("N").is_some());
}

// =============================================================================
// Incremental Load Tests
// =============================================================================

/// A reloaded namespace holding `N` and the group `base`, plus a separate
/// directory for files merged with `load`.
fn reloaded() -> (SearchDirs, TempDir, AovManager) {
    let dirs = SearchDirs::new(1);
    dirs.write(
        0,
        "base.json",
        r#"{
            "definitions": [{"variable": "N", "vextype": "vector", "channel": "base"}],
            "groups": {"base": {"include": ["N", "gone"]}}
        }"#,
    );
    let extra = TempDir::new().expect("create temp dir");
    let mut manager = dirs.manager();
    manager.reload();
    (dirs, extra, manager)
}

#[test]
fn load_replaces_with_higher_priority() {
    let (_dirs, extra, mut manager) = reloaded();
    let path = extra.path().join("late.json");
    fs::write(&path, definition("N", "late", Some(5))).unwrap();

    let report = manager.load(&path).unwrap();

    assert_eq!(report.files, [path]);
    assert_eq!(manager.get_aov("N").unwrap().channel(), "late");
    assert!(matches!(report.diagnostics[0], Diagnostic::Replaced { .. }));
    assert_eq!(
        manager.get_group("base").unwrap().aovs()[0].channel(),
        "late"
    );
}

#[test]
fn load_discards_equal_priority() {
    let (_dirs, extra, mut manager) = reloaded();
    let path = extra.path().join("late.json");
    fs::write(&path, definition("N", "late", None)).unwrap();

    let report = manager.load(&path).unwrap();

    assert_eq!(manager.get_aov("N").unwrap().channel(), "base");
    assert!(matches!(report.diagnostics[0], Diagnostic::Discarded { .. }));
}

#[test]
fn loaded_group_resolves_against_existing_aovs() {
    let (_dirs, extra, mut manager) = reloaded();
    let path = extra.path().join("groups.json");
    fs::write(
        &path,
        r#"{"groups": {"late": {"include": ["N", "missing"]}}}"#,
    )
    .unwrap();

    let report = manager.load(&path).unwrap();

    let late = manager.get_group("late").unwrap();
    assert_eq!(late.aovs().len(), 1);
    assert_eq!(late.aovs()[0].variable(), "N");
    // Only groups from the loaded file report their dropped includes.
    assert_eq!(
        report.dropped_includes().collect::<Vec<_>>(),
        [("late", "missing")]
    );
}

#[test]
fn malformed_load_leaves_namespace_untouched() {
    let (_dirs, extra, mut manager) = reloaded();
    let path = extra.path().join("bad.json");
    fs::write(&path, r#"{"definitions": [{"variable": "P"}]}"#).unwrap();

    let before_aovs: Vec<String> = manager.aovs().map(|a| a.variable().to_string()).collect();
    let before_groups: Vec<String> = manager.groups().map(|g| g.name().to_string()).collect();

    assert!(manager.load(&path).is_err());

    let after_aovs: Vec<String> = manager.aovs().map(|a| a.variable().to_string()).collect();
    let after_groups: Vec<String> = manager.groups().map(|g| g.name().to_string()).collect();
    assert_eq!(after_aovs, before_aovs);
    assert_eq!(after_groups, before_groups);
    assert_eq!(manager.get_aov("N").unwrap().channel(), "base");
}
