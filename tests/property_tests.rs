//! Property-based tests for compact strings and merging.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated namespaces.

use std::sync::Arc;

use proptest::prelude::*;

use aovkit::core::aov::Aov;
use aovkit::core::group::AovGroup;
use aovkit::core::reader::FileContents;
use aovkit::core::types::VexType;
use aovkit::manager::{flatten_list, list_as_string, AovElement, AovManager};

/// Strategy for generating valid AOV and group names.
fn name() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,11}"
}

/// A manager holding `aovs`, plus one group per chunk of them.
fn manager_with(aovs: &[String]) -> AovManager {
    let mut manager = AovManager::default();
    for variable in aovs {
        manager.add_aov(Aov::builder(variable.as_str(), VexType::Vector).build());
    }
    for (i, chunk) in aovs.chunks(2).enumerate() {
        let mut group = AovGroup::new(format!("g{}", i));
        group.set_includes(chunk.iter().cloned());
        manager.add_group(group);
    }
    manager
}

proptest! {
    /// Rendering resolved elements and resolving again yields the same elements.
    #[test]
    fn compact_string_roundtrip(
        aovs in prop::collection::btree_set(name(), 1..8),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..12),
    ) {
        let aovs: Vec<String> = aovs.into_iter().collect();
        let manager = manager_with(&aovs);
        let menu = manager.menu_items();

        let text = picks
            .iter()
            .map(|i| i.get(&menu).as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let elements = manager.get_aovs_from_string(&text);
        prop_assert_eq!(elements.len(), picks.len());

        let rendered = list_as_string(&elements);
        let again = manager.get_aovs_from_string(&rendered);
        prop_assert_eq!(again, elements);
    }

    /// Flattening never repeats a variable and keeps first-seen order.
    #[test]
    fn flatten_is_unique_and_ordered(
        aovs in prop::collection::btree_set(name(), 1..8),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..12),
    ) {
        let aovs: Vec<String> = aovs.into_iter().collect();
        let manager = manager_with(&aovs);
        let menu = manager.menu_items();
        let text = picks.iter().map(|i| i.get(&menu).as_str()).collect::<Vec<_>>().join(" ");
        let elements = manager.get_aovs_from_string(&text);

        let flat: Vec<&str> = flatten_list(&elements).iter().map(|a| a.variable()).collect();

        let mut expected: Vec<&str> = Vec::new();
        for element in &elements {
            for member in element.members() {
                if !expected.contains(&member.variable()) {
                    expected.push(member.variable());
                }
            }
        }
        prop_assert_eq!(flat, expected);
    }

    /// The surviving definition has the highest priority; ties go to the earliest.
    #[test]
    fn merge_keeps_first_highest_priority(priorities in prop::collection::vec(-1i32..4, 1..6)) {
        let files = priorities
            .iter()
            .enumerate()
            .map(|(i, &priority)| FileContents {
                path: format!("/aovs/{}.json", i).into(),
                aovs: vec![Aov::builder("N", VexType::Vector)
                    .channel(format!("from{}", i))
                    .priority(priority)
                    .build()],
                groups: Vec::new(),
            })
            .collect();

        let mut manager = AovManager::default();
        let report = manager.merge(files);

        let best = priorities.iter().max().copied().unwrap();
        let winner = priorities.iter().position(|&p| p == best).unwrap();
        prop_assert_eq!(manager.get_aov("N").unwrap().channel(), format!("from{}", winner));
        prop_assert_eq!(report.diagnostics.len(), priorities.len() - 1);
    }
}

#[test]
fn shared_members_are_the_same_definition() {
    let manager = manager_with(&["N".to_string(), "P".to_string()]);
    let elements = manager.get_aovs_from_string("@g0 N");

    let AovElement::Group(group) = elements[0] else {
        panic!("expected a group");
    };
    assert!(Arc::ptr_eq(&group.aovs()[0], manager.get_aov("N").unwrap()));
}
