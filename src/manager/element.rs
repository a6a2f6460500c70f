//! manager::element
//!
//! A resolved token of the compact string format: an AOV or a group.

use std::collections::HashSet;
use std::fmt;

use crate::core::aov::Aov;
use crate::core::group::AovGroup;

/// Prefix marking a group reference in compact strings.
pub const GROUP_PREFIX: char = '@';

/// An AOV or group borrowed from a manager's namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AovElement<'a> {
    Aov(&'a Aov),
    Group(&'a AovGroup),
}

impl<'a> AovElement<'a> {
    /// The variable or group name, without prefix.
    pub fn name(&self) -> &'a str {
        match self {
            AovElement::Aov(aov) => aov.variable(),
            AovElement::Group(group) => group.name(),
        }
    }

    /// The compact string token: the variable, or `@name` for groups.
    pub fn token(&self) -> String {
        match self {
            AovElement::Aov(aov) => aov.variable().to_string(),
            AovElement::Group(group) => format!("{}{}", GROUP_PREFIX, group.name()),
        }
    }

    /// AOVs this element stands for, in order.
    pub fn members(&self) -> Vec<&'a Aov> {
        match self {
            AovElement::Aov(aov) => vec![*aov],
            AovElement::Group(group) => group.aovs().iter().map(|aov| aov.as_ref()).collect(),
        }
    }
}

impl fmt::Display for AovElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

/// Flatten elements into unique AOVs, keeping first-seen order.
///
/// Group members and standalone AOVs are unioned by variable.
pub fn flatten_list<'a>(elements: &[AovElement<'a>]) -> Vec<&'a Aov> {
    let mut seen = HashSet::new();
    elements
        .iter()
        .flat_map(|element| element.members())
        .filter(|&aov| seen.insert(aov.variable()))
        .collect()
}

/// Join elements into a compact string; groups are prefixed with `@`.
///
/// Inverse of [`crate::manager::AovManager::get_aovs_from_string`].
pub fn list_as_string(elements: &[AovElement<'_>]) -> String {
    elements
        .iter()
        .map(AovElement::token)
        .collect::<Vec<_>>()
        .join(" ")
}
