//! core::naming
//!
//! Naming rules for interactively created AOVs, groups and definition files.
//!
//! # Rules
//!
//! - Variable and group names are non-empty and made of ASCII letters,
//!   digits and `_`. This keeps them free of the whitespace, commas and `@`
//!   that the compact string format uses as syntax.
//! - A definition file path needs a parent directory, a file name and an
//!   extension.

use std::path::Path;

/// Check if a variable or group name is valid.
///
/// # Example
///
/// ```
/// use aovkit::core::naming::is_valid_name;
///
/// assert!(is_valid_name("direct_diffuse"));
/// assert!(!is_valid_name("has space"));
/// assert!(!is_valid_name("@group"));
/// ```
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check if a path is usable as a definition file target.
///
/// # Example
///
/// ```
/// use aovkit::core::naming::is_valid_file_path;
///
/// assert!(is_valid_file_path("/studio/config/aovs/lighting.json"));
/// assert!(!is_valid_file_path("lighting.json"));
/// assert!(!is_valid_file_path("/studio/config/aovs/lighting"));
/// ```
pub fn is_valid_file_path(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();

    let has_dir = path
        .parent()
        .is_some_and(|parent| !parent.as_os_str().is_empty());
    let has_name = path.file_name().is_some();
    let has_ext = path.extension().is_some_and(|ext| !ext.is_empty());

    has_dir && has_name && has_ext
}
