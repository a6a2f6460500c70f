//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing: the definition subdirectory
//! must be a non-empty relative path, and path-list and component names must
//! be non-empty.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::ConfigError;

/// Tool configuration.
///
/// # Example
///
/// ```toml
/// search_paths = ["/studio/pipeline/aovs"]
/// path_env = "HOUDINI_PATH"
/// subdirectory = "config/aovs"
/// default_components = ["diffuse", "reflect", "coat", "refract", "volume"]
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Directories scanned as-is, before the host path list
    pub search_paths: Option<Vec<PathBuf>>,

    /// Environment variable holding the host path list
    pub path_env: Option<String>,

    /// Subdirectory of each path-list entry holding definition files
    pub subdirectory: Option<PathBuf>,

    /// Components used for component export when neither the AOV nor the
    /// renderer supplies any
    pub default_components: Option<Vec<String>>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(subdirectory) = &self.subdirectory {
            validate_subdirectory(subdirectory)?;
        }

        if let Some(env) = &self.path_env {
            if env.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "path_env cannot be empty".to_string(),
                ));
            }
        }

        if let Some(components) = &self.default_components {
            if components.iter().any(|c| c.trim().is_empty()) {
                return Err(ConfigError::InvalidValue(
                    "default_components cannot contain empty names".to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn validate_subdirectory(subdirectory: &Path) -> Result<(), ConfigError> {
    if subdirectory.as_os_str().is_empty() {
        return Err(ConfigError::InvalidValue(
            "subdirectory cannot be empty".to_string(),
        ));
    }
    if subdirectory.is_absolute() {
        return Err(ConfigError::InvalidValue(format!(
            "subdirectory '{}' must be relative",
            subdirectory.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(FileConfig::default().validate().is_ok());
    }

    #[test]
    fn absolute_subdirectory_rejected() {
        let config = FileConfig {
            subdirectory: Some(PathBuf::from("/abs/aovs")),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_component_rejected() {
        let config = FileConfig {
            default_components: Some(vec!["diffuse".into(), " ".into()]),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_toml() {
        let config: FileConfig = toml::from_str(
            r#"
            search_paths = ["/studio/aovs"]
            subdirectory = "aovs"
            default_components = ["diffuse", "reflect"]
            "#,
        )
        .unwrap();
        assert_eq!(config.search_paths, Some(vec![PathBuf::from("/studio/aovs")]));
        assert_eq!(config.subdirectory, Some(PathBuf::from("aovs")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<FileConfig, _> = toml::from_str("colour = true");
        assert!(result.is_err());
    }
}
