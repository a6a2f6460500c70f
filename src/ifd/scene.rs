//! ifd::scene
//!
//! A static scene description that stands in for a live renderer.
//!
//! # Format
//!
//! ```json
//! {
//!   "parms": { "vm_exportcomponents": "diffuse reflect", "auto_aovs": "N @diag" },
//!   "lights": [
//!     { "name": "/obj/key", "parms": { "categories": "fx, hero" } },
//!     { "name": "/obj/fill", "parms": { "vm_export_prefix": "fill" } }
//!   ]
//! }
//! ```
//!
//! Parameters do not vary over time; the evaluation time is ignored.
//!
//! # Light Matching
//!
//! `scope` is a space separated list of glob patterns matched against the
//! light's full path or its last path component. `select` is a space or comma
//! separated list of glob patterns matched against the light's categories;
//! `*` or an empty selection accepts every light.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::ParmValue;

use super::expand::CATEGORIES_PARM;
use super::traits::{Camera, Light};

/// Errors loading a scene description.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse scene '{path}': {message}")]
    Parse { path: PathBuf, message: String },
}

/// A light with fixed string parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneLight {
    pub name: String,
    #[serde(default)]
    pub parms: BTreeMap<String, String>,
}

impl SceneLight {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parms: BTreeMap::new(),
        }
    }

    pub fn with_parm(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parms.insert(name.into(), value.into());
        self
    }

    fn categories(&self) -> Vec<&str> {
        self.parms
            .get(CATEGORIES_PARM)
            .map(|raw| raw.split(|c: char| c == ',' || c.is_whitespace()))
            .into_iter()
            .flatten()
            .filter(|c| !c.is_empty())
            .collect()
    }
}

impl Light for SceneLight {
    fn name(&self) -> &str {
        &self.name
    }

    fn eval_string(&self, parm: &str, _now: f64) -> Option<String> {
        self.parms.get(parm).cloned()
    }
}

/// Camera parameters plus the lights of a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticScene {
    pub parms: BTreeMap<String, ParmValue>,
    pub lights: Vec<SceneLight>,
}

impl StaticScene {
    /// Load a scene from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let contents = fs::read_to_string(path).map_err(|e| SceneError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&contents).map_err(|e| SceneError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn with_parm(mut self, name: impl Into<String>, value: impl Into<ParmValue>) -> Self {
        self.parms.insert(name.into(), value.into());
        self
    }

    pub fn with_light(mut self, light: SceneLight) -> Self {
        self.lights.push(light);
        self
    }
}

impl Camera for StaticScene {
    fn wrangle(&self, parm: &str, _now: f64) -> Option<ParmValue> {
        self.parms.get(parm).cloned()
    }

    fn lights(&self, scope: &str, select: &str, _now: f64) -> Vec<&dyn Light> {
        let scope = patterns(scope, |c| c.is_whitespace());
        let select = patterns(select, |c| c == ',' || c.is_whitespace());

        self.lights
            .iter()
            .filter(|light| in_scope(&light.name, &scope))
            .filter(|light| selected(light, &select))
            .map(|light| light as &dyn Light)
            .collect()
    }
}

fn patterns(mask: &str, separator: impl Fn(char) -> bool) -> Vec<Pattern> {
    mask.split(separator)
        .filter(|token| !token.is_empty())
        .filter_map(|token| {
            Pattern::new(token)
                .or_else(|_| Pattern::new(&Pattern::escape(token)))
                .ok()
        })
        .collect()
}

fn in_scope(name: &str, scope: &[Pattern]) -> bool {
    let base = name.rsplit('/').next().unwrap_or(name);
    scope
        .iter()
        .any(|pattern| pattern.matches(name) || pattern.matches(base))
}

fn selected(light: &SceneLight, select: &[Pattern]) -> bool {
    if select.is_empty() || select.iter().any(|p| p.as_str() == "*") {
        return true;
    }
    light
        .categories()
        .iter()
        .any(|category| select.iter().any(|pattern| pattern.matches(category)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(lights: Vec<&dyn Light>) -> Vec<String> {
        lights.iter().map(|l| l.name().to_string()).collect()
    }

    fn scene() -> StaticScene {
        StaticScene::default()
            .with_light(SceneLight::new("/obj/key").with_parm(CATEGORIES_PARM, "hero, fx"))
            .with_light(SceneLight::new("/obj/fill").with_parm(CATEGORIES_PARM, "fill"))
            .with_light(SceneLight::new("/obj/env"))
    }

    #[test]
    fn scope_matches_path_or_name() {
        let scene = scene();
        assert_eq!(names(scene.lights("*", "*", 0.0)).len(), 3);
        assert_eq!(names(scene.lights("k*", "*", 0.0)), ["/obj/key"]);
        assert_eq!(
            names(scene.lights("/obj/fill /obj/env", "", 0.0)),
            ["/obj/fill", "/obj/env"]
        );
        assert!(scene.lights("", "*", 0.0).is_empty());
    }

    #[test]
    fn select_matches_categories() {
        let scene = scene();
        assert_eq!(names(scene.lights("*", "fx", 0.0)), ["/obj/key"]);
        assert_eq!(
            names(scene.lights("*", "fill,hero", 0.0)),
            ["/obj/key", "/obj/fill"]
        );
    }

    #[test]
    fn load_from_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scene.json");
        fs::write(
            &path,
            r#"{"parms": {"auto_aovs": "N", "enable_auto_aovs": 1},
                "lights": [{"name": "/obj/key", "parms": {"vm_export_prefix": "k"}}]}"#,
        )
        .unwrap();

        let scene = StaticScene::from_file(&path).unwrap();
        assert_eq!(scene.wrangle("enable_auto_aovs", 0.0), Some(ParmValue::Int(1)));
        assert_eq!(
            scene.lights[0].eval_string("vm_export_prefix", 0.0),
            Some("k".to_string())
        );
    }

    #[test]
    fn unknown_fields_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scene.json");
        fs::write(&path, r#"{"camera": {}}"#).unwrap();
        assert!(matches!(
            StaticScene::from_file(&path),
            Err(SceneError::Parse { .. })
        ));
    }
}
