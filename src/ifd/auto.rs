//! ifd::auto
//!
//! Render-time application of the `auto_aovs` camera parameter.

use crate::manager::AovManager;

use super::expand::IfdWriter;
use super::traits::Camera;
use super::IfdError;

/// Camera parameter holding the compact AOV string.
pub const AUTO_AOVS_PARM: &str = "auto_aovs";
/// Toggle enabling automatic AOVs; absent means enabled.
pub const ENABLE_AUTO_AOVS_PARM: &str = "enable_auto_aovs";
/// Older toggle disabling automatic AOVs when set to 1.
pub const DISABLE_AUTO_AOVS_PARM: &str = "disable_auto_aovs";

/// Whether the camera asks for automatic AOVs.
pub fn auto_aovs_enabled(camera: &dyn Camera, now: f64) -> bool {
    if let Some(enabled) = camera.wrangle(ENABLE_AUTO_AOVS_PARM, now) {
        return enabled.as_int() != Some(0);
    }
    camera
        .wrangle(DISABLE_AUTO_AOVS_PARM, now)
        .and_then(|value| value.as_int())
        .map_or(true, |disabled| disabled == 0)
}

/// Emit every AOV named by the camera's `auto_aovs` parameter.
///
/// Returns the number of planes started; zero when automatic AOVs are
/// disabled or the parameter is absent.
pub fn add_aovs_to_ifd(
    manager: &AovManager,
    writer: &mut IfdWriter<'_>,
    camera: &dyn Camera,
    now: f64,
) -> Result<usize, IfdError> {
    if !auto_aovs_enabled(camera, now) {
        tracing::debug!("automatic aovs disabled");
        return Ok(0);
    }

    let Some(value) = camera.wrangle(AUTO_AOVS_PARM, now) else {
        return Ok(0);
    };

    let text = value.as_text();
    let elements = manager.get_aovs_from_string(&text);
    tracing::debug!(auto_aovs = %text, elements = elements.len(), "adding automatic aovs");

    let mut written = 0;
    for element in &elements {
        written += writer.write_element(element, camera, now)?;
    }
    Ok(written)
}
