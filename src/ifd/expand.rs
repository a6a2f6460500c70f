//! ifd::expand
//!
//! Channel expansion: one AOV in, zero or more plane blocks out.
//!
//! # Algorithm
//!
//! 1. Build the base block from the AOV's fields.
//! 2. Component fan-out: with `componentexport`, one block per component,
//!    channel `{channel}_{component}`. Components come from the AOV, else
//!    the camera's `vm_exportcomponents`, else the configured defaults.
//! 3. Light fan-out per block, on `lightexport`:
//!    - none: the block as is
//!    - `per-light`: one block per matching light
//!    - `single`: one block naming every matching light
//!    - `per-category`: one block per light category
//! 4. Each block goes through the hooks and into the stream.
//!
//! Groups emit each member in order. Nothing is deduplicated at this stage.

use crate::core::aov::Aov;
use crate::core::group::AovGroup;
use crate::core::types::LightExport;
use crate::manager::AovElement;

use super::plane::{PlaneBlock, PLANE_BLOCK};
use super::traits::{Camera, ErrorReporter, Light, PlaneHookArgs, PlaneHooks, SceneStream};
use super::IfdError;

/// Camera parameter listing default export components.
pub const EXPORT_COMPONENTS_PARM: &str = "vm_exportcomponents";
/// Light parameter appended to per-light channel names.
pub const EXPORT_SUFFIX_PARM: &str = "vm_export_suffix";
/// Light parameter prepended to per-light channel names.
pub const EXPORT_PREFIX_PARM: &str = "vm_export_prefix";
/// Light parameter holding its categories, comma or space separated.
pub const CATEGORIES_PARM: &str = "categories";

/// `lightexport` value used when a `single` export matches no lights.
///
/// An empty value would read as "light exports disabled".
pub const NO_LIGHTS: &str = "__nolights__";
/// Category of lights that declare none.
pub const NO_CATEGORY: &str = "__none__";

/// Emits plane blocks for AOVs into a scene stream.
pub struct IfdWriter<'a> {
    stream: &'a mut dyn SceneStream,
    hooks: &'a mut dyn PlaneHooks,
    reporter: &'a mut dyn ErrorReporter,
    default_components: Vec<String>,
}

impl<'a> IfdWriter<'a> {
    pub fn new(
        stream: &'a mut dyn SceneStream,
        hooks: &'a mut dyn PlaneHooks,
        reporter: &'a mut dyn ErrorReporter,
    ) -> Self {
        Self {
            stream,
            hooks,
            reporter,
            default_components: Vec::new(),
        }
    }

    /// Components used when neither the AOV nor the camera supplies any.
    pub fn with_default_components(mut self, components: &[String]) -> Self {
        self.default_components = components.to_vec();
        self
    }

    /// Emit an AOV or every member of a group.
    pub fn write_element(
        &mut self,
        element: &AovElement<'_>,
        camera: &dyn Camera,
        now: f64,
    ) -> Result<usize, IfdError> {
        match element {
            AovElement::Aov(aov) => self.write_aov(aov, camera, now),
            AovElement::Group(group) => self.write_group(group, camera, now),
        }
    }

    /// Emit each member of a group in order.
    pub fn write_group(
        &mut self,
        group: &AovGroup,
        camera: &dyn Camera,
        now: f64,
    ) -> Result<usize, IfdError> {
        let mut written = 0;
        for aov in group.aovs() {
            written += self.write_aov(aov, camera, now)?;
        }
        Ok(written)
    }

    /// Emit every plane an AOV expands to.
    ///
    /// Returns the number of planes started. A per-light channel that
    /// cannot be named is reported and skipped.
    ///
    /// # Errors
    ///
    /// Returns the stream's error; planes already written stay written.
    pub fn write_aov(
        &mut self,
        aov: &Aov,
        camera: &dyn Camera,
        now: f64,
    ) -> Result<usize, IfdError> {
        let base = PlaneBlock::from_aov(aov);

        if !aov.componentexport() {
            return self.light_export_planes(aov, base, camera, now);
        }

        let components = self.components_for(aov, camera, now);
        if components.is_empty() {
            tracing::debug!(variable = aov.variable(), "component export without components");
        }

        let mut written = 0;
        for component in components {
            let mut block = base.clone();
            block.channel = format!("{}_{}", base.channel, component);
            block.component = Some(component);
            written += self.light_export_planes(aov, block, camera, now)?;
        }
        Ok(written)
    }

    fn components_for(&self, aov: &Aov, camera: &dyn Camera, now: f64) -> Vec<String> {
        if !aov.components().is_empty() {
            return aov.components().to_vec();
        }

        let from_camera: Vec<String> = camera
            .wrangle(EXPORT_COMPONENTS_PARM, now)
            .map(|value| {
                value
                    .as_text()
                    .split_whitespace()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        if from_camera.is_empty() {
            self.default_components.clone()
        } else {
            from_camera
        }
    }

    fn light_export_planes(
        &mut self,
        aov: &Aov,
        block: PlaneBlock,
        camera: &dyn Camera,
        now: f64,
    ) -> Result<usize, IfdError> {
        let Some(policy) = aov.lightexport() else {
            return self.write_plane(&block, camera, now).map(usize::from);
        };

        let lights = camera.lights(aov.lightexport_scope(), aov.lightexport_select(), now);

        match policy {
            LightExport::PerLight => self.per_light_planes(&block, &lights, camera, now),
            LightExport::Single => {
                let names: Vec<&str> = lights.iter().map(|light| light.name()).collect();
                let mut block = block;
                block.lightexport = Some(if names.is_empty() {
                    NO_LIGHTS.to_string()
                } else {
                    names.join(" ")
                });
                self.write_plane(&block, camera, now).map(usize::from)
            }
            LightExport::PerCategory => {
                let mut written = 0;
                for (category, members) in categorize(&lights, now) {
                    let mut planar = block.clone();
                    planar.channel = format!("{}_{}", category, block.channel);
                    planar.lightexport = Some(members.join(" "));
                    written += usize::from(self.write_plane(&planar, camera, now)?);
                }
                Ok(written)
            }
        }
    }

    fn per_light_planes(
        &mut self,
        block: &PlaneBlock,
        lights: &[&dyn Light],
        camera: &dyn Camera,
        now: f64,
    ) -> Result<usize, IfdError> {
        let mut written = 0;

        for light in lights {
            let suffix = light.eval_string(EXPORT_SUFFIX_PARM, now).unwrap_or_default();
            let prefix = light
                .eval_string(EXPORT_PREFIX_PARM, now)
                .unwrap_or_else(|| default_prefix(light.name()));

            let channel = if !prefix.is_empty() {
                format!("{}_{}{}", prefix, block.channel, suffix)
            } else if !suffix.is_empty() {
                format!("{}{}", block.channel, suffix)
            } else {
                self.reporter.report(&IfdError::AmbiguousPerLightChannel {
                    channel: block.channel.clone(),
                    light: light.name().to_string(),
                });
                continue;
            };

            let mut planar = block.clone();
            planar.channel = channel;
            planar.lightexport = Some(light.name().to_string());
            written += usize::from(self.write_plane(&planar, camera, now)?);
        }

        Ok(written)
    }

    /// Write one block through the hooks.
    ///
    /// Returns `false` if the pre hook suppressed it.
    pub fn write_plane(
        &mut self,
        block: &PlaneBlock,
        camera: &dyn Camera,
        now: f64,
    ) -> Result<bool, IfdError> {
        let args = PlaneHookArgs {
            variable: &block.variable,
            vextype: block.vextype,
            index: -1,
            camera,
            now,
            planefile: block.planefile.as_deref(),
            lightexport: block.lightexport.as_deref(),
        };

        if self.hooks.pre_defplane(&args) {
            tracing::debug!(channel = %block.channel, "pre_defplane suppressed plane");
            return Ok(false);
        }

        self.stream.start(PLANE_BLOCK)?;
        for (name, value) in block.properties() {
            self.stream.property(PLANE_BLOCK, name, &[value])?;
        }

        if self.hooks.post_defplane(&args) {
            tracing::debug!(channel = %block.channel, "post_defplane took over plane");
            return Ok(true);
        }

        self.stream.end()?;
        Ok(true)
    }
}

/// Prefix for a light without `vm_export_prefix`: its path without the
/// leading slash, remaining slashes as underscores.
fn default_prefix(name: &str) -> String {
    name.strip_prefix('/').unwrap_or(name).replace('/', "_")
}

/// Group lights by category, in first-seen order.
fn categorize<'l>(lights: &[&'l dyn Light], now: f64) -> Vec<(String, Vec<&'l str>)> {
    let mut buckets: Vec<(String, Vec<&'l str>)> = Vec::new();

    for light in lights {
        let light: &'l dyn Light = *light;
        let raw = light.eval_string(CATEGORIES_PARM, now).unwrap_or_default();
        let mut categories: Vec<String> = raw
            .replace(',', " ")
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if categories.is_empty() {
            categories.push(NO_CATEGORY.to_string());
        }

        for category in categories {
            match buckets.iter_mut().find(|(name, _)| *name == category) {
                Some((_, members)) => members.push(light.name()),
                None => buckets.push((category, vec![light.name()])),
            }
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::VexType;
    use crate::ifd::mock::{RecordingReporter, RecordingStream, ScriptedHooks};
    use crate::ifd::scene::{SceneLight, StaticScene};
    use crate::ifd::traits::NoHooks;
    use std::sync::Arc;

    fn emit(aov: &Aov, scene: &StaticScene) -> (RecordingStream, RecordingReporter, usize) {
        let mut stream = RecordingStream::new();
        let mut hooks = NoHooks;
        let mut reporter = RecordingReporter::default();
        let written = IfdWriter::new(&mut stream, &mut hooks, &mut reporter)
            .write_aov(aov, scene, 0.0)
            .unwrap();
        (stream, reporter, written)
    }

    #[test]
    fn plain_aov_emits_one_plane() {
        let aov = Aov::builder("N", VexType::Vector).build();
        let (stream, _, written) = emit(&aov, &StaticScene::default());

        assert_eq!(written, 1);
        let planes = stream.planes();
        assert_eq!(planes[0].get("channel"), Some("N"));
        assert_eq!(planes[0].get("quantize"), Some("half"));
        assert!(planes[0].get("lightexport").is_none());
        assert!(stream.is_balanced());
    }

    #[test]
    fn component_fan_out() {
        let aov = Aov::builder("direct", VexType::Vector)
            .channel("Cd")
            .componentexport(true)
            .components(["diffuse", "reflect"])
            .build();
        let (stream, _, written) = emit(&aov, &StaticScene::default());

        assert_eq!(written, 2);
        let planes = stream.planes();
        assert_eq!(planes[0].get("channel"), Some("Cd_diffuse"));
        assert_eq!(planes[0].get("component"), Some("diffuse"));
        assert_eq!(planes[1].get("channel"), Some("Cd_reflect"));
    }

    #[test]
    fn components_fall_back_to_camera_then_defaults() {
        let aov = Aov::builder("direct", VexType::Vector)
            .componentexport(true)
            .build();

        let scene = StaticScene::default().with_parm(EXPORT_COMPONENTS_PARM, "coat sss");
        let (stream, _, _) = emit(&aov, &scene);
        assert_eq!(stream.planes()[1].get("channel"), Some("direct_sss"));

        let mut stream = RecordingStream::new();
        let mut hooks = NoHooks;
        let mut reporter = RecordingReporter::default();
        let defaults = vec!["volume".to_string()];
        IfdWriter::new(&mut stream, &mut hooks, &mut reporter)
            .with_default_components(&defaults)
            .write_aov(&aov, &StaticScene::default(), 0.0)
            .unwrap();
        assert_eq!(stream.planes()[0].get("channel"), Some("direct_volume"));
    }

    #[test]
    fn per_light_naming() {
        let aov = Aov::builder("diffuse", VexType::Vector)
            .lightexport(LightExport::PerLight)
            .build();
        let scene = StaticScene::default()
            .with_light(SceneLight::new("/obj/rig/key"))
            .with_light(SceneLight::new("/obj/fill").with_parm(EXPORT_PREFIX_PARM, "f"))
            .with_light(
                SceneLight::new("/obj/rim")
                    .with_parm(EXPORT_PREFIX_PARM, "")
                    .with_parm(EXPORT_SUFFIX_PARM, "_rim"),
            );

        let (stream, reporter, written) = emit(&aov, &scene);

        assert_eq!(written, 3);
        assert!(reporter.errors.is_empty());
        let channels: Vec<_> = stream
            .planes()
            .iter()
            .map(|p| p.get("channel").unwrap().to_string())
            .collect();
        assert_eq!(channels, ["obj_rig_key_diffuse", "f_diffuse", "diffuse_rim"]);
        assert_eq!(stream.planes()[0].get("lightexport"), Some("/obj/rig/key"));
    }

    #[test]
    fn per_light_without_prefix_or_suffix_is_reported_and_skipped() {
        let aov = Aov::builder("diffuse", VexType::Vector)
            .lightexport(LightExport::PerLight)
            .build();
        let scene = StaticScene::default()
            .with_light(SceneLight::new("/obj/a").with_parm(EXPORT_PREFIX_PARM, ""))
            .with_light(SceneLight::new("/obj/b"));

        let (stream, reporter, written) = emit(&aov, &scene);

        assert_eq!(written, 1);
        assert_eq!(reporter.errors.len(), 1);
        assert_eq!(stream.planes()[0].get("channel"), Some("obj_b_diffuse"));
    }

    #[test]
    fn single_export_without_lights_uses_sentinel() {
        let aov = Aov::builder("diffuse", VexType::Vector)
            .lightexport(LightExport::Single)
            .build();
        let (stream, _, written) = emit(&aov, &StaticScene::default());

        assert_eq!(written, 1);
        assert_eq!(stream.planes()[0].get("lightexport"), Some(NO_LIGHTS));
    }

    #[test]
    fn single_export_joins_light_names() {
        let aov = Aov::builder("diffuse", VexType::Vector)
            .lightexport(LightExport::Single)
            .build();
        let scene = StaticScene::default()
            .with_light(SceneLight::new("/obj/a"))
            .with_light(SceneLight::new("/obj/b"));
        let (stream, _, _) = emit(&aov, &scene);
        assert_eq!(stream.planes()[0].get("lightexport"), Some("/obj/a /obj/b"));
    }

    #[test]
    fn per_category_buckets() {
        let aov = Aov::builder("diffuse", VexType::Vector)
            .lightexport(LightExport::PerCategory)
            .build();
        let scene = StaticScene::default()
            .with_light(SceneLight::new("/obj/a").with_parm(CATEGORIES_PARM, "fx, hero"))
            .with_light(SceneLight::new("/obj/b").with_parm(CATEGORIES_PARM, "hero"))
            .with_light(SceneLight::new("/obj/c"))
            .with_light(SceneLight::new("/obj/d").with_parm(CATEGORIES_PARM, " "));

        let (stream, _, written) = emit(&aov, &scene);

        assert_eq!(written, 3);
        let planes = stream.planes();
        assert_eq!(planes[0].get("channel"), Some("fx_diffuse"));
        assert_eq!(planes[0].get("lightexport"), Some("/obj/a"));
        assert_eq!(planes[1].get("channel"), Some("hero_diffuse"));
        assert_eq!(planes[1].get("lightexport"), Some("/obj/a /obj/b"));
        assert_eq!(planes[2].get("channel"), Some("__none___diffuse"));
        assert_eq!(planes[2].get("lightexport"), Some("/obj/c /obj/d"));
    }

    #[test]
    fn hooks_can_suppress_or_take_over() {
        let n = Aov::builder("N", VexType::Vector).build();
        let p = Aov::builder("P", VexType::Vector).build();

        let mut stream = RecordingStream::new();
        let mut hooks = ScriptedHooks::default().skip_pre("N").skip_post("P");
        let mut reporter = RecordingReporter::default();
        let mut writer = IfdWriter::new(&mut stream, &mut hooks, &mut reporter);

        let scene = StaticScene::default();
        assert_eq!(writer.write_aov(&n, &scene, 0.0).unwrap(), 0);
        assert_eq!(writer.write_aov(&p, &scene, 0.0).unwrap(), 1);
        drop(writer);

        assert_eq!(stream.starts(), 1);
        assert!(!stream.is_balanced());
        assert_eq!(hooks.calls, ["pre N", "pre P", "post P"]);
    }

    #[test]
    fn stream_failure_stops_group_and_keeps_written_planes() {
        let n = Arc::new(Aov::builder("N", VexType::Vector).build());
        let p = Arc::new(Aov::builder("P", VexType::Vector).build());
        let z = Arc::new(Aov::builder("Pz", VexType::Float).build());
        let mut group = AovGroup::new("diag");
        group.extend([n, p, z]);

        let plain = Aov::builder("N", VexType::Vector).build();
        let (single, _, _) = emit(&plain, &StaticScene::default());
        let per_plane = single.events.len();

        // Room for the first plane and the start of the second.
        let mut stream = RecordingStream::failing_after(per_plane + 1);
        let mut hooks = NoHooks;
        let mut reporter = RecordingReporter::default();
        let result = IfdWriter::new(&mut stream, &mut hooks, &mut reporter).write_group(
            &group,
            &StaticScene::default(),
            0.0,
        );

        assert!(matches!(result, Err(IfdError::Stream(_))));
        assert_eq!(stream.events[..per_plane], single.events[..]);
        let planes = stream.planes();
        assert_eq!(planes.len(), 2);
        assert_eq!(planes[0].get("variable"), Some("N"));
        assert!(planes[1].properties.is_empty());
        assert!(!stream.is_balanced());
    }

    #[test]
    fn default_prefix_strips_leading_slash() {
        assert_eq!(default_prefix("/obj/rig/key"), "obj_rig_key");
        assert_eq!(default_prefix("key"), "key");
    }
}
