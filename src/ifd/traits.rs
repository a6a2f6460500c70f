//! ifd::traits
//!
//! Renderer collaborators used during channel emission.
//!
//! # Design
//!
//! The renderer owns the camera, the lights and the scene stream. Emission
//! only needs a narrow slice of each, so each is a small trait:
//!
//! - [`Camera`] evaluates render parameters and lists lights
//! - [`Light`] names itself and evaluates its own parameters
//! - [`SceneStream`] receives block/property/end calls
//! - [`PlaneHooks`] lets plugins veto or take over a plane
//! - [`ErrorReporter`] receives configuration errors that skip a channel
//!
//! Parameter evaluation always takes the evaluation time; static hosts are
//! free to ignore it.

use crate::core::types::{ParmValue, VexType};

use super::IfdError;

/// A scene light.
pub trait Light {
    /// Full object path, e.g. `/obj/key_light`.
    fn name(&self) -> &str;

    /// Evaluate a string parameter; `None` if the light has no such parameter.
    fn eval_string(&self, parm: &str, now: f64) -> Option<String>;
}

/// The camera being rendered, with its output driver's parameters.
pub trait Camera {
    /// Evaluate a render parameter; `None` if it does not exist.
    fn wrangle(&self, parm: &str, now: f64) -> Option<ParmValue>;

    /// Lights whose name matches `scope` and whose categories match `select`.
    fn lights(&self, scope: &str, select: &str, now: f64) -> Vec<&dyn Light>;
}

/// Destination of plane blocks.
pub trait SceneStream {
    fn start(&mut self, block: &str) -> Result<(), IfdError>;

    fn property(&mut self, block: &str, name: &str, values: &[&str]) -> Result<(), IfdError>;

    fn end(&mut self) -> Result<(), IfdError>;
}

/// Arguments passed to plane hooks.
///
/// `index` is always `-1`: AOV planes are not tied to a numbered output.
pub struct PlaneHookArgs<'a> {
    pub variable: &'a str,
    pub vextype: VexType,
    pub index: i32,
    pub camera: &'a dyn Camera,
    pub now: f64,
    pub planefile: Option<&'a str>,
    pub lightexport: Option<&'a str>,
}

/// Plugin hook points around each plane.
///
/// Returning `true` from `pre_defplane` suppresses the plane entirely.
/// Returning `true` from `post_defplane` leaves the block open: the hook has
/// taken responsibility for ending it.
pub trait PlaneHooks {
    fn pre_defplane(&mut self, _args: &PlaneHookArgs<'_>) -> bool {
        false
    }

    fn post_defplane(&mut self, _args: &PlaneHookArgs<'_>) -> bool {
        false
    }
}

/// Hooks that never intervene.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl PlaneHooks for NoHooks {}

/// The host's error channel for problems that skip a channel but not the render.
pub trait ErrorReporter {
    fn report(&mut self, error: &IfdError);
}

/// Reports errors through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&mut self, error: &IfdError) {
        tracing::error!("{}", error);
    }
}
