//! ifd
//!
//! Channel expansion and emission into a renderer's scene stream.
//!
//! # Modules
//!
//! - [`traits`] - Renderer collaborators: camera, light, stream, hooks
//! - [`plane`] - One plane block and its property order
//! - [`expand`] - Component and light fan-out ([`IfdWriter`])
//! - [`auto`] - Render-time `auto_aovs` application
//! - [`text`] - IFD text stream
//! - [`scene`] - Static JSON scene used outside a renderer
//! - [`mock`] - Recording collaborators for tests

pub mod auto;
pub mod expand;
pub mod mock;
pub mod plane;
pub mod scene;
pub mod text;
pub mod traits;

pub use auto::{add_aovs_to_ifd, auto_aovs_enabled};
pub use expand::IfdWriter;
pub use plane::{PlaneBlock, PLANE_BLOCK};
pub use scene::{SceneError, SceneLight, StaticScene};
pub use text::IfdTextWriter;
pub use traits::{
    Camera, ErrorReporter, Light, LogReporter, NoHooks, PlaneHookArgs, PlaneHooks, SceneStream,
};

use thiserror::Error;

/// Errors from plane emission.
#[derive(Debug, Error)]
pub enum IfdError {
    /// Per-light channels would all share one name.
    #[error("empty prefix and suffix for per-light export of '{channel}' (light '{light}')")]
    AmbiguousPerLightChannel { channel: String, light: String },

    /// The scene stream rejected a call.
    #[error("scene stream error: {0}")]
    Stream(String),

    #[error("failed to write scene stream: {0}")]
    Io(#[from] std::io::Error),
}
