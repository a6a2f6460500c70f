//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All terminal output from the CLI goes through this module so that quiet
//! mode and stream selection are handled in one place.

pub mod output;
