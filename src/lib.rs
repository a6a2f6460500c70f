//! aovkit - Load, merge, and emit AOV render-pass definitions
//!
//! AOVs (arbitrary output variables) describe the extra image planes a
//! renderer writes alongside beauty. Definitions live in JSON files found
//! on a search path; groups bundle AOVs under a single `@name`.
//!
//! # Architecture
//!
//! - [`core`] - AOV and group types, file discovery, reading, writing, config
//! - [`manager`] - Priority merge of every discovered file into one namespace
//! - [`ifd`] - Expansion of AOVs into `plane` blocks on a scene stream
//! - [`parms`] - Translation between AOVs and node parameter lists
//! - [`cli`] - Command-line interface layer
//! - [`ui`] - Output formatting
//!
//! # Merge Rules
//!
//! 1. Files merge in search-path order; every file's AOVs merge before any group
//! 2. A later definition replaces an earlier one only with a strictly higher priority
//! 3. Group includes naming unknown AOVs are dropped and reported, never fatal

pub mod cli;
pub mod core;
pub mod ifd;
pub mod manager;
pub mod parms;
pub mod ui;
