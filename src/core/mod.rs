//! core
//!
//! Domain types, definition files and configuration for aovkit.
//!
//! # Modules
//!
//! - [`types`] - Restricted vocabularies: VexType, Quantize, SampleFilter, LightExport
//! - [`aov`] - The AOV definition record and its field schema
//! - [`group`] - Named groups of AOVs
//! - [`naming`] - Name and file path validity rules
//! - [`reader`] - Reading one definition file
//! - [`writer`] - Merging records into a definition file
//! - [`paths`] - Discovery of definition files
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Records are validated at construction; invalid values cannot be represented
//! - Identity is a single key: `variable` for AOVs, `name` for groups
//! - File discovery order is deterministic

pub mod aov;
pub mod config;
pub mod group;
pub mod naming;
pub mod paths;
pub mod reader;
pub mod types;
pub mod writer;
