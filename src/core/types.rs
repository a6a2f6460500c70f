//! core::types
//!
//! Restricted-vocabulary types for AOV attributes.
//!
//! # Types
//!
//! - [`VexType`] - Data type of an output channel
//! - [`Quantize`] - Storage quantization of a channel
//! - [`SampleFilter`] - Sample filter applied to a channel
//! - [`LightExport`] - Per-light export policy
//! - [`ParmValue`] - A parameter value read from a host object
//!
//! # Validation
//!
//! Every type is parsed from its textual form at construction time. A value
//! outside the allowed set fails with [`AovError::InvalidValue`], which
//! carries the field name, the offending value and the allowed set.
//!
//! # Examples
//!
//! ```
//! use aovkit::core::types::{Quantize, VexType};
//!
//! assert_eq!(VexType::parse("vector4").unwrap(), VexType::Vector4);
//! assert_eq!(Quantize::default().as_str(), "half");
//! assert!(Quantize::parse("bogus").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from AOV construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AovError {
    /// The `variable` field is absent.
    #[error("cannot create aov: missing 'variable'")]
    MissingVariable,

    /// The `vextype` field is absent.
    #[error("cannot create aov {variable}: missing 'vextype'")]
    MissingVexType {
        /// Variable of the record that failed
        variable: String,
    },

    /// A restricted-vocabulary field holds a value outside its allowed set.
    #[error("invalid value '{value}' in '{name}': must be one of {}", allowable.join(", "))]
    InvalidValue {
        /// Field name
        name: String,
        /// Offending value
        value: String,
        /// Allowed values for the field
        allowable: &'static [&'static str],
    },

    /// A field holds a value of the wrong JSON type.
    #[error("invalid type for '{name}': expected {expected}")]
    InvalidType {
        /// Field name
        name: String,
        /// Human-readable description of the expected type
        expected: &'static str,
    },
}

impl AovError {
    pub(crate) fn invalid_value(
        name: &str,
        value: impl Into<String>,
        allowable: &'static [&'static str],
    ) -> Self {
        AovError::InvalidValue {
            name: name.to_string(),
            value: value.into(),
            allowable,
        }
    }

    pub(crate) fn invalid_type(name: &str, expected: &'static str) -> Self {
        AovError::InvalidType {
            name: name.to_string(),
            expected,
        }
    }
}

/// Declares a closed vocabulary enum with its textual forms.
///
/// Variant order defines the order of `ALLOWED`.
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Field name used in definition files.
            pub const FIELD: &'static str = $field;

            /// All accepted textual values, in declaration order.
            pub const ALLOWED: &'static [&'static str] = &[$($text),+];

            /// Parse from the textual form.
            ///
            /// # Errors
            ///
            /// Returns `AovError::InvalidValue` for values outside `ALLOWED`.
            pub fn parse(value: &str) -> Result<Self, AovError> {
                match value {
                    $( $text => Ok($name::$variant), )+
                    other => Err(AovError::invalid_value(Self::FIELD, other, Self::ALLOWED)),
                }
            }

            /// The textual form written to files and renderer streams.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = AovError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

vocabulary! {
    /// Data type of an output channel.
    VexType, field = "vextype" {
        /// Single float
        Float => "float",
        /// Three component vector
        Vector => "vector",
        /// Four component vector
        Vector4 => "vector4",
        /// Normalized vector
        UnitVector => "unitvector",
    }
}

vocabulary! {
    /// Storage quantization of a channel.
    Quantize, field = "quantize" {
        /// 8 bit integer
        Eight => "8",
        /// 16 bit integer
        Sixteen => "16",
        /// 16 bit float
        Half => "half",
        /// 32 bit float
        Float => "float",
    }
}

vocabulary! {
    /// Sample filter applied when compositing samples into a pixel.
    SampleFilter, field = "sfilter" {
        /// Opacity filtering
        Alpha => "alpha",
        /// Full opacity filtering
        FullOpacity => "fullopacity",
        /// Closest surface
        Closest => "closest",
    }
}

vocabulary! {
    /// Policy for fanning a channel out over scene lights.
    LightExport, field = "lightexport" {
        /// One channel per light category
        PerCategory => "per-category",
        /// One channel per light
        PerLight => "per-light",
        /// All matching lights merged into one channel
        Single => "single",
    }
}

impl Default for Quantize {
    fn default() -> Self {
        Quantize::Half
    }
}

impl Default for SampleFilter {
    fn default() -> Self {
        SampleFilter::Alpha
    }
}

impl LightExport {
    /// Menu entries for a light export selector; index 0 means "no light exports".
    pub const MENU: &'static [&'static str] = &["", "per-category", "per-light", "single"];

    /// Index of this policy in [`LightExport::MENU`].
    pub fn menu_index(&self) -> usize {
        match self {
            LightExport::PerCategory => 1,
            LightExport::PerLight => 2,
            LightExport::Single => 3,
        }
    }

    /// Inverse of [`LightExport::menu_index`]; index 0 and out-of-range yield `None`.
    pub fn from_menu_index(index: usize) -> Option<Self> {
        Self::MENU
            .get(index)
            .filter(|s| !s.is_empty())
            .and_then(|s| Self::parse(s).ok())
    }
}

/// A parameter value evaluated from a host object (camera, light or node).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParmValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParmValue {
    /// Integer view; floats truncate and numeric strings parse.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParmValue::Int(i) => Some(*i),
            ParmValue::Float(f) => Some(*f as i64),
            ParmValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// String view, as a host would format the value.
    pub fn as_text(&self) -> String {
        match self {
            ParmValue::Int(i) => i.to_string(),
            ParmValue::Float(f) => f.to_string(),
            ParmValue::Text(s) => s.clone(),
        }
    }
}

impl From<i64> for ParmValue {
    fn from(value: i64) -> Self {
        ParmValue::Int(value)
    }
}

impl From<bool> for ParmValue {
    fn from(value: bool) -> Self {
        ParmValue::Int(i64::from(value))
    }
}

impl From<&str> for ParmValue {
    fn from(value: &str) -> Self {
        ParmValue::Text(value.to_string())
    }
}

impl From<String> for ParmValue {
    fn from(value: String) -> Self {
        ParmValue::Text(value)
    }
}
