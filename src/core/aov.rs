//! core::aov
//!
//! The AOV definition record.
//!
//! # Construction
//!
//! Records are built from a mapping of raw key/value pairs, usually one entry
//! of a definition file's `definitions` array. Each recognized key is checked
//! against [`FIELDS`], a static schema table naming the field's kind and, for
//! restricted vocabularies, its allowed values. Unrecognized keys and `null`
//! values are ignored.
//!
//! # Identity
//!
//! Equality, hashing and ordering use `variable` alone. Two records with the
//! same variable are the same entity even if other attributes differ.
//!
//! # Example
//!
//! ```
//! use aovkit::core::aov::Aov;
//! use serde_json::json;
//!
//! let data = json!({"variable": "N", "vextype": "vector", "quantize": "float"});
//! let aov = Aov::from_data(data.as_object().unwrap()).unwrap();
//!
//! assert_eq!(aov.variable(), "N");
//! assert_eq!(aov.channel(), "N");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::types::{AovError, LightExport, Quantize, SampleFilter, VexType};

/// Kind of value a definition field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-form string
    Text,
    /// String restricted to the given values
    Choice(&'static [&'static str]),
    /// Boolean (integers 0/1 accepted)
    Flag,
    /// Integer
    Integer,
    /// List of strings (a whitespace separated string is accepted)
    TextList,
}

/// One entry of the definition schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Key in the raw mapping
    pub name: &'static str,
    /// Value kind and vocabulary
    pub kind: FieldKind,
}

/// Schema of every field an AOV definition recognizes.
pub const FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "variable", kind: FieldKind::Text },
    FieldSpec { name: "vextype", kind: FieldKind::Choice(VexType::ALLOWED) },
    FieldSpec { name: "channel", kind: FieldKind::Text },
    FieldSpec { name: "quantize", kind: FieldKind::Choice(Quantize::ALLOWED) },
    FieldSpec { name: "sfilter", kind: FieldKind::Choice(SampleFilter::ALLOWED) },
    FieldSpec { name: "pfilter", kind: FieldKind::Text },
    FieldSpec { name: "planefile", kind: FieldKind::Text },
    FieldSpec { name: "componentexport", kind: FieldKind::Flag },
    FieldSpec { name: "components", kind: FieldKind::TextList },
    FieldSpec { name: "lightexport", kind: FieldKind::Choice(LightExport::ALLOWED) },
    FieldSpec { name: "lightexport_scope", kind: FieldKind::Text },
    FieldSpec { name: "lightexport_select", kind: FieldKind::Text },
    FieldSpec { name: "comment", kind: FieldKind::Text },
    FieldSpec { name: "priority", kind: FieldKind::Integer },
    FieldSpec { name: "path", kind: FieldKind::Text },
];

/// Look up a field in [`FIELDS`].
pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.name == name)
}

/// Priority of a record that did not declare one.
pub const NO_PRIORITY: i32 = -1;

/// A validated field value produced by [`FieldSpec::check`].
#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    Text(String),
    Flag(bool),
    Integer(i32),
    TextList(Vec<String>),
}

impl FieldSpec {
    /// Validate a raw value against this field's kind.
    fn check(&self, value: &Value) -> Result<FieldValue, AovError> {
        match self.kind {
            FieldKind::Text => value
                .as_str()
                .map(|s| FieldValue::Text(s.to_string()))
                .ok_or_else(|| AovError::invalid_type(self.name, "a string")),
            FieldKind::Choice(allowed) => {
                let text = value
                    .as_str()
                    .ok_or_else(|| AovError::invalid_type(self.name, "a string"))?;
                if allowed.contains(&text) {
                    Ok(FieldValue::Text(text.to_string()))
                } else {
                    Err(AovError::invalid_value(self.name, text, allowed))
                }
            }
            FieldKind::Flag => match value {
                Value::Bool(b) => Ok(FieldValue::Flag(*b)),
                Value::Number(n) if n.as_i64().is_some() => {
                    Ok(FieldValue::Flag(n.as_i64() != Some(0)))
                }
                _ => Err(AovError::invalid_type(self.name, "a boolean")),
            },
            FieldKind::Integer => value
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .map(FieldValue::Integer)
                .ok_or_else(|| AovError::invalid_type(self.name, "an integer")),
            FieldKind::TextList => match value {
                Value::String(s) => Ok(FieldValue::TextList(
                    s.split_whitespace().map(str::to_string).collect(),
                )),
                Value::Array(items) => items
                    .iter()
                    .map(|item| {
                        item.as_str()
                            .map(str::to_string)
                            .ok_or_else(|| AovError::invalid_type(self.name, "a list of strings"))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(FieldValue::TextList),
                _ => Err(AovError::invalid_type(self.name, "a list of strings")),
            },
        }
    }
}

/// An arbitrary output variable: one render output channel definition.
#[derive(Debug, Clone)]
pub struct Aov {
    variable: String,
    vextype: VexType,
    channel: Option<String>,
    quantize: Quantize,
    sfilter: SampleFilter,
    pfilter: Option<String>,
    planefile: Option<String>,
    componentexport: bool,
    components: Vec<String>,
    lightexport: Option<LightExport>,
    lightexport_scope: String,
    lightexport_select: String,
    comment: String,
    priority: i32,
    path: Option<PathBuf>,
}

impl Aov {
    /// Start building a record with the two required fields.
    pub fn builder(variable: impl Into<String>, vextype: VexType) -> AovBuilder {
        AovBuilder {
            aov: Aov {
                variable: variable.into(),
                vextype,
                channel: None,
                quantize: Quantize::default(),
                sfilter: SampleFilter::default(),
                pfilter: None,
                planefile: None,
                componentexport: false,
                components: Vec::new(),
                lightexport: None,
                lightexport_scope: "*".to_string(),
                lightexport_select: "*".to_string(),
                comment: String::new(),
                priority: NO_PRIORITY,
                path: None,
            },
        }
    }

    /// Build a record from a raw key/value mapping.
    ///
    /// # Errors
    ///
    /// - `AovError::InvalidValue` if a restricted field holds an unknown value
    /// - `AovError::InvalidType` if a field holds the wrong JSON type
    /// - `AovError::MissingVariable` / `AovError::MissingVexType` if a
    ///   required field is absent
    pub fn from_data(data: &Map<String, Value>) -> Result<Self, AovError> {
        let mut checked = Vec::with_capacity(data.len());

        for (name, value) in data {
            if value.is_null() {
                continue;
            }
            let Some(spec) = field_spec(name) else {
                tracing::debug!(field = %name, "ignoring unrecognized aov field");
                continue;
            };
            checked.push((spec.name, spec.check(value)?));
        }

        let text = |name: &str| {
            checked.iter().find_map(|(n, v)| match v {
                FieldValue::Text(s) if *n == name => Some(s.clone()),
                _ => None,
            })
        };

        let variable = text("variable").ok_or(AovError::MissingVariable)?;
        let vextype = text("vextype")
            .ok_or_else(|| AovError::MissingVexType {
                variable: variable.clone(),
            })
            .and_then(|v| VexType::parse(&v))?;

        let mut builder = Aov::builder(variable, vextype);

        for (name, value) in checked {
            builder = match (name, value) {
                ("channel", FieldValue::Text(v)) => builder.channel(v),
                ("quantize", FieldValue::Text(v)) => builder.quantize(Quantize::parse(&v)?),
                ("sfilter", FieldValue::Text(v)) => builder.sfilter(SampleFilter::parse(&v)?),
                ("pfilter", FieldValue::Text(v)) => builder.pfilter(v),
                ("planefile", FieldValue::Text(v)) => builder.planefile(v),
                ("componentexport", FieldValue::Flag(v)) => builder.componentexport(v),
                ("components", FieldValue::TextList(v)) => builder.components(v),
                ("lightexport", FieldValue::Text(v)) => {
                    builder.lightexport(LightExport::parse(&v)?)
                }
                ("lightexport_scope", FieldValue::Text(v)) => builder.lightexport_scope(v),
                ("lightexport_select", FieldValue::Text(v)) => builder.lightexport_select(v),
                ("comment", FieldValue::Text(v)) => builder.comment(v),
                ("priority", FieldValue::Integer(v)) => builder.priority(v),
                ("path", FieldValue::Text(v)) => builder.path(v),
                _ => builder,
            };
        }

        Ok(builder.build())
    }

    /// The render variable name; the record's identity.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Channel data type.
    pub fn vextype(&self) -> VexType {
        self.vextype
    }

    /// Output channel name, falling back to the variable.
    pub fn channel(&self) -> &str {
        self.channel.as_deref().unwrap_or(&self.variable)
    }

    /// Output channel name only if one was set explicitly.
    pub fn explicit_channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    pub fn quantize(&self) -> Quantize {
        self.quantize
    }

    pub fn sfilter(&self) -> SampleFilter {
        self.sfilter
    }

    /// Pixel filter; `None` inherits from the main image plane.
    pub fn pfilter(&self) -> Option<&str> {
        self.pfilter.as_deref()
    }

    /// Separate output file for this channel, if any.
    pub fn planefile(&self) -> Option<&str> {
        self.planefile.as_deref()
    }

    pub fn componentexport(&self) -> bool {
        self.componentexport
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn lightexport(&self) -> Option<LightExport> {
        self.lightexport
    }

    /// Light name mask used for light exports.
    pub fn lightexport_scope(&self) -> &str {
        &self.lightexport_scope
    }

    /// Light category selection used for light exports.
    pub fn lightexport_select(&self) -> &str {
        &self.lightexport_select
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Conflict-resolution priority; [`NO_PRIORITY`] when undeclared.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// File the record was read from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_channel(&mut self, channel: Option<String>) {
        self.channel = channel;
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    /// Serialize back to the definition-file mapping.
    ///
    /// Optional fields are written only when set; `priority` only when declared.
    pub fn to_data(&self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("variable".into(), self.variable.clone().into());
        data.insert("vextype".into(), self.vextype.as_str().into());

        if let Some(channel) = &self.channel {
            data.insert("channel".into(), channel.clone().into());
        }
        data.insert("quantize".into(), self.quantize.as_str().into());
        data.insert("sfilter".into(), self.sfilter.as_str().into());
        if let Some(pfilter) = &self.pfilter {
            data.insert("pfilter".into(), pfilter.clone().into());
        }
        if let Some(planefile) = &self.planefile {
            data.insert("planefile".into(), planefile.clone().into());
        }
        if self.componentexport {
            data.insert("componentexport".into(), true.into());
            if !self.components.is_empty() {
                data.insert("components".into(), self.components.clone().into());
            }
        }
        if let Some(lightexport) = self.lightexport {
            data.insert("lightexport".into(), lightexport.as_str().into());
            data.insert("lightexport_scope".into(), self.lightexport_scope.clone().into());
            data.insert("lightexport_select".into(), self.lightexport_select.clone().into());
        }
        if !self.comment.is_empty() {
            data.insert("comment".into(), self.comment.clone().into());
        }
        if self.priority > NO_PRIORITY {
            data.insert("priority".into(), self.priority.into());
        }

        data
    }
}

impl PartialEq for Aov {
    fn eq(&self, other: &Self) -> bool {
        self.variable == other.variable
    }
}

impl Eq for Aov {}

impl Hash for Aov {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.variable.hash(state);
    }
}

impl PartialOrd for Aov {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Aov {
    fn cmp(&self, other: &Self) -> Ordering {
        self.variable.cmp(&other.variable)
    }
}

impl fmt::Display for Aov {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.variable)
    }
}

/// Typed builder for [`Aov`].
#[derive(Debug, Clone)]
pub struct AovBuilder {
    aov: Aov,
}

impl AovBuilder {
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.aov.channel = Some(channel.into());
        self
    }

    pub fn quantize(mut self, quantize: Quantize) -> Self {
        self.aov.quantize = quantize;
        self
    }

    pub fn sfilter(mut self, sfilter: SampleFilter) -> Self {
        self.aov.sfilter = sfilter;
        self
    }

    pub fn pfilter(mut self, pfilter: impl Into<String>) -> Self {
        self.aov.pfilter = Some(pfilter.into());
        self
    }

    pub fn planefile(mut self, planefile: impl Into<String>) -> Self {
        self.aov.planefile = Some(planefile.into());
        self
    }

    pub fn componentexport(mut self, enabled: bool) -> Self {
        self.aov.componentexport = enabled;
        self
    }

    pub fn components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aov.components = components.into_iter().map(Into::into).collect();
        self
    }

    pub fn lightexport(mut self, lightexport: LightExport) -> Self {
        self.aov.lightexport = Some(lightexport);
        self
    }

    pub fn lightexport_scope(mut self, scope: impl Into<String>) -> Self {
        self.aov.lightexport_scope = scope.into();
        self
    }

    pub fn lightexport_select(mut self, select: impl Into<String>) -> Self {
        self.aov.lightexport_select = select.into();
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.aov.comment = comment.into();
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.aov.priority = priority;
        self
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.aov.path = Some(path.into());
        self
    }

    pub fn build(self) -> Aov {
        self.aov
    }
}
