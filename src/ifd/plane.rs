//! ifd::plane
//!
//! One plane definition block and its property order.

use crate::core::aov::Aov;
use crate::core::types::{Quantize, SampleFilter, VexType};

/// Block type of a channel definition in the scene stream.
pub const PLANE_BLOCK: &str = "plane";

/// Attributes of one emitted channel.
///
/// Built from an AOV, then specialized per component and per light.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneBlock {
    pub variable: String,
    pub vextype: VexType,
    pub channel: String,
    pub quantize: Option<Quantize>,
    pub planefile: Option<String>,
    pub lightexport: Option<String>,
    pub pfilter: Option<String>,
    pub sfilter: Option<SampleFilter>,
    pub component: Option<String>,
}

impl PlaneBlock {
    /// The base block for an AOV; the channel defaults to the variable.
    pub fn from_aov(aov: &Aov) -> Self {
        Self {
            variable: aov.variable().to_string(),
            vextype: aov.vextype(),
            channel: aov.channel().to_string(),
            quantize: Some(aov.quantize()),
            planefile: aov.planefile().map(str::to_string),
            lightexport: None,
            pfilter: aov.pfilter().map(str::to_string),
            sfilter: Some(aov.sfilter()),
            component: None,
        }
    }

    /// Properties in stream order: the three identifying properties, then
    /// whichever optional ones are present.
    pub fn properties(&self) -> Vec<(&'static str, &str)> {
        let mut props = vec![
            ("variable", self.variable.as_str()),
            ("vextype", self.vextype.as_str()),
            ("channel", self.channel.as_str()),
        ];

        let optional = [
            ("quantize", self.quantize.map(|q| q.as_str())),
            ("planefile", self.planefile.as_deref()),
            ("lightexport", self.lightexport.as_deref()),
            ("pfilter", self.pfilter.as_deref()),
            ("sfilter", self.sfilter.map(|s| s.as_str())),
            ("component", self.component.as_deref()),
        ];
        props.extend(
            optional
                .into_iter()
                .filter_map(|(name, value)| value.map(|v| (name, v))),
        );

        props
    }
}
