//! parms
//!
//! Applying AOVs to a render node's parameters and reading them back.
//!
//! # Modes
//!
//! - String mode: the node's `auto_aovs` parameter holds a compact string
//!   that is resolved at render time ([`apply_elements_as_string`]).
//! - Multiparm mode: one numbered row of `vm_*` parameters per AOV
//!   ([`apply_to_node_as_parms`], read back by [`build_aovs_from_multiparm`]).
//!
//! # Row Parameters
//!
//! | Field | Parameter |
//! |-------|-----------|
//! | row count | `vm_numaux` |
//! | variable | `vm_variable_plane{i}` |
//! | vextype | `vm_vextype_plane{i}` |
//! | channel | `vm_channel_plane{i}` |
//! | planefile | `vm_usefile_plane{i}`, `vm_filename_plane{i}` |
//! | quantize | `vm_quantize_plane{i}` |
//! | sfilter | `vm_sfilter_plane{i}` |
//! | pfilter | `vm_pfilter_plane{i}` |
//! | componentexport | `vm_componentexport{i}` |
//! | lightexport | `vm_lightexport{i}` (menu index) |
//! | lightexport_scope | `vm_lightexport_scope{i}` |
//! | lightexport_select | `vm_lightexport_select{i}` |
//!
//! Rows are numbered from 1.

pub mod node;

pub use node::{InMemoryNode, ParmNode};

pub use crate::manager::{flatten_list, list_as_string};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::aov::Aov;
use crate::core::types::{AovError, LightExport, ParmValue};
use crate::ifd::auto::{AUTO_AOVS_PARM, ENABLE_AUTO_AOVS_PARM};
use crate::manager::AovElement;

/// Parameter holding the multiparm row count.
pub const NUM_AUX_PARM: &str = "vm_numaux";

/// Errors from node parameter operations.
#[derive(Debug, Error)]
pub enum ParmError {
    #[error("node '{node}' has no parameter '{parm}'")]
    NoSuchParm { node: String, parm: String },

    #[error("invalid aov in row {row}: {source}")]
    Definition { row: usize, source: AovError },
}

fn row_parm(prefix: &str, row: usize) -> String {
    format!("{}{}", prefix, row)
}

fn eval_text(node: &dyn ParmNode, parm: &str) -> Option<String> {
    node.eval(parm)
        .map(|value| value.as_text())
        .filter(|text| !text.is_empty())
}

fn row_count(node: &dyn ParmNode) -> usize {
    node.eval(NUM_AUX_PARM)
        .and_then(|value| value.as_int())
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0)
}

/// Write the unique AOVs of `elements` as multiparm rows.
///
/// Groups are flattened and unioned with standalone AOVs. Returns the number
/// of rows written.
pub fn apply_to_node_as_parms(
    node: &mut dyn ParmNode,
    elements: &[AovElement<'_>],
) -> Result<usize, ParmError> {
    let aovs = flatten_list(elements);
    node.set(NUM_AUX_PARM, ParmValue::Int(aovs.len() as i64))?;

    for (row, aov) in (1..).zip(&aovs) {
        node.set(&row_parm("vm_variable_plane", row), aov.variable().into())?;
        node.set(&row_parm("vm_vextype_plane", row), aov.vextype().as_str().into())?;

        // Every row parameter is written so a reused row keeps nothing of
        // its previous AOV.
        node.set(&row_parm("vm_channel_plane", row), aov.channel().into())?;
        node.set(
            &row_parm("vm_usefile_plane", row),
            aov.planefile().is_some().into(),
        )?;
        node.set(
            &row_parm("vm_filename_plane", row),
            aov.planefile().unwrap_or_default().into(),
        )?;
        node.set(&row_parm("vm_quantize_plane", row), aov.quantize().as_str().into())?;
        node.set(&row_parm("vm_sfilter_plane", row), aov.sfilter().as_str().into())?;
        node.set(
            &row_parm("vm_pfilter_plane", row),
            aov.pfilter().unwrap_or_default().into(),
        )?;
        node.set(
            &row_parm("vm_componentexport", row),
            aov.componentexport().into(),
        )?;
        let menu_index = aov.lightexport().map_or(0, |policy| policy.menu_index());
        node.set(
            &row_parm("vm_lightexport", row),
            ParmValue::Int(menu_index as i64),
        )?;
        node.set(
            &row_parm("vm_lightexport_scope", row),
            aov.lightexport_scope().into(),
        )?;
        node.set(
            &row_parm("vm_lightexport_select", row),
            aov.lightexport_select().into(),
        )?;
    }

    tracing::debug!(node = node.name(), rows = aovs.len(), "applied aovs as parms");
    Ok(aovs.len())
}

/// Rebuild AOVs from a node's multiparm rows.
///
/// # Errors
///
/// Returns `ParmError::Definition` for the first row that does not form a
/// valid AOV.
pub fn build_aovs_from_multiparm(node: &dyn ParmNode) -> Result<Vec<Aov>, ParmError> {
    (1..=row_count(node))
        .map(|row| {
            let data = row_data(node, row);
            Aov::from_data(&data).map_err(|source| ParmError::Definition { row, source })
        })
        .collect()
}

fn row_data(node: &dyn ParmNode, row: usize) -> Map<String, Value> {
    let text = |prefix: &str| eval_text(node, &row_parm(prefix, row));
    let flag = |prefix: &str| {
        node.eval(&row_parm(prefix, row))
            .and_then(|value| value.as_int())
            .is_some_and(|n| n != 0)
    };

    let variable = text("vm_variable_plane");
    let mut data = Map::new();
    let mut put = |key: &str, value: Option<String>| {
        if let Some(value) = value {
            data.insert(key.to_string(), Value::String(value));
        }
    };

    put("variable", variable.clone());
    put("vextype", text("vm_vextype_plane"));
    put(
        "channel",
        text("vm_channel_plane").filter(|channel| Some(channel) != variable.as_ref()),
    );
    put("quantize", text("vm_quantize_plane"));
    put("sfilter", text("vm_sfilter_plane"));
    put("pfilter", text("vm_pfilter_plane"));
    if flag("vm_usefile_plane") {
        put("planefile", text("vm_filename_plane"));
    }

    let lightexport = node
        .eval(&row_parm("vm_lightexport", row))
        .and_then(|value| value.as_int())
        .and_then(|index| usize::try_from(index).ok())
        .and_then(LightExport::from_menu_index);
    if let Some(lightexport) = lightexport {
        put("lightexport", Some(lightexport.as_str().to_string()));
        put("lightexport_scope", text("vm_lightexport_scope"));
        put("lightexport_select", text("vm_lightexport_select"));
    }

    data.insert("componentexport".into(), Value::Bool(flag("vm_componentexport")));
    data
}

/// Variables of a node's multiparm rows, including rows that would not
/// form a valid AOV.
pub fn aov_names_from_multiparm(node: &dyn ParmNode) -> Vec<String> {
    (1..=row_count(node))
        .filter_map(|row| eval_text(node, &row_parm("vm_variable_plane", row)))
        .collect()
}

/// Store `elements` in the node's `auto_aovs` parameter, adding the
/// parameter and its enable toggle if the node lacks them.
pub fn apply_elements_as_string(
    elements: &[AovElement<'_>],
    node: &mut dyn ParmNode,
) -> Result<(), ParmError> {
    if node.eval(AUTO_AOVS_PARM).is_none() {
        node.add_parm(ENABLE_AUTO_AOVS_PARM, ParmValue::Int(1))?;
        node.add_parm(AUTO_AOVS_PARM, ParmValue::from(""))?;
    }

    let value = list_as_string(elements);
    tracing::debug!(node = node.name(), auto_aovs = %value, "applied aovs as string");
    node.set(AUTO_AOVS_PARM, value.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::group::AovGroup;
    use crate::core::types::{Quantize, VexType};
    use std::sync::Arc;

    fn sample() -> (Arc<Aov>, Arc<Aov>, AovGroup) {
        let n = Arc::new(
            Aov::builder("N", VexType::Vector)
                .quantize(Quantize::Float)
                .planefile("$HIP/n.exr")
                .build(),
        );
        let direct = Arc::new(
            Aov::builder("direct", VexType::Vector)
                .channel("Cd")
                .componentexport(true)
                .lightexport(LightExport::PerLight)
                .lightexport_scope("key*")
                .build(),
        );
        let mut group = AovGroup::new("lighting");
        group.extend([Arc::clone(&direct), Arc::clone(&n)]);
        (n, direct, group)
    }

    #[test]
    fn multiparm_rows_dedup_and_round_trip() {
        let (n, _, group) = sample();
        let elements = [AovElement::Aov(&n), AovElement::Group(&group)];

        let mut node = InMemoryNode::new("/out/mantra1");
        assert_eq!(apply_to_node_as_parms(&mut node, &elements).unwrap(), 2);

        assert_eq!(node.eval("vm_numaux"), Some(ParmValue::Int(2)));
        assert_eq!(node.eval("vm_variable_plane1"), Some(ParmValue::from("N")));
        assert_eq!(node.eval("vm_lightexport2"), Some(ParmValue::Int(2)));
        assert_eq!(node.eval("vm_channel_plane1"), Some(ParmValue::from("N")));

        let rebuilt = build_aovs_from_multiparm(&node).unwrap();
        assert_eq!(rebuilt.len(), 2);
        assert_eq!(rebuilt[0].planefile(), Some("$HIP/n.exr"));
        assert_eq!(rebuilt[0].explicit_channel(), None);
        assert_eq!(rebuilt[0].quantize(), Quantize::Float);
        assert_eq!(rebuilt[1].explicit_channel(), Some("Cd"));
        assert!(rebuilt[1].componentexport());
        assert_eq!(rebuilt[1].lightexport(), Some(LightExport::PerLight));
        assert_eq!(rebuilt[1].lightexport_scope(), "key*");

        assert_eq!(aov_names_from_multiparm(&node), ["N", "direct"]);
    }

    #[test]
    fn reapplied_rows_keep_nothing_of_previous_aov() {
        let a = Aov::builder("A", VexType::Vector)
            .channel("chanA")
            .planefile("$HIP/a.exr")
            .pfilter("minmax max")
            .componentexport(true)
            .lightexport(LightExport::PerLight)
            .lightexport_scope("key*")
            .build();
        let b = Aov::builder("B", VexType::Float).build();

        let mut node = InMemoryNode::new("/out/mantra1");
        apply_to_node_as_parms(&mut node, &[AovElement::Aov(&a)]).unwrap();
        apply_to_node_as_parms(&mut node, &[AovElement::Aov(&b)]).unwrap();

        let rebuilt = build_aovs_from_multiparm(&node).unwrap();
        assert_eq!(rebuilt.len(), 1);
        let b = &rebuilt[0];
        assert_eq!(b.variable(), "B");
        assert_eq!(b.vextype(), VexType::Float);
        assert_eq!(b.explicit_channel(), None);
        assert_eq!(b.planefile(), None);
        assert_eq!(b.pfilter(), None);
        assert!(!b.componentexport());
        assert_eq!(b.lightexport(), None);
        assert_eq!(b.lightexport_scope(), "*");
    }

    #[test]
    fn invalid_row_reports_row_number() {
        let mut node = InMemoryNode::new("/out/mantra1");
        node.set("vm_numaux", 1_i64.into()).unwrap();
        node.set("vm_variable_plane1", "N".into()).unwrap();
        node.set("vm_vextype_plane1", "matrix3".into()).unwrap();

        assert!(matches!(
            build_aovs_from_multiparm(&node),
            Err(ParmError::Definition { row: 1, .. })
        ));
        assert_eq!(aov_names_from_multiparm(&node), ["N"]);
    }

    #[test]
    fn string_mode_creates_parms() {
        let (n, _, group) = sample();
        let elements = [AovElement::Group(&group), AovElement::Aov(&n)];

        let mut node = InMemoryNode::with_template("/out/mantra1", [("vm_numaux", 0_i64)]);
        apply_elements_as_string(&elements, &mut node).unwrap();

        assert_eq!(node.eval("auto_aovs"), Some(ParmValue::from("@lighting N")));
        assert_eq!(node.eval("enable_auto_aovs"), Some(ParmValue::Int(1)));
    }

    #[test]
    fn empty_node_has_no_rows() {
        let node = InMemoryNode::new("/out/mantra1");
        assert!(build_aovs_from_multiparm(&node).unwrap().is_empty());
    }
}
