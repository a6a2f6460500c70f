//! parms::node
//!
//! Host nodes whose parameters receive AOV settings.

use std::collections::BTreeMap;

use crate::core::types::ParmValue;

use super::ParmError;

/// A node with named parameters, such as a render output driver.
pub trait ParmNode {
    fn name(&self) -> &str;

    /// Current value; `None` if the node has no such parameter.
    fn eval(&self, parm: &str) -> Option<ParmValue>;

    /// Set an existing parameter.
    fn set(&mut self, parm: &str, value: ParmValue) -> Result<(), ParmError>;

    /// Add a parameter with a default value if it does not exist.
    fn add_parm(&mut self, parm: &str, default: ParmValue) -> Result<(), ParmError>;
}

/// A node backed by a map.
///
/// An open node accepts any parameter on `set`. A node built from a
/// template only accepts the template's parameters and those added later.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryNode {
    name: String,
    parms: BTreeMap<String, ParmValue>,
    open: bool,
}

impl InMemoryNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parms: BTreeMap::new(),
            open: true,
        }
    }

    pub fn with_template<I, S, V>(name: impl Into<String>, parms: I) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<ParmValue>,
    {
        Self {
            name: name.into(),
            parms: parms
                .into_iter()
                .map(|(parm, value)| (parm.into(), value.into()))
                .collect(),
            open: false,
        }
    }

    pub fn parms(&self) -> &BTreeMap<String, ParmValue> {
        &self.parms
    }
}

impl ParmNode for InMemoryNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn eval(&self, parm: &str) -> Option<ParmValue> {
        self.parms.get(parm).cloned()
    }

    fn set(&mut self, parm: &str, value: ParmValue) -> Result<(), ParmError> {
        match self.parms.get_mut(parm) {
            Some(slot) => *slot = value,
            None if self.open => {
                self.parms.insert(parm.to_string(), value);
            }
            None => {
                return Err(ParmError::NoSuchParm {
                    node: self.name.clone(),
                    parm: parm.to_string(),
                })
            }
        }
        Ok(())
    }

    fn add_parm(&mut self, parm: &str, default: ParmValue) -> Result<(), ParmError> {
        self.parms.entry(parm.to_string()).or_insert(default);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_node_rejects_unknown_parms() {
        let mut node = InMemoryNode::with_template("/out/mantra1", [("vm_numaux", 0_i64)]);
        assert!(node.set("vm_numaux", 2_i64.into()).is_ok());
        assert!(matches!(
            node.set("auto_aovs", "N".into()),
            Err(ParmError::NoSuchParm { .. })
        ));

        node.add_parm("auto_aovs", "".into()).unwrap();
        node.set("auto_aovs", "N".into()).unwrap();
        assert_eq!(node.eval("auto_aovs"), Some(ParmValue::from("N")));
    }

    #[test]
    fn add_parm_keeps_existing_value() {
        let mut node = InMemoryNode::new("/out/mantra1");
        node.set("enable_auto_aovs", 0_i64.into()).unwrap();
        node.add_parm("enable_auto_aovs", 1_i64.into()).unwrap();
        assert_eq!(node.eval("enable_auto_aovs"), Some(ParmValue::Int(0)));
    }
}
