//! Target parameter sink.
//!
//! Host adapters implement [`ParameterSink`] to create parameters and keys in
//! the DCC node graph. The re-synthesizer only writes; it never reads back.
//! [`ParameterTable`] records everything written, for tests and for exporting
//! the converted rig as JSON.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::resynth::TargetKeyframe;

pub trait ParameterSink {
    fn set_static(&mut self, parm: &str, value: f64);
    /// Replace the parameter's keys with `keyframes`, in order.
    fn set_keyframes(&mut self, parm: &str, keyframes: Vec<TargetKeyframe>);
    /// Add a spare vector parameter with a default value.
    fn define_vector(&mut self, parm: &str, label: &str, default: &[f64]);
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keyframes: Vec<TargetKeyframe>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpareVector {
    pub label: String,
    pub default: Vec<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterTable {
    pub parameters: HashMap<String, ParameterEntry>,
    #[serde(default)]
    pub spares: HashMap<String, SpareVector>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, parm: &str) -> Option<&ParameterEntry> {
        self.parameters.get(parm)
    }

    pub fn value(&self, parm: &str) -> Option<f64> {
        self.parameters.get(parm).and_then(|e| e.value)
    }

    pub fn keyframes(&self, parm: &str) -> &[TargetKeyframe] {
        self.parameters
            .get(parm)
            .map(|e| e.keyframes.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_animated(&self, parm: &str) -> bool {
        !self.keyframes(parm).is_empty()
    }

    /// Parameter names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.parameters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl ParameterSink for ParameterTable {
    fn set_static(&mut self, parm: &str, value: f64) {
        self.parameters.entry(parm.to_string()).or_default().value = Some(value);
    }

    fn set_keyframes(&mut self, parm: &str, keyframes: Vec<TargetKeyframe>) {
        self.parameters.entry(parm.to_string()).or_default().keyframes = keyframes;
    }

    fn define_vector(&mut self, parm: &str, label: &str, default: &[f64]) {
        self.spares.insert(
            parm.to_string(),
            SpareVector {
                label: label.to_string(),
                default: default.to_vec(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resynth::{KeyExpression, TangentSpec};

    #[test]
    fn later_writes_replace_earlier_ones() {
        let mut table = ParameterTable::new();
        table.set_static("light_intensity", 1.0);
        table.set_static("light_intensity", 2.0);
        table.set_keyframes(
            "light_intensity",
            vec![TargetKeyframe {
                frame: 0,
                value: 2.0,
                expression: KeyExpression::Linear,
                tangent: TangentSpec::Auto,
            }],
        );
        assert_eq!(table.value("light_intensity"), Some(2.0));
        assert!(table.is_animated("light_intensity"));
        assert!(!table.is_animated("tx"));
        assert_eq!(table.names(), vec!["light_intensity"]);
    }
}
