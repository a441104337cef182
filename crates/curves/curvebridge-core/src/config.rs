//! Conversion configuration for curvebridge-core.

use serde::{Deserialize, Serialize};

/// Settings shared by the re-synthesizer and the light importer.
/// Every field has a default matching the behaviour of the original tools.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// The only animation layer the re-synthesizer reads.
    pub base_layer: String,

    /// Channel-name suffix per vector axis (`axis_index` → label).
    pub axis_labels: Vec<String>,

    /// Light import settings.
    pub lights: LightSettings,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightSettings {
    pub icon_scale: f64,
    /// Spare pre/post rotation parameters compensating the Y-up → Z-up axis swap.
    pub pre_rotate: [f64; 3],
    pub post_rotate: [f64; 3],
    /// Directional light intensity is rescaled by this factor.
    pub directional_intensity_scale: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_layer: "Base Layer".to_string(),
            axis_labels: ["X", "Y", "Z", "W"].iter().map(|s| s.to_string()).collect(),
            lights: LightSettings::default(),
        }
    }
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            icon_scale: 20.0,
            pre_rotate: [-90.0, 0.0, 0.0],
            post_rotate: [-90.0, 0.0, 0.0],
            directional_intensity_scale: 0.01,
        }
    }
}

impl Config {
    /// Label for `axis`, or `None` past the configured labels.
    pub fn axis_label(&self, axis: usize) -> Option<&str> {
        self.axis_labels.get(axis).map(String::as_str)
    }
}
