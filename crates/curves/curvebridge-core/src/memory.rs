//! In-memory source scene implementing the [`crate::source`] traits.

use std::collections::BTreeMap;

use crate::curve::AnimCurve;
use crate::source::{CurveNodeSource, CurveSource, NodeSource, PropertySource, SceneSource};
use crate::value::PropertyValue;

#[derive(Clone, Debug, Default)]
pub struct MemoryChannel {
    pub name: String,
    /// `None` entries model curve slots the source reports but cannot resolve.
    pub curves: Vec<Option<AnimCurve>>,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryCurveNode {
    pub name: String,
    pub channels: Vec<MemoryChannel>,
}

impl MemoryCurveNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channels: Vec::new(),
        }
    }

    /// Append a channel holding a single curve.
    pub fn with_channel(mut self, name: impl Into<String>, curve: AnimCurve) -> Self {
        self.channels.push(MemoryChannel {
            name: name.into(),
            curves: vec![Some(curve)],
        });
        self
    }

    pub fn with_curves(mut self, name: impl Into<String>, curves: Vec<Option<AnimCurve>>) -> Self {
        self.channels.push(MemoryChannel {
            name: name.into(),
            curves,
        });
        self
    }
}

impl CurveNodeSource for MemoryCurveNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn channel_count(&self) -> usize {
        self.channels.len()
    }

    fn channel_name(&self, channel: usize) -> Option<&str> {
        self.channels.get(channel).map(|c| c.name.as_str())
    }

    fn curve_count(&self, channel: usize) -> usize {
        self.channels.get(channel).map_or(0, |c| c.curves.len())
    }

    fn curve(&self, channel: usize, index: usize) -> Option<&dyn CurveSource> {
        self.channels
            .get(channel)?
            .curves
            .get(index)?
            .as_ref()
            .map(|c| c as &dyn CurveSource)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryProperty {
    pub name: String,
    pub value: Option<PropertyValue>,
    /// Curve node per layer name.
    pub curve_nodes: BTreeMap<String, MemoryCurveNode>,
}

impl MemoryProperty {
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
            curve_nodes: BTreeMap::new(),
        }
    }

    /// A property whose data type has no persisted shape.
    pub fn unsupported(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            curve_nodes: BTreeMap::new(),
        }
    }

    pub fn animated_on(mut self, layer: impl Into<String>, node: MemoryCurveNode) -> Self {
        self.curve_nodes.insert(layer.into(), node);
        self
    }
}

impl PropertySource for MemoryProperty {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Option<PropertyValue> {
        self.value.clone()
    }

    fn curve_node(&self, layer: &str) -> Option<&dyn CurveNodeSource> {
        self.curve_nodes
            .get(layer)
            .map(|n| n as &dyn CurveNodeSource)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryNode {
    pub name: String,
    pub id: i64,
    pub type_name: String,
    pub properties: Vec<MemoryProperty>,
    pub attribute: Option<Vec<MemoryProperty>>,
    pub children: Vec<MemoryNode>,
}

impl MemoryNode {
    pub fn new(name: impl Into<String>, id: i64, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id,
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn with_property(mut self, property: MemoryProperty) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_attribute(mut self, properties: Vec<MemoryProperty>) -> Self {
        self.attribute = Some(properties);
        self
    }

    pub fn with_child(mut self, child: MemoryNode) -> Self {
        self.children.push(child);
        self
    }
}

impl NodeSource for MemoryNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn unique_id(&self) -> i64 {
        self.id
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn properties(&self) -> Vec<&dyn PropertySource> {
        self.properties
            .iter()
            .map(|p| p as &dyn PropertySource)
            .collect()
    }

    fn attribute_properties(&self) -> Option<Vec<&dyn PropertySource>> {
        self.attribute
            .as_ref()
            .map(|props| props.iter().map(|p| p as &dyn PropertySource).collect())
    }

    fn children(&self) -> Vec<&dyn NodeSource> {
        self.children.iter().map(|c| c as &dyn NodeSource).collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryScene {
    pub layers: Vec<String>,
    pub global_settings: Vec<MemoryProperty>,
    pub root: Option<MemoryNode>,
}

impl SceneSource for MemoryScene {
    fn animation_layers(&self) -> Vec<String> {
        self.layers.clone()
    }

    fn global_settings(&self) -> Vec<&dyn PropertySource> {
        self.global_settings
            .iter()
            .map(|p| p as &dyn PropertySource)
            .collect()
    }

    fn root(&self) -> Option<&dyn NodeSource> {
        self.root.as_ref().map(|n| n as &dyn NodeSource)
    }
}
