//! Read-only view of the source scene graph consumed by the extractor.
//!
//! Native SDK bindings implement these traits; [`crate::memory`] provides an
//! in-memory implementation. The extractor never writes through them.

use crate::curve::{AnimCurve, KeyframeSample};
use crate::value::PropertyValue;

/// Keys of one curve, addressed by index.
pub trait CurveSource {
    fn key_count(&self) -> usize;
    /// Fully populated key at `index`; `None` when the key cannot be read.
    fn key(&self, index: usize) -> Option<KeyframeSample>;
}

/// The per-layer curve node bound to a property: one or more channels, each
/// holding one or more independent curves.
pub trait CurveNodeSource {
    fn name(&self) -> &str;
    fn channel_count(&self) -> usize;
    fn channel_name(&self, channel: usize) -> Option<&str>;
    fn curve_count(&self, channel: usize) -> usize;
    fn curve(&self, channel: usize, index: usize) -> Option<&dyn CurveSource>;
}

pub trait PropertySource {
    fn name(&self) -> &str;
    /// Static value; `None` for data types without a persisted shape.
    fn value(&self) -> Option<PropertyValue>;
    /// Curve node bound on `layer`, if the property is animated there.
    fn curve_node(&self, layer: &str) -> Option<&dyn CurveNodeSource>;
}

pub trait NodeSource {
    fn name(&self) -> &str;
    fn unique_id(&self) -> i64;
    fn type_name(&self) -> &str;
    fn properties(&self) -> Vec<&dyn PropertySource>;
    /// Properties of the node attribute (light, camera, mesh...); `None` when
    /// the node has no attribute.
    fn attribute_properties(&self) -> Option<Vec<&dyn PropertySource>>;
    fn children(&self) -> Vec<&dyn NodeSource>;
}

pub trait SceneSource {
    /// Names of every animation layer across all animation stacks, in stack order.
    fn animation_layers(&self) -> Vec<String>;
    fn global_settings(&self) -> Vec<&dyn PropertySource>;
    fn root(&self) -> Option<&dyn NodeSource>;
}

impl CurveSource for AnimCurve {
    fn key_count(&self) -> usize {
        self.len()
    }

    fn key(&self, index: usize) -> Option<KeyframeSample> {
        self.get(index).cloned()
    }
}
