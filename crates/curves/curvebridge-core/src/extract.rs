//! Curve extraction: source scene → intermediate document.
//!
//! Values are stored exactly as read. No scaling or axis remap happens here,
//! and NaN reads are kept (they persist as `null`).

use indexmap::IndexMap;
use log::debug;

use crate::curve::{AnimCurve, AnimLayer, AnimatedProperty, PropertyEnvelope};
use crate::document::{NodeRecord, PropertyMap, SceneDocument, NO_PARENT};
use crate::source::{CurveNodeSource, CurveSource, NodeSource, PropertySource, SceneSource};

/// Explicit traversal state handed to every extraction call.
#[derive(Clone, Copy, Debug)]
pub struct ExtractContext<'a> {
    /// Active animation layers, in stack order.
    pub layers: &'a [String],
}

impl<'a> ExtractContext<'a> {
    pub fn new(layers: &'a [String]) -> Self {
        Self { layers }
    }
}

/// Read every key of a curve in source order. Unreadable keys are skipped.
pub fn read_curve(curve: &dyn CurveSource) -> AnimCurve {
    (0..curve.key_count())
        .filter_map(|i| curve.key(i))
        .collect()
}

/// Name under which curve `index` of `channel` is stored.
///
/// Multi-channel nodes get the channel label (`"Lcl Translation_X"`) so the
/// re-synthesizer can match on the axis suffix; further curves on the same
/// channel, and extra curves on a single-channel node, get a positional
/// suffix.
pub fn channel_key(node: &dyn CurveNodeSource, channel: usize, index: usize) -> String {
    let base = node.name();
    if node.channel_count() > 1 {
        let label = node
            .channel_name(channel)
            .map(str::to_string)
            .unwrap_or_else(|| channel.to_string());
        if index == 0 {
            format!("{base}_{label}")
        } else {
            format!("{base}_{label}_{index}")
        }
    } else if node.curve_count(channel) > 1 {
        format!("{base}_{index}")
    } else {
        base.to_string()
    }
}

/// Curves of `node` on one layer. Curves without keys are left out.
pub fn extract_layer(node: &dyn CurveNodeSource) -> AnimLayer {
    let mut layer = AnimLayer::default();
    for channel in 0..node.channel_count() {
        for index in 0..node.curve_count(channel) {
            let Some(curve) = node.curve(channel, index) else {
                continue;
            };
            let keys = read_curve(curve);
            if keys.is_empty() {
                continue;
            }
            layer.channels.insert(channel_key(node, channel, index), keys);
        }
    }
    layer
}

/// Per-layer curves of a property; layers without any keys are omitted.
pub fn extract_layers(
    property: &dyn PropertySource,
    ctx: ExtractContext<'_>,
) -> IndexMap<String, AnimLayer> {
    let mut layers = IndexMap::new();
    for name in ctx.layers {
        let Some(node) = property.curve_node(name) else {
            continue;
        };
        let layer = extract_layer(node);
        if layer.is_empty() {
            debug!(
                "property '{}' has a curve node on '{name}' but no keys",
                property.name()
            );
            continue;
        }
        layers.insert(name.clone(), layer);
    }
    layers
}

/// Envelope for one property: bare value when unanimated, default plus layers
/// otherwise. `None` when the property's data type has no persisted shape.
pub fn extract_property(
    property: &dyn PropertySource,
    ctx: ExtractContext<'_>,
) -> Option<PropertyEnvelope> {
    let Some(default) = property.value() else {
        debug!("property '{}' has no persisted shape; skipped", property.name());
        return None;
    };
    let layers = extract_layers(property, ctx);
    if layers.is_empty() {
        Some(PropertyEnvelope::Static(default))
    } else {
        Some(PropertyEnvelope::Animated(AnimatedProperty { default, layers }))
    }
}

pub fn extract_properties(properties: &[&dyn PropertySource], ctx: ExtractContext<'_>) -> PropertyMap {
    properties
        .iter()
        .filter_map(|p| extract_property(*p, ctx).map(|env| (p.name().to_string(), env)))
        .collect()
}

/// Record for a single node. A node without an attribute yields an empty
/// attribute map.
pub fn extract_node(node: &dyn NodeSource, parent: i64, ctx: ExtractContext<'_>) -> NodeRecord {
    let attributes = node
        .attribute_properties()
        .map(|props| extract_properties(&props, ctx))
        .unwrap_or_default();
    NodeRecord {
        name: node.name().to_string(),
        id: node.unique_id(),
        type_name: node.type_name().to_string(),
        parent,
        properties: extract_properties(&node.properties(), ctx),
        attributes,
    }
}

/// Whole scene, depth-first with parents before children.
pub fn extract_scene(scene: &dyn SceneSource) -> SceneDocument {
    let layers = scene.animation_layers();
    let ctx = ExtractContext::new(&layers);
    let mut doc = SceneDocument {
        global_settings: extract_properties(&scene.global_settings(), ctx),
        nodes: Vec::new(),
    };
    if let Some(root) = scene.root() {
        extract_subtree(root, NO_PARENT, ctx, &mut doc);
    }
    doc
}

fn extract_subtree(
    node: &dyn NodeSource,
    parent: i64,
    ctx: ExtractContext<'_>,
    doc: &mut SceneDocument,
) {
    doc.insert_node(extract_node(node, parent, ctx));
    let id = node.unique_id();
    for child in node.children() {
        extract_subtree(child, id, ctx, doc);
    }
}
