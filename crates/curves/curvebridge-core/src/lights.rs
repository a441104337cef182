//! Light rig import: intermediate document light nodes → target light
//! parameters.
//!
//! The source scene is Y-up and the target Z-up, so translation Y/Z swap and
//! Z is negated; rotation is compensated by the spare `rpre`/`rpost`
//! parameters instead.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::binding::ChannelBinding;
use crate::config::Config;
use crate::curve::PropertyEnvelope;
use crate::document::{NodeRecord, PropertyMap, SceneDocument};
use crate::resynth::{apply_parameter, binding_default, read_float};
use crate::sink::{ParameterSink, ParameterTable};

/// Node type tag of light nodes in the document.
pub const LIGHT_NODE_TYPE: &str = "Light";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightKind {
    Point,
    Directional,
    Spot,
    Area,
    Volume,
}

impl LightKind {
    /// Decode the source `LightType` enum.
    pub fn from_source_type(code: i64) -> Option<Self> {
        match code {
            0 => Some(LightKind::Point),
            1 => Some(LightKind::Directional),
            2 => Some(LightKind::Spot),
            3 => Some(LightKind::Area),
            4 => Some(LightKind::Volume),
            _ => None,
        }
    }

    /// Target `light_type` menu index. Volume lights have no target
    /// equivalent and import as points.
    pub fn target_type(self) -> i64 {
        match self {
            LightKind::Point | LightKind::Spot | LightKind::Volume => 0,
            LightKind::Area => 2,
            LightKind::Directional => 7,
        }
    }

    pub fn cone_enabled(self) -> bool {
        self == LightKind::Spot
    }
}

/// Where one scalar target parameter reads its data from.
struct LightChannel {
    parm: &'static str,
    property: &'static str,
    axis: Option<usize>,
    factor: f64,
    /// Transform channels are always written; the rest only when present.
    required: bool,
}

const fn channel(
    parm: &'static str,
    property: &'static str,
    axis: Option<usize>,
    factor: f64,
    required: bool,
) -> LightChannel {
    LightChannel {
        parm,
        property,
        axis,
        factor,
        required,
    }
}

const LIGHT_CHANNELS: &[LightChannel] = &[
    channel("tx", "Lcl Translation", Some(0), 1.0, true),
    channel("ty", "Lcl Translation", Some(2), 1.0, true),
    channel("tz", "Lcl Translation", Some(1), -1.0, true),
    channel("rx", "Lcl Rotation", Some(0), 1.0, true),
    channel("ry", "Lcl Rotation", Some(1), 1.0, true),
    channel("rz", "Lcl Rotation", Some(2), 1.0, true),
    channel("light_intensity", "Intensity", None, 1.0, false),
    channel("light_colorr", "Color.R", None, 1.0, false),
    channel("light_colorg", "Color.G", None, 1.0, false),
    channel("light_colorb", "Color.B", None, 1.0, false),
    channel("coneangle", "OuterConeAngle", None, 1.0, false),
];

/// Result of importing one light node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImportedLight {
    pub name: String,
    pub kind: LightKind,
    pub parameters: ParameterTable,
}

fn scalar_default(map: &PropertyMap, name: &str) -> Option<f64> {
    map.get(name)
        .map(PropertyEnvelope::default_value)
        .and_then(|v| binding_default(v, &ChannelBinding::scalar(name)))
        .map(read_float)
}

/// Light kind of a node from its `LightType` attribute. Missing or unknown
/// codes fall back to a point light.
pub fn light_kind(node: &NodeRecord) -> LightKind {
    let code = scalar_default(&node.attributes, "LightType");
    match code.and_then(|c| LightKind::from_source_type(c as i64)) {
        Some(kind) => kind,
        None => {
            warn!(
                "light '{}': unknown light type {code:?}, importing as point",
                node.name
            );
            LightKind::Point
        }
    }
}

/// Parameters shared by every imported light.
pub fn apply_common<S: ParameterSink + ?Sized>(sink: &mut S, cfg: &Config) {
    sink.define_vector("rpre", "Pre Rotate", &cfg.lights.pre_rotate);
    sink.define_vector("rpost", "Post Rotate", &cfg.lights.post_rotate);
    sink.set_static("iconscale", cfg.lights.icon_scale);
}

/// Type-specific parameters, read from the light attribute block.
pub fn apply_kind<S: ParameterSink + ?Sized>(
    sink: &mut S,
    kind: LightKind,
    attributes: &PropertyMap,
    cfg: &Config,
) {
    sink.set_static("light_type", kind.target_type() as f64);
    sink.set_static("coneenable", if kind.cone_enabled() { 1.0 } else { 0.0 });
    match kind {
        LightKind::Spot => {
            if let Some(angle) = scalar_default(attributes, "OuterAngle") {
                sink.set_static("coneangle", angle);
            }
        }
        LightKind::Directional => {
            if let Some(intensity) = scalar_default(attributes, "Intensity") {
                sink.set_static(
                    "light_intensity",
                    intensity * cfg.lights.directional_intensity_scale,
                );
            }
        }
        LightKind::Point | LightKind::Area | LightKind::Volume => {}
    }
}

/// Import one light node into `sink`: type parameters first, then the common
/// parameters, then every bound channel (which may override type defaults).
pub fn import_light<S: ParameterSink + ?Sized>(
    sink: &mut S,
    node: &NodeRecord,
    cfg: &Config,
) -> LightKind {
    let kind = light_kind(node);
    apply_kind(sink, kind, &node.attributes, cfg);
    apply_common(sink, cfg);

    for ch in LIGHT_CHANNELS {
        let Some(envelope) = node.property(ch.property) else {
            if ch.required {
                warn!("light '{}': missing '{}'", node.name, ch.property);
            }
            continue;
        };
        let binding = match ch.axis {
            Some(axis) => ChannelBinding::axis(ch.property, axis),
            None => ChannelBinding::scalar(ch.property),
        };
        if !apply_parameter(sink, ch.parm, envelope, &binding, ch.factor, cfg) {
            warn!("light '{}': '{}' left unset", node.name, ch.parm);
        }
    }
    kind
}

/// Import every light node of a document, in document order.
pub fn import_lights(doc: &SceneDocument, cfg: &Config) -> Vec<ImportedLight> {
    doc.nodes_of_type(LIGHT_NODE_TYPE)
        .map(|node| {
            let mut parameters = ParameterTable::new();
            let kind = import_light(&mut parameters, node, cfg);
            debug!(
                "imported light '{}' as {kind:?} with {} parameters",
                node.name,
                parameters.len()
            );
            ImportedLight {
                name: node.name.clone(),
                kind,
                parameters,
            }
        })
        .collect()
}
