//! Curve re-synthesis: neutral curves → target keyframes.
//!
//! The target keyframe model describes a tangent as slope plus acceleration
//! (a weight-compensated tangent length) and chooses the segment shape per key
//! through an expression (`constant()`, `linear()`, `cubic()`, `bezier()`).
//! Each source key is classified in index order; the classification of key `i`
//! looks at the intrinsic class of key `i-1` or `i+1`:
//!
//! | source key                | context                          | result                          |
//! |---------------------------|----------------------------------|---------------------------------|
//! | any                       | only key of the curve            | intrinsic class, auto tangent   |
//! | constant                  |                                  | `constant()`, auto              |
//! | linear, last              | previous is cubic/bezier         | `bezier()`, incoming only       |
//! | linear, not last          | next is cubic/bezier             | `bezier()`, outgoing only       |
//! | linear                    | otherwise                        | `linear()`, auto                |
//! | cubic/bezier, first       |                                  | unchanged, outgoing only        |
//! | cubic/bezier, later       | next is bezier                   | `bezier()`, per tangent mode    |
//!
//! A cubic key with either weighted flag set is intrinsically bezier.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::binding::ChannelBinding;
use crate::config::Config;
use crate::curve::{
    AnimCurve, AnimatedProperty, Interpolation, KeyframeSample, PropertyEnvelope, TangentMode,
};
use crate::sink::ParameterSink;
use crate::value::PropertyValue;

/// Target segment shape of a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyExpression {
    #[serde(rename = "constant()")]
    Constant,
    #[serde(rename = "linear()")]
    Linear,
    #[serde(rename = "cubic()")]
    Cubic,
    #[serde(rename = "bezier()")]
    Bezier,
}

impl KeyExpression {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyExpression::Constant => "constant()",
            KeyExpression::Linear => "linear()",
            KeyExpression::Cubic => "cubic()",
            KeyExpression::Bezier => "bezier()",
        }
    }

    #[inline]
    pub fn is_curved(self) -> bool {
        matches!(self, KeyExpression::Cubic | KeyExpression::Bezier)
    }
}

/// Side of a key a tangent leaves from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    /// Incoming (left) tangent.
    In,
    /// Outgoing (right) tangent.
    Out,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tangent {
    pub slope: f64,
    pub accel: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TangentSpec {
    /// Let the target compute slopes.
    Auto,
    /// Explicit tangents; an unset side keeps the target's default.
    Explicit {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        incoming: Option<Tangent>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        outgoing: Option<Tangent>,
    },
}

impl TangentSpec {
    pub fn incoming(&self) -> Option<Tangent> {
        match self {
            TangentSpec::Auto => None,
            TangentSpec::Explicit { incoming, .. } => *incoming,
        }
    }

    pub fn outgoing(&self) -> Option<Tangent> {
        match self {
            TangentSpec::Auto => None,
            TangentSpec::Explicit { outgoing, .. } => *outgoing,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, TangentSpec::Auto)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyClassification {
    pub expression: KeyExpression,
    pub tangent: TangentSpec,
}

impl KeyClassification {
    fn auto(expression: KeyExpression) -> Self {
        Self {
            expression,
            tangent: TangentSpec::Auto,
        }
    }
}

/// One emitted target key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetKeyframe {
    /// Key time in frames (the source key's frame number).
    pub frame: i64,
    pub value: f64,
    pub expression: KeyExpression,
    pub tangent: TangentSpec,
}

/// What a parameter receives from one envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParameterAssignment {
    Static {
        value: f64,
    },
    Animated {
        default: f64,
        keyframes: Vec<TargetKeyframe>,
    },
}

/// Replace the NaN "absent" sentinel with `0.0`.
#[inline]
pub fn read_float(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v
    }
}

/// Class of a key before neighbour context is applied.
pub fn intrinsic_class(key: &KeyframeSample) -> KeyExpression {
    match key.interpolation {
        Interpolation::Constant => KeyExpression::Constant,
        Interpolation::Linear => KeyExpression::Linear,
        Interpolation::Cubic if key.is_weighted() => KeyExpression::Bezier,
        Interpolation::Cubic => KeyExpression::Cubic,
    }
}

fn slope(key: &KeyframeSample, side: Side) -> f64 {
    match side {
        Side::In => read_float(key.left_slope),
        Side::Out => read_float(key.right_slope),
    }
}

/// Tangent acceleration of key `index` on `side`:
/// `sqrt(W² · DT² · (1 + S²))` with `DT` the signed time to the neighbour on
/// that side, `S` the slope and `W` the weight on that side. The weight is read
/// whether or not the side is flagged weighted. A zero weight carries no
/// length information and yields the unweighted length `|DT · S|`.
/// Without a neighbour on `side` the acceleration is zero.
pub fn tangent_accel(curve: &AnimCurve, index: usize, side: Side) -> f64 {
    let keys = &curve.keys;
    let Some(key) = keys.get(index) else {
        return 0.0;
    };
    let s = slope(key, side);
    let neighbour = match side {
        Side::Out => keys.get(index + 1).map(|n| (n, read_float(key.right_weight))),
        Side::In => index
            .checked_sub(1)
            .and_then(|i| keys.get(i))
            .map(|n| (n, read_float(key.left_weight))),
    };
    let Some((other, w)) = neighbour else {
        return 0.0;
    };
    let dt = read_float(key.time) - read_float(other.time);
    if w == 0.0 {
        (dt * s).abs()
    } else {
        (w * w * dt * dt * (1.0 + s * s)).sqrt()
    }
}

fn tangent(curve: &AnimCurve, index: usize, side: Side, factor: f64) -> Tangent {
    Tangent {
        slope: slope(&curve.keys[index], side) * factor,
        accel: tangent_accel(curve, index, side),
    }
}

/// Classify key `index` of `curve`. `None` when the index is out of range.
pub fn classify_key(curve: &AnimCurve, index: usize, factor: f64) -> Option<KeyClassification> {
    let key = curve.get(index)?;
    let class = intrinsic_class(key);
    let last = curve.len() - 1;
    if last == 0 {
        return Some(KeyClassification::auto(class));
    }
    let next = curve.get(index + 1).map(intrinsic_class);

    let out = match class {
        KeyExpression::Constant => KeyClassification::auto(class),
        KeyExpression::Linear if index == last => {
            let previous = intrinsic_class(&curve.keys[index - 1]);
            if previous.is_curved() {
                KeyClassification {
                    expression: KeyExpression::Bezier,
                    tangent: TangentSpec::Explicit {
                        incoming: Some(tangent(curve, index, Side::In, factor)),
                        outgoing: None,
                    },
                }
            } else {
                KeyClassification::auto(class)
            }
        }
        KeyExpression::Linear => {
            if next.is_some_and(KeyExpression::is_curved) {
                KeyClassification {
                    expression: KeyExpression::Bezier,
                    tangent: TangentSpec::Explicit {
                        incoming: None,
                        outgoing: Some(tangent(curve, index, Side::Out, factor)),
                    },
                }
            } else {
                KeyClassification::auto(class)
            }
        }
        KeyExpression::Cubic | KeyExpression::Bezier if index == 0 => KeyClassification {
            expression: class,
            tangent: TangentSpec::Explicit {
                incoming: None,
                outgoing: Some(tangent(curve, index, Side::Out, factor)),
            },
        },
        KeyExpression::Cubic | KeyExpression::Bezier => {
            let expression = if next == Some(KeyExpression::Bezier) {
                KeyExpression::Bezier
            } else {
                class
            };
            let spec = match key.tangent_mode {
                TangentMode::Auto | TangentMode::Unknown => TangentSpec::Auto,
                TangentMode::Break => TangentSpec::Explicit {
                    incoming: Some(tangent(curve, index, Side::In, factor)),
                    outgoing: Some(tangent(curve, index, Side::Out, factor)),
                },
                // User mode keeps a single slope; both sides take the outgoing one.
                TangentMode::User => {
                    let t = tangent(curve, index, Side::Out, factor);
                    TangentSpec::Explicit {
                        incoming: Some(t),
                        outgoing: Some(t),
                    }
                }
            };
            KeyClassification {
                expression,
                tangent: spec,
            }
        }
    };
    Some(out)
}

/// One target key per source key, in source order.
pub fn resynthesize_curve(curve: &AnimCurve, factor: f64) -> Vec<TargetKeyframe> {
    curve
        .iter()
        .enumerate()
        .filter_map(|(i, key)| {
            let class = classify_key(curve, i, factor)?;
            Some(TargetKeyframe {
                frame: key.frame,
                value: read_float(key.value) * factor,
                expression: class.expression,
                tangent: class.tangent,
            })
        })
        .collect()
}

/// Static value a binding reads from a default.
pub fn binding_default(value: &PropertyValue, binding: &ChannelBinding) -> Option<f64> {
    if binding.multi_channel {
        value.component(binding.axis_index)
    } else {
        value.as_scalar()
    }
}

/// Curve driving `binding` in the base layer, if any.
pub fn select_curve<'a>(
    animation: &'a AnimatedProperty,
    binding: &ChannelBinding,
    cfg: &Config,
) -> Option<&'a AnimCurve> {
    for name in animation.layers.keys().filter(|n| **n != cfg.base_layer) {
        debug!(
            "'{}': layer '{name}' ignored, only '{}' is re-synthesized",
            binding.channel_name, cfg.base_layer
        );
    }
    let layer = animation.layer(&cfg.base_layer)?;
    let found = if binding.multi_channel {
        let label = cfg.axis_label(binding.axis_index)?;
        layer.channel_ending_with(label)
    } else {
        layer.first_channel()
    };
    found.map(|(_, curve)| curve)
}

/// Re-synthesize one envelope for one binding. Values and slopes are scaled by
/// `factor`. Returns `None` only when nothing can be emitted (no readable
/// default and no curve).
pub fn resynthesize(
    envelope: &PropertyEnvelope,
    binding: &ChannelBinding,
    factor: f64,
    cfg: &Config,
) -> Option<ParameterAssignment> {
    let default = binding_default(envelope.default_value(), binding);
    let curve = envelope
        .animation()
        .and_then(|anim| select_curve(anim, binding, cfg))
        .filter(|c| !c.is_empty());

    match (curve, default) {
        (Some(curve), default) => {
            if default.is_none() {
                warn!(
                    "'{}'[{}]: default value unreadable, using 0",
                    binding.channel_name, binding.axis_index
                );
            }
            Some(ParameterAssignment::Animated {
                default: read_float(default.unwrap_or(0.0)) * factor,
                keyframes: resynthesize_curve(curve, factor),
            })
        }
        (None, Some(default)) => {
            if envelope.is_animated() {
                debug!(
                    "'{}'[{}]: no matching curve, using the default value",
                    binding.channel_name, binding.axis_index
                );
            }
            Some(ParameterAssignment::Static {
                value: read_float(default) * factor,
            })
        }
        (None, None) => {
            warn!(
                "'{}'[{}]: default value unreadable and no curve; nothing emitted",
                binding.channel_name, binding.axis_index
            );
            None
        }
    }
}

/// Re-synthesize and push the result into `sink` under `parm`. Animated
/// parameters receive their default first, then the keyframes.
pub fn apply_parameter<S: ParameterSink + ?Sized>(
    sink: &mut S,
    parm: &str,
    envelope: &PropertyEnvelope,
    binding: &ChannelBinding,
    factor: f64,
    cfg: &Config,
) -> bool {
    match resynthesize(envelope, binding, factor, cfg) {
        Some(ParameterAssignment::Static { value }) => {
            sink.set_static(parm, value);
            true
        }
        Some(ParameterAssignment::Animated { default, keyframes }) => {
            sink.set_static(parm, default);
            sink.set_keyframes(parm, keyframes);
            true
        }
        None => false,
    }
}
