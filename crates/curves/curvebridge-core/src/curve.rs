//! Neutral curve model shared by the extractor and the re-synthesizer.
//!
//! Field names and enum spellings match the persisted intermediate format, so
//! documents written by older exporters load without a migration step.
//! Numeric fields use NaN as the "absent/unsupported" sentinel; NaN persists as
//! JSON `null` and `null` (or a missing field) reads back as NaN.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::value::PropertyValue;

/// Source interpolation mode of the segment leaving a key.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Interpolation {
    #[serde(rename = "eInterpolationConstant")]
    Constant,
    #[serde(rename = "eInterpolationLinear")]
    Linear,
    #[default]
    #[serde(rename = "eInterpolationCubic")]
    Cubic,
}

/// Source tangent policy of a cubic key.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum TangentMode {
    #[default]
    #[serde(rename = "eTangentAuto")]
    Auto,
    #[serde(rename = "eTangentBreak")]
    Break,
    #[serde(rename = "eTangentUser")]
    User,
    /// TCB, generic clamp and the other modes the target has no equivalent for.
    #[serde(other, rename = "eTangentUnknown")]
    Unknown,
}

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConstantMode {
    #[default]
    #[serde(rename = "eConstantStandard")]
    Standard,
    #[serde(rename = "eConstantNext")]
    Next,
}

fn nan() -> f64 {
    f64::NAN
}

fn nan_from_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// One sampled key on a source curve.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyframeSample {
    /// Key time in seconds.
    #[serde(default = "nan", deserialize_with = "nan_from_null")]
    pub time: f64,
    #[serde(default)]
    pub frame: i64,
    #[serde(default = "nan", deserialize_with = "nan_from_null")]
    pub value: f64,

    #[serde(rename = "intp", default)]
    pub interpolation: Interpolation,
    #[serde(rename = "tang", default)]
    pub tangent_mode: TangentMode,
    #[serde(rename = "con", default)]
    pub constant_mode: ConstantMode,
    #[serde(rename = "break", default)]
    pub is_break: bool,

    #[serde(rename = "left auto", default = "nan", deserialize_with = "nan_from_null")]
    pub left_auto: f64,
    #[serde(rename = "right auto", default = "nan", deserialize_with = "nan_from_null")]
    pub right_auto: f64,

    #[serde(rename = "left slope", default = "nan", deserialize_with = "nan_from_null")]
    pub left_slope: f64,
    #[serde(rename = "right slope", default = "nan", deserialize_with = "nan_from_null")]
    pub right_slope: f64,

    #[serde(rename = "left weighted", default)]
    pub left_weighted: bool,
    #[serde(rename = "right weighted", default)]
    pub right_weighted: bool,
    #[serde(rename = "left weight", default = "nan", deserialize_with = "nan_from_null")]
    pub left_weight: f64,
    #[serde(rename = "right weight", default = "nan", deserialize_with = "nan_from_null")]
    pub right_weight: f64,

    #[serde(rename = "left has velocity", default)]
    pub left_has_velocity: bool,
    #[serde(rename = "right has velocity", default)]
    pub right_has_velocity: bool,
    #[serde(rename = "left velocity", default = "nan", deserialize_with = "nan_from_null")]
    pub left_velocity: f64,
    #[serde(rename = "right velocity", default = "nan", deserialize_with = "nan_from_null")]
    pub right_velocity: f64,
}

impl KeyframeSample {
    /// A key with flat unweighted tangents; the starting point for builders.
    pub fn new(time: f64, frame: i64, value: f64) -> Self {
        Self {
            time,
            frame,
            value,
            interpolation: Interpolation::Cubic,
            tangent_mode: TangentMode::Auto,
            constant_mode: ConstantMode::Standard,
            is_break: false,
            left_auto: 0.0,
            right_auto: 0.0,
            left_slope: 0.0,
            right_slope: 0.0,
            left_weighted: false,
            right_weighted: false,
            left_weight: 0.0,
            right_weight: 0.0,
            left_has_velocity: false,
            right_has_velocity: false,
            left_velocity: 0.0,
            right_velocity: 0.0,
        }
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_tangent_mode(mut self, mode: TangentMode) -> Self {
        self.tangent_mode = mode;
        self.is_break = mode == TangentMode::Break;
        self
    }

    pub fn with_slopes(mut self, left: f64, right: f64) -> Self {
        self.left_slope = left;
        self.right_slope = right;
        self
    }

    pub fn with_weights(mut self, left: f64, right: f64) -> Self {
        self.left_weight = left;
        self.right_weight = right;
        self
    }

    pub fn weighted(mut self, left: bool, right: bool) -> Self {
        self.left_weighted = left;
        self.right_weighted = right;
        self
    }

    #[inline]
    pub fn is_weighted(&self) -> bool {
        self.left_weighted || self.right_weighted
    }
}

/// Ordered keys of one channel. Order is the key index used for neighbour
/// lookups and is never re-sorted.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimCurve {
    pub keys: Vec<KeyframeSample>,
}

impl AnimCurve {
    pub fn new(keys: Vec<KeyframeSample>) -> Self {
        Self { keys }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&KeyframeSample> {
        self.keys.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeyframeSample> {
        self.keys.iter()
    }

    /// `true` when key times never decrease. NaN times are not compared.
    pub fn is_time_ordered(&self) -> bool {
        self.keys
            .windows(2)
            .all(|w| w[0].time.is_nan() || w[1].time.is_nan() || w[0].time <= w[1].time)
    }
}

impl FromIterator<KeyframeSample> for AnimCurve {
    fn from_iter<I: IntoIterator<Item = KeyframeSample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Curves of one animation layer keyed by (disambiguated) channel name, in
/// source channel order. The layer name is the key under which the layer is
/// stored.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimLayer {
    pub channels: IndexMap<String, AnimCurve>,
}

impl AnimLayer {
    pub fn channel(&self, name: &str) -> Option<&AnimCurve> {
        self.channels.get(name)
    }

    /// First channel whose name ends with `suffix`.
    pub fn channel_ending_with(&self, suffix: &str) -> Option<(&str, &AnimCurve)> {
        self.channels
            .iter()
            .find(|(name, _)| name.ends_with(suffix))
            .map(|(name, curve)| (name.as_str(), curve))
    }

    /// First channel in source order.
    pub fn first_channel(&self) -> Option<(&str, &AnimCurve)> {
        self.channels
            .iter()
            .next()
            .map(|(name, curve)| (name.as_str(), curve))
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Default value plus per-layer curves of an animated property.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnimatedProperty {
    #[serde(rename = "Default")]
    pub default: PropertyValue,
    #[serde(rename = "AnimCurves")]
    pub layers: IndexMap<String, AnimLayer>,
}

impl AnimatedProperty {
    pub fn layer(&self, name: &str) -> Option<&AnimLayer> {
        self.layers.get(name)
    }
}

/// The persisted unit for one property: a bare value, or a default wrapped
/// with its animation layers.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyEnvelope {
    Animated(AnimatedProperty),
    Static(PropertyValue),
}

impl PropertyEnvelope {
    pub fn default_value(&self) -> &PropertyValue {
        match self {
            PropertyEnvelope::Animated(a) => &a.default,
            PropertyEnvelope::Static(v) => v,
        }
    }

    pub fn animation(&self) -> Option<&AnimatedProperty> {
        match self {
            PropertyEnvelope::Animated(a) => Some(a),
            PropertyEnvelope::Static(_) => None,
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, PropertyEnvelope::Animated(_))
    }
}

impl From<PropertyValue> for PropertyEnvelope {
    fn from(value: PropertyValue) -> Self {
        PropertyEnvelope::Static(value)
    }
}
