//! curvebridge-core: animation curve transcoding (engine-agnostic)
//!
//! Moves animation from an FBX-style scene graph (curve nodes with derivative
//! and weight tangents) into a DCC keyframe model (slope and acceleration
//! tangents with auto/break/user modes), through a neutral JSON document:
//!
//! - [`extract`] walks a [`source::SceneSource`] and produces a [`SceneDocument`].
//! - [`resynth`] turns one [`PropertyEnvelope`] plus a [`ChannelBinding`] into
//!   target keyframes, and pushes them into a [`sink::ParameterSink`].
//! - [`lights`] drives the re-synthesizer for every light node of a document.

pub mod binding;
pub mod config;
pub mod curve;
pub mod document;
pub mod error;
pub mod extract;
pub mod lights;
pub mod memory;
pub mod resynth;
pub mod sink;
pub mod source;
pub mod value;

// Re-exports for consumers (host adapters)
pub use binding::ChannelBinding;
pub use config::{Config, LightSettings};
pub use curve::{
    AnimCurve, AnimLayer, AnimatedProperty, ConstantMode, Interpolation, KeyframeSample,
    PropertyEnvelope, TangentMode,
};
pub use document::{NodeRecord, PropertyMap, SceneDocument};
pub use error::DocumentError;
pub use extract::{extract_node, extract_property, extract_scene, ExtractContext};
pub use lights::{import_light, import_lights, ImportedLight, LightKind};
pub use resynth::{
    apply_parameter, classify_key, resynthesize, resynthesize_curve, tangent_accel,
    KeyClassification, KeyExpression, ParameterAssignment, Side, Tangent, TangentSpec,
    TargetKeyframe,
};
pub use sink::{ParameterSink, ParameterTable};
pub use value::{PropertyValue, ValueKind};
