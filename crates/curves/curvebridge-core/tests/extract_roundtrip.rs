use curvebridge_core::memory::{MemoryCurveNode, MemoryNode, MemoryProperty, MemoryScene};
use curvebridge_core::{
    extract_scene, resynthesize, AnimCurve, ChannelBinding, Config, Interpolation, KeyframeSample,
    ParameterAssignment, PropertyValue, SceneDocument, TangentMode,
};

fn translation_curve(values: &[(i64, f64)], interpolation: Interpolation) -> AnimCurve {
    values
        .iter()
        .map(|(frame, value)| {
            KeyframeSample::new(*frame as f64 / 24.0, *frame, *value)
                .with_interpolation(interpolation)
                .with_tangent_mode(TangentMode::Break)
                .with_slopes(0.5, -0.5)
                .with_weights(0.333, 0.333)
        })
        .collect()
}

fn sample_scene() -> MemoryScene {
    let translation = MemoryProperty::new("Lcl Translation", PropertyValue::Vec3([1.0, 2.0, 3.0]))
        .animated_on(
            "Base Layer",
            MemoryCurveNode::new("Lcl Translation")
                .with_channel(
                    "X",
                    translation_curve(&[(0, 1.0), (12, 4.0), (30, -2.5)], Interpolation::Cubic),
                )
                .with_channel(
                    "Y",
                    translation_curve(&[(0, 2.0), (24, 2.0)], Interpolation::Linear),
                )
                .with_channel("Z", AnimCurve::default()),
        );
    let intensity = MemoryProperty::new("Intensity", PropertyValue::Scalar(100.0)).animated_on(
        "Base Layer",
        MemoryCurveNode::new("Intensity").with_channel(
            "",
            translation_curve(&[(0, 100.0), (6, 80.0), (7, 0.0)], Interpolation::Constant),
        ),
    );

    let light = MemoryNode::new("Fill", 11, "Light")
        .with_property(translation)
        .with_property(MemoryProperty::new("Lcl Rotation", PropertyValue::Vec3([0.0, 90.0, 0.0])))
        .with_property(MemoryProperty::unsupported("LookAtProperty"))
        .with_attribute(vec![
            MemoryProperty::new("LightType", PropertyValue::Enum(0)),
            intensity,
        ]);
    let group = MemoryNode::new("Rig", 10, "Null").with_child(light);

    MemoryScene {
        layers: vec!["Base Layer".into()],
        global_settings: vec![MemoryProperty::new("UpAxis", PropertyValue::Int(1))],
        root: Some(MemoryNode::new("RootNode", 1, "Null").with_child(group)),
    }
}

#[test]
fn scene_structure_and_parents() {
    let doc = extract_scene(&sample_scene());
    let names: Vec<&str> = doc.nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["RootNode", "Rig", "Fill"]);
    assert!(doc.node("RootNode").unwrap().is_root());
    assert_eq!(doc.node("Rig").unwrap().parent, 1);
    assert_eq!(doc.node("Fill").unwrap().parent, 10);
    assert!(doc.node("RootNode").unwrap().attributes.is_empty());

    let fill = doc.node("Fill").unwrap();
    assert!(fill.property("LookAtProperty").is_none());
    assert!(!fill.property("Lcl Rotation").unwrap().is_animated());

    let translation = fill.property("Lcl Translation").unwrap().animation().unwrap();
    let layer = translation.layer("Base Layer").unwrap();
    let channels: Vec<&str> = layer.channels.keys().map(String::as_str).collect();
    // The keyless Z curve is not emitted.
    assert_eq!(channels, vec!["Lcl Translation_X", "Lcl Translation_Y"]);

    assert_eq!(
        doc.global_settings.get("UpAxis").map(|p| p.default_value()),
        Some(&PropertyValue::Int(1))
    );
}

#[test]
fn frames_and_values_survive_the_document() {
    let cfg = Config::default();
    let doc = extract_scene(&sample_scene());
    let text = doc.to_json_string().expect("serialize document");
    let doc = SceneDocument::from_json_str(&text).expect("parse document");
    let fill = doc.node("Fill").unwrap();

    let translation = fill.property("Lcl Translation").unwrap();
    match resynthesize(translation, &ChannelBinding::axis("Lcl Translation", 0), 1.0, &cfg) {
        Some(ParameterAssignment::Animated { default, keyframes }) => {
            assert_eq!(default, 1.0);
            let pairs: Vec<(i64, f64)> = keyframes.iter().map(|k| (k.frame, k.value)).collect();
            assert_eq!(pairs, vec![(0, 1.0), (12, 4.0), (30, -2.5)]);
        }
        other => panic!("expected animated X, got {other:?}"),
    }

    // No Z curve: falls back to the default component.
    assert_eq!(
        resynthesize(translation, &ChannelBinding::axis("Lcl Translation", 2), 1.0, &cfg),
        Some(ParameterAssignment::Static { value: 3.0 })
    );

    let intensity = fill.attribute("Intensity").unwrap();
    match resynthesize(intensity, &ChannelBinding::scalar("Intensity"), 1.0, &cfg) {
        Some(ParameterAssignment::Animated { keyframes, .. }) => {
            let pairs: Vec<(i64, f64)> = keyframes.iter().map(|k| (k.frame, k.value)).collect();
            assert_eq!(pairs, vec![(0, 100.0), (6, 80.0), (7, 0.0)]);
        }
        other => panic!("expected animated intensity, got {other:?}"),
    }
}

#[test]
fn document_file_round_trip() {
    let doc = extract_scene(&sample_scene());
    let path = std::env::temp_dir().join(format!(
        "curvebridge-roundtrip-{}.json",
        std::process::id()
    ));
    doc.write_to_path(&path).expect("write document");
    let back = SceneDocument::read_from_path(&path).expect("read document");
    std::fs::remove_file(&path).ok();
    assert_eq!(back.nodes.len(), doc.nodes.len());
    let fill = back.node("Fill").unwrap();
    let key = &fill
        .property("Lcl Translation")
        .and_then(|p| p.animation())
        .and_then(|a| a.layer("Base Layer"))
        .and_then(|l| l.channel("Lcl Translation_X"))
        .unwrap()
        .keys[1];
    assert_eq!(key.tangent_mode, TangentMode::Break);
    assert_eq!(key.right_weight, 0.333);
    assert_eq!(key.time, 0.5);
}

#[test]
fn missing_document_reports_path() {
    let err = SceneDocument::read_from_path("/nonexistent/curvebridge.json").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/curvebridge.json"));
}

fn nan_intensity_scene() -> MemoryScene {
    let intensity = MemoryProperty::new("Intensity", PropertyValue::Scalar(f64::NAN)).animated_on(
        "Base Layer",
        MemoryCurveNode::new("Intensity").with_channel(
            "",
            translation_curve(&[(0, 10.0), (12, 20.0)], Interpolation::Linear),
        ),
    );
    MemoryScene {
        layers: vec!["Base Layer".into()],
        global_settings: Vec::new(),
        root: Some(MemoryNode::new("Lamp", 3, "Light").with_attribute(vec![intensity])),
    }
}

#[test]
fn nan_default_keeps_its_curve_through_the_document() {
    let cfg = Config::default();
    let text = extract_scene(&nan_intensity_scene())
        .to_json_string()
        .expect("serialize document");
    assert!(text.contains(r#""Default":null"#));

    let doc = SceneDocument::from_json_str(&text).expect("parse document");
    let intensity = doc.node("Lamp").unwrap().attribute("Intensity").unwrap();
    assert!(intensity.is_animated());
    assert!(intensity.default_value().as_scalar().unwrap().is_nan());

    match resynthesize(intensity, &ChannelBinding::scalar("Intensity"), 1.0, &cfg) {
        Some(ParameterAssignment::Animated { default, keyframes }) => {
            assert_eq!(default, 0.0);
            let pairs: Vec<(i64, f64)> = keyframes.iter().map(|k| (k.frame, k.value)).collect();
            assert_eq!(pairs, vec![(0, 10.0), (12, 20.0)]);
        }
        other => panic!("expected animated intensity, got {other:?}"),
    }
}

const NAN_COMPONENT_DOCUMENT: &str = r#"{"GlobalSettings": {},
 "Probe": {"Name": "Probe", "ID": 5, "Type": "Null", "Parent": -1,
   "Properties": {
     "Lcl Translation": {"Default": [NaN, 1.0, 2.0], "AnimCurves": {"Base Layer": {
       "Lcl Translation_X": [
         {"time": 0.0, "frame": 0, "value": 4.0, "intp": "eInterpolationLinear"},
         {"time": 1.0, "frame": 24, "value": 8.0, "intp": "eInterpolationLinear"}
       ]}}},
     "Color": {"Default": [1.0, 1.0, 1.0], "AnimCurves": {"Base Layer": {
       "Color_R": [{"time": 0.0, "frame": 0, "value": 0.25, "intp": "eInterpolationConstant"}],
       "Color_G": [{"time": 0.0, "frame": 0, "value": 0.5, "intp": "eInterpolationConstant"}],
       "Color_B": [{"time": 0.0, "frame": 0, "value": 0.75, "intp": "eInterpolationConstant"}]
     }}}
   },
   "Attributes": []}}"#;

#[test]
fn nan_vector_component_keeps_its_curve() {
    let cfg = Config::default();
    let doc = SceneDocument::from_json_str(NAN_COMPONENT_DOCUMENT).expect("parse document");
    let translation = doc.node("Probe").unwrap().property("Lcl Translation").unwrap();
    assert!(translation.is_animated());

    match resynthesize(translation, &ChannelBinding::axis("Lcl Translation", 0), 1.0, &cfg) {
        Some(ParameterAssignment::Animated { default, keyframes }) => {
            assert_eq!(default, 0.0);
            let values: Vec<f64> = keyframes.iter().map(|k| k.value).collect();
            assert_eq!(values, vec![4.0, 8.0]);
        }
        other => panic!("expected animated X, got {other:?}"),
    }
    assert_eq!(
        resynthesize(translation, &ChannelBinding::axis("Lcl Translation", 1), 1.0, &cfg),
        Some(ParameterAssignment::Static { value: 1.0 })
    );

    // Written back, the NaN component stays a null component.
    let text = doc.to_json_string().expect("serialize document");
    assert!(text.contains(r#""Default":[null,1.0,2.0]"#));
}

#[test]
fn scalar_binding_reads_the_first_channel_in_source_order() {
    let cfg = Config::default();
    let doc = SceneDocument::from_json_str(NAN_COMPONENT_DOCUMENT).expect("parse document");
    let color = doc.node("Probe").unwrap().property("Color").unwrap();
    match resynthesize(color, &ChannelBinding::scalar("Color"), 1.0, &cfg) {
        Some(ParameterAssignment::Animated { keyframes, .. }) => {
            assert_eq!(keyframes.len(), 1);
            assert_eq!(keyframes[0].value, 0.25);
        }
        other => panic!("expected animated color, got {other:?}"),
    }
}
