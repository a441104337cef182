//! Intermediate scene document: the persisted hand-off between the extractor
//! and the re-synthesizer.
//!
//! Layout (one flat JSON object):
//! - `"GlobalSettings"`: property map of the scene's global settings.
//! - `"<node name>"`: one [`NodeRecord`] per scene node, in traversal order.
//!
//! Reading is lenient so documents produced by older exporters still load:
//! bare `NaN`/`Infinity` literals become `null`, an attribute block persisted
//! as `[]` reads as empty, and property values without a persisted shape are
//! dropped.

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::debug;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::curve::PropertyEnvelope;
use crate::error::DocumentError;

/// Property name → persisted envelope, in source order.
pub type PropertyMap = IndexMap<String, PropertyEnvelope>;

const GLOBAL_SETTINGS_KEY: &str = "GlobalSettings";

/// Parent id recorded for the scene root.
pub const NO_PARENT: i64 = -1;

fn no_parent() -> i64 {
    NO_PARENT
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ID", default)]
    pub id: i64,
    #[serde(rename = "Type", default)]
    pub type_name: String,
    #[serde(rename = "Parent", default = "no_parent")]
    pub parent: i64,
    #[serde(rename = "Properties", default, deserialize_with = "lenient_property_map")]
    pub properties: PropertyMap,
    #[serde(rename = "Attributes", default, deserialize_with = "lenient_property_map")]
    pub attributes: PropertyMap,
}

impl NodeRecord {
    pub fn property(&self, name: &str) -> Option<&PropertyEnvelope> {
        self.properties.get(name)
    }

    pub fn attribute(&self, name: &str) -> Option<&PropertyEnvelope> {
        self.attributes.get(name)
    }

    pub fn is_root(&self) -> bool {
        self.parent == NO_PARENT
    }
}

#[derive(Clone, Debug, Default)]
pub struct SceneDocument {
    pub global_settings: PropertyMap,
    pub nodes: Vec<NodeRecord>,
}

impl SceneDocument {
    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        let text = replace_non_finite_literals(text);
        serde_json::from_str(&text).map_err(DocumentError::Parse)
    }

    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        serde_json::to_string(self).map_err(DocumentError::Serialize)
    }

    pub fn read_from_path(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let text = self.to_json_string()?;
        fs::write(path, text).map_err(|source| DocumentError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn node(&self, name: &str) -> Option<&NodeRecord> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn nodes_of_type<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a NodeRecord> {
        self.nodes.iter().filter(move |n| n.type_name == type_name)
    }

    /// Insert a node, replacing a previous node of the same name in place
    /// (node names are the document keys).
    pub fn insert_node(&mut self, node: NodeRecord) {
        if let Some(slot) = self.nodes.iter_mut().find(|n| n.name == node.name) {
            debug!("node '{}' appears twice; keeping the later record", node.name);
            *slot = node;
        } else {
            self.nodes.push(node);
        }
    }
}

impl Serialize for SceneDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.nodes.len() + 1))?;
        map.serialize_entry(GLOBAL_SETTINGS_KEY, &self.global_settings)?;
        for node in &self.nodes {
            map.serialize_entry(&node.name, node)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SceneDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DocumentVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = SceneDocument;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a scene document object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut doc = SceneDocument::default();
        while let Some(key) = access.next_key::<String>()? {
            let raw: JsonValue = access.next_value()?;
            if key == GLOBAL_SETTINGS_KEY {
                doc.global_settings = property_map_from_json(raw);
                continue;
            }
            match serde_json::from_value::<NodeRecord>(raw) {
                Ok(node) => doc.insert_node(node),
                Err(err) => debug!("entry '{key}' is not a node record ({err}); skipped"),
            }
        }
        Ok(doc)
    }
}

fn lenient_property_map<'de, D>(deserializer: D) -> Result<PropertyMap, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = JsonValue::deserialize(deserializer)?;
    Ok(property_map_from_json(raw))
}

fn property_map_from_json(raw: JsonValue) -> PropertyMap {
    let mut out = PropertyMap::new();
    match raw {
        JsonValue::Object(entries) => {
            for (name, value) in entries {
                if value.is_null() {
                    debug!("property '{name}' has no persisted value; skipped");
                    continue;
                }
                match serde_json::from_value::<PropertyEnvelope>(value) {
                    Ok(envelope) => {
                        out.insert(name, envelope);
                    }
                    Err(err) => debug!("property '{name}' not understood ({err}); skipped"),
                }
            }
        }
        // A node without an attribute persists its attribute block as `[]`.
        JsonValue::Array(items) if items.is_empty() => {}
        JsonValue::Null => {}
        other => debug!("expected a property object, found {other}"),
    }
    out
}

/// Rewrite the non-standard `NaN`, `Infinity` and `-Infinity` literals some
/// JSON writers emit into `null`. String contents are left untouched.
pub fn replace_non_finite_literals(text: &str) -> Cow<'_, str> {
    const LITERALS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

    let bytes = text.as_bytes();
    let mut out: Option<String> = None;
    let mut copied = 0;
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        if b == b'"' {
            in_string = true;
            i += 1;
            continue;
        }
        if let Some(lit) = LITERALS
            .iter()
            .find(|lit| bytes[i..].starts_with(lit.as_bytes()))
        {
            let buf = out.get_or_insert_with(|| String::with_capacity(text.len()));
            buf.push_str(&text[copied..i]);
            buf.push_str("null");
            i += lit.len();
            copied = i;
            continue;
        }
        i += 1;
    }
    match out {
        None => Cow::Borrowed(text),
        Some(mut buf) => {
            buf.push_str(&text[copied..]);
            Cow::Owned(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PropertyValue;

    #[test]
    fn non_finite_literals_outside_strings_only() {
        let text = r#"{"a": NaN, "b": -Infinity, "c": "NaN", "d": [Infinity, 1.0]}"#;
        let clean = replace_non_finite_literals(text);
        assert_eq!(
            clean,
            r#"{"a": null, "b": null, "c": "NaN", "d": [null, 1.0]}"#
        );
        assert!(matches!(
            replace_non_finite_literals("{\"x\": 1}"),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn escaped_quotes_keep_string_state() {
        let text = r#"{"a\"NaN": NaN}"#;
        assert_eq!(replace_non_finite_literals(text), r#"{"a\"NaN": null}"#);
    }

    #[test]
    fn lenient_node_record() {
        let text = r#"{
            "GlobalSettings": { "UpAxis": 1, "DefaultCamera": "Producer Perspective" },
            "RootNode": { "Name": "RootNode", "ID": 1, "Type": "Null", "Parent": -1,
                          "Properties": { "Visibility": 1.0, "Broken": null }, "Attributes": [] }
        }"#;
        let doc = SceneDocument::from_json_str(text).unwrap();
        assert_eq!(
            doc.global_settings.get("UpAxis").map(|p| p.default_value()),
            Some(&PropertyValue::Int(1))
        );
        let root = doc.node("RootNode").unwrap();
        assert!(root.is_root());
        assert!(root.property("Broken").is_none());
        assert!(root.attributes.is_empty());
    }

    #[test]
    fn node_order_survives_round_trip() {
        let mut doc = SceneDocument::default();
        for (i, name) in ["Root", "Zeta", "Alpha"].iter().enumerate() {
            doc.insert_node(NodeRecord {
                name: name.to_string(),
                id: i as i64,
                type_name: "Null".into(),
                parent: NO_PARENT,
                properties: PropertyMap::new(),
                attributes: PropertyMap::new(),
            });
        }
        let text = doc.to_json_string().unwrap();
        let back = SceneDocument::from_json_str(&text).unwrap();
        let names: Vec<&str> = back.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Root", "Zeta", "Alpha"]);
    }
}
