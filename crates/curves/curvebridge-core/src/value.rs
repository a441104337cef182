//! Property value shapes carried through the intermediate document.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValueKind {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Bool,
    Int,
    Str,
    Enum,
    Time,
}

/// A property's static value.
///
/// Persisted untagged, the way the source exporter writes it: numbers, fixed
/// length arrays, booleans and strings. The on-disk form carries no tag, so
/// `Enum` and `Time` read back as `Int`. NaN numbers persist as `null`, and a
/// `null` number or vector component reads back as NaN.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Scalar(f64),
    Vec2([f64; 2]),
    Vec3([f64; 3]),
    Vec4([f64; 4]),
    Str(String),
    /// Enum index (write-only shape; reads back as `Int`).
    Enum(i64),
    /// Frame count (write-only shape; reads back as `Int`).
    Time(i64),
}

/// On-disk shape of a [`PropertyValue`].
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredValue {
    Bool(bool),
    Int(i64),
    Scalar(f64),
    Null,
    Vec2([Option<f64>; 2]),
    Vec3([Option<f64>; 3]),
    Vec4([Option<f64>; 4]),
    Str(String),
}

fn nan_components<const N: usize>(v: [Option<f64>; N]) -> [f64; N] {
    v.map(|c| c.unwrap_or(f64::NAN))
}

impl From<StoredValue> for PropertyValue {
    fn from(stored: StoredValue) -> Self {
        match stored {
            StoredValue::Bool(b) => PropertyValue::Bool(b),
            StoredValue::Int(i) => PropertyValue::Int(i),
            StoredValue::Scalar(v) => PropertyValue::Scalar(v),
            StoredValue::Null => PropertyValue::Scalar(f64::NAN),
            StoredValue::Vec2(v) => PropertyValue::Vec2(nan_components(v)),
            StoredValue::Vec3(v) => PropertyValue::Vec3(nan_components(v)),
            StoredValue::Vec4(v) => PropertyValue::Vec4(nan_components(v)),
            StoredValue::Str(s) => PropertyValue::Str(s),
        }
    }
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        StoredValue::deserialize(deserializer).map(PropertyValue::from)
    }
}

impl PropertyValue {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::Scalar(_) => ValueKind::Scalar,
            PropertyValue::Vec2(_) => ValueKind::Vec2,
            PropertyValue::Vec3(_) => ValueKind::Vec3,
            PropertyValue::Vec4(_) => ValueKind::Vec4,
            PropertyValue::Bool(_) => ValueKind::Bool,
            PropertyValue::Int(_) => ValueKind::Int,
            PropertyValue::Str(_) => ValueKind::Str,
            PropertyValue::Enum(_) => ValueKind::Enum,
            PropertyValue::Time(_) => ValueKind::Time,
        }
    }

    /// Component `axis` of a vector value. `None` for scalars, text, and
    /// out-of-range axes.
    pub fn component(&self, axis: usize) -> Option<f64> {
        match self {
            PropertyValue::Vec2(v) => v.get(axis).copied(),
            PropertyValue::Vec3(v) => v.get(axis).copied(),
            PropertyValue::Vec4(v) => v.get(axis).copied(),
            _ => None,
        }
    }

    /// Numeric reading of a scalar-shaped value. Booleans map to 0/1.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            PropertyValue::Scalar(v) => Some(*v),
            PropertyValue::Int(v) | PropertyValue::Enum(v) | PropertyValue::Time(v) => {
                Some(*v as f64)
            }
            PropertyValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_reads_vector_axes_only() {
        let v = PropertyValue::Vec3([1.0, 2.0, 3.0]);
        assert_eq!(v.component(2), Some(3.0));
        assert_eq!(v.component(3), None);
        assert_eq!(PropertyValue::Scalar(4.0).component(0), None);
    }

    #[test]
    fn as_scalar_covers_numeric_shapes() {
        assert_eq!(PropertyValue::Scalar(0.5).as_scalar(), Some(0.5));
        assert_eq!(PropertyValue::Enum(3).as_scalar(), Some(3.0));
        assert_eq!(PropertyValue::Bool(true).as_scalar(), Some(1.0));
        assert_eq!(PropertyValue::Str("x".into()).as_scalar(), None);
        assert_eq!(PropertyValue::Vec2([1.0, 2.0]).as_scalar(), None);
    }

    #[test]
    fn kind_names_the_shape() {
        assert_eq!(PropertyValue::Scalar(1.0).kind(), ValueKind::Scalar);
        assert_eq!(PropertyValue::Vec4([0.0; 4]).kind(), ValueKind::Vec4);
        assert_eq!(PropertyValue::Enum(2).kind(), ValueKind::Enum);
        assert_eq!(PropertyValue::Time(48).kind(), ValueKind::Time);
        assert_eq!(PropertyValue::Str(String::new()).kind(), ValueKind::Str);
    }

    #[test]
    fn null_numbers_read_back_as_nan() {
        let text = serde_json::to_string(&PropertyValue::Scalar(f64::NAN)).unwrap();
        assert_eq!(text, "null");
        let v: PropertyValue = serde_json::from_str(&text).unwrap();
        assert_eq!(v.kind(), ValueKind::Scalar);
        assert!(v.as_scalar().unwrap().is_nan());

        let text = serde_json::to_string(&PropertyValue::Vec3([f64::NAN, 1.0, 2.0])).unwrap();
        assert_eq!(text, "[null,1.0,2.0]");
        let v: PropertyValue = serde_json::from_str(&text).unwrap();
        assert_eq!(v.kind(), ValueKind::Vec3);
        assert!(v.component(0).unwrap().is_nan());
        assert_eq!(v.component(2), Some(2.0));
    }

    #[test]
    fn untagged_json_shapes() {
        let v: PropertyValue = serde_json::from_str("[0.0, 1.5, -2.0]").unwrap();
        assert_eq!(v, PropertyValue::Vec3([0.0, 1.5, -2.0]));
        let v: PropertyValue = serde_json::from_str("2.5").unwrap();
        assert_eq!(v, PropertyValue::Scalar(2.5));
        let v: PropertyValue = serde_json::from_str("7").unwrap();
        assert_eq!(v, PropertyValue::Int(7));
        let v: PropertyValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, PropertyValue::Bool(true));
        let v: PropertyValue = serde_json::from_str("\"Lambert\"").unwrap();
        assert_eq!(v, PropertyValue::Str("Lambert".into()));

        assert_eq!(
            serde_json::to_string(&PropertyValue::Enum(2)).unwrap(),
            "2".to_string()
        );
    }
}
