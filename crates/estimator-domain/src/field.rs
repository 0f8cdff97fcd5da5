//! Extracted field values
//!
//! The extraction model returns loosely shaped JSON per field. Every value is
//! classified into one of four shapes on entry so that merging can match on
//! the shape pair instead of inspecting JSON at runtime.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use indexmap::IndexMap;

/// Field name → value for one chunk's extraction result, in the order reported
pub type FieldSet = IndexMap<String, FieldValue>;

/// Field name → value after folding several field sets together, in first-seen order
pub type MergedRecord = IndexMap<String, FieldValue>;

/// A single datum reported by the extractor together with its confidence
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedField {
    /// Extracted value (any JSON type)
    pub value: Value,

    /// Extractor's self-reported certainty in [0.0, 1.0]
    pub confidence: f64,

    /// Section the value was attributed to, when reported
    pub source_section: Option<String>,

    /// Any other keys the extractor returned alongside the value
    pub extra: Map<String, Value>,
}

impl ExtractedField {
    /// Create a field with no provenance
    pub fn new(value: impl Into<Value>, confidence: f64) -> Self {
        Self {
            value: value.into(),
            confidence,
            source_section: None,
            extra: Map::new(),
        }
    }

    /// Attach the section the value came from
    pub fn with_source(mut self, section: impl Into<String>) -> Self {
        self.source_section = Some(section.into());
        self
    }

    /// Build from a JSON object, handing the object back unless `confidence` is a number
    pub fn from_object(mut object: Map<String, Value>) -> Result<Self, Map<String, Value>> {
        let Some(confidence) = object.get("confidence").and_then(Value::as_f64) else {
            return Err(object);
        };
        object.shift_remove("confidence");
        let value = object.shift_remove("value").unwrap_or(Value::Null);
        let source_section = match object.get("source_section") {
            Some(Value::String(s)) => {
                let s = s.clone();
                object.shift_remove("source_section");
                Some(s)
            }
            _ => None,
        };

        Ok(Self {
            value,
            confidence,
            source_section,
            extra: object,
        })
    }

    /// Render back to the JSON object shape
    pub fn to_object(&self) -> Map<String, Value> {
        let mut object = self.extra.clone();
        object.insert("value".to_string(), self.value.clone());
        object.insert("confidence".to_string(), Value::from(self.confidence));
        if let Some(section) = &self.source_section {
            object.insert("source_section".to_string(), Value::String(section.clone()));
        }
        object
    }
}

/// The closed set of shapes a field can take while flowing through merge
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Object carrying a numeric `confidence`
    Scored(ExtractedField),
    /// JSON array
    List(Vec<Value>),
    /// JSON object without a numeric `confidence`
    Object(Map<String, Value>),
    /// String, number, bool or null
    Scalar(Value),
}

impl FieldValue {
    /// Confidence of a scored value
    pub fn confidence(&self) -> Option<f64> {
        match self {
            FieldValue::Scored(field) => Some(field.confidence),
            _ => None,
        }
    }

    /// Render as plain JSON
    pub fn to_value(&self) -> Value {
        match self {
            FieldValue::Scored(field) => Value::Object(field.to_object()),
            FieldValue::List(items) => Value::Array(items.clone()),
            FieldValue::Object(map) => Value::Object(map.clone()),
            FieldValue::Scalar(value) => value.clone(),
        }
    }

    /// Consume into plain JSON
    pub fn into_value(self) -> Value {
        match self {
            FieldValue::Scored(field) => Value::Object(field.to_object()),
            FieldValue::List(items) => Value::Array(items),
            FieldValue::Object(map) => Value::Object(map),
            FieldValue::Scalar(value) => value,
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => FieldValue::List(items),
            Value::Object(map) => match ExtractedField::from_object(map) {
                Ok(field) => FieldValue::Scored(field),
                Err(map) => FieldValue::Object(map),
            },
            other => FieldValue::Scalar(other),
        }
    }
}

impl From<ExtractedField> for FieldValue {
    fn from(field: ExtractedField) -> Self {
        FieldValue::Scored(field)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(FieldValue::from)
    }
}
