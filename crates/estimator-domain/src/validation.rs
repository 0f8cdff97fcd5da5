//! Validated output record

use serde::{Deserialize, Serialize};
use serde_json::Value;
use indexmap::IndexMap;

/// Field name → validated field; the externally observable pipeline result
pub type ValidatedRecord = IndexMap<String, ValidatedField>;

/// Outcome of validating one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Whether every check passed
    pub is_valid: bool,

    /// Confidence carried through from the field (0.0 when validation itself failed)
    pub confidence: f64,

    /// Human-readable reasons for each failed check
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// A merged field with its validation annotation
///
/// Validation never drops data: an invalid field still carries its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedField {
    /// The extracted value
    pub value: Value,

    /// Confidence reported by the extractor
    pub confidence: f64,

    /// Pass/fail explanation
    pub validation_result: ValidationResult,
}

impl ValidatedField {
    /// Annotation used when a field could not be validated at all
    pub fn failed(value: Value) -> Self {
        Self {
            value,
            confidence: 0.0,
            validation_result: ValidationResult {
                is_valid: false,
                confidence: 0.0,
                errors: vec!["Validation failed".to_string()],
            },
        }
    }

    /// Shorthand for `validation_result.is_valid`
    pub fn is_valid(&self) -> bool {
        self.validation_result.is_valid
    }
}
