//! Confidence and type checks on the merged record

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use estimator_domain::{
    ExtractedField, FieldValue, MergedRecord, ValidatedField, ValidatedRecord, ValidationResult,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref NON_NUMERIC: Regex = Regex::new(r"[^0-9.\-]+").unwrap();
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
];

// %.f also matches an absent fraction
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// Day-less forms, parsed as the first of the month
const MONTH_FORMATS: &[&str] = &["%Y-%m", "%B %Y", "%b %Y"];

/// Default minimum confidence for a field to be valid
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.7;

/// A price-like value that is neither a number nor a string
#[derive(Debug)]
struct StructuralFailure;

/// Annotates every merged field with a validation result
#[derive(Debug, Clone)]
pub struct FieldValidator {
    min_confidence_threshold: f64,
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CONFIDENCE)
    }
}

impl FieldValidator {
    /// Create a validator with the given confidence threshold
    pub fn new(min_confidence_threshold: f64) -> Self {
        Self {
            min_confidence_threshold,
        }
    }

    /// Validate every field; no field is ever dropped
    pub fn validate_fields(&self, record: &MergedRecord) -> ValidatedRecord {
        record
            .iter()
            .map(|(key, value)| {
                let validated = match value {
                    FieldValue::Scored(field) => match self.validate_field(key, field) {
                        Ok(result) => ValidatedField {
                            value: field.value.clone(),
                            confidence: field.confidence,
                            validation_result: result,
                        },
                        Err(StructuralFailure) => {
                            warn!("Field {} has a value of the wrong type for its checks", key);
                            ValidatedField::failed(field.value.clone())
                        }
                    },
                    other => {
                        warn!("Field {} carries no confidence score", key);
                        ValidatedField::failed(other.to_value())
                    }
                };
                (key.clone(), validated)
            })
            .collect()
    }

    fn validate_field(&self, key: &str, field: &ExtractedField) -> Result<ValidationResult, StructuralFailure> {
        let mut errors = Vec::new();

        if field.confidence < self.min_confidence_threshold {
            errors.push(format!(
                "Confidence score {} is below threshold {}",
                field.confidence, self.min_confidence_threshold
            ));
        }

        match key.to_lowercase().as_str() {
            "date" => {
                if !is_valid_date(&field.value) {
                    errors.push("Invalid date format".to_string());
                }
            }
            "cost" | "budget" | "price" => {
                if !is_valid_number(&field.value)? {
                    errors.push("Invalid number format".to_string());
                }
            }
            "email" => {
                if !field.value.as_str().is_some_and(|s| EMAIL.is_match(s)) {
                    errors.push("Invalid email format".to_string());
                }
            }
            _ => {}
        }

        if !errors.is_empty() {
            debug!("Field {} failed validation: {:?}", key, errors);
        }

        Ok(ValidationResult {
            is_valid: errors.is_empty(),
            confidence: field.confidence,
            errors,
        })
    }
}

/// Numbers are timestamps; strings must parse in one of the known forms
fn is_valid_date(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => parses_as_date(s.trim()),
        _ => false,
    }
}

fn parses_as_date(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || DateTime::parse_from_rfc2822(value).is_ok()
        || DATE_FORMATS
            .iter()
            .any(|format| NaiveDate::parse_from_str(value, format).is_ok())
        || DATETIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
        || MONTH_FORMATS.iter().any(|format| {
            NaiveDate::parse_from_str(&format!("{} 1", value), &format!("{} %d", format)).is_ok()
        })
}

fn is_valid_number(value: &Value) -> Result<bool, StructuralFailure> {
    match value {
        Value::Number(_) => Ok(true),
        Value::String(s) => {
            // Nothing left after stripping counts as zero
            let stripped = NON_NUMERIC.replace_all(s, "");
            Ok(stripped.is_empty() || stripped.parse::<f64>().is_ok())
        }
        _ => Err(StructuralFailure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(raw: Value) -> MergedRecord {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_below_threshold_is_invalid_but_kept() {
        let validated = FieldValidator::new(0.7)
            .validate_fields(&record(json!({"x": {"value": "hello", "confidence": 0.5}})));

        let field = &validated["x"];
        assert!(!field.is_valid());
        assert_eq!(field.value, json!("hello"));
        assert_eq!(field.confidence, 0.5);
        assert_eq!(field.validation_result.errors.len(), 1);
        assert!(field.validation_result.errors[0].contains("0.5"));
        assert!(field.validation_result.errors[0].contains("0.7"));
    }

    #[test]
    fn test_valid_field_has_no_errors() {
        let validated = FieldValidator::default()
            .validate_fields(&record(json!({"project_name": {"value": "HQ", "confidence": 0.9}})));
        assert!(validated["project_name"].is_valid());
        assert!(validated["project_name"].validation_result.errors.is_empty());
    }

    #[test]
    fn test_date_checks() {
        let validator = FieldValidator::default();
        for good in [
            "2024-05-01",
            "2024-05-01T10:00:00Z",
            "2024-05-01T10:00:00",
            "2024-05-01T10:00:00.250",
            "2024-05-01 10:00",
            "2024-05",
            "May 2024",
            "March 5 2024",
            "05/01/2024",
            "May 1, 2024",
        ] {
            let validated = validator.validate_fields(&record(json!({"date": {"value": good, "confidence": 0.9}})));
            assert!(validated["date"].is_valid(), "{} should be a date", good);
        }

        let validated = validator.validate_fields(&record(json!({"Date": {"value": "next spring", "confidence": 0.9}})));
        assert_eq!(validated["Date"].validation_result.errors, vec!["Invalid date format"]);
    }

    #[test]
    fn test_number_checks() {
        let validator = FieldValidator::default();
        let validated = validator.validate_fields(&record(json!({
            "cost": {"value": "$12,500.00", "confidence": 0.9},
            "budget": {"value": 40000, "confidence": 0.9},
            "price": {"value": "1.2.3", "confidence": 0.9}
        })));

        assert!(validated["cost"].is_valid());
        assert!(validated["budget"].is_valid());
        assert_eq!(validated["price"].validation_result.errors, vec!["Invalid number format"]);
    }

    #[test]
    fn test_number_without_digits_counts_as_zero() {
        let validated = FieldValidator::default().validate_fields(&record(json!({
            "budget": {"value": "TBD", "confidence": 0.9},
            "Price": {"value": "call us", "confidence": 0.9}
        })));
        assert!(validated["budget"].is_valid());
        assert!(validated["Price"].is_valid());
    }

    #[test]
    fn test_email_check() {
        let validator = FieldValidator::default();
        let validated = validator.validate_fields(&record(json!({
            "email": {"value": "pm@example.com", "confidence": 0.9}
        })));
        assert!(validated["email"].is_valid());

        let validated = validator.validate_fields(&record(json!({
            "EMAIL": {"value": "pm at example", "confidence": 0.2}
        })));
        assert_eq!(validated["EMAIL"].validation_result.errors.len(), 2);

        let validated = validator.validate_fields(&record(json!({
            "email": {"value": 42, "confidence": 0.9}
        })));
        let email = &validated["email"];
        assert_eq!(email.confidence, 0.9);
        assert_eq!(email.validation_result.confidence, 0.9);
        assert_eq!(email.validation_result.errors, vec!["Invalid email format"]);
    }

    #[test]
    fn test_structural_failures_are_isolated() {
        let validated = FieldValidator::default().validate_fields(&record(json!({
            "devices": ["smoke", "heat"],
            "cost": {"value": ["1", "2"], "confidence": 0.9},
            "budget": {"value": null, "confidence": 0.9},
            "date": {"value": 1714557600000u64, "confidence": 0.9},
            "name": {"value": "ok", "confidence": 0.9}
        })));

        assert_eq!(validated["devices"], ValidatedField::failed(json!(["smoke", "heat"])));
        assert_eq!(validated["cost"], ValidatedField::failed(json!(["1", "2"])));
        assert_eq!(validated["budget"], ValidatedField::failed(Value::Null));
        assert!(validated["date"].is_valid());
        assert!(validated["name"].is_valid());
    }
}
