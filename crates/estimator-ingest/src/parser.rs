//! Parse LLM output into a field set

use crate::error::IngestError;
use estimator_domain::{FieldSet, FieldValue};
use serde_json::Value;
use tracing::debug;

/// Parse an extraction response into named fields
///
/// The JSON may be wrapped in a markdown code block or surrounded by prose.
/// When it carries an `extracted_fields` object, that object holds the fields;
/// otherwise the top-level object does.
pub fn parse_extraction_response(response: &str) -> Result<FieldSet, IngestError> {
    let json = match fenced_json(response).and_then(|block| serde_json::from_str::<Value>(block).ok()) {
        Some(json) => json,
        None => {
            let span = object_span(response).ok_or_else(|| {
                IngestError::MalformedExtractionResponse("No JSON object in response".to_string())
            })?;
            serde_json::from_str(span).map_err(|e| {
                IngestError::MalformedExtractionResponse(format!("JSON parse error: {}", e))
            })?
        }
    };

    let fields = match json {
        Value::Object(mut object) => match object.shift_remove("extracted_fields") {
            Some(Value::Object(fields)) => fields,
            Some(other) => {
                return Err(IngestError::MalformedExtractionResponse(format!(
                    "extracted_fields is not an object: {}",
                    other
                )))
            }
            None => object,
        },
        other => {
            return Err(IngestError::MalformedExtractionResponse(format!(
                "Expected JSON object, got {}",
                other
            )))
        }
    };

    debug!("Parsed {} fields from response", fields.len());
    Ok(fields
        .into_iter()
        .map(|(name, value)| (name, FieldValue::from(value)))
        .collect())
}

/// Contents of the first ``` or ```json code block
fn fenced_json(response: &str) -> Option<&str> {
    let start = response.find("```")?;
    let rest = &response[start + 3..];
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

/// Span from the first `{` to the last `}`
fn object_span(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (start < end).then(|| &response[start..=end])
}
