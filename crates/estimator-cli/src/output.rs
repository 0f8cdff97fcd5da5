//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use colored::*;
use estimator_domain::{Chunk, Section, ValidatedRecord};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Values longer than this are shortened in tables.
const MAX_CELL_WIDTH: usize = 48;

/// Sections and chunks of one document part.
#[derive(Debug, Clone, Serialize)]
pub struct PartReport {
    /// Zero-based part index
    pub part: usize,

    /// Sections found in the part
    pub sections: Vec<Section>,

    /// Chunks that would be sent to the model
    pub chunks: Vec<Chunk>,
}

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    pretty: bool,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, pretty: bool, color_enabled: bool) -> Self {
        Self {
            format,
            pretty,
            color_enabled,
        }
    }

    /// Format the validated record.
    pub fn format_record(&self, record: &ValidatedRecord) -> Result<String> {
        match self.format {
            CliFormat::Json => self.to_json(record),
            CliFormat::Table => Ok(self.format_record_table(record)),
        }
    }

    /// Format a chunking dry run.
    pub fn format_chunks(&self, parts: &[PartReport]) -> Result<String> {
        match self.format {
            CliFormat::Json => self.to_json(parts),
            CliFormat::Table => Ok(self.format_chunks_table(parts)),
        }
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        Ok(if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        })
    }

    fn format_record_table(&self, record: &ValidatedRecord) -> String {
        if record.is_empty() {
            return self.colorize("No fields extracted.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value", "Confidence", "Valid", "Errors"]);

        for (name, field) in record {
            let valid = if field.is_valid() {
                self.colorize("yes", "green")
            } else {
                self.colorize("no", "red")
            };
            builder.push_record([
                name.clone(),
                truncate(&field.value.to_string()),
                format!("{:.2}", field.confidence),
                valid,
                field.validation_result.errors.join("; "),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn format_chunks_table(&self, parts: &[PartReport]) -> String {
        if parts.iter().all(|part| part.chunks.is_empty()) {
            return self.colorize("No sections found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Part", "Chunk", "Sections", "Fragments", "Tokens"]);

        for part in parts {
            for (index, chunk) in part.chunks.iter().enumerate() {
                builder.push_record([
                    (part.part + 1).to_string(),
                    (index + 1).to_string(),
                    truncate(&chunk.sections.join(", ")),
                    chunk.content.len().to_string(),
                    chunk.token_count.to_string(),
                ]);
            }
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let head: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use estimator_domain::{ValidatedField, ValidationResult};
    use serde_json::json;

    fn create_test_record() -> ValidatedRecord {
        let mut record = ValidatedRecord::new();
        record.insert(
            "budget".to_string(),
            ValidatedField {
                value: json!("$50,000"),
                confidence: 0.95,
                validation_result: ValidationResult {
                    is_valid: true,
                    confidence: 0.95,
                    errors: Vec::new(),
                },
            },
        );
        record.insert("systems".to_string(), ValidatedField::failed(json!(["fire"])));
        record
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(CliFormat::Json, false, false);
        let output = formatter.format_record(&create_test_record()).unwrap();
        assert!(!output.contains('\n'));
        assert!(output.contains("\"validationResult\""));
        assert!(output.contains("\"isValid\":false"));
    }

    #[test]
    fn test_pretty_json_format() {
        let formatter = Formatter::new(CliFormat::Json, true, false);
        let output = formatter.format_record(&create_test_record()).unwrap();
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(CliFormat::Table, false, false);
        let output = formatter.format_record(&create_test_record()).unwrap();
        assert!(output.contains("Confidence"));
        assert!(output.contains("budget"));
        assert!(output.contains("Validation failed"));
    }

    #[test]
    fn test_empty_record() {
        let formatter = Formatter::new(CliFormat::Table, false, false);
        let output = formatter.format_record(&ValidatedRecord::new()).unwrap();
        assert!(output.contains("No fields extracted"));
    }

    #[test]
    fn test_chunks_table() {
        let mut chunk = Chunk::new();
        chunk.push("section_0", "body", 1);
        let parts = vec![PartReport {
            part: 0,
            sections: vec![Section::new(0, "OVERVIEW", "body", 1)],
            chunks: vec![chunk],
        }];

        let formatter = Formatter::new(CliFormat::Table, false, false);
        let output = formatter.format_chunks(&parts).unwrap();
        assert!(output.contains("section_0"));
        assert!(output.contains("Tokens"));
    }

    #[test]
    fn test_truncate_long_values() {
        let long = "x".repeat(100);
        let short = truncate(&long);
        assert_eq!(short.chars().count(), MAX_CELL_WIDTH);
        assert!(short.ends_with("..."));
        assert_eq!(truncate("short"), "short");
    }
}
