//! Prompt construction for field extraction

/// System message sent with every extraction call
pub const SYSTEM_MESSAGE: &str =
    "You are a document analysis assistant. Extract structured information from the provided text.";

/// Builds the user prompt for one chunk
pub struct PromptBuilder<'a> {
    text: &'a str,
    sections: &'a [String],
}

impl<'a> PromptBuilder<'a> {
    /// Create a builder for `text` drawn from the given section ids
    pub fn new(text: &'a str, sections: &'a [String]) -> Self {
        Self { text, sections }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str("Please analyze the following text and extract structured information.\n");
        prompt.push_str(&format!(
            "The text is from sections: {}\n\n",
            self.sections.join(", ")
        ));

        prompt.push_str("Text content:\n");
        prompt.push_str(self.text);
        prompt.push_str("\n\n");

        prompt.push_str(OUTPUT_FORMAT);
        prompt.push_str("\n\n");
        prompt.push_str(FOCUS_AREAS);

        prompt
    }
}

const OUTPUT_FORMAT: &str = r#"Please provide the extracted information in the following JSON format:
{
    "extracted_fields": {
        "field_name": {
            "value": "extracted value",
            "confidence": 0.95,
            "source_section": "section_id"
        }
    }
}"#;

const FOCUS_AREAS: &str = r#"Focus on extracting:
1. Key metrics and measurements
2. Important dates and deadlines
3. Project requirements and specifications
4. Cost estimates and budgets
5. Contact information and stakeholders
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_sections() {
        let sections = vec!["section_0".to_string(), "section_2".to_string()];
        let prompt = PromptBuilder::new("Test text", &sections).build();
        assert!(prompt.contains("The text is from sections: section_0, section_2"));
    }

    #[test]
    fn test_prompt_includes_text() {
        let prompt = PromptBuilder::new("Install 40 smoke detectors", &[]).build();
        assert!(prompt.contains("Text content:\nInstall 40 smoke detectors\n"));
    }

    #[test]
    fn test_prompt_includes_format_and_focus() {
        let prompt = PromptBuilder::new("Test", &[]).build();
        assert!(prompt.contains("\"extracted_fields\""));
        assert!(prompt.contains("source_section"));
        assert!(prompt.contains("4. Cost estimates and budgets"));
    }
}
