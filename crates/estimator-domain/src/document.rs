//! Document structure produced by segmentation and chunking

use serde::{Deserialize, Serialize};

/// A contiguous span of a source document under one heading
///
/// Sections are created once per segmentation pass and never mutated
/// afterwards; the chunker only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Identifier assigned in discovery order (`section_0`, `section_1`, ...)
    pub id: String,

    /// Detected heading text, trimmed
    pub title: String,

    /// Lines belonging to this section, joined with `\n`
    pub content: String,

    /// Best-effort `(start, end)` page numbers; both ends are always equal
    pub page_range: (u32, u32),
}

impl Section {
    /// Create a section with the id derived from its discovery index
    pub fn new(index: usize, title: impl Into<String>, content: impl Into<String>, page: u32) -> Self {
        Self {
            id: format!("section_{}", index),
            title: title.into(),
            content: content.into(),
            page_range: (page, page),
        }
    }
}

/// A token-budget-bounded group of fragments destined for one extraction call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// Section id of every fragment, in append order (repeats are meaningful)
    pub sections: Vec<String>,

    /// Text fragments in append order
    pub content: Vec<String>,

    /// Sum of the token counts of all fragments
    pub token_count: usize,
}

impl Chunk {
    /// Create an empty chunk
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no fragment has been added yet
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Append one fragment attributed to `section_id`
    pub fn push(&mut self, section_id: &str, fragment: &str, tokens: usize) {
        self.sections.push(section_id.to_string());
        self.content.push(fragment.to_string());
        self.token_count += tokens;
    }

    /// The text sent to the field extractor: fragments separated by a blank line
    pub fn text(&self) -> String {
        self.content.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_id_follows_index() {
        let section = Section::new(3, "Scope", "body", 2);
        assert_eq!(section.id, "section_3");
        assert_eq!(section.page_range, (2, 2));
    }

    #[test]
    fn test_chunk_push_accumulates() {
        let mut chunk = Chunk::new();
        assert!(chunk.is_empty());

        chunk.push("section_0", "alpha", 3);
        chunk.push("section_0", "beta", 4);

        assert!(!chunk.is_empty());
        assert_eq!(chunk.token_count, 7);
        assert_eq!(chunk.sections, vec!["section_0", "section_0"]);
        assert_eq!(chunk.text(), "alpha\n\nbeta");
    }

    #[test]
    fn test_section_serializes_camel_case() {
        let section = Section::new(0, "Scope", "body", 1);
        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["pageRange"], serde_json::json!([1, 1]));
    }
}
