//! Section segmentation by header heuristics

use estimator_domain::Section;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    // "1. Introduction"
    static ref NUMBERED_HEADING: Regex = Regex::new(r"^\d+\.\s+[A-Z]").unwrap();

    // "Scope Of Work", optionally "Scope Of Work:"
    static ref TITLE_CASE_HEADING: Regex =
        Regex::new(r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*:?$").unwrap();

    static ref DIGITS: Regex = Regex::new(r"\d+").unwrap();
}

/// True when `line` looks like a section heading
///
/// All-caps detection compares the line with its uppercase form, so lines
/// without letters (`----`, `2024`) count as headings once longer than three
/// characters, as do all-caps disclaimers.
pub fn is_section_header(line: &str) -> bool {
    let trimmed = line.trim();

    if NUMBERED_HEADING.is_match(trimmed) {
        return true;
    }

    if trimmed == trimmed.to_uppercase() && trimmed.chars().count() > 3 {
        return true;
    }

    TITLE_CASE_HEADING.is_match(trimmed)
}

/// Page number announced by a "Page N" marker on this line
fn page_marker(line: &str) -> Option<u32> {
    if !line.contains("Page") {
        return None;
    }
    DIGITS.find(line).and_then(|m| m.as_str().parse().ok())
}

/// Split raw text into titled sections in document order
///
/// Lines before the first heading belong to no section, so text without any
/// heading yields no sections. Both ends of `page_range` are the page counter
/// at the moment the section is closed.
pub fn segment_document(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current_title: Option<String> = None;
    let mut current_content: Vec<&str> = Vec::new();
    let mut page_number = 1;

    for line in text.split('\n') {
        if is_section_header(line) {
            if let Some(title) = current_title.take() {
                sections.push(Section::new(
                    sections.len(),
                    title,
                    current_content.join("\n"),
                    page_number,
                ));
            }
            current_title = Some(line.trim().to_string());
            current_content.clear();
        } else {
            current_content.push(line);
        }

        if let Some(page) = page_marker(line) {
            page_number = page;
        }
    }

    if let Some(title) = current_title {
        sections.push(Section::new(
            sections.len(),
            title,
            current_content.join("\n"),
            page_number,
        ));
    }

    debug!("Segmented document into {} sections", sections.len());
    sections
}
