//! Splitting of documents that exceed the per-part token ceiling

use crate::tokenizer::Tokenizer;
use tracing::info;

/// Break `text` into parts of at most `ceiling` tokens
///
/// Text within the ceiling is returned untouched as a single part. Larger text
/// is cut into consecutive token windows, each rebuilt by joining its tokens
/// with a single space; line structure inside a window does not survive.
pub fn split_document(text: &str, ceiling: usize, tokenizer: &dyn Tokenizer) -> Vec<String> {
    let total = tokenizer.count(text);
    if total <= ceiling {
        return vec![text.to_string()];
    }

    let tokens = tokenizer.split(text);
    let parts: Vec<String> = tokens
        .chunks(ceiling.max(1))
        .map(|window| window.join(" "))
        .collect();

    info!(
        "Document has {} tokens, split into {} parts of at most {} tokens",
        total,
        parts.len(),
        ceiling
    );
    parts
}
