//! Greedy token-budgeted chunking of sections

use crate::tokenizer::Tokenizer;
use estimator_domain::{Chunk, Section};
use std::sync::Arc;
use tracing::debug;

/// Groups sections into chunks that fit one extraction call
pub struct DocumentChunker {
    max_tokens_per_chunk: usize,
    tokenizer: Arc<dyn Tokenizer>,
}

impl DocumentChunker {
    /// Create a chunker with the given per-chunk token budget
    pub fn new(max_tokens_per_chunk: usize, tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self {
            max_tokens_per_chunk,
            tokenizer,
        }
    }

    /// Token budget of a single chunk
    pub fn max_tokens_per_chunk(&self) -> usize {
        self.max_tokens_per_chunk
    }

    /// Pack sections into chunks in document order
    ///
    /// A section over budget is broken into its `\n\n` paragraphs. A single
    /// paragraph that is itself over budget still becomes one fragment, so
    /// the budget is only exceeded by single-fragment chunks.
    pub fn create_chunks(&self, sections: &[Section]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut current = Chunk::new();

        for section in sections {
            let section_tokens = self.tokenizer.count(&section.content);

            if section_tokens > self.max_tokens_per_chunk {
                debug!(
                    "Section {} has {} tokens, splitting by paragraph",
                    section.id, section_tokens
                );
                for paragraph in section.content.split("\n\n") {
                    let tokens = self.tokenizer.count(paragraph);
                    self.append(&mut chunks, &mut current, &section.id, paragraph, tokens);
                }
            } else {
                self.append(&mut chunks, &mut current, &section.id, &section.content, section_tokens);
            }
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        debug!("Packed {} sections into {} chunks", sections.len(), chunks.len());
        chunks
    }

    fn append(
        &self,
        chunks: &mut Vec<Chunk>,
        current: &mut Chunk,
        section_id: &str,
        fragment: &str,
        tokens: usize,
    ) {
        if !current.is_empty() && current.token_count + tokens > self.max_tokens_per_chunk {
            chunks.push(std::mem::take(current));
        }
        current.push(section_id, fragment, tokens);
    }
}
