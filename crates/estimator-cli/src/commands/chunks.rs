//! Chunks command implementation.

use crate::cli::ChunksArgs;
use crate::error::Result;
use crate::output::{Formatter, PartReport};
use estimator_domain::TextExtractor;
use estimator_ingest::tokenizer::build_tokenizer;
use estimator_ingest::{
    mime_type_for_path, segment_document, split_document, DocumentChunker, FileTextExtractor,
    IngestConfig,
};

/// Execute the chunks command.
pub fn execute_chunks(args: ChunksArgs, config: &IngestConfig, formatter: &Formatter) -> Result<()> {
    let text = FileTextExtractor::new().extract(&args.file, &mime_type_for_path(&args.file))?;
    let parts = plan_chunks(&text, config)?;

    println!("{}", formatter.format_chunks(&parts)?);
    Ok(())
}

/// Split, segment and chunk `text` the way the pipeline would.
pub fn plan_chunks(text: &str, config: &IngestConfig) -> Result<Vec<PartReport>> {
    let tokenizer = build_tokenizer(config.tokenizer)?;
    let chunker = DocumentChunker::new(config.max_tokens_per_chunk, tokenizer.clone());

    Ok(split_document(text, config.max_tokens_per_document_part, tokenizer.as_ref())
        .iter()
        .enumerate()
        .map(|(part, part_text)| {
            let sections = segment_document(part_text);
            let chunks = chunker.create_chunks(&sections);
            PartReport {
                part,
                sections,
                chunks,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use estimator_ingest::TokenizerKind;

    #[test]
    fn test_plan_chunks() {
        let config = IngestConfig {
            max_tokens_per_chunk: 5,
            tokenizer: TokenizerKind::Whitespace,
            ..IngestConfig::default()
        };
        let text = "OVERVIEW\none two three\nDEVICES\nfour five six";

        let parts = plan_chunks(text, &config).unwrap();

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].sections.len(), 2);
        assert_eq!(parts[0].chunks.len(), 2);
        assert_eq!(parts[0].chunks[1].sections, vec!["section_1"]);
    }
}
