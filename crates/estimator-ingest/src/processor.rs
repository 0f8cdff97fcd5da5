//! Document processing pipeline
//!
//! ```text
//! file → text → parts → sections → chunks → field sets → merge → validate
//! ```
//!
//! Parts are processed one after another. Within a part every chunk is sent to
//! the field extractor at once on the blocking pool, and results are gathered
//! back in chunk order.

use crate::chunking::DocumentChunker;
use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::merge::merge_all;
use crate::segmenter::segment_document;
use crate::splitter::split_document;
use crate::text::mime_type_for_path;
use crate::tokenizer::{build_tokenizer, Tokenizer};
use crate::validator::FieldValidator;
use estimator_domain::{Chunk, FieldExtractor, FieldSet, MergedRecord, TextExtractor, ValidatedRecord};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Turns source documents into validated field records
pub struct DocumentProcessor<T, F> {
    text_extractor: Arc<T>,
    field_extractor: Arc<F>,
    tokenizer: Arc<dyn Tokenizer>,
    chunker: DocumentChunker,
    validator: FieldValidator,
    config: IngestConfig,
}

impl<T, F> DocumentProcessor<T, F>
where
    T: TextExtractor + Send + Sync + 'static,
    T::Error: Into<IngestError>,
    F: FieldExtractor + Send + Sync + 'static,
    F::Error: Into<IngestError>,
{
    /// Create a processor using the tokenizer selected in `config`
    ///
    /// # Errors
    ///
    /// Returns `IngestError::Config` if the configuration is invalid or the
    /// tokenizer cannot be loaded.
    pub fn new(text_extractor: T, field_extractor: F, config: IngestConfig) -> Result<Self, IngestError> {
        let tokenizer = build_tokenizer(config.tokenizer)?;
        Self::with_tokenizer(text_extractor, field_extractor, config, tokenizer)
    }

    /// Create a processor sharing an already loaded tokenizer
    pub fn with_tokenizer(
        text_extractor: T,
        field_extractor: F,
        config: IngestConfig,
        tokenizer: Arc<dyn Tokenizer>,
    ) -> Result<Self, IngestError> {
        config.validate()?;

        Ok(Self {
            text_extractor: Arc::new(text_extractor),
            field_extractor: Arc::new(field_extractor),
            chunker: DocumentChunker::new(config.max_tokens_per_chunk, Arc::clone(&tokenizer)),
            validator: FieldValidator::new(config.min_confidence_threshold),
            tokenizer,
            config,
        })
    }

    /// Effective configuration
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Extract, chunk, analyze and validate the document at `path`
    pub async fn process_document(&self, path: &Path) -> Result<ValidatedRecord, IngestError> {
        info!("Starting document processing for: {}", path.display());

        let text = self.ingest(path).await.inspect_err(|e| {
            error!("Error during document ingestion: {}", e);
        })?;
        info!("Document ingestion successful ({} characters)", text.len());

        self.process_text(&text).await
    }

    /// Run the pipeline on text that has already been extracted
    pub async fn process_text(&self, text: &str) -> Result<ValidatedRecord, IngestError> {
        let parts = split_document(text, self.config.max_tokens_per_document_part, self.tokenizer.as_ref());

        let mut part_results = Vec::with_capacity(parts.len());
        for (index, part) in parts.iter().enumerate() {
            info!("Processing document part {}/{}", index + 1, parts.len());
            part_results.push(self.process_part(part).await?);
        }

        let merged = merge_all(&part_results);
        let validated = self.validator.validate_fields(&merged);

        info!("Document processing completed with {} fields", validated.len());
        Ok(validated)
    }

    /// Segment, chunk and extract one document part
    pub async fn process_part(&self, text: &str) -> Result<MergedRecord, IngestError> {
        let sections = segment_document(text);
        info!("Section segmentation complete. Found {} sections", sections.len());

        let chunks = self.chunker.create_chunks(&sections);
        info!("Chunking complete. Created {} chunks", chunks.len());

        let handles: Vec<_> = chunks
            .into_iter()
            .map(|chunk| self.spawn_extraction(chunk))
            .collect();

        // Every call settles before any error is reported
        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            outcomes.push(handle.await.map_err(IngestError::from).and_then(|outcome| outcome));
        }

        let mut chunk_results = Vec::with_capacity(outcomes.len());
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(fields) => {
                    debug!("Chunk {} yielded {} fields", index, fields.len());
                    chunk_results.push(fields);
                }
                Err(e) if e.is_recoverable() => {
                    warn!("Chunk {} produced no usable fields: {}", index, e);
                    chunk_results.push(FieldSet::new());
                }
                Err(e) => {
                    error!("Error during field extraction of chunk {}: {}", index, e);
                    return Err(e);
                }
            }
        }

        info!("Field extraction complete for {} chunks", chunk_results.len());
        Ok(merge_all(&chunk_results))
    }

    async fn ingest(&self, path: &Path) -> Result<String, IngestError> {
        let extractor = Arc::clone(&self.text_extractor);
        let path = path.to_path_buf();
        let mime_type = mime_type_for_path(&path);

        tokio::task::spawn_blocking(move || {
            extractor
                .extract(&path, &mime_type)
                .map_err(Into::<IngestError>::into)
        })
        .await?
    }

    fn spawn_extraction(&self, chunk: Chunk) -> JoinHandle<Result<FieldSet, IngestError>> {
        let extractor = Arc::clone(&self.field_extractor);
        let limit = self.config.extraction_timeout();

        tokio::spawn(async move {
            let call = tokio::task::spawn_blocking(move || {
                extractor
                    .extract(&chunk.text(), &chunk.sections)
                    .map_err(Into::<IngestError>::into)
            });

            match tokio::time::timeout(limit, call).await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(join_error)) => Err(join_error.into()),
                Err(_) => Err(IngestError::ExtractionFailure(format!(
                    "Field extraction timed out after {:?}",
                    limit
                ))),
            }
        })
    }
}
