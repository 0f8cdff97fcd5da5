//! Estimator Ingest
//!
//! Turns arbitrarily large project documents (RFPs, scopes of work, device
//! schedules) into one validated record of extracted fields.
//!
//! # Overview
//!
//! Source documents are far larger than a single model call can take. The
//! pipeline breaks them down into section-aware, token-bounded chunks, asks a
//! field extractor about every chunk, and folds the partial answers back into
//! a single record annotated with validation results.
//!
//! # Architecture
//!
//! ```text
//! file → TextExtractor → split → segment → chunk → FieldExtractor → merge → validate
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use estimator_ingest::{DocumentProcessor, FileTextExtractor, IngestConfig, LlmFieldExtractor};
//! use estimator_ingest::tokenizer::build_tokenizer;
//! use estimator_llm::MockProvider;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = IngestConfig::default();
//! let tokenizer = build_tokenizer(config.tokenizer)?;
//!
//! let llm = MockProvider::new(r#"{"extracted_fields": {}}"#);
//! let fields = LlmFieldExtractor::new(llm, tokenizer.clone(), &config);
//! let processor = DocumentProcessor::with_tokenizer(FileTextExtractor::new(), fields, config, tokenizer)?;
//!
//! let record = processor.process_document(Path::new("scope_of_work.pdf")).await?;
//! for (name, field) in &record {
//!     println!("{}: {} (valid: {})", name, field.value, field.is_valid());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod prompt;
mod parser;
mod extractor;
mod processor;

pub mod chunking;
pub mod merge;
pub mod segmenter;
pub mod splitter;
pub mod text;
pub mod tokenizer;
pub mod validator;


pub use error::IngestError;
pub use config::{IngestConfig, TokenizerKind};
pub use chunking::DocumentChunker;
pub use extractor::LlmFieldExtractor;
pub use merge::{merge, merge_all};
pub use parser::parse_extraction_response;
pub use processor::DocumentProcessor;
pub use segmenter::segment_document;
pub use splitter::split_document;
pub use text::{mime_type_for_path, DocumentKind, FileTextExtractor};
pub use validator::FieldValidator;
