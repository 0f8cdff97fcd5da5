//! Estimator Domain Layer
//!
//! Core value types and collaborator contracts for the document ingestion
//! pipeline. Infrastructure (file parsing, tokenization, LLM access) lives in
//! other crates and plugs in through the traits defined here.
//!
//! ## Key Concepts
//!
//! - **Section**: a titled, contiguous span of a source document
//! - **Chunk**: a token-bounded group of fragments sent to one extraction call
//! - **FieldValue**: the closed set of shapes an extracted field can take
//! - **ValidatedField**: a merged field annotated with its validation outcome
//!
//! ## Architecture
//!
//! ```text
//! TextExtractor → sections → chunks → FieldExtractor → FieldSet → merge → validate
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod field;
pub mod traits;
pub mod validation;

// Re-exports for convenience
pub use document::{Chunk, Section};
pub use field::{ExtractedField, FieldSet, FieldValue, MergedRecord};
pub use traits::{FieldExtractor, GenerationRequest, LlmProvider, TextExtractor};
pub use validation::{ValidatedField, ValidatedRecord, ValidationResult};
