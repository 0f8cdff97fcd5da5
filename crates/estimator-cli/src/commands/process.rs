//! Process command implementation.

use crate::cli::ProcessArgs;
use crate::error::Result;
use crate::output::Formatter;
use estimator_domain::{LlmProvider, ValidatedRecord};
use estimator_ingest::tokenizer::build_tokenizer;
use estimator_ingest::{DocumentProcessor, FileTextExtractor, IngestConfig, IngestError, LlmFieldExtractor};
use estimator_llm::OpenAiProvider;
use std::path::Path;
use tracing::info;

/// Execute the process command.
pub async fn execute_process(args: ProcessArgs, config: IngestConfig, formatter: &Formatter) -> Result<()> {
    let provider = OpenAiProvider::from_env()?;
    info!("Using model {}", provider.model());

    let record = process_with(&args.file, config, provider).await?;

    println!("{}", formatter.format_record(&record)?);
    Ok(())
}

/// Run the full pipeline on `file` against the given provider.
pub async fn process_with<L>(file: &Path, config: IngestConfig, provider: L) -> Result<ValidatedRecord>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Into<IngestError>,
{
    let tokenizer = build_tokenizer(config.tokenizer)?;
    let fields = LlmFieldExtractor::new(provider, tokenizer.clone(), &config);
    let processor = DocumentProcessor::with_tokenizer(FileTextExtractor::new(), fields, config, tokenizer)?;

    Ok(processor.process_document(file).await?)
}
