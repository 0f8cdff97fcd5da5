//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Estimator CLI - Extract validated project fields from RFPs and scope documents.
#[derive(Debug, Parser)]
#[command(name = "estimator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Pipeline configuration file (TOML)
    #[arg(short, long, global = true, env = "ESTIMATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "json")]
    pub format: CliFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Settings that take precedence over the configuration file and environment.
#[derive(Debug, Clone, Default, Args)]
pub struct OverrideArgs {
    /// Token budget of a single chunk
    #[arg(long, global = true)]
    pub max_tokens_per_chunk: Option<usize>,

    /// Token ceiling above which a document is split into parts
    #[arg(long, global = true)]
    pub max_tokens_per_part: Option<usize>,

    /// Fields below this confidence are marked invalid (0.0-1.0)
    #[arg(long, global = true)]
    pub min_confidence: Option<f64>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// JSON (default)
    Json,
    /// Human-readable table
    Table,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract and validate fields from a document
    Process(ProcessArgs),

    /// Show the sections and chunks of a document without calling the model
    Chunks(ChunksArgs),

    /// Print the effective configuration as TOML
    Config,
}

/// Arguments for the process command.
#[derive(Debug, Parser)]
pub struct ProcessArgs {
    /// Document to process (.pdf, .docx or .txt)
    pub file: PathBuf,
}

/// Arguments for the chunks command.
#[derive(Debug, Parser)]
pub struct ChunksArgs {
    /// Document to inspect (.pdf, .docx or .txt)
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_process_with_overrides() {
        let cli = Cli::try_parse_from([
            "estimator",
            "process",
            "scope.pdf",
            "--max-tokens-per-chunk",
            "2000",
            "--min-confidence",
            "0.5",
            "--pretty",
        ])
        .unwrap();

        assert!(cli.pretty);
        assert_eq!(cli.format, CliFormat::Json);
        assert_eq!(cli.overrides.max_tokens_per_chunk, Some(2000));
        assert_eq!(cli.overrides.min_confidence, Some(0.5));
        assert!(cli.overrides.max_tokens_per_part.is_none());
        match cli.command {
            Command::Process(args) => assert_eq!(args.file, PathBuf::from("scope.pdf")),
            other => panic!("expected process command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_chunks_table() {
        let cli = Cli::try_parse_from(["estimator", "--format", "table", "chunks", "rfp.docx"]).unwrap();
        assert_eq!(cli.format, CliFormat::Table);
        assert!(matches!(cli.command, Command::Chunks(_)));
    }

    #[test]
    fn test_process_requires_file() {
        assert!(Cli::try_parse_from(["estimator", "process"]).is_err());
    }
}
