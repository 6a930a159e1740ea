//! Command line argument parsing for the Lupe CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Lupe - a metadata inspector for tantivy indexes
#[derive(Parser, Debug, Clone)]
#[command(name = "lupe")]
#[command(about = "Inspect the metadata of a tantivy full-text index")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct LupeArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl LupeArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show index overview (path, size, format, fields)
    Info(InfoArgs),

    /// Show per-field distinct term counts
    Fields(FieldsArgs),

    /// Show the most frequent terms
    #[command(name = "top-terms")]
    TopTerms(TopTermsArgs),
}

/// Arguments for the index overview
#[derive(Parser, Debug, Clone)]
pub struct InfoArgs {
    /// Path to the index directory
    #[arg(value_name = "INDEX_PATH")]
    pub index_path: PathBuf,

    /// Also compute the total distinct term count (full index scan)
    #[arg(short, long)]
    pub terms: bool,
}

/// Arguments for per-field term counts
#[derive(Parser, Debug, Clone)]
pub struct FieldsArgs {
    /// Path to the index directory
    #[arg(value_name = "INDEX_PATH")]
    pub index_path: PathBuf,
}

/// Arguments for top terms
#[derive(Parser, Debug, Clone)]
pub struct TopTermsArgs {
    /// Path to the index directory
    #[arg(value_name = "INDEX_PATH")]
    pub index_path: PathBuf,

    /// Number of terms to show (at most 50)
    #[arg(short, long, default_value = "50")]
    pub limit: usize,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_info_command() {
        let args =
            LupeArgs::try_parse_from(["lupe", "info", "/path/to/index", "--terms"]).unwrap();

        if let Command::Info(info_args) = args.command {
            assert_eq!(info_args.index_path, PathBuf::from("/path/to/index"));
            assert!(info_args.terms);
        } else {
            panic!("Expected Info command");
        }
    }

    #[test]
    fn test_top_terms_command() {
        let args =
            LupeArgs::try_parse_from(["lupe", "top-terms", "/path/to/index", "--limit", "10"])
                .unwrap();

        if let Command::TopTerms(top_args) = args.command {
            assert_eq!(top_args.index_path, PathBuf::from("/path/to/index"));
            assert_eq!(top_args.limit, 10);
        } else {
            panic!("Expected TopTerms command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        // Default verbosity
        let args = LupeArgs::try_parse_from(["lupe", "fields", "/idx"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        // Multiple verbose flags
        let args = LupeArgs::try_parse_from(["lupe", "-vv", "fields", "/idx"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        // Quiet flag
        let args = LupeArgs::try_parse_from(["lupe", "--quiet", "fields", "/idx"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args =
            LupeArgs::try_parse_from(["lupe", "--format", "json", "fields", "/idx"]).unwrap();
        assert!(matches!(args.output_format, OutputFormat::Json));
    }
}
