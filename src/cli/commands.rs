//! Command implementations for the Lupe CLI.

use log::debug;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::Result;
use crate::info::{DEFAULT_TOP_TERMS, IndexInfo};

/// Execute a CLI command.
pub fn execute_command(args: LupeArgs) -> Result<()> {
    match &args.command {
        Command::Info(info_args) => show_info(info_args.clone(), &args),
        Command::Fields(fields_args) => show_fields(fields_args.clone(), &args),
        Command::TopTerms(top_args) => show_top_terms(top_args.clone(), &args),
    }
}

/// Show the index overview.
fn show_info(args: InfoArgs, cli_args: &LupeArgs) -> Result<()> {
    if cli_args.verbosity() > 1 {
        println!("Inspecting index at: {}", args.index_path.display());
    }

    let info = IndexInfo::open_in_dir(&args.index_path)?;

    let num_terms = if args.terms {
        Some(info.num_terms()?)
    } else {
        None
    };

    let report = IndexReport {
        index_path: info
            .index_path()
            .map(|path| path.to_string_lossy().to_string()),
        dir_kind: info.dir_kind().to_string(),
        total_file_size: info.total_file_size(),
        last_modified: info.last_modified(),
        version: info.version(),
        format: info.index_format().cloned(),
        num_docs: info.num_docs(),
        num_segments: info.num_segments(),
        field_names: info.field_names().to_vec(),
        num_terms,
    };

    output_result("Index overview", &report, cli_args)?;

    Ok(())
}

/// Show per-field distinct term counts.
fn show_fields(args: FieldsArgs, cli_args: &LupeArgs) -> Result<()> {
    if cli_args.verbosity() > 1 {
        println!("Counting terms in: {}", args.index_path.display());
    }

    let info = IndexInfo::open_in_dir(&args.index_path)?;
    let counts = info.term_counts()?;
    debug!(
        "scanned {} fields, {} distinct terms",
        counts.per_field.len(),
        counts.total
    );

    let report = FieldCountsReport {
        index_path: info
            .index_path()
            .map(|path| path.to_string_lossy().to_string()),
        fields: counts.per_field.values().cloned().collect(),
        total_terms: counts.total,
    };

    output_result("Field term counts", &report, cli_args)?;

    Ok(())
}

/// Show the most frequent terms.
fn show_top_terms(args: TopTermsArgs, cli_args: &LupeArgs) -> Result<()> {
    if cli_args.verbosity() > 1 {
        println!("Ranking terms in: {}", args.index_path.display());
    }

    let info = IndexInfo::open_in_dir(&args.index_path)?;
    let limit = args.limit.min(DEFAULT_TOP_TERMS);
    let terms = info.top_terms()?.iter().take(limit).cloned().collect();

    let report = TopTermsReport {
        index_path: info
            .index_path()
            .map(|path| path.to_string_lossy().to_string()),
        terms,
    };

    output_result("Top terms", &report, cli_args)?;

    Ok(())
}
