//! Output formatting for CLI commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cli::args::{LupeArgs, OutputFormat};
use crate::error::Result;
use crate::format::FormatDetails;
use crate::info::{FieldTermCount, TermStats};

/// Overview report for one index.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexReport {
    pub index_path: Option<String>,
    pub dir_kind: String,
    pub total_file_size: Option<u64>,
    pub last_modified: Option<DateTime<Utc>>,
    pub version: Option<u64>,
    pub format: Option<FormatDetails>,
    pub num_docs: u64,
    pub num_segments: usize,
    pub field_names: Vec<String>,
    /// Only present when the term scan was requested.
    pub num_terms: Option<u64>,
}

/// Per-field term count report.
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldCountsReport {
    pub index_path: Option<String>,
    pub fields: Vec<FieldTermCount>,
    pub total_terms: u64,
}

/// Top terms report.
#[derive(Debug, Serialize, Deserialize)]
pub struct TopTermsReport {
    pub index_path: Option<String>,
    pub terms: Vec<TermStats>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &LupeArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &LupeArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    // Convert to JSON value for easier manipulation
    let value = serde_json::to_value(result)?;

    match result {
        _ if std::any::type_name::<T>().contains("IndexReport") => {
            output_index_report_human(&value)
        }
        _ if std::any::type_name::<T>().contains("FieldCountsReport") => {
            output_field_counts_human(&value)
        }
        _ if std::any::type_name::<T>().contains("TopTermsReport") => {
            output_top_terms_human(&value)
        }
        _ => output_generic_human(&value),
    }
}

/// Render an unknown value as the conventional sentinel.
fn or_na(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::Null) | None => "N/A".to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Output the index overview in human format.
fn output_index_report_human(value: &serde_json::Value) -> Result<()> {
    if let Some(obj) = value.as_object() {
        println!("Index Overview:");
        println!("═══════════════");

        println!("Path: {}", or_na(obj.get("index_path")));
        println!("Directory: {}", or_na(obj.get("dir_kind")));

        match obj.get("total_file_size").and_then(|s| s.as_u64()) {
            Some(size) => println!("Size: {}", format_bytes(size)),
            None => println!("Size: N/A"),
        }

        println!("Last modified: {}", or_na(obj.get("last_modified")));
        println!("Version: {}", or_na(obj.get("version")));

        match obj.get("format").and_then(|f| f.as_object()) {
            Some(format) => {
                let code = format
                    .get("index_format_version")
                    .and_then(|v| v.as_u64())
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "N/A".to_string());
                println!("Format: v{code}");
                let major = format.get("major").and_then(|v| v.as_u64()).unwrap_or(0);
                let minor = format.get("minor").and_then(|v| v.as_u64()).unwrap_or(0);
                let patch = format.get("patch").and_then(|v| v.as_u64()).unwrap_or(0);
                println!("Written by: tantivy {major}.{minor}.{patch}");
            }
            None => println!("Format: -1 (unknown)"),
        }

        if let Some(docs) = obj.get("num_docs").and_then(|d| d.as_u64()) {
            println!("Documents: {docs}");
        }
        if let Some(segments) = obj.get("num_segments").and_then(|s| s.as_u64()) {
            println!("Segments: {segments}");
        }
        if let Some(terms) = obj.get("num_terms").and_then(|t| t.as_u64()) {
            println!("Distinct terms: {terms}");
        }

        if let Some(fields) = obj.get("field_names").and_then(|f| f.as_array()) {
            println!();
            println!("Fields ({}):", fields.len());
            println!("───────────");
            for field in fields {
                if let Some(name) = field.as_str() {
                    println!("  {name}");
                }
            }
        }
    }
    Ok(())
}

/// Output per-field term counts in human format.
fn output_field_counts_human(value: &serde_json::Value) -> Result<()> {
    if let Some(obj) = value.as_object() {
        println!("Field Term Counts:");
        println!("══════════════════");

        if let Some(fields) = obj.get("fields").and_then(|f| f.as_array()) {
            for field in fields {
                let name = field.get("field").and_then(|n| n.as_str()).unwrap_or("?");
                let count = field
                    .get("term_count")
                    .and_then(|c| c.as_u64())
                    .unwrap_or(0);
                println!("{name}: {count}");
            }
        }

        if let Some(total) = obj.get("total_terms").and_then(|t| t.as_u64()) {
            println!();
            println!("Total distinct terms: {total}");
        }
    }
    Ok(())
}

/// Output top terms in human format.
fn output_top_terms_human(value: &serde_json::Value) -> Result<()> {
    if let Some(obj) = value.as_object()
        && let Some(terms) = obj.get("terms").and_then(|t| t.as_array())
    {
        println!("Top Terms:");
        println!("══════════");

        for (i, entry) in terms.iter().enumerate() {
            let field = entry.get("field").and_then(|f| f.as_str()).unwrap_or("?");
            let term = entry.get("term").and_then(|t| t.as_str()).unwrap_or("?");
            let doc_freq = entry.get("doc_freq").and_then(|d| d.as_u64()).unwrap_or(0);
            println!("{:3}. {field}:{term} ({doc_freq})", i + 1);
        }

        if terms.is_empty() {
            println!("(no terms)");
        }
    }
    Ok(())
}

/// Output generic data in human format.
fn output_generic_human(value: &serde_json::Value) -> Result<()> {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = format_value(val);
                println!("{key}: {formatted_val}");
            }
        }
        _ => {
            let formatted_value = format_value(value);
            println!("{formatted_value}");
        }
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &LupeArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "N/A".to_string(),
    }
}

/// Format bytes into human-readable format.
fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        let unit = UNITS[unit_index];
        format!("{bytes} {unit}")
    } else {
        let unit = UNITS[unit_index];
        format!("{size:.1} {unit}")
    }
}
