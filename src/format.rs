//! On-disk index format detection.
//!
//! Every tantivy segment file ends with a footer describing the library
//! version that wrote it:
//!
//! ```text
//! [body bytes]
//! [JSON: {"version":{...},"crc":CRC32}]
//! [footer_json_len: u32 LE]
//! [magic: u32 LE = 1337]
//! ```
//!
//! This module reads the footer of one segment file to report the format
//! of an index directory without touching the rest of its contents.

use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LupeError, Result};

/// Magic number terminating every tantivy segment file footer.
pub const FOOTER_MAGIC_NUMBER: u32 = 1337;

/// File extensions of segment files that carry a footer. The JSON files
/// (`meta.json`, `.managed.json`) are written atomically and have none.
const SEGMENT_EXTENSIONS: &[&str] = &["term", "idx", "pos", "fieldnorm", "fast", "store", "del"];

/// Version record found in a segment file footer.
///
/// This mirrors the serialized form of tantivy's `Version` struct, so it
/// can describe indexes written by a different library release than the
/// one linked into this binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDetails {
    /// Major version of the tantivy release that wrote the file.
    pub major: u32,

    /// Minor version of the tantivy release that wrote the file.
    pub minor: u32,

    /// Patch version of the tantivy release that wrote the file.
    pub patch: u32,

    /// On-disk format version code.
    pub index_format_version: u32,
}

impl FormatDetails {
    /// Format details of the tantivy library linked into this binary.
    pub fn library() -> Result<FormatDetails> {
        // tantivy keeps the Version fields private; go through the same
        // serialized form the footer uses.
        let value = serde_json::to_value(tantivy::version())?;
        Ok(serde_json::from_value(value)?)
    }

    /// Whether an index in this format can be opened by the linked library.
    pub fn is_supported_by_runtime(&self) -> bool {
        match FormatDetails::library() {
            Ok(library) => self.index_format_version == library.index_format_version,
            Err(_) => false,
        }
    }

    /// Human-readable one-line description.
    pub fn describe(&self) -> String {
        format!(
            "tantivy {}.{}.{}, index format v{}",
            self.major, self.minor, self.patch, self.index_format_version
        )
    }
}

impl std::fmt::Display for FormatDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Deserialized segment file footer.
#[derive(Debug, Deserialize)]
struct FileFooter {
    version: FormatDetails,
    #[allow(dead_code)]
    crc: u32,
}

/// Detect the format of the index stored in `dir`.
///
/// Picks one segment file (the lexicographically first, for determinism)
/// and decodes its footer. Returns `Ok(None)` when the directory holds no
/// segment files yet, or when the chosen file does not end with a footer.
/// I/O failures and corrupt footers propagate as errors.
pub fn read_format_details(dir: &Path) -> Result<Option<FormatDetails>> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    for dir_entry in fs::read_dir(dir)? {
        let path = dir_entry?.path();
        if !path.is_file() {
            continue;
        }
        let has_segment_ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SEGMENT_EXTENSIONS.contains(&ext));
        if has_segment_ext {
            candidates.push(path);
        }
    }
    candidates.sort();

    match candidates.first() {
        Some(path) => read_footer(path),
        None => Ok(None),
    }
}

/// Read the footer of a single segment file.
fn read_footer(path: &Path) -> Result<Option<FormatDetails>> {
    let mut file = File::open(path)?;
    let file_len = file.metadata()?.len();
    if file_len < 8 {
        return Ok(None);
    }

    let mut trailer = [0u8; 8];
    file.seek(SeekFrom::End(-8))?;
    file.read_exact(&mut trailer)?;

    let footer_len = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]) as u64;
    let magic = u32::from_le_bytes([trailer[4], trailer[5], trailer[6], trailer[7]]);
    if magic != FOOTER_MAGIC_NUMBER || footer_len + 8 > file_len {
        return Ok(None);
    }

    let mut footer_json = vec![0u8; footer_len as usize];
    file.seek(SeekFrom::End(-8 - footer_len as i64))?;
    file.read_exact(&mut footer_json)?;

    let footer: FileFooter = serde_json::from_slice(&footer_json).map_err(|e| {
        LupeError::format(format!("unreadable footer in {}: {e}", path.display()))
    })?;
    Ok(Some(footer.version))
}
