//! Lazily computed summary metadata for an open index.
//!
//! [`IndexInfo`] is a read-only reporting facade over a tantivy index: it
//! gathers cheap metadata eagerly at construction (path, size, format,
//! field names) and defers whole-index scans (distinct term counts, top
//! terms by document frequency) until first requested, caching the result
//! for the lifetime of the object.

use std::collections::{BTreeMap, BinaryHeap};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tantivy::schema::Field;
use tantivy::{Index, InvertedIndexReader, ReloadPolicy, Searcher};

use crate::error::Result;
use crate::format::{self, FormatDetails};
use crate::terms::TermMerger;

/// How many top terms are collected and cached.
pub const DEFAULT_TOP_TERMS: usize = 50;

/// Distinct term count for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTermCount {
    /// The field name.
    pub field: String,

    /// Number of distinct terms observed for the field, deduplicated
    /// across segments.
    pub term_count: u64,
}

/// A term together with its aggregated document frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermStats {
    /// The field the term belongs to.
    pub field: String,

    /// The term value, rendered lossily as UTF-8.
    pub term: String,

    /// Number of documents containing the term, summed across segments.
    pub doc_freq: u64,
}

/// Result of one full term-counting pass over the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCounts {
    /// Per-field distinct term counts, keyed by field name.
    pub per_field: BTreeMap<String, FieldTermCount>,

    /// Total distinct term count. Always equals the sum of the per-field
    /// counts.
    pub total: u64,
}

/// Summary metadata for one index snapshot.
///
/// The snapshot is pinned by holding a [`Searcher`]; later commits to the
/// index are not reflected, which makes the compute-once caching of the
/// expensive accessors sound. The `IndexInfo` never closes or mutates the
/// underlying index.
///
/// Metadata that requires on-disk storage (total size, last-modified,
/// format details) degrades to `None` when the index has no directory
/// path, e.g. for a RAM index. The commit version degrades independently:
/// it is reported whenever the index meta file is readable, path or not.
pub struct IndexInfo {
    index: Index,
    searcher: Searcher,
    index_path: Option<PathBuf>,
    dir_kind: String,
    total_file_size: Option<u64>,
    last_modified: Option<DateTime<Utc>>,
    version: Option<u64>,
    index_format: Option<FormatDetails>,
    field_names: Vec<String>,
    num_segments: usize,
    term_counts: OnceCell<TermCounts>,
    top_terms: OnceCell<Vec<TermStats>>,
}

impl IndexInfo {
    /// Open the index stored in `path` and inspect it.
    pub fn open_in_dir<P: AsRef<Path>>(path: P) -> Result<IndexInfo> {
        let index = Index::open_in_dir(path.as_ref())?;
        IndexInfo::new(index, Some(path.as_ref().to_path_buf()))
    }

    /// Inspect a pre-opened index handle.
    ///
    /// Pass the directory path when the index is file-backed; without it,
    /// all storage-derived metadata reports as unknown rather than failing.
    pub fn from_index(index: Index, index_path: Option<PathBuf>) -> Result<IndexInfo> {
        IndexInfo::new(index, index_path)
    }

    fn new(index: Index, index_path: Option<PathBuf>) -> Result<IndexInfo> {
        let searcher = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?
            .searcher();

        let dir_kind = match &index_path {
            Some(_) => "MmapDirectory".to_string(),
            None => "N/A".to_string(),
        };

        let total_file_size = match &index_path {
            Some(path) => Some(calc_total_file_size(path)?),
            None => None,
        };
        let last_modified = match &index_path {
            Some(path) => read_last_modified(path)?,
            None => None,
        };
        let index_format = match &index_path {
            Some(path) => format::read_format_details(path)?,
            None => None,
        };

        // The commit version comes from the meta file, not from the
        // directory path, and degrades on its own.
        let (version, num_segments) = match index.load_metas() {
            Ok(meta) => (Some(meta.opstamp), meta.segments.len()),
            Err(e) => {
                debug!("index meta unavailable: {e}");
                (None, searcher.segment_readers().len())
            }
        };

        let mut field_names: Vec<String> = index
            .fields_metadata()?
            .into_iter()
            .map(|field_metadata| field_metadata.field_name)
            .collect();
        field_names.sort();
        field_names.dedup();

        Ok(IndexInfo {
            index,
            searcher,
            index_path,
            dir_kind,
            total_file_size,
            last_modified,
            version,
            index_format,
            field_names,
            num_segments,
            term_counts: OnceCell::new(),
            top_terms: OnceCell::new(),
        })
    }

    /// The inspected index handle.
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// The pinned searcher this snapshot was taken from.
    pub fn searcher(&self) -> &Searcher {
        &self.searcher
    }

    /// Directory path of the index, if file-backed.
    pub fn index_path(&self) -> Option<&Path> {
        self.index_path.as_deref()
    }

    /// Name of the directory implementation backing the index, `"N/A"`
    /// when no storage path is known.
    pub fn dir_kind(&self) -> &str {
        &self.dir_kind
    }

    /// Total size of the index files in bytes, if storage is available.
    pub fn total_file_size(&self) -> Option<u64> {
        self.total_file_size
    }

    /// Modification time of the current commit point, if storage is
    /// available.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }

    /// Commit version (opstamp) of the inspected snapshot.
    pub fn version(&self) -> Option<u64> {
        self.version
    }

    /// On-disk format of the index, decoded from a segment file footer.
    /// `None` for RAM indexes and for indexes without any segment files.
    pub fn index_format(&self) -> Option<&FormatDetails> {
        self.index_format.as_ref()
    }

    /// Alphabetically sorted names of the fields present in the index.
    ///
    /// This is the union of the fields that actually occur in some
    /// segment, so an empty index reports no fields even when its schema
    /// declares some.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Number of segments in the inspected commit.
    pub fn num_segments(&self) -> usize {
        self.num_segments
    }

    /// Number of live documents visible to the snapshot.
    pub fn num_docs(&self) -> u64 {
        self.searcher.num_docs()
    }

    /// Total number of distinct terms in the index.
    ///
    /// The first call performs one full pass over all fields and segments;
    /// the result is cached.
    pub fn num_terms(&self) -> Result<u64> {
        Ok(self.term_counts()?.total)
    }

    /// Per-field distinct term counts, keyed by field name.
    ///
    /// Computed together with [`num_terms`](Self::num_terms) in a single
    /// cached pass.
    pub fn field_term_counts(&self) -> Result<&BTreeMap<String, FieldTermCount>> {
        Ok(&self.term_counts()?.per_field)
    }

    /// The cached term-counting summary, computing it on first call.
    pub fn term_counts(&self) -> Result<&TermCounts> {
        self.term_counts.get_or_try_init(|| self.count_terms())
    }

    /// The top [`DEFAULT_TOP_TERMS`] terms by document frequency across
    /// all fields, ordered by descending frequency with ties broken by
    /// term and field name. Computed once and cached.
    pub fn top_terms(&self) -> Result<&[TermStats]> {
        self.top_terms
            .get_or_try_init(|| self.collect_top_terms(DEFAULT_TOP_TERMS))
            .map(Vec::as_slice)
    }

    /// One full pass over every indexed field, counting distinct terms.
    fn count_terms(&self) -> Result<TermCounts> {
        debug!(
            "counting distinct terms over {} segments",
            self.searcher.segment_readers().len()
        );
        let schema = self.index.schema();
        let mut per_field = BTreeMap::new();
        let mut total = 0u64;

        for (field, field_entry) in schema.fields() {
            if !field_entry.is_indexed() {
                continue;
            }
            let inverted_indexes = self.segment_inverted_indexes(field)?;
            let mut streams = Vec::with_capacity(inverted_indexes.len());
            for inverted_index in &inverted_indexes {
                streams.push(inverted_index.terms().stream()?);
            }

            let mut merger = TermMerger::new(streams);
            let mut term_count = 0u64;
            while merger.advance() {
                term_count += 1;
            }
            // Fields declared in the schema but absent from every segment
            // are not reported.
            if term_count == 0 {
                continue;
            }
            total += term_count;
            per_field.insert(
                field_entry.name().to_string(),
                FieldTermCount {
                    field: field_entry.name().to_string(),
                    term_count,
                },
            );
        }

        debug!("counted {total} distinct terms in {} fields", per_field.len());
        Ok(TermCounts { per_field, total })
    }

    /// Rank all terms by aggregated document frequency, keeping the top
    /// `limit`.
    fn collect_top_terms(&self, limit: usize) -> Result<Vec<TermStats>> {
        debug!("collecting top {limit} terms");
        let schema = self.index.schema();
        let mut heap: BinaryHeap<std::cmp::Reverse<RankedTerm>> =
            BinaryHeap::with_capacity(limit + 1);

        for (field, field_entry) in schema.fields() {
            if !field_entry.is_indexed() {
                continue;
            }
            let inverted_indexes = self.segment_inverted_indexes(field)?;
            let mut streams = Vec::with_capacity(inverted_indexes.len());
            for inverted_index in &inverted_indexes {
                streams.push(inverted_index.terms().stream()?);
            }

            let mut merger = TermMerger::new(streams);
            while merger.advance() {
                let doc_freq = merger.doc_freq();
                if heap.len() == limit {
                    // Cannot displace anything; skip before allocating.
                    match heap.peek() {
                        Some(std::cmp::Reverse(weakest)) if doc_freq < weakest.doc_freq => {
                            continue;
                        }
                        _ => {}
                    }
                }
                heap.push(std::cmp::Reverse(RankedTerm {
                    doc_freq,
                    term: String::from_utf8_lossy(merger.term()).into_owned(),
                    field: field_entry.name().to_string(),
                }));
                if heap.len() > limit {
                    heap.pop();
                }
            }
        }

        let mut ranked: Vec<RankedTerm> = heap
            .into_iter()
            .map(|std::cmp::Reverse(term)| term)
            .collect();
        ranked.sort_by(|a, b| {
            b.doc_freq
                .cmp(&a.doc_freq)
                .then_with(|| a.term.cmp(&b.term))
                .then_with(|| a.field.cmp(&b.field))
        });

        Ok(ranked
            .into_iter()
            .map(|term| TermStats {
                field: term.field,
                term: term.term,
                doc_freq: term.doc_freq,
            })
            .collect())
    }

    /// Per-segment inverted index readers for one field. The readers must
    /// outlive any term streams opened from them.
    fn segment_inverted_indexes(&self, field: Field) -> Result<Vec<Arc<InvertedIndexReader>>> {
        self.searcher
            .segment_readers()
            .iter()
            .map(|segment| segment.inverted_index(field).map_err(Into::into))
            .collect()
    }
}

impl fmt::Debug for IndexInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexInfo")
            .field("index_path", &self.index_path)
            .field("dir_kind", &self.dir_kind)
            .field("num_segments", &self.num_segments)
            .field("field_names", &self.field_names)
            .finish_non_exhaustive()
    }
}

/// Heap entry for top-term selection. The natural order puts the weakest
/// candidate first: lowest frequency, and among equal frequencies the
/// lexicographically largest (term, field) pair, so that smaller terms are
/// retained on ties.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RankedTerm {
    doc_freq: u64,
    term: String,
    field: String,
}

impl PartialOrd for RankedTerm {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedTerm {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.doc_freq
            .cmp(&other.doc_freq)
            .then_with(|| other.term.cmp(&self.term))
            .then_with(|| other.field.cmp(&self.field))
    }
}

/// Sum of the sizes of the regular files in the index directory.
fn calc_total_file_size(dir: &Path) -> Result<u64> {
    let mut total = 0u64;
    for dir_entry in fs::read_dir(dir)? {
        let metadata = dir_entry?.metadata()?;
        if metadata.is_file() {
            total += metadata.len();
        }
    }
    Ok(total)
}

/// Modification time of the commit point, taken from the meta file.
fn read_last_modified(dir: &Path) -> Result<Option<DateTime<Utc>>> {
    match fs::metadata(dir.join("meta.json")) {
        Ok(metadata) => Ok(metadata.modified().ok().map(DateTime::<Utc>::from)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
