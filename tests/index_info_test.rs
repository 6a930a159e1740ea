use std::path::Path;

use tantivy::schema::{STORED, STRING, Schema, TEXT};
use tantivy::{Index, doc};
use tempfile::tempdir;

use lupe::info::{DEFAULT_TOP_TERMS, IndexInfo};

/// Build an on-disk index with two segments whose term sets overlap.
fn build_two_segment_index(path: &Path) {
    let mut schema_builder = Schema::builder();
    let title = schema_builder.add_text_field("title", TEXT | STORED);
    let body = schema_builder.add_text_field("body", TEXT);
    let tag = schema_builder.add_text_field("tag", STRING);
    let schema = schema_builder.build();

    let index = Index::create_in_dir(path, schema).unwrap();
    let mut writer = index.writer(50_000_000).unwrap();

    writer
        .add_document(doc!(
            title => "first post",
            body => "rust makes systems programming fun",
            tag => "rust",
        ))
        .unwrap();
    writer
        .add_document(doc!(
            title => "second post",
            body => "search engines index terms",
            tag => "search",
        ))
        .unwrap();
    writer.commit().unwrap();

    writer
        .add_document(doc!(
            title => "third post",
            body => "rust search engines are fast",
            tag => "rust",
        ))
        .unwrap();
    writer.commit().unwrap();
}

#[test]
fn test_on_disk_metadata() {
    let dir = tempdir().unwrap();
    build_two_segment_index(dir.path());

    let info = IndexInfo::open_in_dir(dir.path()).unwrap();

    assert_eq!(info.index_path(), Some(dir.path()));
    assert_eq!(info.dir_kind(), "MmapDirectory");
    assert!(info.total_file_size().unwrap() > 0);
    assert!(info.last_modified().is_some());
    assert!(info.version().is_some());
    assert_eq!(info.num_docs(), 3);
    assert_eq!(info.num_segments(), 2);

    let format = info.index_format().expect("segment files carry a footer");
    assert!(format.is_supported_by_runtime());
}

#[test]
fn test_field_names_are_sorted_and_complete() {
    let dir = tempdir().unwrap();
    build_two_segment_index(dir.path());

    let info = IndexInfo::open_in_dir(dir.path()).unwrap();
    assert_eq!(info.field_names(), ["body", "tag", "title"]);
}

#[test]
fn test_term_counts_deduplicate_across_segments() {
    let dir = tempdir().unwrap();
    build_two_segment_index(dir.path());

    let info = IndexInfo::open_in_dir(dir.path()).unwrap();
    let counts = info.field_term_counts().unwrap();

    // "rust" appears in both segments of body and tag but counts once.
    // body: rust, makes, systems, programming, fun, search, engines,
    //       index, terms, are, fast -> 11 distinct
    assert_eq!(counts["body"].term_count, 11);
    // tag: rust, search -> 2 distinct (raw terms, STRING field)
    assert_eq!(counts["tag"].term_count, 2);
    // title: first, second, third, post -> 4 distinct
    assert_eq!(counts["title"].term_count, 4);

    let sum: u64 = counts.values().map(|c| c.term_count).sum();
    assert_eq!(info.num_terms().unwrap(), sum);
}

#[test]
fn test_top_terms_aggregate_doc_freq_across_segments() {
    let dir = tempdir().unwrap();
    build_two_segment_index(dir.path());

    let info = IndexInfo::open_in_dir(dir.path()).unwrap();
    let top = info.top_terms().unwrap();

    assert!(!top.is_empty());
    assert!(top.len() <= DEFAULT_TOP_TERMS);

    // "post" occurs in all three titles, across both segments.
    let post = top
        .iter()
        .find(|t| t.field == "title" && t.term == "post")
        .expect("frequent term is ranked");
    assert_eq!(post.doc_freq, 3);

    // "rust" in body occurs in two documents, one in each segment.
    let rust = top
        .iter()
        .find(|t| t.field == "body" && t.term == "rust")
        .expect("frequent term is ranked");
    assert_eq!(rust.doc_freq, 2);

    // The ranking is globally non-increasing in frequency.
    for pair in top.windows(2) {
        assert!(pair[0].doc_freq >= pair[1].doc_freq);
    }
    assert_eq!(top[0].term, "post");
}

#[test]
fn test_accessors_are_cached() {
    let dir = tempdir().unwrap();
    build_two_segment_index(dir.path());

    let info = IndexInfo::open_in_dir(dir.path()).unwrap();

    let first = info.field_term_counts().unwrap();
    let second = info.field_term_counts().unwrap();
    assert!(std::ptr::eq(first, second));
    assert_eq!(info.num_terms().unwrap(), info.num_terms().unwrap());
}

#[test]
fn test_empty_on_disk_index() {
    let dir = tempdir().unwrap();
    let mut schema_builder = Schema::builder();
    schema_builder.add_text_field("body", TEXT);
    Index::create_in_dir(dir.path(), schema_builder.build()).unwrap();

    let info = IndexInfo::open_in_dir(dir.path()).unwrap();

    assert!(info.field_names().is_empty());
    assert_eq!(info.num_docs(), 0);
    assert_eq!(info.num_terms().unwrap(), 0);
    assert!(info.top_terms().unwrap().is_empty());
    // No segment files yet, so the on-disk format is unknown.
    assert!(info.index_format().is_none());
    // But the meta file exists and reports a commit version.
    assert!(info.version().is_some());
    assert!(info.last_modified().is_some());
}

#[test]
fn test_open_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("no-such-index");
    assert!(IndexInfo::open_in_dir(&missing).is_err());
}
