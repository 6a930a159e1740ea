//! Merged term enumeration across index segments.
//!
//! Each segment stores its own sorted term dictionary per field. To count
//! distinct terms (or aggregate document frequencies) for a whole index,
//! the per-segment streams are combined with an n-way min-heap merge that
//! visits every distinct term exactly once, in byte order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tantivy::termdict::TermStreamer;

/// One per-segment term stream participating in a merge.
struct HeapEntry<'a> {
    stream: TermStreamer<'a>,
    segment_ord: usize,
}

impl PartialEq for HeapEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry<'_> {}

impl PartialOrd for HeapEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse the comparison so the smallest
        // term surfaces first. Ties are broken by segment ordinal.
        other
            .stream
            .key()
            .cmp(self.stream.key())
            .then_with(|| other.segment_ord.cmp(&self.segment_ord))
    }
}

/// N-way streaming merge over sorted per-segment term streams.
///
/// Memory profile: O(N) for N source streams.
pub struct TermMerger<'a> {
    /// Streams positioned past the current term.
    heap: BinaryHeap<HeapEntry<'a>>,

    /// Streams currently positioned on the same term.
    current: Vec<HeapEntry<'a>>,

    /// Reusable buffer holding the current term.
    term: Vec<u8>,
}

impl<'a> TermMerger<'a> {
    /// Create a merger over the given streams, one per segment.
    pub fn new(streams: Vec<TermStreamer<'a>>) -> TermMerger<'a> {
        let mut heap = BinaryHeap::with_capacity(streams.len());
        for (segment_ord, mut stream) in streams.into_iter().enumerate() {
            if stream.advance() {
                heap.push(HeapEntry {
                    stream,
                    segment_ord,
                });
            }
        }
        TermMerger {
            heap,
            current: Vec::new(),
            term: Vec::new(),
        }
    }

    /// Advance to the next distinct term.
    ///
    /// Returns `false` once all streams are exhausted.
    pub fn advance(&mut self) -> bool {
        for mut entry in self.current.drain(..) {
            if entry.stream.advance() {
                self.heap.push(entry);
            }
        }

        let head = match self.heap.pop() {
            Some(head) => head,
            None => {
                self.term.clear();
                return false;
            }
        };
        self.term.clear();
        self.term.extend_from_slice(head.stream.key());
        self.current.push(head);

        // Gather every stream positioned on the same term.
        loop {
            match self.heap.peek() {
                Some(next) if next.stream.key() == self.term.as_slice() => {
                    if let Some(next) = self.heap.pop() {
                        self.current.push(next);
                    }
                }
                _ => break,
            }
        }

        true
    }

    /// The current term bytes. Valid after a successful [`advance`](Self::advance).
    pub fn term(&self) -> &[u8] {
        &self.term
    }

    /// Document frequency of the current term, summed across segments.
    pub fn doc_freq(&self) -> u64 {
        self.current
            .iter()
            .map(|entry| u64::from(entry.stream.value().doc_freq))
            .sum()
    }

    /// Number of streams that still hold terms.
    pub fn remaining_sources(&self) -> usize {
        self.heap.len() + self.current.len()
    }
}

#[cfg(test)]
mod tests {
    use tantivy::schema::{Schema, TEXT};
    use tantivy::{Index, doc};

    use super::*;

    #[test]
    fn test_merge_deduplicates_across_segments() {
        let mut schema_builder = Schema::builder();
        let body = schema_builder.add_text_field("body", TEXT);
        let index = Index::create_in_ram(schema_builder.build());

        let mut writer = index.writer(50_000_000).unwrap();
        writer.add_document(doc!(body => "apple banana")).unwrap();
        writer.commit().unwrap();
        writer.add_document(doc!(body => "banana cherry")).unwrap();
        writer.commit().unwrap();

        let searcher = index.reader().unwrap().searcher();
        assert_eq!(searcher.segment_readers().len(), 2);

        let inverted_indexes: Vec<_> = searcher
            .segment_readers()
            .iter()
            .map(|segment| segment.inverted_index(body).unwrap())
            .collect();
        let mut streams = Vec::new();
        for inverted_index in &inverted_indexes {
            streams.push(inverted_index.terms().stream().unwrap());
        }

        let mut merger = TermMerger::new(streams);
        let mut terms = Vec::new();
        while merger.advance() {
            terms.push((
                String::from_utf8(merger.term().to_vec()).unwrap(),
                merger.doc_freq(),
            ));
        }

        assert_eq!(
            terms,
            vec![
                ("apple".to_string(), 1),
                ("banana".to_string(), 2),
                ("cherry".to_string(), 1),
            ]
        );
        assert_eq!(merger.remaining_sources(), 0);
    }

    #[test]
    fn test_empty_merge() {
        let mut merger = TermMerger::new(Vec::new());
        assert!(!merger.advance());
        assert_eq!(merger.term(), b"");
    }
}
