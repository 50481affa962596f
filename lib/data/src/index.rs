//! Term-overlap retrieval over the target table.
//!
//! The harness-side stand-in for the external retrieval backend: queries are
//! sets of terms, candidates are ranked by how many query terms they match,
//! weighted by term rarity.

use crate::table::SourceTable;
use ahash::AHashMap;
use linkx_core::{tokenize, TupleId};

/// The retrieval boundary: execute a term query against the target store and
/// return candidate ids, best first.
pub trait Receiver: Send + Sync {
    fn retrieve(&self, terms: &[String], top_k: usize) -> Vec<TupleId>;
}

/// Inverted index over the target table.
#[derive(Debug, Clone, Default)]
pub struct TermIndex {
    // term -> ids of rows containing it
    postings: AHashMap<String, Vec<TupleId>>,
    total_docs: u64,
}

impl TermIndex {
    /// Index every attribute of every row in the target table.
    #[must_use]
    pub fn build(table: &SourceTable) -> Self {
        let mut postings: AHashMap<String, Vec<TupleId>> = AHashMap::new();

        for row in table.rows() {
            let mut seen: Vec<String> = Vec::new();
            for (_, text) in &row.attributes {
                for term in tokenize(text) {
                    if !seen.contains(&term) {
                        seen.push(term);
                    }
                }
            }
            for term in seen {
                postings.entry(term).or_default().push(row.id);
            }
        }

        Self {
            postings,
            total_docs: table.len() as u64,
        }
    }

    #[inline]
    #[must_use]
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    #[inline]
    #[must_use]
    pub fn doc_freq(&self, term: &str) -> u64 {
        self.postings.get(term).map(|ids| ids.len() as u64).unwrap_or(0)
    }

    fn idf(&self, term: &str) -> f64 {
        let df = self.doc_freq(term) as f64;
        if df == 0.0 {
            return 0.0;
        }
        let n = self.total_docs as f64;
        ((n - df + 0.5) / (df + 0.5)).ln().max(0.0)
    }
}

impl Receiver for TermIndex {
    fn retrieve(&self, terms: &[String], top_k: usize) -> Vec<TupleId> {
        if self.total_docs == 0 || terms.is_empty() {
            return Vec::new();
        }

        let mut doc_scores: AHashMap<TupleId, f64> = AHashMap::new();
        let mut seen: Vec<&String> = Vec::new();
        for term in terms {
            // A term repeated within one query counts once.
            if seen.contains(&term) {
                continue;
            }
            seen.push(term);

            if let Some(ids) = self.postings.get(term) {
                // Overlap count dominates; rarity breaks ties between
                // candidates matching equally many terms.
                let weight = 1.0 + self.idf(term);
                for &id in ids {
                    *doc_scores.entry(id).or_insert(0.0) += weight;
                }
            }
        }

        let mut results: Vec<(TupleId, f64)> = doc_scores.into_iter().collect();
        results.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        results.truncate(top_k);
        results.into_iter().map(|(id, _)| id).collect()
    }
}
