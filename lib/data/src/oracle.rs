//! Ground-truth oracle for experiments.
//!
//! Knows the true source-to-target correspondence and turns retrieval
//! outcomes into per-term rewards. Production deployments replace this with
//! live user feedback; the contract toward the sender is the same.

use crate::error::{DataError, Result};
use crate::table::SourceTable;
use ahash::{AHashMap, AHashSet};
use csv::ReaderBuilder;
use linkx_core::{tokenize, TupleId};
use std::path::Path;

/// The true match for each source row.
#[derive(Debug, Clone, Default)]
pub struct Oracle {
    truth: AHashMap<TupleId, TupleId>,
}

impl Oracle {
    /// Load `source_id,target_id` pairs from CSV. A leading header line is
    /// detected and skipped.
    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)?;

        let mut truth = AHashMap::new();
        for (ordinal, record) in reader.records().enumerate() {
            let record = record?;
            let source = record.get(0).unwrap_or("").trim().parse::<TupleId>();
            let target = record.get(1).unwrap_or("").trim().parse::<TupleId>();
            match (source, target) {
                (Ok(source), Ok(target)) => {
                    truth.insert(source, target);
                }
                _ if ordinal == 0 => continue, // header line
                _ => {
                    return Err(DataError::InvalidTable(format!(
                        "line {} of {}: expected two integer ids",
                        ordinal + 1,
                        path.display()
                    )));
                }
            }
        }
        Ok(Self { truth })
    }

    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (TupleId, TupleId)>) -> Self {
        Self {
            truth: pairs.into_iter().collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.truth.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.truth.is_empty()
    }

    /// The true target for a source row, if known.
    #[inline]
    #[must_use]
    pub fn target_of(&self, tuple_id: TupleId) -> Option<TupleId> {
        self.truth.get(&tuple_id).copied()
    }

    /// Whether the retrieved candidates contain the true match.
    #[must_use]
    pub fn is_hit(&self, tuple_id: TupleId, candidates: &[TupleId]) -> bool {
        self.target_of(tuple_id)
            .map(|target| candidates.contains(&target))
            .unwrap_or(false)
    }

    /// Per-term rewards for one query round: 1.0 for a term that occurs in
    /// the true target row's content, 0.0 otherwise. A source row with no
    /// known match (or a dangling target id) rewards nothing.
    #[must_use]
    pub fn term_rewards(
        &self,
        tuple_id: TupleId,
        terms: &[String],
        target_table: &SourceTable,
    ) -> Vec<f64> {
        let target_row = self
            .target_of(tuple_id)
            .and_then(|target| target_table.get(target));

        let Some(row) = target_row else {
            return vec![0.0; terms.len()];
        };

        let mut target_terms: AHashSet<String> = AHashSet::new();
        for (_, text) in &row.attributes {
            target_terms.extend(tokenize(text));
        }

        terms
            .iter()
            .map(|term| {
                if target_terms.contains(term) {
                    1.0
                } else {
                    0.0
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkx_core::SourceRow;
    use std::io::Write;

    fn target_table() -> SourceTable {
        SourceTable::from_rows(vec![SourceRow::new(
            100,
            vec![
                ("name".to_string(), "Kind of Blue".to_string()),
                ("performer".to_string(), "Miles Davis".to_string()),
            ],
        )])
        .unwrap()
    }

    #[test]
    fn test_load_csv_with_header() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"source_id,target_id\n0,100\n1,101\n").unwrap();
        let oracle = Oracle::load_csv(file.path()).unwrap();
        assert_eq!(oracle.len(), 2);
        assert_eq!(oracle.target_of(0), Some(100));
        assert_eq!(oracle.target_of(1), Some(101));
        assert_eq!(oracle.target_of(2), None);
    }

    #[test]
    fn test_load_csv_without_header() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"0,100\n1,101\n").unwrap();
        let oracle = Oracle::load_csv(file.path()).unwrap();
        assert_eq!(oracle.len(), 2);
    }

    #[test]
    fn test_load_csv_rejects_garbage_past_header() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"source_id,target_id\n0,100\nnot,ids\n").unwrap();
        assert!(matches!(
            Oracle::load_csv(file.path()),
            Err(DataError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_is_hit() {
        let oracle = Oracle::from_pairs([(0, 100)]);
        assert!(oracle.is_hit(0, &[101, 100]));
        assert!(!oracle.is_hit(0, &[101, 102]));
        assert!(!oracle.is_hit(7, &[100]));
    }

    #[test]
    fn test_term_rewards_match_target_content() {
        let oracle = Oracle::from_pairs([(0, 100)]);
        let terms: Vec<String> = ["blue", "davis", "coltrane"]
            .iter()
            .map(|t| t.to_string())
            .collect();
        let rewards = oracle.term_rewards(0, &terms, &target_table());
        assert_eq!(rewards, vec![1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_term_rewards_without_truth_are_zero() {
        let oracle = Oracle::from_pairs([(0, 999)]);
        let terms = vec!["blue".to_string()];
        // Unknown source row.
        assert_eq!(oracle.term_rewards(5, &terms, &target_table()), vec![0.0]);
        // Known source row but dangling target id.
        assert_eq!(oracle.term_rewards(0, &terms, &target_table()), vec![0.0]);
    }
}
