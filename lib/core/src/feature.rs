use crate::row::SourceRow;
use crate::signal::{tokenize, Signal};
use ahash::AHashMap;
use ndarray::Array1;

/// Output dimension of [`Featurizer::featurize`]. The bandit model must be
/// constructed with a matching dimension.
pub const FEATURE_DIM: usize = 8;

/// Per-term document frequencies over the source table.
///
/// Built once before an experiment starts; the rarity feature needs to know
/// how common a term is across rows, which a single (term, row) pair cannot
/// tell.
#[derive(Debug, Clone, Default)]
pub struct CorpusStats {
    doc_freq: AHashMap<String, u32>,
    row_count: u32,
}

impl CorpusStats {
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a SourceRow>,
    {
        let mut doc_freq: AHashMap<String, u32> = AHashMap::new();
        let mut row_count = 0u32;

        for row in rows {
            row_count += 1;
            let mut seen: Vec<String> = Vec::new();
            for (_, text) in &row.attributes {
                for term in tokenize(text) {
                    if !seen.contains(&term) {
                        seen.push(term);
                    }
                }
            }
            for term in seen {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        Self {
            doc_freq,
            row_count,
        }
    }

    #[inline]
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count as usize
    }

    #[inline]
    #[must_use]
    pub fn doc_freq(&self, term: &str) -> u32 {
        self.doc_freq.get(term).copied().unwrap_or(0)
    }

    /// Smoothed inverse document frequency of a term across the source table.
    pub fn idf(&self, term: &str) -> f64 {
        if self.row_count == 0 {
            return 0.0;
        }
        let n = f64::from(self.row_count);
        let df = f64::from(self.doc_freq(term));
        ((n - df + 0.5) / (df + 0.5)).ln().max(0.0)
    }
}

/// Maps a (term, row) pair to a fixed-length feature vector.
///
/// Pure and deterministic given the row's signal decomposition and the corpus
/// statistics captured at construction. Holds no learned state.
#[derive(Debug, Clone)]
pub struct Featurizer {
    stats: CorpusStats,
}

impl Featurizer {
    #[inline]
    #[must_use]
    pub fn new(stats: CorpusStats) -> Self {
        Self { stats }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        FEATURE_DIM
    }

    /// Featurize one term against a row's signals.
    ///
    /// A term that does not occur in the signals still gets a well-defined
    /// vector (zero frequency and provenance saturated at 1); this happens
    /// when the caller reports outcomes for terms it obtained elsewhere.
    #[must_use]
    pub fn featurize(&self, term: &str, signals: &[Signal]) -> Array1<f64> {
        let signal_count = signals.len();
        let total_terms: usize = signals.iter().map(|s| s.terms().len()).sum();

        let mut occurrences = 0usize;
        let mut covering_signals = 0usize;
        let mut first_signal = signal_count;
        let mut first_position = 0.0f64;

        for (sig_idx, signal) in signals.iter().enumerate() {
            let mut in_signal = false;
            for (pos, candidate) in signal.terms().iter().enumerate() {
                if candidate == term {
                    occurrences += 1;
                    if !in_signal {
                        in_signal = true;
                        covering_signals += 1;
                    }
                    if first_signal == signal_count {
                        first_signal = sig_idx;
                        first_position = pos as f64 / signal.terms().len() as f64;
                    }
                }
            }
        }

        let provenance = if signal_count == 0 {
            1.0
        } else {
            first_signal as f64 / signal_count as f64
        };
        let frequency = if total_terms == 0 {
            0.0
        } else {
            occurrences as f64 / total_terms as f64
        };
        let coverage = if signal_count == 0 {
            0.0
        } else {
            covering_signals as f64 / signal_count as f64
        };
        let rarity = if self.stats.row_count() == 0 {
            0.0
        } else {
            self.stats.idf(term) / (self.stats.row_count() as f64 + 1.0).ln()
        };
        let length = (term.chars().count() as f64 / 16.0).min(1.0);
        let numeric = if !term.is_empty() && term.chars().all(|c| c.is_ascii_digit()) {
            1.0
        } else {
            0.0
        };

        Array1::from_vec(vec![
            1.0, // bias
            length,
            provenance,
            first_position,
            frequency,
            rarity,
            numeric,
            coverage,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::extract_signals;

    fn sample_rows() -> Vec<SourceRow> {
        vec![
            SourceRow::new(
                0,
                vec![
                    ("title".to_string(), "kind of blue".to_string()),
                    ("artist".to_string(), "miles davis".to_string()),
                ],
            ),
            SourceRow::new(
                1,
                vec![
                    ("title".to_string(), "blue train".to_string()),
                    ("artist".to_string(), "john coltrane".to_string()),
                ],
            ),
            SourceRow::new(
                2,
                vec![
                    ("title".to_string(), "giant steps".to_string()),
                    ("artist".to_string(), "john coltrane".to_string()),
                ],
            ),
        ]
    }

    #[test]
    fn test_feature_dimension() {
        let rows = sample_rows();
        let featurizer = Featurizer::new(CorpusStats::from_rows(&rows));
        let signals = extract_signals(&rows[0]);
        let features = featurizer.featurize("blue", &signals);
        assert_eq!(features.len(), FEATURE_DIM);
        assert_eq!(features.len(), featurizer.dim());
    }

    #[test]
    fn test_featurize_is_deterministic() {
        let rows = sample_rows();
        let featurizer = Featurizer::new(CorpusStats::from_rows(&rows));
        let signals = extract_signals(&rows[0]);
        let a = featurizer.featurize("davis", &signals);
        let b = featurizer.featurize("davis", &signals);
        assert_eq!(a, b);
    }

    #[test]
    fn test_doc_freq_counts_rows_not_occurrences() {
        let rows = sample_rows();
        let stats = CorpusStats::from_rows(&rows);
        assert_eq!(stats.row_count(), 3);
        assert_eq!(stats.doc_freq("blue"), 2);
        assert_eq!(stats.doc_freq("coltrane"), 2);
        assert_eq!(stats.doc_freq("davis"), 1);
        assert_eq!(stats.doc_freq("missing"), 0);
    }

    #[test]
    fn test_rare_terms_score_higher_idf() {
        let rows = sample_rows();
        let stats = CorpusStats::from_rows(&rows);
        assert!(stats.idf("davis") > stats.idf("blue"));
        assert!(stats.idf("missing") > stats.idf("davis"));
    }

    #[test]
    fn test_bias_and_numeric_features() {
        let rows = vec![SourceRow::new(
            0,
            vec![("year".to_string(), "1959 reissue".to_string())],
        )];
        let featurizer = Featurizer::new(CorpusStats::from_rows(&rows));
        let signals = extract_signals(&rows[0]);

        let numeric = featurizer.featurize("1959", &signals);
        assert_eq!(numeric[0], 1.0);
        assert_eq!(numeric[6], 1.0);

        let word = featurizer.featurize("reissue", &signals);
        assert_eq!(word[6], 0.0);
    }

    #[test]
    fn test_absent_term_has_zero_frequency() {
        let rows = sample_rows();
        let featurizer = Featurizer::new(CorpusStats::from_rows(&rows));
        let signals = extract_signals(&rows[0]);
        let features = featurizer.featurize("zeppelin", &signals);
        assert_eq!(features[4], 0.0);
        assert_eq!(features[7], 0.0);
        // Provenance saturates for terms outside the row.
        assert_eq!(features[2], 1.0);
    }

    #[test]
    fn test_frequency_counts_duplicates() {
        let rows = vec![SourceRow::new(
            0,
            vec![
                ("title".to_string(), "blue blue moon".to_string()),
                ("label".to_string(), "blue note".to_string()),
            ],
        )];
        let featurizer = Featurizer::new(CorpusStats::from_rows(&rows));
        let signals = extract_signals(&rows[0]);
        let features = featurizer.featurize("blue", &signals);
        // 3 occurrences out of 5 terms, across both of two attributes.
        assert!((features[4] - 0.6).abs() < 1e-12);
        assert!((features[7] - 1.0).abs() < 1e-12);
    }
}
