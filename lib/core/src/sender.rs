//! Term selection: candidate enumeration, batched scoring, feedback routing.

use crate::bandit::LinUcbModel;
use crate::config::BanditConfig;
use crate::error::{Error, Result};
use crate::feature::Featurizer;
use crate::row::{RowSource, TupleId};
use crate::signal::{extract_signals, Signal};
use ahash::AHashMap;
use ndarray::{Array1, Array2};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::debug;

/// A candidate term with its predicted usefulness.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTerm {
    pub term: String,
    pub score: f64,
}

/// A strategy that ranks candidate terms for a row and accepts outcome
/// feedback.
///
/// The interaction loop depends only on this trait; concrete scorers
/// (bandit, baselines) plug in behind it.
pub trait QueryStrategy {
    /// Human-readable model identifier, used for logging and output naming.
    fn name(&self) -> &str;

    /// Rank the row's candidate terms and return the top `query_length`.
    ///
    /// Returns fewer than `query_length` entries when the row has fewer
    /// distinct terms; a row with no terms yields an empty result. Neither
    /// case is an error.
    fn generate_query(
        &mut self,
        tuple_id: TupleId,
        query_length: usize,
    ) -> Result<Vec<ScoredTerm>>;

    /// Fold observed outcomes for previously queried terms back into the
    /// strategy. `terms` and `rewards` must have equal length.
    fn update_model(&mut self, tuple_id: TupleId, terms: &[String], rewards: &[f64])
        -> Result<()>;
}

/// Dataset-level term selection backed by one linear UCB model shared across
/// every row of the source table.
///
/// Owns the signal cache and the bandit exclusively; calls must be strictly
/// serialized, one interaction round at a time.
pub struct BanditSender {
    rows: Arc<dyn RowSource>,
    featurizer: Featurizer,
    model: LinUcbModel,
    signal_cache: AHashMap<TupleId, Vec<Signal>>,
}

impl BanditSender {
    /// Build a sender for one experiment run.
    ///
    /// Fails if the configured model dimension disagrees with the
    /// featurizer's output dimension; the mismatch is a configuration error
    /// caught here rather than at call time.
    pub fn new(
        config: &BanditConfig,
        rows: Arc<dyn RowSource>,
        featurizer: Featurizer,
    ) -> Result<Self> {
        if config.dim != featurizer.dim() {
            return Err(Error::InvalidConfig(format!(
                "model dimension {} does not match featurizer dimension {}",
                config.dim,
                featurizer.dim()
            )));
        }
        let model = LinUcbModel::new(config)?;

        Ok(Self {
            rows,
            featurizer,
            model,
            signal_cache: AHashMap::new(),
        })
    }

    /// The underlying bandit, for inspection by tests and metrics.
    #[inline]
    #[must_use]
    pub fn model(&self) -> &LinUcbModel {
        &self.model
    }

    /// Number of rows whose signal decomposition has been cached so far.
    #[inline]
    #[must_use]
    pub fn cached_rows(&self) -> usize {
        self.signal_cache.len()
    }

    /// Distinct terms of a row in enumeration order: attributes in row
    /// order, tokens in text order, first occurrence wins.
    fn distinct_terms(signals: &[Signal]) -> Vec<String> {
        let mut terms: Vec<String> = Vec::new();
        for signal in signals {
            for term in signal.terms() {
                if !terms.contains(term) {
                    terms.push(term.clone());
                }
            }
        }
        terms
    }

    fn feature_matrix(
        featurizer: &Featurizer,
        terms: &[String],
        signals: &[Signal],
    ) -> Array2<f64> {
        let mut features = Array2::zeros((terms.len(), featurizer.dim()));
        for (i, term) in terms.iter().enumerate() {
            features
                .row_mut(i)
                .assign(&featurizer.featurize(term, signals));
        }
        features
    }
}

/// Fetch the cached decomposition for a row, deriving and caching it on
/// first access. The cache is append-only and never evicts.
fn cached_signals<'a>(
    cache: &'a mut AHashMap<TupleId, Vec<Signal>>,
    rows: &dyn RowSource,
    tuple_id: TupleId,
) -> Result<&'a [Signal]> {
    match cache.entry(tuple_id) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(entry) => {
            let row = rows.row(tuple_id).ok_or(Error::RowNotFound(tuple_id))?;
            Ok(entry.insert(extract_signals(row)))
        }
    }
}

impl QueryStrategy for BanditSender {
    fn name(&self) -> &str {
        "dataset_level"
    }

    fn generate_query(
        &mut self,
        tuple_id: TupleId,
        query_length: usize,
    ) -> Result<Vec<ScoredTerm>> {
        let signals = cached_signals(&mut self.signal_cache, self.rows.as_ref(), tuple_id)?;

        let terms = Self::distinct_terms(signals);
        if terms.is_empty() {
            debug!(tuple_id, "row has no terms, returning empty query");
            return Ok(Vec::new());
        }

        let features = Self::feature_matrix(&self.featurizer, &terms, signals);
        let scores = self.model.predict(&features)?;

        let mut ranked: Vec<ScoredTerm> = terms
            .into_iter()
            .zip(scores.iter())
            .map(|(term, &score)| ScoredTerm { term, score })
            .collect();
        // Stable sort: equal scores keep enumeration order.
        ranked.sort_by_key(|entry| Reverse(OrderedFloat(entry.score)));
        ranked.truncate(query_length);
        Ok(ranked)
    }

    fn update_model(
        &mut self,
        tuple_id: TupleId,
        terms: &[String],
        rewards: &[f64],
    ) -> Result<()> {
        if terms.len() != rewards.len() {
            return Err(Error::BatchMismatch {
                features: terms.len(),
                rewards: rewards.len(),
            });
        }
        if terms.is_empty() {
            return Ok(());
        }

        let signals = cached_signals(&mut self.signal_cache, self.rows.as_ref(), tuple_id)?;
        let features = Self::feature_matrix(&self.featurizer, terms, signals);
        let rewards = Array1::from_vec(rewards.to_vec());
        self.model.partial_fit(&features, &rewards)
    }
}
