//! # linkx Core
//!
//! Core library for the linkx record-linkage toolkit.
//!
//! This crate provides the term-scoring engine used for active record
//! linkage:
//!
//! - [`SourceRow`] / [`RowSource`] - the read-only row-store boundary
//! - [`Signal`] - attribute-scoped decomposition of a row into terms
//! - [`Featurizer`] - fixed-dimension features for (term, row) pairs
//! - [`LinUcbModel`] - linear UCB contextual bandit over those features
//! - [`BanditSender`] - candidate enumeration, scoring, and feedback routing
//!
//! ## Example
//!
//! ```rust
//! use linkx_core::{
//!     BanditConfig, BanditSender, CorpusStats, Featurizer, QueryStrategy,
//!     RowSource, SourceRow, TupleId,
//! };
//! use std::sync::Arc;
//!
//! struct Rows(Vec<SourceRow>);
//!
//! impl RowSource for Rows {
//!     fn row(&self, tuple_id: TupleId) -> Option<&SourceRow> {
//!         self.0.iter().find(|r| r.id == tuple_id)
//!     }
//!     fn row_count(&self) -> usize {
//!         self.0.len()
//!     }
//! }
//!
//! let rows = vec![SourceRow::new(
//!     0,
//!     vec![("title".to_string(), "kind of blue".to_string())],
//! )];
//! let stats = CorpusStats::from_rows(&rows);
//! let source: Arc<dyn RowSource> = Arc::new(Rows(rows));
//!
//! let mut sender = BanditSender::new(
//!     &BanditConfig::default(),
//!     source,
//!     Featurizer::new(stats),
//! )
//! .unwrap();
//!
//! // One interaction round: query, observe, update.
//! let query = sender.generate_query(0, 2).unwrap();
//! let terms: Vec<String> = query.iter().map(|t| t.term.clone()).collect();
//! let rewards = vec![1.0; terms.len()];
//! sender.update_model(0, &terms, &rewards).unwrap();
//! ```

pub mod bandit;
pub mod config;
pub mod error;
pub mod feature;
pub mod row;
pub mod sender;
pub mod signal;

pub use bandit::LinUcbModel;
pub use config::BanditConfig;
pub use error::{Error, Result};
pub use feature::{CorpusStats, Featurizer, FEATURE_DIM};
pub use row::{RowSource, SourceRow, TupleId};
pub use sender::{BanditSender, QueryStrategy, ScoredTerm};
pub use signal::{extract_signals, tokenize, Signal};
