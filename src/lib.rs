//! # linkx
//!
//! An active record-linkage toolkit: match rows of a source table against an
//! unseen target store under a query budget, learning which terms to send
//! with a linear UCB contextual bandit.
//!
//! Instead of joining two tables outright, linkx repeatedly issues small
//! term queries for individual source rows, observes which retrieved
//! candidates were true matches, and folds that feedback back into the
//! term-scoring model so later queries get better.
//!
//! ## Quick Start
//!
//! ### As a Batch Runner
//!
//! ```bash
//! cargo install linkx
//! linkx --dataset-dir datasets/albums --iterations 1000 --keys 5 --runs 4
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use linkx::prelude::*;
//!
//! // Load the dataset.
//! let source = SourceTable::load_csv("datasets/albums/source.csv").unwrap();
//! let target = SourceTable::load_csv("datasets/albums/target.csv").unwrap();
//! let oracle = Oracle::load_csv("datasets/albums/ground_truth.csv").unwrap();
//!
//! // Configure and run one batch of repetitions.
//! let config = ExperimentConfig {
//!     dataset_name: "albums".to_string(),
//!     interactions: 1000,
//!     query_length: 5,
//!     ..Default::default()
//! };
//! let experiment = Experiment::new(config, source, target, oracle).unwrap();
//! let summaries = experiment.run_all().unwrap();
//! for summary in &summaries {
//!     println!("run {} recall@k {:.3}", summary.run, summary.recall_at_k);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! linkx is composed of several crates:
//!
//! - [`linkx-core`](https://docs.rs/linkx-core) - Signal extraction, featurization, the linear UCB bandit, term selection
//! - [`linkx-data`](https://docs.rs/linkx-data) - CSV row tables, the term-overlap retrieval index, the ground-truth oracle
//! - [`linkx-experiment`](https://docs.rs/linkx-experiment) - Interaction loop, row sampling, repetition averaging, metrics

// Re-export core types
pub use linkx_core::{
    BanditConfig, BanditSender, CorpusStats, Error, Featurizer, LinUcbModel, QueryStrategy,
    Result, RowSource, ScoredTerm, Signal, SourceRow, TupleId, FEATURE_DIM,
};

// Re-export data layer
pub use linkx_data::{DataError, Oracle, Receiver, SourceTable, TermIndex};

// Re-export experiment harness
pub use linkx_experiment::{
    Experiment, ExperimentConfig, ExperimentError, InteractionRecord, RowDistribution,
    RowSampler, RunSummary,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BanditConfig, BanditSender, CorpusStats, Experiment, ExperimentConfig, Featurizer,
        LinUcbModel, Oracle, QueryStrategy, Receiver, RowDistribution, RowSource, RunSummary,
        ScoredTerm, SourceRow, SourceTable, TermIndex, TupleId,
    };
}
