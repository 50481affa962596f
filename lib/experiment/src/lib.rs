//! # linkx Experiment
//!
//! Experiment harness for the linkx record-linkage toolkit: the interaction
//! loop that drives a query strategy against a retrieval index and a
//! ground-truth oracle, seeded row sampling, repetition averaging across
//! threads, and per-run metrics.
//!
//! The harness owns scheduling and bookkeeping only; all learning lives in
//! `linkx-core`.

pub mod config;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod sampler;

pub use config::ExperimentConfig;
pub use driver::Experiment;
pub use error::{ExperimentError, Result};
pub use metrics::{InteractionRecord, RunSummary};
pub use sampler::{RowDistribution, RowSampler};
