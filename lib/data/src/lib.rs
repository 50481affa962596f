//! # linkx Data
//!
//! Data layer for the linkx record-linkage toolkit: CSV-backed row tables,
//! the term-overlap retrieval index used as the experiment's target store,
//! and the ground-truth oracle that converts retrieval outcomes into
//! per-term rewards.
//!
//! The scoring engine in `linkx-core` never touches files; everything
//! I/O-shaped lives here.

pub mod error;
pub mod index;
pub mod oracle;
pub mod table;

pub use error::{DataError, Result};
pub use index::{Receiver, TermIndex};
pub use oracle::Oracle;
pub use table::SourceTable;
