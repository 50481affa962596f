use crate::error::{ExperimentError, Result};
use crate::sampler::RowDistribution;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_top_k() -> usize {
    20
}

fn default_alpha() -> f64 {
    0.2
}

fn default_lambda() -> f64 {
    1.0
}

fn default_runs() -> usize {
    1
}

/// Configuration for one batch of experiment repetitions.
///
/// Constructed once (from the CLI or a config file) and passed by reference
/// into the driver; nothing in the harness reads ambient global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Dataset label used in logs and output file names.
    pub dataset_name: String,
    /// Interaction rounds per repetition.
    pub interactions: usize,
    /// Terms per query.
    pub query_length: usize,
    /// Candidates retrieved per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Exploration strength for the bandit.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Ridge regularization for the bandit.
    #[serde(default = "default_lambda")]
    pub lambda: f64,
    /// Row sampling distribution.
    #[serde(default)]
    pub distribution: RowDistribution,
    /// Independent repetitions to run (each with its own model).
    #[serde(default = "default_runs")]
    pub runs: usize,
    /// Optional per-run seeds; when shorter than `runs`, remaining runs get
    /// fresh entropy.
    #[serde(default)]
    pub seeds: Vec<u64>,
    /// Where per-run result JSON is written, when set.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.interactions == 0 {
            return Err(ExperimentError::InvalidConfig(
                "interactions must be positive".to_string(),
            ));
        }
        if self.query_length == 0 {
            return Err(ExperimentError::InvalidConfig(
                "query_length must be positive".to_string(),
            ));
        }
        if self.top_k == 0 {
            return Err(ExperimentError::InvalidConfig(
                "top_k must be positive".to_string(),
            ));
        }
        if self.runs == 0 {
            return Err(ExperimentError::InvalidConfig(
                "runs must be positive".to_string(),
            ));
        }
        if let RowDistribution::Zipf { exponent } = self.distribution {
            if !exponent.is_finite() || exponent <= 0.0 {
                return Err(ExperimentError::InvalidConfig(format!(
                    "zipf exponent must be positive, got {exponent}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            dataset_name: String::new(),
            interactions: 100,
            query_length: 5,
            top_k: default_top_k(),
            alpha: default_alpha(),
            lambda: default_lambda(),
            distribution: RowDistribution::default(),
            runs: default_runs(),
            seeds: Vec::new(),
            output_dir: None,
        }
    }
}
