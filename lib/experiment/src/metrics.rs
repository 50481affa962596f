use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of one interaction round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub step: usize,
    pub tuple_id: u64,
    /// Terms actually sent (may be fewer than the configured query length).
    pub query_terms: usize,
    /// Sum of per-term rewards observed this round.
    pub reward: f64,
    /// Whether the true match appeared in the retrieved candidates.
    pub hit: bool,
}

/// Aggregated result of one repetition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run: usize,
    pub seed: u64,
    pub model: String,
    pub dataset: String,
    pub interactions: usize,
    pub matches_found: usize,
    pub recall_at_k: f64,
    pub cumulative_reward: f64,
    pub records: Vec<InteractionRecord>,
}

impl RunSummary {
    #[must_use]
    pub fn from_records(
        run: usize,
        seed: u64,
        model: String,
        dataset: String,
        records: Vec<InteractionRecord>,
    ) -> Self {
        let interactions = records.len();
        let matches_found = records.iter().filter(|r| r.hit).count();
        let cumulative_reward = records.iter().map(|r| r.reward).sum();
        let recall_at_k = if interactions == 0 {
            0.0
        } else {
            matches_found as f64 / interactions as f64
        };

        Self {
            run,
            seed,
            model,
            dataset,
            interactions,
            matches_found,
            recall_at_k,
            cumulative_reward,
            records,
        }
    }

    /// Write this summary as pretty JSON under `dir`, creating the directory
    /// if needed. Returns the written path.
    pub fn write_json(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!(
            "{}_{}_run{}_seed{}.json",
            self.dataset, self.model, self.run, self.seed
        ));
        let file = fs::File::create(&path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(path)
    }
}
