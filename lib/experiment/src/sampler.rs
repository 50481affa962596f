use crate::error::{ExperimentError, Result};
use linkx_core::TupleId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Distribution as _;
use rand_distr::Zipf;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How source rows are drawn for interaction rounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowDistribution {
    /// Every row equally likely.
    Uniform,
    /// Zipf-distributed popularity over rows in file order: earlier rows are
    /// queried more often, mimicking skewed real-world workloads.
    Zipf { exponent: f64 },
}

impl Default for RowDistribution {
    fn default() -> Self {
        Self::Uniform
    }
}

impl FromStr for RowDistribution {
    type Err = String;

    /// Accepts `uniform`, `zipf`, or `zipf:<exponent>`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s == "uniform" {
            return Ok(Self::Uniform);
        }
        if s == "zipf" {
            return Ok(Self::Zipf { exponent: 1.1 });
        }
        if let Some(raw) = s.strip_prefix("zipf:") {
            let exponent: f64 = raw
                .parse()
                .map_err(|_| format!("invalid zipf exponent: {raw:?}"))?;
            return Ok(Self::Zipf { exponent });
        }
        Err(format!(
            "unknown distribution {s:?}, expected uniform, zipf, or zipf:<exponent>"
        ))
    }
}

/// Seeded row sampler for one repetition.
pub struct RowSampler {
    ids: Vec<TupleId>,
    zipf: Option<Zipf<f64>>,
    rng: StdRng,
}

impl RowSampler {
    pub fn new(ids: Vec<TupleId>, distribution: RowDistribution, seed: u64) -> Result<Self> {
        if ids.is_empty() {
            return Err(ExperimentError::InvalidConfig(
                "cannot sample rows from an empty table".to_string(),
            ));
        }
        let zipf = match distribution {
            RowDistribution::Uniform => None,
            RowDistribution::Zipf { exponent } => Some(
                Zipf::new(ids.len() as u64, exponent).map_err(|e| {
                    ExperimentError::InvalidConfig(format!("invalid zipf exponent: {e}"))
                })?,
            ),
        };
        Ok(Self {
            ids,
            zipf,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn sample(&mut self) -> TupleId {
        match &self.zipf {
            Some(zipf) => {
                // Samples are 1-indexed ranks.
                let rank = zipf.sample(&mut self.rng) as usize;
                self.ids[rank - 1]
            }
            None => {
                let index = self.rng.gen_range(0..self.ids.len());
                self.ids[index]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_distributions() {
        assert_eq!(
            "uniform".parse::<RowDistribution>().unwrap(),
            RowDistribution::Uniform
        );
        assert_eq!(
            "zipf:1.5".parse::<RowDistribution>().unwrap(),
            RowDistribution::Zipf { exponent: 1.5 }
        );
        assert!(matches!(
            "zipf".parse::<RowDistribution>().unwrap(),
            RowDistribution::Zipf { .. }
        ));
        assert!("pareto".parse::<RowDistribution>().is_err());
        assert!("zipf:abc".parse::<RowDistribution>().is_err());
    }

    #[test]
    fn test_same_seed_same_draws() {
        let ids = vec![1, 2, 3, 4, 5];
        let mut a = RowSampler::new(ids.clone(), RowDistribution::Uniform, 42).unwrap();
        let mut b = RowSampler::new(ids, RowDistribution::Uniform, 42).unwrap();
        for _ in 0..50 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn test_samples_stay_in_range() {
        let ids = vec![10, 20, 30];
        let mut sampler =
            RowSampler::new(ids.clone(), RowDistribution::Zipf { exponent: 1.2 }, 7).unwrap();
        for _ in 0..200 {
            assert!(ids.contains(&sampler.sample()));
        }
    }

    #[test]
    fn test_zipf_skews_toward_head() {
        let ids = vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        let mut sampler =
            RowSampler::new(ids, RowDistribution::Zipf { exponent: 1.5 }, 13).unwrap();
        let mut head = 0usize;
        const DRAWS: usize = 1000;
        for _ in 0..DRAWS {
            if sampler.sample() == 0 {
                head += 1;
            }
        }
        // Rank 1 should dominate a uniform share by a wide margin.
        assert!(head > DRAWS / 10);
    }

    #[test]
    fn test_empty_ids_rejected() {
        assert!(RowSampler::new(Vec::new(), RowDistribution::Uniform, 0).is_err());
    }
}
