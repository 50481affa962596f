use crate::error::{Error, Result};
use crate::feature::FEATURE_DIM;
use serde::{Deserialize, Serialize};

/// Configuration for the linear UCB model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BanditConfig {
    /// Exploration strength. Larger alpha puts more weight on the upper
    /// confidence bound of under-sampled terms.
    pub alpha: f64,
    /// Feature dimensionality. Must match the featurizer's output dimension.
    pub dim: usize,
    /// Ridge regularization seed for the accumulator matrix. Keeps `A`
    /// invertible before `dim` samples have been observed.
    pub lambda: f64,
}

impl Default for BanditConfig {
    fn default() -> Self {
        Self {
            alpha: 0.2,
            dim: FEATURE_DIM,
            lambda: 1.0,
        }
    }
}

impl BanditConfig {
    #[inline]
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "alpha must be a non-negative finite number, got {}",
                self.alpha
            )));
        }
        if self.dim == 0 {
            return Err(Error::InvalidConfig(
                "feature dimension must be positive".to_string(),
            ));
        }
        if !self.lambda.is_finite() || self.lambda <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "lambda must be a positive finite number, got {}",
                self.lambda
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(BanditConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_alpha() {
        let config = BanditConfig {
            alpha: -0.1,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_zero_dim() {
        let config = BanditConfig {
            dim: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_non_positive_lambda() {
        for lambda in [0.0, -1.0, f64::NAN] {
            let config = BanditConfig {
                lambda,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        }
    }
}
