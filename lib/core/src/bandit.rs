//! Linear UCB contextual bandit.
//!
//! Maintains the ridge-regression accumulators `A = lambda*I + sum(x x^T)`
//! and `b = sum(y x)`, and scores feature vectors with the upper confidence
//! bound `x.theta + alpha * sqrt(x^T A^-1 x)`.
//!
//! `A` stays symmetric positive-definite for its whole lifetime: it starts as
//! a scaled identity and only ever accumulates outer products. The model
//! keeps a Cholesky factor of `A` current so that both the weight solve and
//! the confidence width run as triangular substitutions instead of an
//! explicit inverse.

use crate::config::BanditConfig;
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Linear UCB model over fixed-dimension feature vectors.
#[derive(Debug, Clone)]
pub struct LinUcbModel {
    alpha: f64,
    dim: usize,
    /// Covariance-like accumulator, d x d.
    a: Array2<f64>,
    /// Reward correlation vector, d.
    b: Array1<f64>,
    /// Ridge weights, recomputed after every update.
    theta: Array1<f64>,
    /// Lower Cholesky factor of `a`, kept in sync with it.
    factor: Array2<f64>,
}

impl LinUcbModel {
    pub fn new(config: &BanditConfig) -> Result<Self> {
        config.validate()?;

        let dim = config.dim;
        let a = Array2::eye(dim) * config.lambda;
        let factor = cholesky(&a)?;

        Ok(Self {
            alpha: config.alpha,
            dim,
            a,
            b: Array1::zeros(dim),
            theta: Array1::zeros(dim),
            factor,
        })
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Current ridge weights.
    #[inline]
    #[must_use]
    pub fn theta(&self) -> &Array1<f64> {
        &self.theta
    }

    /// Score a batch of feature vectors, one score per row.
    ///
    /// Each score is the point estimate `x.theta` plus the exploration bonus
    /// `alpha * sqrt(x^T A^-1 x)`. Read-only: repeated calls with the same
    /// input return the same output.
    pub fn predict(&self, features: &Array2<f64>) -> Result<Array1<f64>> {
        if features.ncols() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                actual: features.ncols(),
            });
        }

        let mut scores = Array1::zeros(features.nrows());
        for (i, x) in features.axis_iter(Axis(0)).enumerate() {
            let mut score = x.dot(&self.theta);
            if self.alpha > 0.0 {
                score += self.alpha * self.confidence_width(x);
            }
            scores[i] = score;
        }
        Ok(scores)
    }

    /// Fold a batch of (feature vector, reward) samples into the model.
    ///
    /// Samples within one call are accumulated commutatively, so their order
    /// does not matter. Shape validation happens before any mutation and the
    /// accumulators are only committed once the refreshed factorization
    /// succeeds; a failed call leaves the model untouched.
    pub fn partial_fit(&mut self, features: &Array2<f64>, rewards: &Array1<f64>) -> Result<()> {
        if features.ncols() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                actual: features.ncols(),
            });
        }
        if features.nrows() != rewards.len() {
            return Err(Error::BatchMismatch {
                features: features.nrows(),
                rewards: rewards.len(),
            });
        }

        let mut a = self.a.clone();
        let mut b = self.b.clone();
        for (x, &y) in features.axis_iter(Axis(0)).zip(rewards.iter()) {
            for i in 0..self.dim {
                let xi = x[i];
                b[i] += y * xi;
                for j in 0..self.dim {
                    a[[i, j]] += xi * x[j];
                }
            }
        }

        let factor = cholesky(&a)?;
        let theta = solve_spd(&factor, &b);

        self.a = a;
        self.b = b;
        self.factor = factor;
        self.theta = theta;
        Ok(())
    }

    /// Exploration width `sqrt(x^T A^-1 x)` for a single feature vector.
    ///
    /// With `A = L L^T`, solving `L z = x` gives `x^T A^-1 x = z.z`.
    fn confidence_width(&self, x: ArrayView1<'_, f64>) -> f64 {
        let z = solve_lower(&self.factor, x);
        z.dot(&z).sqrt()
    }
}

/// Lower Cholesky factor of a symmetric positive-definite matrix.
fn cholesky(a: &Array2<f64>) -> Result<Array2<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]];
            }
            if i == j {
                if sum <= 0.0 {
                    return Err(Error::Numerical(format!(
                        "accumulator matrix lost positive-definiteness at pivot {i}"
                    )));
                }
                l[[i, j]] = sum.sqrt();
            } else {
                l[[i, j]] = sum / l[[j, j]];
            }
        }
    }
    Ok(l)
}

/// Forward substitution: solve `L z = rhs` for lower-triangular `L`.
fn solve_lower(l: &Array2<f64>, rhs: ArrayView1<'_, f64>) -> Array1<f64> {
    let n = l.nrows();
    let mut z = Array1::zeros(n);
    for i in 0..n {
        let mut sum = rhs[i];
        for k in 0..i {
            sum -= l[[i, k]] * z[k];
        }
        z[i] = sum / l[[i, i]];
    }
    z
}

/// Solve `L L^T theta = b` with the factor from [`cholesky`].
fn solve_spd(l: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let n = l.nrows();
    let z = solve_lower(l, b.view());

    // Back substitution on L^T.
    let mut theta = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = z[i];
        for k in (i + 1)..n {
            sum -= l[[k, i]] * theta[k];
        }
        theta[i] = sum / l[[i, i]];
    }
    theta
}
