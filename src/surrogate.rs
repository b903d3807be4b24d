//! Surrogate regression models.
//!
//! A [`Surrogate`] is fitted to observed `(normalized point, normalized
//! score)` pairs and predicts a `(mean, std)` pair for unseen points. The
//! built-in [`GaussianProcess`] uses a **Matérn 5/2 kernel** with ARD
//! lengthscales and a Cholesky solve.
//!
//! # Fitting
//!
//! 1. Scores are standardized to zero mean and unit variance.
//! 2. ARD lengthscales are set to the per-dimension standard deviation of
//!    the training inputs (floored at 0.01).
//! 3. `K + σ²I` is factorized; a small `noise_variance` on the diagonal
//!    keeps repeated points from making the matrix singular.
//!
//! At most 100 training points (the most recent ones) are used to keep
//! the O(n³) fitting cost manageable.

use nalgebra::{DMatrix, DVector, Dyn};

use crate::error::{Error, Result};

/// A probabilistic regression model over the normalized search space.
pub trait Surrogate: Send {
    /// Fits the model to the given observations.
    ///
    /// On error the previously fitted state, if any, is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the observations are empty, inconsistent, or
    /// the model cannot be fitted to them.
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()>;

    /// Predicts the `(mean, std)` of the score at `x`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model has not been fitted or `x` has the
    /// wrong width.
    fn predict(&self, x: &[f64]) -> Result<(f64, f64)>;
}

/// Default observation noise variance.
const DEFAULT_NOISE_VAR: f64 = 1e-6;

/// Maximum number of training points to use for the GP.
const MAX_TRAIN_POINTS: usize = 100;

/// √5.
const SQRT_5: f64 = 2.236_067_977_499_79;

/// Gaussian Process regressor with a Matérn 5/2 kernel.
///
/// # Examples
///
/// ```
/// use tunebandit::surrogate::{GaussianProcess, Surrogate};
///
/// let mut gp = GaussianProcess::new();
/// gp.fit(&[vec![0.0], vec![1.0]], &[0.0, 1.0]).unwrap();
///
/// let (mean, std) = gp.predict(&[1.0]).unwrap();
/// assert!((mean - 1.0).abs() < 1e-2);
/// assert!(std < 1e-2);
/// ```
pub struct GaussianProcess {
    noise_variance: f64,
    model: Option<GpModel>,
}

impl GaussianProcess {
    /// Creates an unfitted GP with the default noise variance (1e-6).
    #[must_use]
    pub fn new() -> Self {
        Self::with_noise_variance(DEFAULT_NOISE_VAR)
    }

    /// Creates an unfitted GP with the given observation noise variance.
    #[must_use]
    pub fn with_noise_variance(noise_variance: f64) -> Self {
        Self {
            noise_variance,
            model: None,
        }
    }

    /// Whether a model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }
}

impl Default for GaussianProcess {
    fn default() -> Self {
        Self::new()
    }
}

/// A fitted GP model ready for predictions.
struct GpModel {
    /// Cholesky factor L of K + σ²I.
    cholesky: nalgebra::linalg::Cholesky<f64, Dyn>,
    /// α = (K + σ²I)^{-1} y.
    alpha: DVector<f64>,
    /// Training inputs, one row per point.
    x_train: Vec<Vec<f64>>,
    /// ARD lengthscales per dimension.
    lengthscales: Vec<f64>,
    /// Signal variance.
    signal_var: f64,
    /// Mean of the raw training scores.
    y_mean: f64,
    /// Std dev of the raw training scores.
    y_std: f64,
}

// ---------------------------------------------------------------------------
// Matérn 5/2 kernel
// ---------------------------------------------------------------------------

/// `k(x1, x2) = σ² (1 + √5 r + 5/3 r²) exp(-√5 r)`
/// where `r = sqrt(Σ ((x1_i - x2_i) / l_i)²)`
fn matern52(x1: &[f64], x2: &[f64], lengthscales: &[f64], signal_var: f64) -> f64 {
    let r_sq: f64 = x1
        .iter()
        .zip(x2)
        .zip(lengthscales)
        .map(|((a, b), l)| ((a - b) / l).powi(2))
        .sum();
    let sqrt5_r = SQRT_5 * r_sq.sqrt();
    signal_var * (1.0 + sqrt5_r + 5.0 / 3.0 * r_sq) * (-sqrt5_r).exp()
}

fn kernel_matrix(
    x: &[Vec<f64>],
    lengthscales: &[f64],
    signal_var: f64,
    noise_var: f64,
) -> DMatrix<f64> {
    let n = x.len();
    DMatrix::from_fn(n, n, |i, j| {
        let k = matern52(&x[i], &x[j], lengthscales, signal_var);
        if i == j { k + noise_var } else { k }
    })
}

fn kernel_vector(
    x_star: &[f64],
    x_train: &[Vec<f64>],
    lengthscales: &[f64],
    signal_var: f64,
) -> DVector<f64> {
    DVector::from_fn(x_train.len(), |i, _| {
        matern52(x_star, &x_train[i], lengthscales, signal_var)
    })
}

// ---------------------------------------------------------------------------
// Fitting and prediction
// ---------------------------------------------------------------------------

impl Surrogate for GaussianProcess {
    #[allow(clippy::cast_precision_loss)]
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        if x.len() != y.len() {
            return Err(Error::DimensionMismatch {
                expected: x.len(),
                got: y.len(),
            });
        }
        if y.is_empty() {
            return Err(Error::SurrogateFit("no observations"));
        }
        let d = x[0].len();
        if let Some(row) = x.iter().find(|row| row.len() != d) {
            return Err(Error::DimensionMismatch {
                expected: d,
                got: row.len(),
            });
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(Error::SurrogateFit("non-finite score"));
        }

        let start = y.len().saturating_sub(MAX_TRAIN_POINTS);
        let (x_train, y_train) = (&x[start..], &y[start..]);
        let n = y_train.len();

        let y_mean = y_train.iter().sum::<f64>() / n as f64;
        let y_var = if n > 1 {
            y_train.iter().map(|&v| (v - y_mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let y_std = if y_var > 1e-20 { y_var.sqrt() } else { 1.0 };
        let y_standardized: Vec<f64> = y_train.iter().map(|&v| (v - y_mean) / y_std).collect();

        let lengthscales: Vec<f64> = (0..d)
            .map(|j| {
                let mean_j = x_train.iter().map(|row| row[j]).sum::<f64>() / n as f64;
                let var_j = x_train
                    .iter()
                    .map(|row| (row[j] - mean_j).powi(2))
                    .sum::<f64>()
                    / n as f64;
                var_j.sqrt().max(0.01)
            })
            .collect();

        // Scores are standardized, so unit signal variance.
        let signal_var = 1.0;

        let k = kernel_matrix(x_train, &lengthscales, signal_var, self.noise_variance);
        let cholesky = nalgebra::linalg::Cholesky::new(k)
            .ok_or(Error::SurrogateFit("kernel matrix is not positive definite"))?;
        let alpha = cholesky.solve(&DVector::from_column_slice(&y_standardized));

        self.model = Some(GpModel {
            cholesky,
            alpha,
            x_train: x_train.to_vec(),
            lengthscales,
            signal_var,
            y_mean,
            y_std,
        });
        Ok(())
    }

    fn predict(&self, x: &[f64]) -> Result<(f64, f64)> {
        let model = self
            .model
            .as_ref()
            .ok_or(Error::SurrogateFit("model has not been fitted"))?;
        if x.len() != model.lengthscales.len() {
            return Err(Error::DimensionMismatch {
                expected: model.lengthscales.len(),
                got: x.len(),
            });
        }

        let k_star = kernel_vector(x, &model.x_train, &model.lengthscales, model.signal_var);

        // Mean: k*^T α
        let mean = k_star.dot(&model.alpha);

        // Variance: k(x*, x*) - k*^T (K + σ²I)^{-1} k*
        let v = model.cholesky.solve(&k_star);
        let var = (model.signal_var - k_star.dot(&v)).max(0.0);

        Ok((
            mean * model.y_std + model.y_mean,
            var.sqrt() * model.y_std,
        ))
    }
}
