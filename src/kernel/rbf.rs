//! RBF (Radial Basis Function) kernel implementation
//!
//! The RBF kernel is defined as: K(x, y) = exp(-γ * ||x - y||²)
//! where γ (gamma) is a hyperparameter that controls the kernel width.

use crate::core::{Result, SVMError};
use crate::kernel::linear::dot_product;
use crate::kernel::Kernel;

/// RBF (Radial Basis Function) kernel: K(x, y) = exp(-γ * ||x - y||²)
///
/// The gamma parameter controls the "reach" of each training example:
/// - High gamma: close points have high influence (potential overfitting)
/// - Low gamma: distant points have influence (potential underfitting)
///
/// `1.0 / n_features` is a good default starting point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RBFKernel {
    gamma: f64,
}

impl RBFKernel {
    /// Create a new RBF kernel with specified gamma parameter
    ///
    /// Fails with `InvalidParameter` if gamma is not a positive finite number.
    pub fn new(gamma: f64) -> Result<Self> {
        if !(gamma.is_finite() && gamma > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "RBF gamma must be positive, got: {gamma}"
            )));
        }
        Ok(Self { gamma })
    }

    /// Create RBF kernel with gamma = 1.0 / n_features
    pub fn with_auto_gamma(n_features: usize) -> Result<Self> {
        if n_features == 0 {
            return Err(SVMError::InvalidParameter(
                "Number of features must be positive".to_string(),
            ));
        }
        Self::new(1.0 / n_features as f64)
    }

    /// Build from a gamma already checked by `KernelSpec::validate`
    pub(crate) fn from_gamma_unchecked(gamma: f64) -> Self {
        Self { gamma }
    }

    /// Get the gamma parameter
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Kernel for RBFKernel {
    fn compute(&self, x: &[f64], y: &[f64]) -> f64 {
        (-self.gamma * squared_euclidean_distance(x, y)).exp()
    }

    fn compute_with_norms(&self, x: &[f64], y: &[f64], x_norm_sq: f64, y_norm_sq: f64) -> f64 {
        // ||x - y||² = ||x||² + ||y||² - 2*x^T*y
        let squared_distance = (x_norm_sq + y_norm_sq - 2.0 * dot_product(x, y)).max(0.0);
        (-self.gamma * squared_distance).exp()
    }
}

/// Squared Euclidean distance ||x - y||²
pub(crate) fn squared_euclidean_distance(x: &[f64], y: &[f64]) -> f64 {
    x.iter()
        .zip(y)
        .map(|(a, b)| {
            let diff = a - b;
            diff * diff
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::linear::norm_squared;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rbf_kernel_creation() {
        let kernel = RBFKernel::new(0.5).unwrap();
        assert_eq!(kernel.gamma(), 0.5);

        let kernel_auto = RBFKernel::with_auto_gamma(10).unwrap();
        assert_eq!(kernel_auto.gamma(), 0.1);
    }

    #[test]
    fn test_rbf_kernel_invalid_gamma() {
        assert!(matches!(
            RBFKernel::new(-0.5),
            Err(SVMError::InvalidParameter(_))
        ));
        assert!(RBFKernel::new(0.0).is_err());
        assert!(RBFKernel::new(f64::NAN).is_err());
        assert!(RBFKernel::with_auto_gamma(0).is_err());
    }

    #[test]
    fn test_rbf_kernel_identical_vectors() {
        let kernel = RBFKernel::new(1.0).unwrap();
        let x = [1.0, 2.0, 3.0];

        // K(x, x) should always be 1.0 for RBF kernel
        assert_abs_diff_eq!(kernel.compute(&x, &x), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rbf_kernel_different_gammas() {
        let x = [1.0];
        let y = [3.0];

        // ||x - y||² = (1 - 3)² = 4
        let low = RBFKernel::new(0.1).unwrap().compute(&x, &y);
        let high = RBFKernel::new(10.0).unwrap().compute(&x, &y);

        assert!(low > high);
        assert_abs_diff_eq!(low, (-0.4_f64).exp(), epsilon = 1e-12);
        assert_abs_diff_eq!(high, (-40.0_f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_rbf_kernel_with_norms() {
        let kernel = RBFKernel::new(2.0).unwrap();
        let x = [3.0, 4.0];
        let y = [1.0, 2.0];

        let direct = kernel.compute(&x, &y);
        let via_norms = kernel.compute_with_norms(&x, &y, norm_squared(&x), norm_squared(&y));

        assert_abs_diff_eq!(direct, via_norms, epsilon = 1e-12);
    }

    #[test]
    fn test_rbf_kernel_decreases_with_distance() {
        let kernel = RBFKernel::new(1.0).unwrap();
        let origin = [0.0];

        let k1 = kernel.compute(&origin, &[1.0]);
        let k2 = kernel.compute(&origin, &[2.0]);
        let k3 = kernel.compute(&origin, &[3.0]);

        assert!(k1 > k2 && k2 > k3);
        assert!(k3 > 0.0 && k1 < 1.0);
    }

    #[test]
    fn test_squared_euclidean_distance() {
        assert_eq!(squared_euclidean_distance(&[1.0, 3.0, 0.0], &[0.0, 2.0, 1.0]), 3.0);
        assert_eq!(squared_euclidean_distance(&[1.0, 2.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_rbf_kernel_numerical_stability() {
        let kernel = RBFKernel::new(1e-6).unwrap();
        let result = kernel.compute(&[1e6], &[-1e6]);
        assert!(result.is_finite());
        assert!((0.0..=1.0).contains(&result));
    }
}
