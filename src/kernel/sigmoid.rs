//! Sigmoid (Tanh) Kernel Implementation
//!
//! K(x, y) = tanh(γ * <x, y> + r)
//!
//! where γ (gamma) scales the dot product and r (coef0) shifts it. The
//! kernel is bounded in [-1, 1] and is not positive semi-definite for every
//! parameter choice, so the solver must cope with non-positive curvature.

use crate::core::{Result, SVMError};
use crate::kernel::linear::dot_product;
use crate::kernel::traits::Kernel;

/// Sigmoid (Hyperbolic Tangent) kernel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SigmoidKernel {
    /// Scaling parameter for the dot product
    pub gamma: f64,
    /// Bias/offset parameter (can be positive, negative, or zero)
    pub coef0: f64,
}

impl SigmoidKernel {
    /// Creates a new Sigmoid kernel with specified parameters
    ///
    /// # Examples
    /// ```
    /// use svmtune::kernel::SigmoidKernel;
    ///
    /// let kernel = SigmoidKernel::new(0.1, -1.0).unwrap();
    /// assert_eq!(kernel.gamma, 0.1);
    /// assert_eq!(kernel.coef0, -1.0);
    /// ```
    pub fn new(gamma: f64, coef0: f64) -> Result<Self> {
        if !gamma.is_finite() || !coef0.is_finite() {
            return Err(SVMError::InvalidParameter(format!(
                "Sigmoid gamma and coef0 must be finite, got: gamma={gamma}, coef0={coef0}"
            )));
        }
        Ok(Self { gamma, coef0 })
    }

    /// Sigmoid kernel with gamma = 1/n_features and coef0 = 0
    pub fn with_auto_gamma(n_features: usize) -> Result<Self> {
        if n_features == 0 {
            return Err(SVMError::InvalidParameter(
                "Number of features must be positive".to_string(),
            ));
        }
        Self::new(1.0 / n_features as f64, 0.0)
    }
}

impl Kernel for SigmoidKernel {
    fn compute(&self, x: &[f64], y: &[f64]) -> f64 {
        (self.gamma * dot_product(x, y) + self.coef0).tanh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sigmoid_kernel_computation() {
        let kernel = SigmoidKernel::new(0.5, -1.0).unwrap();
        // <x, y> = 4, tanh(0.5 * 4 - 1) = tanh(1)
        assert_abs_diff_eq!(kernel.compute(&[2.0], &[2.0]), 1.0_f64.tanh(), epsilon = 1e-12);
    }

    #[test]
    fn test_sigmoid_kernel_bounded() {
        let kernel = SigmoidKernel::new(10.0, 0.0).unwrap();
        let big = kernel.compute(&[100.0], &[100.0]);
        let small = kernel.compute(&[100.0], &[-100.0]);
        assert!(big <= 1.0 && big > 0.99);
        assert!(small >= -1.0 && small < -0.99);
    }

    #[test]
    fn test_sigmoid_auto_gamma() {
        let kernel = SigmoidKernel::with_auto_gamma(4).unwrap();
        assert_eq!(kernel.gamma, 0.25);
        assert_eq!(kernel.coef0, 0.0);
        assert!(SigmoidKernel::with_auto_gamma(0).is_err());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            SigmoidKernel::new(f64::NAN, 0.0),
            Err(SVMError::InvalidParameter(_))
        ));
    }
}
