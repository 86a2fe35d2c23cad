//! Polynomial Kernel Implementation
//!
//! The polynomial kernel is defined as:
//! K(x, y) = (γ * <x, y> + r)^d
//!
//! Where:
//! - γ (gamma): scaling factor for the dot product
//! - r (coef0): independent term in the polynomial
//! - d (degree): degree of the polynomial
//!
//! Common configurations:
//! - Quadratic kernel: d=2, γ=1, r=1
//! - Cubic kernel: d=3, γ=1, r=1

use crate::core::{Result, SVMError};
use crate::kernel::linear::dot_product;
use crate::kernel::traits::Kernel;

/// Polynomial kernel with configurable degree, gamma, and coefficient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolynomialKernel {
    /// Scaling factor for the dot product
    pub gamma: f64,
    /// Independent term in the polynomial
    pub coef0: f64,
    /// Degree of the polynomial
    pub degree: u32,
}

impl PolynomialKernel {
    /// Creates a new polynomial kernel with the specified parameters
    ///
    /// Fails with `InvalidParameter` if `degree` is zero or gamma/coef0 are
    /// not finite.
    ///
    /// # Examples
    /// ```
    /// use svmtune::kernel::PolynomialKernel;
    ///
    /// // Cubic kernel: (0.5·x·y + 1)³
    /// let cubic = PolynomialKernel::new(3, 0.5, 1.0).unwrap();
    /// assert_eq!(cubic.degree, 3);
    /// assert!(PolynomialKernel::new(0, 1.0, 0.0).is_err());
    /// ```
    pub fn new(degree: u32, gamma: f64, coef0: f64) -> Result<Self> {
        if degree < 1 {
            return Err(SVMError::InvalidParameter(
                "Polynomial degree must be at least 1".to_string(),
            ));
        }
        if !gamma.is_finite() || !coef0.is_finite() {
            return Err(SVMError::InvalidParameter(format!(
                "Polynomial gamma and coef0 must be finite, got: gamma={gamma}, coef0={coef0}"
            )));
        }
        Ok(Self {
            gamma,
            coef0,
            degree,
        })
    }

    /// Creates a quadratic kernel: (γ * <x,y> + 1)²
    pub fn quadratic(gamma: f64) -> Result<Self> {
        Self::new(2, gamma, 1.0)
    }

    /// Creates a cubic kernel: (γ * <x,y> + 1)³
    pub fn cubic(gamma: f64) -> Result<Self> {
        Self::new(3, gamma, 1.0)
    }
}

impl Kernel for PolynomialKernel {
    fn compute(&self, x: &[f64], y: &[f64]) -> f64 {
        let base = self.gamma * dot_product(x, y) + self.coef0;
        // powi takes i32; degrees beyond that range overflow anyway
        base.powi(self.degree.min(i32::MAX as u32) as i32)
    }
}
