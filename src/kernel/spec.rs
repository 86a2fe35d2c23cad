//! Serializable kernel configuration
//!
//! `KernelSpec` is the value models and grid points carry around. It is
//! validated once before training and then dispatched to the concrete
//! kernel implementations without further checks.

use crate::core::{Result, SVMError};
use crate::kernel::{Kernel, LinearKernel, PolynomialKernel, RBFKernel, SigmoidKernel};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kernel choice together with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KernelSpec {
    #[default]
    Linear,
    Polynomial { degree: u32, gamma: f64, coef0: f64 },
    Rbf { gamma: f64 },
    Sigmoid { gamma: f64, coef0: f64 },
}

impl KernelSpec {
    /// Check the parameters, failing with `InvalidParameter` on degree < 1,
    /// RBF gamma <= 0 or any non-finite value
    pub fn validate(&self) -> Result<()> {
        match *self {
            KernelSpec::Linear => Ok(()),
            KernelSpec::Polynomial {
                degree,
                gamma,
                coef0,
            } => PolynomialKernel::new(degree, gamma, coef0).map(|_| ()),
            KernelSpec::Rbf { gamma } => RBFKernel::new(gamma).map(|_| ()),
            KernelSpec::Sigmoid { gamma, coef0 } => SigmoidKernel::new(gamma, coef0).map(|_| ()),
        }
    }

    /// Short kernel name, as used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            KernelSpec::Linear => "linear",
            KernelSpec::Polynomial { .. } => "polynomial",
            KernelSpec::Rbf { .. } => "rbf",
            KernelSpec::Sigmoid { .. } => "sigmoid",
        }
    }
}

impl fmt::Display for KernelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelSpec::Linear => write!(f, "linear"),
            KernelSpec::Polynomial {
                degree,
                gamma,
                coef0,
            } => write!(f, "polynomial(degree={degree}, gamma={gamma}, coef0={coef0})"),
            KernelSpec::Rbf { gamma } => write!(f, "rbf(gamma={gamma})"),
            KernelSpec::Sigmoid { gamma, coef0 } => {
                write!(f, "sigmoid(gamma={gamma}, coef0={coef0})")
            }
        }
    }
}

impl Kernel for KernelSpec {
    fn compute(&self, x: &[f64], y: &[f64]) -> f64 {
        match *self {
            KernelSpec::Linear => LinearKernel.compute(x, y),
            KernelSpec::Polynomial {
                degree,
                gamma,
                coef0,
            } => PolynomialKernel {
                gamma,
                coef0,
                degree,
            }
            .compute(x, y),
            KernelSpec::Rbf { gamma } => RBFKernel::from_gamma_unchecked(gamma).compute(x, y),
            KernelSpec::Sigmoid { gamma, coef0 } => SigmoidKernel { gamma, coef0 }.compute(x, y),
        }
    }

    fn compute_with_norms(&self, x: &[f64], y: &[f64], x_norm_sq: f64, y_norm_sq: f64) -> f64 {
        match *self {
            KernelSpec::Rbf { gamma } => RBFKernel::from_gamma_unchecked(gamma)
                .compute_with_norms(x, y, x_norm_sq, y_norm_sq),
            _ => self.compute(x, y),
        }
    }
}

/// Checked kernel evaluation
///
/// Validates the kernel parameters and the vector lengths, then returns
/// K(a, b).
///
/// # Examples
/// ```
/// use svmtune::kernel::{evaluate, KernelSpec};
///
/// let value = evaluate(&KernelSpec::Linear, &[1.0, 2.0], &[3.0, 4.0]).unwrap();
/// assert_eq!(value, 11.0);
/// assert!(evaluate(&KernelSpec::Rbf { gamma: 0.0 }, &[1.0], &[1.0]).is_err());
/// ```
pub fn evaluate(spec: &KernelSpec, a: &[f64], b: &[f64]) -> Result<f64> {
    spec.validate()?;
    if a.len() != b.len() {
        return Err(SVMError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(spec.compute(a, b))
}
