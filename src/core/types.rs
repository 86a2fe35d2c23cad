//! Core type definitions for SVM

use crate::core::{Label, Result, SVMError};
use serde::{Deserialize, Serialize};

/// Training sample with a dense feature vector and a class label
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample<L> {
    /// Feature vector
    pub features: Vec<f64>,
    /// Class label
    pub label: L,
}

impl<L> Sample<L> {
    /// Create a new sample
    pub fn new(features: Vec<f64>, label: L) -> Self {
        Self { features, label }
    }

    /// Number of features
    pub fn dim(&self) -> usize {
        self.features.len()
    }
}

/// Validate that every sample has the same dimensionality and finite
/// features, and return the dimensionality
pub(crate) fn common_dimension<L>(samples: &[Sample<L>]) -> Result<usize> {
    let first = samples.first().ok_or(SVMError::EmptyDataset)?;
    let expected = first.dim();
    for (index, sample) in samples.iter().enumerate() {
        if sample.dim() != expected {
            return Err(SVMError::DimensionMismatch {
                expected,
                actual: sample.dim(),
            });
        }
        check_finite(&sample.features)
            .map_err(|e| SVMError::InvalidInput(format!("Sample {index}: {e}")))?;
    }
    Ok(expected)
}

/// `InvalidInput` when any feature is NaN or infinite
pub(crate) fn check_finite(features: &[f64]) -> Result<()> {
    match features.iter().position(|v| !v.is_finite()) {
        None => Ok(()),
        Some(col) => Err(SVMError::InvalidInput(format!(
            "non-finite value {} in feature {col}",
            features[col]
        ))),
    }
}

/// Distinct labels of a sample slice, in order of first appearance
pub(crate) fn distinct_labels<L: Label>(samples: &[Sample<L>]) -> Vec<L> {
    let mut classes: Vec<L> = Vec::new();
    for sample in samples {
        if !classes.contains(&sample.label) {
            classes.push(sample.label.clone());
        }
    }
    classes
}

/// Ordered, non-empty collection of samples with a fixed dimensionality
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset<L> {
    samples: Vec<Sample<L>>,
    dim: usize,
}

impl<L: Label> Dataset<L> {
    /// Build a dataset, validating that it is non-empty and that all
    /// feature vectors share one dimensionality
    pub fn new(samples: Vec<Sample<L>>) -> Result<Self> {
        let dim = common_dimension(&samples)?;
        Ok(Self { samples, dim })
    }

    /// Build a dataset from parallel feature and label vectors
    pub fn from_parts(features: Vec<Vec<f64>>, labels: Vec<L>) -> Result<Self> {
        if features.len() != labels.len() {
            return Err(SVMError::InvalidInput(format!(
                "{} feature vectors but {} labels",
                features.len(),
                labels.len()
            )));
        }
        let samples = features
            .into_iter()
            .zip(labels)
            .map(|(f, l)| Sample::new(f, l))
            .collect();
        Self::new(samples)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false: datasets are validated non-empty on construction
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of features per sample
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn samples(&self) -> &[Sample<L>] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<Sample<L>> {
        self.samples
    }

    /// Labels of every sample, in order
    pub fn labels(&self) -> Vec<L> {
        self.samples.iter().map(|s| s.label.clone()).collect()
    }

    /// Distinct labels in order of first appearance
    pub fn classes(&self) -> Vec<L> {
        distinct_labels(&self.samples)
    }

    /// Samples at the given positions, in the given order
    ///
    /// # Panics
    /// Panics if any index is out of bounds
    pub fn subset(&self, indices: &[usize]) -> Vec<Sample<L>> {
        indices.iter().map(|&i| self.samples[i].clone()).collect()
    }

    /// New dataset holding only the samples whose label is in `labels`
    pub fn filter_classes(&self, labels: &[L]) -> Result<Self> {
        let samples: Vec<Sample<L>> = self
            .samples
            .iter()
            .filter(|s| labels.contains(&s.label))
            .cloned()
            .collect();
        Self::new(samples)
    }
}

/// Pair selection rule used by the SMO solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WorkingSetStrategy {
    /// First-order rule: the pair with the largest KKT violation
    MaxViolatingPair,
    /// Second-order rule: maximal violator first, then the partner with the
    /// largest estimated objective gain
    #[default]
    SecondOrder,
}

/// Result of optimization process
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Lagrange multipliers (alpha values)
    pub alpha: Vec<f64>,
    /// Bias term (b)
    pub b: f64,
    /// Indices of support vectors (where alpha > sv_tolerance)
    pub support_vectors: Vec<usize>,
    /// Number of iterations performed
    pub iterations: usize,
    /// Final dual objective value
    pub objective_value: f64,
    /// Maximal KKT violation at termination
    pub violation: f64,
    /// Whether the violation fell below epsilon within the budget
    pub converged: bool,
}

/// Configuration for optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Tolerance for KKT conditions
    pub epsilon: f64,
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// Alphas at or below this value are treated as zero
    pub sv_tolerance: f64,
    /// Kernel cache size in bytes
    pub cache_size: usize,
    /// Pair selection rule
    pub working_set_strategy: WorkingSetStrategy,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.001,
            max_iterations: 100_000,
            sv_tolerance: 1e-7,
            cache_size: 100_000_000, // 100MB
            working_set_strategy: WorkingSetStrategy::SecondOrder,
        }
    }
}

impl OptimizerConfig {
    /// Check the configuration before any training work starts
    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "epsilon must be positive, got: {}",
                self.epsilon
            )));
        }
        if !(self.sv_tolerance.is_finite() && self.sv_tolerance >= 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "sv_tolerance must be non-negative, got: {}",
                self.sv_tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(SVMError::InvalidParameter(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
