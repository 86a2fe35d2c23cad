//! Binary soft-margin SVM classifier
//!
//! Ties a kernel and the SMO solver together: builds the Gram matrix of the
//! training points, solves the dual, and keeps only the support vectors.

use crate::core::{
    check_finite, common_dimension, distinct_labels, Classifier, Label, OptimizerConfig, Result,
    SVMError, Sample,
};
use crate::kernel::{Kernel, KernelSpec};
use crate::solver::{build_gram, SMOSolver};
use log::debug;
use serde::{Deserialize, Serialize};

/// Trainer for two-class problems
#[derive(Debug, Clone, Default)]
pub struct BinaryClassifier {
    config: OptimizerConfig,
}

impl BinaryClassifier {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Fit a model on samples carrying exactly two distinct labels
    ///
    /// The label met first in sample order becomes the +1 class.
    pub fn fit<L: Label>(
        &self,
        samples: &[Sample<L>],
        kernel: KernelSpec,
        cost: f64,
    ) -> Result<TrainedModel<L>> {
        common_dimension(samples)?;
        let [positive, negative]: [L; 2] =
            distinct_labels(samples).try_into().map_err(|labels: Vec<L>| {
                SVMError::InvalidInput(format!(
                    "Binary classification requires exactly 2 distinct labels, found {}",
                    labels.len()
                ))
            })?;

        let refs: Vec<&Sample<L>> = samples.iter().collect();
        self.fit_labelled(&refs, kernel, cost, positive, negative)
    }

    /// Fit with an explicit label-to-sign assignment
    ///
    /// Every sample must carry either `positive` or `negative`.
    pub(crate) fn fit_labelled<L: Label>(
        &self,
        samples: &[&Sample<L>],
        kernel: KernelSpec,
        cost: f64,
        positive: L,
        negative: L,
    ) -> Result<TrainedModel<L>> {
        kernel.validate()?;
        validate_cost(cost)?;
        self.config.validate()?;

        let first = samples.first().ok_or(SVMError::EmptyDataset)?;
        let dim = first.dim();

        let mut y = Vec::with_capacity(samples.len());
        for (index, sample) in samples.iter().enumerate() {
            if sample.dim() != dim {
                return Err(SVMError::DimensionMismatch {
                    expected: dim,
                    actual: sample.dim(),
                });
            }
            check_finite(&sample.features)
                .map_err(|e| SVMError::InvalidInput(format!("Sample {index}: {e}")))?;
            if sample.label == positive {
                y.push(1.0);
            } else if sample.label == negative {
                y.push(-1.0);
            } else {
                return Err(SVMError::InvalidInput(format!(
                    "Unexpected label {:?} in a {:?} vs {:?} problem",
                    sample.label, positive, negative
                )));
            }
        }

        debug!(
            "Fitting {:?} vs {:?} on {} samples with {} kernel, C = {}",
            positive,
            negative,
            samples.len(),
            kernel,
            cost
        );

        let points: Vec<&[f64]> = samples.iter().map(|s| s.features.as_slice()).collect();
        let mut gram = build_gram(&kernel, points, self.config.cache_size);
        let result = SMOSolver::new(self.config.clone()).solve(&mut *gram, &y, cost)?;

        let support_vectors = result
            .support_vectors
            .iter()
            .map(|&index| SupportVector {
                index,
                features: samples[index].features.clone(),
                alpha: result.alpha[index],
                sign: y[index],
            })
            .collect();

        Ok(TrainedModel {
            kernel,
            cost,
            positive_label: positive,
            negative_label: negative,
            support_vectors,
            bias: result.b,
            iterations: result.iterations,
            converged: result.converged,
            violation: result.violation,
            dim,
        })
    }
}

pub(crate) fn validate_cost(cost: f64) -> Result<()> {
    if cost.is_finite() && cost > 0.0 {
        Ok(())
    } else {
        Err(SVMError::InvalidParameter(format!(
            "Cost must be positive, got: {cost}"
        )))
    }
}

/// A retained training point with its dual weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportVector {
    /// Position in the sample slice the model was fit on
    pub index: usize,
    pub features: Vec<f64>,
    pub alpha: f64,
    /// +1.0 or -1.0
    pub sign: f64,
}

/// A fitted two-class model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel<L> {
    kernel: KernelSpec,
    cost: f64,
    positive_label: L,
    negative_label: L,
    support_vectors: Vec<SupportVector>,
    bias: f64,
    iterations: usize,
    converged: bool,
    violation: f64,
    dim: usize,
}

impl<L: Label> TrainedModel<L> {
    /// Σ α_i s_i K(sv_i, x) + b
    ///
    /// `x` must have the training dimensionality; see `check_dimension`.
    pub fn decision_value(&self, x: &[f64]) -> f64 {
        self.support_vectors
            .iter()
            .map(|sv| sv.alpha * sv.sign * self.kernel.compute(&sv.features, x))
            .sum::<f64>()
            + self.bias
    }

    /// Map a decision value to a label; zero goes to the -1 class
    pub fn label_for(&self, decision_value: f64) -> &L {
        if decision_value > 0.0 {
            &self.positive_label
        } else {
            &self.negative_label
        }
    }

    pub fn check_dimension(&self, x: &[f64]) -> Result<()> {
        if x.len() == self.dim {
            Ok(())
        } else {
            Err(SVMError::DimensionMismatch {
                expected: self.dim,
                actual: x.len(),
            })
        }
    }

    /// `predict` after checking the length and finiteness of `x`
    pub fn try_predict(&self, x: &[f64]) -> Result<L> {
        self.check_dimension(x)?;
        check_finite(x)?;
        Ok(self.predict(x))
    }

    /// `DidNotConverge` when the solver ran out of iterations
    pub fn diagnostic(&self) -> Option<SVMError> {
        if self.converged {
            None
        } else {
            Some(SVMError::DidNotConverge {
                iterations: self.iterations,
                violation: self.violation,
            })
        }
    }

    pub fn kernel(&self) -> &KernelSpec {
        &self.kernel
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn positive_label(&self) -> &L {
        &self.positive_label
    }

    pub fn negative_label(&self) -> &L {
        &self.negative_label
    }

    pub fn support_vectors(&self) -> &[SupportVector] {
        &self.support_vectors
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Primal weight vector Σ α_i s_i sv_i, meaningful for the linear kernel
    pub fn linear_weights(&self) -> Option<Vec<f64>> {
        if self.kernel != KernelSpec::Linear {
            return None;
        }
        let mut w = vec![0.0; self.dim];
        for sv in &self.support_vectors {
            for (wk, xk) in w.iter_mut().zip(&sv.features) {
                *wk += sv.alpha * sv.sign * xk;
            }
        }
        Some(w)
    }
}

impl<L: Label> Classifier<L> for TrainedModel<L> {
    fn predict(&self, features: &[f64]) -> L {
        self.label_for(self.decision_value(features)).clone()
    }

    fn n_support_vectors(&self) -> usize {
        self.support_vectors.len()
    }
}
