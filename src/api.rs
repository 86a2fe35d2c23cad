//! High-level API for Support Vector Machine operations
//!
//! This module provides a user-friendly interface for common SVM tasks,
//! including training, tuning, prediction, and model evaluation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use svmtune::api::SVM;
//! use svmtune::kernel::KernelSpec;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Train a model on data
//! let model = SVM::new()
//!     .with_kernel(KernelSpec::Rbf { gamma: 0.5 })
//!     .with_cost(1.0)
//!     .train_from_csv("iris.csv")?;
//!
//! // Evaluate it on held-out data
//! let confusion = SVM::evaluate_csv(&model, "iris_test.csv")?;
//! println!("Accuracy: {:.2}%", confusion.accuracy() * 100.0);
//! # Ok(())
//! # }
//! ```

use crate::classifier::{MultiClassModel, OneVsOneClassifier};
use crate::core::{Classifier, Dataset, Label, OptimizerConfig, Result, Sample, WorkingSetStrategy};
use crate::data::load_csv;
use crate::kernel::KernelSpec;
use crate::metrics::ConfusionMatrix;
use crate::tuning::{FoldStrategy, GridSearch, KernelFamily, ParamGrid, TuneResult};
use log::{info, warn};
use std::path::Path;

/// High-level SVM interface with builder pattern
#[derive(Debug, Clone)]
pub struct SVM {
    kernel: KernelSpec,
    cost: f64,
    config: OptimizerConfig,
}

impl SVM {
    /// Create a new SVM with linear kernel and default parameters
    pub fn new() -> Self {
        Self {
            kernel: KernelSpec::Linear,
            cost: 1.0,
            config: OptimizerConfig::default(),
        }
    }

    /// SVM with an RBF kernel
    pub fn with_rbf(gamma: f64) -> Self {
        Self::new().with_kernel(KernelSpec::Rbf { gamma })
    }

    /// SVM with an RBF kernel and gamma = 1 / n_features
    pub fn with_rbf_auto(n_features: usize) -> Self {
        Self::with_rbf(1.0 / n_features.max(1) as f64)
    }

    /// Set the kernel
    pub fn with_kernel(mut self, kernel: KernelSpec) -> Self {
        self.kernel = kernel;
        self
    }

    /// Set regularization parameter C
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    /// Set convergence tolerance
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    /// Set maximum number of iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set kernel cache size in bytes
    pub fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.config.cache_size = cache_size;
        self
    }

    /// Alphas at or below this value do not make a support vector
    pub fn with_sv_tolerance(mut self, sv_tolerance: f64) -> Self {
        self.config.sv_tolerance = sv_tolerance;
        self
    }

    /// Set the SMO pair selection rule
    pub fn with_working_set_strategy(mut self, strategy: WorkingSetStrategy) -> Self {
        self.config.working_set_strategy = strategy;
        self
    }

    pub fn kernel(&self) -> &KernelSpec {
        &self.kernel
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Train on a dataset
    pub fn train<L: Label>(&self, dataset: &Dataset<L>) -> Result<MultiClassModel<L>> {
        self.train_samples(dataset.samples())
    }

    /// Train on samples
    ///
    /// Two classes give a single pairwise model; more classes are handled
    /// one-vs-one.
    pub fn train_samples<L: Label>(&self, samples: &[Sample<L>]) -> Result<MultiClassModel<L>> {
        let model =
            OneVsOneClassifier::new(self.config.clone()).fit(samples, self.kernel, self.cost)?;
        for diagnostic in model.diagnostics() {
            warn!("{diagnostic}");
        }
        info!(
            "Trained {} pairwise model(s) over {} classes, {} support vectors",
            model.n_models(),
            model.n_classes(),
            model.n_support_vectors()
        );
        Ok(model)
    }

    /// Train from a CSV file (header detected automatically)
    pub fn train_from_csv<P: AsRef<Path>>(&self, path: P) -> Result<MultiClassModel<String>> {
        let dataset = load_csv(path)?;
        self.train(&dataset)
    }

    /// Grid search over `grid` with this builder's solver settings
    ///
    /// The kernel and cost set on the builder are ignored; the search picks
    /// its own.
    pub fn tune<L: Label>(
        &self,
        samples: &[Sample<L>],
        family: KernelFamily,
        grid: &ParamGrid,
        folds: usize,
        strategy: FoldStrategy,
    ) -> Result<TuneResult<L>> {
        GridSearch::new()
            .with_folds(folds)
            .with_fold_strategy(strategy)
            .with_optimizer(self.config.clone())
            .tune(samples, family, grid)
    }

    /// Confusion matrix of `model` on `samples`
    pub fn evaluate<L: Label>(model: &MultiClassModel<L>, samples: &[Sample<L>]) -> ConfusionMatrix<L> {
        ConfusionMatrix::from_model(model, samples)
    }

    /// Confusion matrix of `model` on a CSV file
    pub fn evaluate_csv<P: AsRef<Path>>(
        model: &MultiClassModel<String>,
        path: P,
    ) -> Result<ConfusionMatrix<String>> {
        let dataset = load_csv(path)?;
        Ok(Self::evaluate(model, dataset.samples()))
    }
}

impl Default for SVM {
    fn default() -> Self {
        Self::new()
    }
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub kernel: KernelSpec,
    pub cost: f64,
    pub n_classes: usize,
    pub n_models: usize,
    pub n_support_vectors: usize,
    pub converged: bool,
}

impl ModelInfo {
    pub fn of<L: Label>(model: &MultiClassModel<L>) -> Self {
        let first = model.pairs().first().map(|p| &p.model);
        Self {
            kernel: first.map(|m| *m.kernel()).unwrap_or_default(),
            cost: first.map_or(0.0, |m| m.cost()),
            n_classes: model.n_classes(),
            n_models: model.n_models(),
            n_support_vectors: model.n_support_vectors(),
            converged: model.diagnostics().is_empty(),
        }
    }
}

/// Convenience functions for quick operations
pub mod quick {
    use super::*;

    /// Train a linear SVM on CSV data with default parameters
    pub fn train_csv<P: AsRef<Path>>(path: P) -> Result<MultiClassModel<String>> {
        SVM::new().train_from_csv(path)
    }

    /// Train on one CSV file, return the accuracy on another
    pub fn evaluate_split<P1: AsRef<Path>, P2: AsRef<Path>>(
        train_path: P1,
        test_path: P2,
        kernel: KernelSpec,
        cost: f64,
    ) -> Result<f64> {
        let model = SVM::new()
            .with_kernel(kernel)
            .with_cost(cost)
            .train_from_csv(train_path)?;
        Ok(SVM::evaluate_csv(&model, test_path)?.accuracy())
    }
}
