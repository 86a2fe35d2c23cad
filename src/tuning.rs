//! Grid-search cross-validation
//!
//! Every grid point is scored by k-fold cross-validation of the one-vs-one
//! classifier; the point with the lowest mean misclassification rate is then
//! refit on the whole input.

use crate::classifier::binary::validate_cost;
use crate::classifier::{MultiClassModel, OneVsOneClassifier};
use crate::core::{
    common_dimension, distinct_labels, Classifier, Label, OptimizerConfig, Result, SVMError,
    Sample,
};
use crate::kernel::KernelSpec;
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Mean errors closer than this are treated as equal
const ERROR_TIE_TOLERANCE: f64 = 1e-12;

/// Kernel family searched by a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelFamily {
    Linear,
    Polynomial,
    Rbf,
    Sigmoid,
}

impl KernelFamily {
    pub fn name(&self) -> &'static str {
        match self {
            KernelFamily::Linear => "linear",
            KernelFamily::Polynomial => "polynomial",
            KernelFamily::Rbf => "rbf",
            KernelFamily::Sigmoid => "sigmoid",
        }
    }
}

/// Candidate values per hyperparameter axis
///
/// Axes a family does not use are ignored. An empty axis that the family
/// does use leaves the grid without combinations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParamGrid {
    pub costs: Vec<f64>,
    pub gammas: Vec<f64>,
    pub degrees: Vec<u32>,
    pub coef0s: Vec<f64>,
}

impl ParamGrid {
    pub fn new(costs: Vec<f64>) -> Self {
        Self {
            costs,
            ..Self::default()
        }
    }

    pub fn with_gammas(mut self, gammas: Vec<f64>) -> Self {
        self.gammas = gammas;
        self
    }

    pub fn with_degrees(mut self, degrees: Vec<u32>) -> Self {
        self.degrees = degrees;
        self
    }

    pub fn with_coef0s(mut self, coef0s: Vec<f64>) -> Self {
        self.coef0s = coef0s;
        self
    }

    /// All (kernel, cost) combinations for `family`, in enumeration order:
    /// cost outermost, then gamma, degree, coef0
    pub fn points(&self, family: KernelFamily) -> Vec<(KernelSpec, f64)> {
        let mut points = Vec::new();
        for &cost in &self.costs {
            match family {
                KernelFamily::Linear => points.push((KernelSpec::Linear, cost)),
                KernelFamily::Rbf => {
                    for &gamma in &self.gammas {
                        points.push((KernelSpec::Rbf { gamma }, cost));
                    }
                }
                KernelFamily::Polynomial => {
                    for &gamma in &self.gammas {
                        for &degree in &self.degrees {
                            for &coef0 in &self.coef0s {
                                let kernel = KernelSpec::Polynomial {
                                    degree,
                                    gamma,
                                    coef0,
                                };
                                points.push((kernel, cost));
                            }
                        }
                    }
                }
                KernelFamily::Sigmoid => {
                    for &gamma in &self.gammas {
                        for &coef0 in &self.coef0s {
                            points.push((KernelSpec::Sigmoid { gamma, coef0 }, cost));
                        }
                    }
                }
            }
        }
        points
    }

    pub fn len(&self, family: KernelFamily) -> usize {
        let axes = match family {
            KernelFamily::Linear => 1,
            KernelFamily::Rbf => self.gammas.len(),
            KernelFamily::Polynomial => self.gammas.len() * self.degrees.len() * self.coef0s.len(),
            KernelFamily::Sigmoid => self.gammas.len() * self.coef0s.len(),
        };
        self.costs.len() * axes
    }
}

/// How samples are assigned to folds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FoldStrategy {
    /// Folds are consecutive runs of the input order
    #[default]
    Contiguous,
    /// Input order permuted with a seeded RNG, then split into runs
    Shuffled { seed: u64 },
    /// Each class shuffled separately and spread evenly over the folds
    Stratified { seed: u64 },
}

/// Cross-validated score of one grid point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub kernel: KernelSpec,
    pub cost: f64,
    /// Misclassification rate on each held-out fold
    pub fold_errors: Vec<f64>,
    pub mean_error: f64,
}

/// Outcome of a grid search
#[derive(Debug, Clone)]
pub struct TuneResult<L> {
    best: usize,
    history: Vec<GridPoint>,
    model: MultiClassModel<L>,
}

impl<L: Label> TuneResult<L> {
    pub fn best_point(&self) -> &GridPoint {
        &self.history[self.best]
    }

    pub fn best_kernel(&self) -> KernelSpec {
        self.best_point().kernel
    }

    pub fn best_cost(&self) -> f64 {
        self.best_point().cost
    }

    pub fn best_error(&self) -> f64 {
        self.best_point().mean_error
    }

    /// The winning configuration refit on all samples
    pub fn model(&self) -> &MultiClassModel<L> {
        &self.model
    }

    pub fn into_model(self) -> MultiClassModel<L> {
        self.model
    }

    /// Every grid point, in enumeration order
    pub fn history(&self) -> &[GridPoint] {
        &self.history
    }

    /// Other grid points whose mean error equals the best one
    pub fn ties(&self) -> Vec<&GridPoint> {
        let best = self.best_error();
        self.history
            .iter()
            .enumerate()
            .filter(|&(i, p)| i != self.best && (p.mean_error - best).abs() <= ERROR_TIE_TOLERANCE)
            .map(|(_, p)| p)
            .collect()
    }
}

/// k-fold grid-search tuner
#[derive(Debug, Clone)]
pub struct GridSearch {
    folds: usize,
    strategy: FoldStrategy,
    config: OptimizerConfig,
}

impl Default for GridSearch {
    fn default() -> Self {
        Self {
            folds: 10,
            strategy: FoldStrategy::default(),
            config: OptimizerConfig::default(),
        }
    }
}

impl GridSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folds(mut self, folds: usize) -> Self {
        self.folds = folds;
        self
    }

    pub fn with_fold_strategy(mut self, strategy: FoldStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Solver settings used for every fit
    pub fn with_optimizer(mut self, config: OptimizerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn folds(&self) -> usize {
        self.folds
    }

    pub fn fold_strategy(&self) -> FoldStrategy {
        self.strategy
    }

    /// Cross-validate every point of `grid` for `family` and refit the best
    ///
    /// All preconditions are checked before the first fit. Ties in mean
    /// error go to the smaller cost, then to the earlier grid point.
    pub fn tune<L: Label>(
        &self,
        samples: &[Sample<L>],
        family: KernelFamily,
        grid: &ParamGrid,
    ) -> Result<TuneResult<L>> {
        let points = grid.points(family);
        if points.is_empty() {
            return Err(SVMError::EmptyGrid);
        }
        for (kernel, cost) in &points {
            kernel.validate()?;
            validate_cost(*cost)?;
        }
        self.config.validate()?;

        if self.folds < 2 {
            return Err(SVMError::InvalidParameter(format!(
                "Cross-validation needs at least 2 folds, got: {}",
                self.folds
            )));
        }
        common_dimension(samples)?;
        if self.folds > samples.len() {
            return Err(SVMError::InsufficientSamples {
                folds: self.folds,
                samples: samples.len(),
            });
        }

        let classes = distinct_labels(samples);
        if classes.len() < 2 {
            return Err(SVMError::InsufficientClasses {
                found: classes.len(),
            });
        }

        let splits = self.split(samples)?;
        let trainer = OneVsOneClassifier::new(self.config.clone());

        info!(
            "Grid search: {} {} points x {} folds on {} samples",
            points.len(),
            family.name(),
            self.folds,
            samples.len()
        );

        let mut history = Vec::with_capacity(points.len());
        for (kernel, cost) in points {
            let mut fold_errors = Vec::with_capacity(splits.len());
            for (fold, (train, held_out)) in splits.iter().enumerate() {
                let model = trainer.fit(train, kernel, cost)?;
                let error = model.error_rate(held_out);
                debug!("{kernel}, C = {cost}: fold {fold} error {error:.4}");
                fold_errors.push(error);
            }
            let mean_error = fold_errors.iter().sum::<f64>() / fold_errors.len() as f64;
            info!("{kernel}, C = {cost}: mean CV error {mean_error:.4}");
            history.push(GridPoint {
                kernel,
                cost,
                fold_errors,
                mean_error,
            });
        }

        let best = select_best(&history);
        let winner = &history[best];
        info!(
            "Best: {}, C = {} (mean CV error {:.4}); refitting on all {} samples",
            winner.kernel,
            winner.cost,
            winner.mean_error,
            samples.len()
        );
        let model = trainer.fit(samples, winner.kernel, winner.cost)?;

        Ok(TuneResult {
            best,
            history,
            model,
        })
    }

    /// Held-out index sets, one per fold
    pub fn fold_indices<L: Label>(&self, samples: &[Sample<L>]) -> Vec<Vec<usize>> {
        let n = samples.len();
        let k = self.folds.max(1);

        match self.strategy {
            FoldStrategy::Contiguous => runs((0..n).collect(), k),
            FoldStrategy::Shuffled { seed } => {
                let mut order: Vec<usize> = (0..n).collect();
                order.shuffle(&mut SmallRng::seed_from_u64(seed));
                runs(order, k)
            }
            FoldStrategy::Stratified { seed } => {
                // Classes shuffled one after another, then dealt round-robin so
                // a class smaller than k continues where the previous one stopped
                let mut rng = SmallRng::seed_from_u64(seed);
                let mut order = Vec::with_capacity(n);
                for class in distinct_labels(samples) {
                    let mut members: Vec<usize> =
                        (0..n).filter(|&i| samples[i].label == class).collect();
                    members.shuffle(&mut rng);
                    order.extend(members);
                }
                let mut folds = vec![Vec::new(); k];
                for (position, index) in order.into_iter().enumerate() {
                    folds[position % k].push(index);
                }
                folds
            }
        }
    }

    /// Training and held-out samples per fold, checked for usability
    #[allow(clippy::type_complexity)]
    fn split<L: Label>(&self, samples: &[Sample<L>]) -> Result<Vec<(Vec<Sample<L>>, Vec<Sample<L>>)>> {
        let n = samples.len();
        let mut splits = Vec::with_capacity(self.folds);

        for held_out in self.fold_indices(samples) {
            if held_out.is_empty() {
                return Err(SVMError::InsufficientSamples {
                    folds: self.folds,
                    samples: n,
                });
            }
            let mut in_fold = vec![false; n];
            for &i in &held_out {
                in_fold[i] = true;
            }

            let train: Vec<Sample<L>> = (0..n)
                .filter(|&i| !in_fold[i])
                .map(|i| samples[i].clone())
                .collect();
            let found = distinct_labels(&train).len();
            if found < 2 {
                return Err(SVMError::InsufficientClasses { found });
            }

            let validation = held_out.iter().map(|&i| samples[i].clone()).collect();
            splits.push((train, validation));
        }

        Ok(splits)
    }
}

/// Fold f covers positions [f·n/k, (f+1)·n/k) of `order`
fn runs(order: Vec<usize>, k: usize) -> Vec<Vec<usize>> {
    let n = order.len();
    (0..k)
        .map(|f| order[f * n / k..(f + 1) * n / k].to_vec())
        .collect()
}

/// Lowest mean error, then smaller cost, then earliest point
fn select_best(history: &[GridPoint]) -> usize {
    let mut best = 0;
    for (i, point) in history.iter().enumerate().skip(1) {
        let current = &history[best];
        let lower = point.mean_error < current.mean_error - ERROR_TIE_TOLERANCE;
        let tied = (point.mean_error - current.mean_error).abs() <= ERROR_TIE_TOLERANCE;
        if lower || (tied && point.cost < current.cost) {
            best = i;
        }
    }
    best
}
