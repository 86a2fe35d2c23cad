//! One-vs-one multi-class classification
//!
//! One binary model per unordered class pair, combined by majority vote.

use crate::classifier::binary::{validate_cost, BinaryClassifier, TrainedModel};
use crate::core::{
    check_finite, common_dimension, distinct_labels, Classifier, Label, OptimizerConfig, Result,
    SVMError, Sample,
};
use crate::kernel::KernelSpec;
use log::debug;
use serde::{Deserialize, Serialize};

/// Trainer for problems with two or more classes
#[derive(Debug, Clone, Default)]
pub struct OneVsOneClassifier {
    binary: BinaryClassifier,
}

impl OneVsOneClassifier {
    pub fn new(config: OptimizerConfig) -> Self {
        Self {
            binary: BinaryClassifier::new(config),
        }
    }

    pub fn config(&self) -> &OptimizerConfig {
        self.binary.config()
    }

    /// Fit k(k-1)/2 pairwise models for the k classes present
    ///
    /// Classes are ordered by first appearance. The model for pair (i, j),
    /// i < j, treats `classes[i]` as its +1 label.
    pub fn fit<L: Label>(
        &self,
        samples: &[Sample<L>],
        kernel: KernelSpec,
        cost: f64,
    ) -> Result<MultiClassModel<L>> {
        common_dimension(samples)?;
        kernel.validate()?;
        validate_cost(cost)?;
        self.binary.config().validate()?;

        let classes = distinct_labels(samples);
        if classes.len() < 2 {
            return Err(SVMError::InsufficientClasses {
                found: classes.len(),
            });
        }

        let mut pairs = Vec::with_capacity(classes.len() * (classes.len() - 1) / 2);
        for first in 0..classes.len() {
            for second in first + 1..classes.len() {
                let (a, b) = (&classes[first], &classes[second]);
                let subset: Vec<&Sample<L>> = samples
                    .iter()
                    .filter(|s| &s.label == a || &s.label == b)
                    .collect();

                let model =
                    self.binary
                        .fit_labelled(&subset, kernel, cost, a.clone(), b.clone())?;
                debug!(
                    "Pair {:?} vs {:?}: {} support vectors, {} iterations",
                    a,
                    b,
                    model.n_support_vectors(),
                    model.iterations()
                );
                pairs.push(PairModel {
                    first,
                    second,
                    model,
                });
            }
        }

        Ok(MultiClassModel { classes, pairs })
    }
}

/// Binary model for the class pair (`classes[first]`, `classes[second]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairModel<L> {
    pub first: usize,
    pub second: usize,
    pub model: TrainedModel<L>,
}

/// A fitted one-vs-one ensemble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiClassModel<L> {
    classes: Vec<L>,
    pairs: Vec<PairModel<L>>,
}

impl<L: Label> MultiClassModel<L> {
    /// Classes in first-appearance order
    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Pairwise models in enumeration order
    pub fn pairs(&self) -> &[PairModel<L>] {
        &self.pairs
    }

    pub fn n_models(&self) -> usize {
        self.pairs.len()
    }

    /// Model separating `a` and `b`, in either order
    pub fn get(&self, a: &L, b: &L) -> Option<&TrainedModel<L>> {
        self.pairs
            .iter()
            .find(|p| {
                let (x, y) = (&self.classes[p.first], &self.classes[p.second]);
                (x == a && y == b) || (x == b && y == a)
            })
            .map(|p| &p.model)
    }

    /// Decision value of every pairwise model, in pair order
    pub fn decision_values(&self, x: &[f64]) -> Vec<f64> {
        self.pairs.iter().map(|p| p.model.decision_value(x)).collect()
    }

    /// Votes per class, aligned with `classes()`
    pub fn votes(&self, x: &[f64]) -> Vec<usize> {
        self.tally(x).0
    }

    /// Votes per class and the pair index of each class's first vote
    fn tally(&self, x: &[f64]) -> (Vec<usize>, Vec<usize>) {
        let mut votes = vec![0; self.classes.len()];
        let mut first_vote_at = vec![usize::MAX; self.classes.len()];

        for (index, pair) in self.pairs.iter().enumerate() {
            let winner = if pair.model.decision_value(x) > 0.0 {
                pair.first
            } else {
                pair.second
            };
            votes[winner] += 1;
            if first_vote_at[winner] == usize::MAX {
                first_vote_at[winner] = index;
            }
        }

        (votes, first_vote_at)
    }

    pub fn check_dimension(&self, x: &[f64]) -> Result<()> {
        match self.pairs.first() {
            Some(pair) => pair.model.check_dimension(x),
            None => Ok(()),
        }
    }

    /// `predict` after checking the length and finiteness of `x`
    pub fn try_predict(&self, x: &[f64]) -> Result<L> {
        self.check_dimension(x)?;
        check_finite(x)?;
        Ok(self.predict(x))
    }

    /// Check the pair layout of a model that did not come from `fit`
    ///
    /// Every class pair `i < j` must appear once, in enumeration order, with
    /// matching labels and a common dimensionality.
    pub fn validate(&self) -> Result<()> {
        let k = self.classes.len();
        if k < 2 {
            return Err(SVMError::InsufficientClasses { found: k });
        }
        if count_distinct(&self.classes) != k {
            return Err(SVMError::InvalidInput("Duplicate class labels".to_string()));
        }

        let expected = (0..k).flat_map(|i| (i + 1..k).map(move |j| (i, j)));
        let mut count = 0;
        for (pair, (i, j)) in self.pairs.iter().zip(expected) {
            count += 1;
            if (pair.first, pair.second) != (i, j) {
                return Err(SVMError::InvalidInput(format!(
                    "Pair {} is ({}, {}), expected ({i}, {j})",
                    count - 1,
                    pair.first,
                    pair.second
                )));
            }
            let model = &pair.model;
            if model.positive_label() != &self.classes[i]
                || model.negative_label() != &self.classes[j]
            {
                return Err(SVMError::InvalidInput(format!(
                    "Pair ({i}, {j}) labels do not match its classes"
                )));
            }
        }
        if count != k * (k - 1) / 2 || self.pairs.len() != count {
            return Err(SVMError::InvalidInput(format!(
                "{} pairwise models for {k} classes, expected {}",
                self.pairs.len(),
                k * (k - 1) / 2
            )));
        }

        let dim = self.pairs[0].model.dim();
        for pair in &self.pairs {
            if pair.model.dim() != dim {
                return Err(SVMError::DimensionMismatch {
                    expected: dim,
                    actual: pair.model.dim(),
                });
            }
            for sv in pair.model.support_vectors() {
                if sv.features.len() != dim {
                    return Err(SVMError::DimensionMismatch {
                        expected: dim,
                        actual: sv.features.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Non-convergence diagnostics of the pairwise models
    pub fn diagnostics(&self) -> Vec<SVMError> {
        self.pairs
            .iter()
            .filter_map(|p| p.model.diagnostic())
            .collect()
    }
}

impl<L: Label> Classifier<L> for MultiClassModel<L> {
    /// Majority vote; ties go to the class whose first vote came from the
    /// lowest pair index
    fn predict(&self, features: &[f64]) -> L {
        let (votes, first_vote_at) = self.tally(features);

        let mut best = 0;
        for class in 1..self.classes.len() {
            let more = votes[class] > votes[best];
            let earlier = votes[class] == votes[best] && first_vote_at[class] < first_vote_at[best];
            if more || earlier {
                best = class;
            }
        }

        self.classes[best].clone()
    }

    /// Sum over pairwise models; a training point may count once per pair
    fn n_support_vectors(&self) -> usize {
        self.pairs.iter().map(|p| p.model.n_support_vectors()).sum()
    }
}

fn count_distinct<L: Label>(labels: &[L]) -> usize {
    labels
        .iter()
        .enumerate()
        .filter(|&(i, l)| !labels[..i].contains(l))
        .count()
}
