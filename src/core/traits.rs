//! Core traits for SVM implementation

use crate::core::Sample;
use std::fmt::Debug;
use std::hash::Hash;

/// Class label bound used across the crate
///
/// Any cloneable, hashable, comparable value can serve as a label:
/// species names, integer class codes, booleans.
pub trait Label: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Label for T {}

/// A fitted model that maps a feature vector to a class label
pub trait Classifier<L: Label> {
    /// Predict the label of a single feature vector
    ///
    /// `features` must have the training dimensionality and finite values;
    /// the models' `try_predict` checks both.
    fn predict(&self, features: &[f64]) -> L;

    /// Predict the labels of multiple samples
    fn predict_batch(&self, samples: &[Sample<L>]) -> Vec<L> {
        samples.iter().map(|s| self.predict(&s.features)).collect()
    }

    /// Fraction of samples whose predicted label differs from the stored one
    fn error_rate(&self, samples: &[Sample<L>]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let wrong = samples
            .iter()
            .filter(|s| self.predict(&s.features) != s.label)
            .count();
        wrong as f64 / samples.len() as f64
    }

    /// Total number of support vectors retained by the model
    fn n_support_vectors(&self) -> usize;
}
