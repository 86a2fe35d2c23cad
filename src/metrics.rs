//! Evaluation metrics
//!
//! A confusion matrix counts (predicted, actual) label pairs. Rows are
//! predicted labels, columns actual labels, and the diagonal holds the
//! correct predictions.

use crate::core::{Classifier, Label, Result, SVMError, Sample};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix<L> {
    classes: Vec<L>,
    /// counts[predicted][actual]
    counts: Vec<Vec<usize>>,
}

impl<L: Label> ConfusionMatrix<L> {
    /// Tabulate parallel prediction and ground-truth slices
    ///
    /// Classes are ordered by first appearance among the actual labels,
    /// followed by predicted labels never seen as actual.
    pub fn from_predictions(predicted: &[L], actual: &[L]) -> Result<Self> {
        if predicted.len() != actual.len() {
            return Err(SVMError::InvalidInput(format!(
                "{} predictions for {} actual labels",
                predicted.len(),
                actual.len()
            )));
        }
        Ok(Self::tabulate(predicted, actual))
    }

    /// Predict every sample with `model` and tabulate against its label
    pub fn from_model<C: Classifier<L> + ?Sized>(model: &C, samples: &[Sample<L>]) -> Self {
        let predicted = model.predict_batch(samples);
        let actual: Vec<L> = samples.iter().map(|s| s.label.clone()).collect();
        Self::tabulate(&predicted, &actual)
    }

    fn tabulate(predicted: &[L], actual: &[L]) -> Self {
        let mut classes: Vec<L> = Vec::new();
        for label in actual.iter().chain(predicted) {
            if !classes.contains(label) {
                classes.push(label.clone());
            }
        }

        let k = classes.len();
        let mut counts = vec![vec![0; k]; k];
        for (p, a) in predicted.iter().zip(actual) {
            let row = position(&classes, p);
            let col = position(&classes, a);
            counts[row][col] += 1;
        }

        Self { classes, counts }
    }

    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    /// Number of samples predicted as `predicted` whose label is `actual`
    pub fn get(&self, predicted: &L, actual: &L) -> usize {
        let row = self.classes.iter().position(|c| c == predicted);
        let col = self.classes.iter().position(|c| c == actual);
        match (row, col) {
            (Some(r), Some(c)) => self.counts[r][c],
            _ => 0,
        }
    }

    /// Non-zero cells as (predicted, actual, count)
    pub fn entries(&self) -> Vec<(&L, &L, usize)> {
        let mut entries = Vec::new();
        for (r, row) in self.counts.iter().enumerate() {
            for (c, &count) in row.iter().enumerate() {
                if count > 0 {
                    entries.push((&self.classes[r], &self.classes[c], count));
                }
            }
        }
        entries
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        (0..self.classes.len()).map(|i| self.counts[i][i]).sum()
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.correct() as f64 / total as f64
        }
    }

    pub fn error_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            1.0 - self.accuracy()
        }
    }

    /// Precision per class: diagonal over row sum
    pub fn precision(&self) -> Vec<f64> {
        (0..self.classes.len())
            .map(|i| ratio(self.counts[i][i], self.counts[i].iter().sum()))
            .collect()
    }

    /// Recall per class: diagonal over column sum
    pub fn recall(&self) -> Vec<f64> {
        (0..self.classes.len())
            .map(|j| ratio(self.counts[j][j], self.counts.iter().map(|row| row[j]).sum()))
            .collect()
    }
}

fn position<L: PartialEq>(classes: &[L], label: &L) -> usize {
    classes.iter().position(|c| c == label).unwrap_or(0)
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Table with predicted labels as rows and actual labels as columns
impl<L: Label + fmt::Display> fmt::Display for ConfusionMatrix<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let corner = "predicted \\ actual";
        let names: Vec<String> = self.classes.iter().map(|c| c.to_string()).collect();
        let first_width = names
            .iter()
            .map(|n| n.len())
            .max()
            .unwrap_or(0)
            .max(corner.len());
        let widths: Vec<usize> = names
            .iter()
            .enumerate()
            .map(|(j, n)| {
                let widest_count = self.counts.iter().map(|row| row[j].to_string().len()).max();
                n.len().max(widest_count.unwrap_or(1))
            })
            .collect();

        write!(f, "{corner:<first_width$}")?;
        for (name, &width) in names.iter().zip(&widths) {
            write!(f, "  {name:>width$}")?;
        }
        writeln!(f)?;

        for (name, row) in names.iter().zip(&self.counts) {
            write!(f, "{name:<first_width$}")?;
            for (count, &width) in row.iter().zip(&widths) {
                write!(f, "  {count:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
