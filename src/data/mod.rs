//! Data loading and partitioning
//!
//! Dataset ingestion lives outside the classifier: this module only reads
//! the dense CSV layout used by the CLI and the walkthrough demo, and
//! splits a dataset into disjoint training and test partitions.

pub mod csv;

pub use self::csv::{load_csv, read_csv};

use crate::core::{Dataset, Label, Result, SVMError, Sample};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle with `seed` and split into (train, test) partitions
///
/// `train_ratio` must lie strictly between 0 and 1 and leave at least one
/// sample on each side.
pub fn train_test_split<L: Label>(
    dataset: &Dataset<L>,
    train_ratio: f64,
    seed: u64,
) -> Result<(Vec<Sample<L>>, Vec<Sample<L>>)> {
    if !(train_ratio > 0.0 && train_ratio < 1.0) {
        return Err(SVMError::InvalidParameter(format!(
            "Train ratio must be between 0 and 1, got: {train_ratio}"
        )));
    }

    let n = dataset.len();
    let train_size = (n as f64 * train_ratio).round() as usize;
    if train_size == 0 || train_size == n {
        return Err(SVMError::InsufficientSamples {
            folds: 2,
            samples: n,
        });
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut SmallRng::seed_from_u64(seed));
    let (train, test) = order.split_at(train_size);

    Ok((dataset.subset(train), dataset.subset(test)))
}
