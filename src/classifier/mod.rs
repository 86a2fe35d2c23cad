//! SVM classifiers
//!
//! `BinaryClassifier` fits two-class models; `OneVsOneClassifier` combines
//! one binary model per class pair for any number of classes.

pub mod binary;
pub mod multiclass;

pub use self::binary::{BinaryClassifier, SupportVector, TrainedModel};
pub use self::multiclass::{MultiClassModel, OneVsOneClassifier, PairModel};
