//! Soft-margin Support Vector Machine classification in Rust
//!
//! Kernels, an SMO solver for the dual problem, one-vs-one multi-class
//! classification and grid-search cross-validation for choosing the kernel
//! parameters and the cost.

pub mod api;
pub mod cache;
pub mod classifier;
pub mod core;
pub mod data;
pub mod kernel;
pub mod metrics;
pub mod persistence;
pub mod solver;
pub mod tuning;

// Re-export main types for convenience
pub use crate::api::{ModelInfo, SVM};
pub use crate::cache::{CacheStats, KernelCache};
pub use crate::classifier::{BinaryClassifier, MultiClassModel, OneVsOneClassifier, TrainedModel};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{Result, SVMError};
pub use crate::data::{load_csv, train_test_split};
pub use crate::kernel::{evaluate, Kernel, KernelSpec};
pub use crate::metrics::ConfusionMatrix;
pub use crate::solver::SMOSolver;
pub use crate::tuning::{FoldStrategy, GridSearch, KernelFamily, ParamGrid, TuneResult};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
