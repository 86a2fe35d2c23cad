//! SVM solver implementations
//!
//! This module implements the Sequential Minimal Optimization (SMO) algorithm
//! for the soft-margin dual, over a Gram matrix that is either precomputed or
//! computed row by row behind the kernel cache.

pub mod gram;
pub mod smo;

pub use self::gram::{build_gram, CachedGram, GramMatrix, PrecomputedGram};
pub use self::smo::SMOSolver;
