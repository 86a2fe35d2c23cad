//! Error types for SVM implementation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SVMError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient classes: need at least 2 distinct labels, found {found}")]
    InsufficientClasses { found: usize },

    #[error("Insufficient samples: {folds} folds requested for {samples} samples")]
    InsufficientSamples { folds: usize, samples: usize },

    #[error("Parameter grid has no combinations")]
    EmptyGrid,

    /// Solver ran out of its iteration budget. Reported as a diagnostic on a
    /// usable model, never returned from training.
    #[error("Solver did not converge after {iterations} iterations (KKT violation {violation:.3e})")]
    DidNotConverge { iterations: usize, violation: f64 },

    #[error("Invalid label: expected -1 or +1, got {0}")]
    InvalidLabel(f64),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, SVMError>;
