//! Kernel trait definition

/// Kernel function trait
///
/// A kernel function K(x, y) maps two feature vectors of equal length to a
/// similarity score. Implementations assume equal lengths; use
/// [`crate::kernel::evaluate`] for a checked evaluation.
pub trait Kernel: Send + Sync {
    /// Compute kernel value K(x, y)
    fn compute(&self, x: &[f64], y: &[f64]) -> f64;

    /// Optional: compute kernel value using precomputed squared norms
    /// This can be more efficient for some kernels (e.g., RBF)
    fn compute_with_norms(&self, x: &[f64], y: &[f64], x_norm_sq: f64, y_norm_sq: f64) -> f64 {
        // Default implementation ignores the norms
        let _ = (x_norm_sq, y_norm_sq);
        self.compute(x, y)
    }
}
