//! Gram matrix access for the SMO solver
//!
//! The solver only ever needs the diagonal and whole rows of
//! G[i][j] = K(x_i, x_j). Small problems precompute the full symmetric
//! matrix; problems whose matrix exceeds the cache budget compute rows on
//! demand and keep recently used ones in an LRU cache.

use crate::cache::{KernelCache, KernelRow};
use crate::core::{Result, SVMError};
use crate::kernel::linear::norm_squared;
use crate::kernel::Kernel;
use log::debug;
use std::sync::Arc;

/// Read access to a square, symmetric Gram matrix
pub trait GramMatrix {
    /// Number of rows (and columns)
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// G[i][i]
    fn diagonal(&self, i: usize) -> f64;

    /// Full row G[i][·]
    fn row(&mut self, i: usize) -> KernelRow;
}

/// Fully materialised Gram matrix
#[derive(Debug, Clone)]
pub struct PrecomputedGram {
    rows: Vec<KernelRow>,
}

impl PrecomputedGram {
    /// Evaluate the kernel over every pair of points, using symmetry
    pub fn from_points<K: Kernel + ?Sized>(kernel: &K, points: &[&[f64]]) -> Self {
        let n = points.len();
        let norms: Vec<f64> = points.iter().map(|p| norm_squared(p)).collect();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in i..n {
                let value = kernel.compute_with_norms(points[i], points[j], norms[i], norms[j]);
                matrix[i][j] = value;
                matrix[j][i] = value;
            }
        }

        Self {
            rows: matrix.into_iter().map(Arc::from).collect(),
        }
    }

    /// Wrap an existing matrix, checking that it is square
    pub fn from_matrix(matrix: Vec<Vec<f64>>) -> Result<Self> {
        let n = matrix.len();
        if let Some(bad) = matrix.iter().find(|row| row.len() != n) {
            return Err(SVMError::DimensionMismatch {
                expected: n,
                actual: bad.len(),
            });
        }
        Ok(Self {
            rows: matrix.into_iter().map(Arc::from).collect(),
        })
    }
}

impl GramMatrix for PrecomputedGram {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn diagonal(&self, i: usize) -> f64 {
        self.rows[i][i]
    }

    fn row(&mut self, i: usize) -> KernelRow {
        Arc::clone(&self.rows[i])
    }
}

/// Gram matrix computed row by row behind an LRU cache
pub struct CachedGram<'a, K: Kernel + ?Sized> {
    kernel: &'a K,
    points: Vec<&'a [f64]>,
    norms: Vec<f64>,
    diag: Vec<f64>,
    cache: KernelCache,
}

impl<'a, K: Kernel + ?Sized> CachedGram<'a, K> {
    pub fn new(kernel: &'a K, points: Vec<&'a [f64]>, cache_size: usize) -> Self {
        let norms: Vec<f64> = points.iter().map(|p| norm_squared(p)).collect();
        let diag = points
            .iter()
            .zip(&norms)
            .map(|(p, &norm)| kernel.compute_with_norms(p, p, norm, norm))
            .collect();
        let cache = KernelCache::with_memory_limit(cache_size, points.len());
        Self {
            kernel,
            points,
            norms,
            diag,
            cache,
        }
    }

    pub fn cache(&self) -> &KernelCache {
        &self.cache
    }
}

impl<K: Kernel + ?Sized> Drop for CachedGram<'_, K> {
    fn drop(&mut self) {
        let stats = self.cache.stats();
        debug!(
            "Kernel cache: {} hits, {} misses ({:.1}% hit rate), {}/{} rows held",
            stats.hits,
            stats.misses,
            self.cache.hit_rate() * 100.0,
            stats.size,
            stats.capacity
        );
    }
}

impl<K: Kernel + ?Sized> GramMatrix for CachedGram<'_, K> {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn diagonal(&self, i: usize) -> f64 {
        self.diag[i]
    }

    fn row(&mut self, i: usize) -> KernelRow {
        if let Some(row) = self.cache.get(i) {
            return row;
        }
        let x_i = self.points[i];
        let norm_i = self.norms[i];
        let row: KernelRow = self
            .points
            .iter()
            .zip(&self.norms)
            .map(|(x_j, &norm_j)| self.kernel.compute_with_norms(x_i, x_j, norm_i, norm_j))
            .collect();
        self.cache.put(i, Arc::clone(&row));
        row
    }
}

/// Pick the Gram representation for `points` under a cache budget in bytes
pub fn build_gram<'a, K: Kernel + ?Sized>(
    kernel: &'a K,
    points: Vec<&'a [f64]>,
    cache_size: usize,
) -> Box<dyn GramMatrix + 'a> {
    let n = points.len();
    let full_bytes = n
        .saturating_mul(n)
        .saturating_mul(std::mem::size_of::<f64>());

    if full_bytes <= cache_size {
        debug!("Precomputing {n}x{n} Gram matrix ({full_bytes} bytes)");
        Box::new(PrecomputedGram::from_points(kernel, &points))
    } else {
        debug!("Gram matrix needs {full_bytes} bytes, caching rows within {cache_size} bytes");
        Box::new(CachedGram::new(kernel, points, cache_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{KernelSpec, LinearKernel};
    use approx::assert_abs_diff_eq;

    fn points() -> Vec<Vec<f64>> {
        vec![vec![1.0, 0.0], vec![0.0, 2.0], vec![1.0, 1.0]]
    }

    #[test]
    fn test_precomputed_gram_linear() {
        let data = points();
        let refs: Vec<&[f64]> = data.iter().map(|p| p.as_slice()).collect();
        let mut gram = PrecomputedGram::from_points(&LinearKernel, &refs);

        assert_eq!(gram.len(), 3);
        assert_eq!(gram.diagonal(1), 4.0);
        assert_eq!(&*gram.row(2), &[1.0, 2.0, 2.0]);
    }

    #[test]
    fn test_from_matrix_rejects_non_square() {
        let result = PrecomputedGram::from_matrix(vec![vec![1.0, 0.0], vec![0.0]]);
        assert!(matches!(result, Err(SVMError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_cached_gram_matches_precomputed() {
        let data = points();
        let refs: Vec<&[f64]> = data.iter().map(|p| p.as_slice()).collect();
        let kernel = KernelSpec::Rbf { gamma: 0.7 };

        let mut full = PrecomputedGram::from_points(&kernel, &refs);
        // Budget for two rows only
        let mut cached = CachedGram::new(&kernel, refs.clone(), 2 * 3 * 8);

        for i in [0, 1, 2, 0, 2] {
            let a = full.row(i);
            let b = cached.row(i);
            for (x, y) in a.iter().zip(b.iter()) {
                assert_abs_diff_eq!(x, y, epsilon = 1e-12);
            }
            assert_abs_diff_eq!(full.diagonal(i), cached.diagonal(i), epsilon = 1e-12);
        }
        assert!(cached.cache().stats().hits > 0);
    }

    #[test]
    fn test_build_gram_respects_budget() {
        let data = points();
        let refs: Vec<&[f64]> = data.iter().map(|p| p.as_slice()).collect();

        let mut big = build_gram(&LinearKernel, refs.clone(), 1_000_000);
        let mut small = build_gram(&LinearKernel, refs, 8);

        assert_eq!(big.len(), 3);
        assert_eq!(&*big.row(0), &*small.row(0));
    }
}
