//! Sequential Minimal Optimization (SMO) solver implementation
//!
//! Solves the soft-margin SVM dual
//!
//! ```text
//! max  Σα_i − ½ ΣΣ α_i α_j y_i y_j G_ij
//! s.t. 0 ≤ α_i ≤ C,  Σ α_i y_i = 0
//! ```
//!
//! by repeatedly optimizing one pair of multipliers while the gradient
//! g = Qα − 1 (with Q_ij = y_i y_j G_ij) is kept up to date incrementally.

use crate::core::{OptimizationResult, OptimizerConfig, Result, SVMError, WorkingSetStrategy};
use crate::solver::gram::GramMatrix;
use log::{debug, warn};

/// Curvature used in place of non-positive values (non-PSD kernels)
const TAU: f64 = 1e-12;

/// SMO solver for SVM optimization
///
/// Stateless apart from its configuration; one solver can be reused across
/// any number of problems.
#[derive(Debug, Clone, Default)]
pub struct SMOSolver {
    config: OptimizerConfig,
}

/// Pair chosen for the next update together with the current KKT violation
#[derive(Debug, Clone, Copy)]
struct WorkingSet {
    i: usize,
    j: usize,
    violation: f64,
}

/// Mutable optimization state for a single solve
struct SolverState<'y> {
    y: &'y [f64],
    c: f64,
    alpha: Vec<f64>,
    grad: Vec<f64>,
}

impl SolverState<'_> {
    /// Index can move in the direction that increases y_t * alpha_t
    fn in_up(&self, t: usize) -> bool {
        if self.y[t] > 0.0 {
            self.alpha[t] < self.c
        } else {
            self.alpha[t] > 0.0
        }
    }

    /// Index can move in the direction that decreases y_t * alpha_t
    fn in_low(&self, t: usize) -> bool {
        if self.y[t] > 0.0 {
            self.alpha[t] > 0.0
        } else {
            self.alpha[t] < self.c
        }
    }

    /// -y_t * g_t, the quantity compared across the two index sets
    fn score(&self, t: usize) -> f64 {
        -self.y[t] * self.grad[t]
    }

    /// (max over I_up, min over I_low) of the score, with their indices
    fn extremes(&self) -> (Option<(usize, f64)>, Option<(usize, f64)>) {
        let mut up: Option<(usize, f64)> = None;
        let mut low: Option<(usize, f64)> = None;

        for t in 0..self.alpha.len() {
            let s = self.score(t);
            if self.in_up(t) && up.map_or(true, |(_, best)| s > best) {
                up = Some((t, s));
            }
            if self.in_low(t) && low.map_or(true, |(_, best)| s < best) {
                low = Some((t, s));
            }
        }

        (up, low)
    }
}

impl SMOSolver {
    /// Create a new SMO solver with the given configuration
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Solve the SVM dual problem
    ///
    /// `gram` is the kernel matrix of the training points, `y` their signs
    /// (each exactly -1.0 or +1.0) and `c` the box bound. Running out of
    /// iterations is not an error: the result carries `converged = false`
    /// together with the best alphas found.
    pub fn solve(
        &self,
        gram: &mut dyn GramMatrix,
        y: &[f64],
        c: f64,
    ) -> Result<OptimizationResult> {
        let n = y.len();
        if n == 0 {
            return Err(SVMError::EmptyDataset);
        }
        if gram.len() != n {
            return Err(SVMError::DimensionMismatch {
                expected: n,
                actual: gram.len(),
            });
        }
        // Validate labels are binary (-1 or +1)
        if let Some(&bad) = y.iter().find(|&&label| label != 1.0 && label != -1.0) {
            return Err(SVMError::InvalidLabel(bad));
        }
        if !(c.is_finite() && c > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "Cost must be positive, got: {c}"
            )));
        }
        self.config.validate()?;

        // With alpha = 0 the gradient Qα − 1 is −1 everywhere
        let mut state = SolverState {
            y,
            c,
            alpha: vec![0.0; n],
            grad: vec![-1.0; n],
        };

        let mut iterations = 0;
        let mut violation = 0.0;
        let mut converged = false;

        loop {
            let Some(ws) = self.select_working_set(&state, gram) else {
                // No feasible direction at all (e.g. a single class)
                converged = true;
                violation = 0.0;
                break;
            };
            violation = ws.violation;

            if violation < self.config.epsilon {
                converged = true;
                break;
            }
            if iterations >= self.config.max_iterations {
                break;
            }

            self.update_pair(&mut state, gram, ws.i, ws.j);
            iterations += 1;
        }

        if converged {
            debug!("SMO converged after {iterations} iterations (KKT violation {violation:.3e})");
        } else {
            warn!(
                "SMO reached max iterations ({}) with KKT violation {:.3e}; returning best-found solution",
                self.config.max_iterations, violation
            );
        }

        let b = self.calculate_bias(&state);
        let objective_value = calculate_objective(&state);

        let support_vectors: Vec<usize> = state
            .alpha
            .iter()
            .enumerate()
            .filter(|(_, &a)| a > self.config.sv_tolerance)
            .map(|(i, _)| i)
            .collect();

        debug!(
            "{} support vectors, bias {:.6}, objective {:.6}",
            support_vectors.len(),
            b,
            objective_value
        );

        Ok(OptimizationResult {
            alpha: state.alpha,
            b,
            support_vectors,
            iterations,
            objective_value,
            violation,
            converged,
        })
    }

    /// Select the next pair using the configured strategy
    ///
    /// Returns `None` when one of the two index sets is empty.
    fn select_working_set(
        &self,
        state: &SolverState<'_>,
        gram: &mut dyn GramMatrix,
    ) -> Option<WorkingSet> {
        let (up, low) = state.extremes();
        let (i, m) = up?;
        let (j_first, big_m) = low?;
        let violation = m - big_m;

        let j = match self.config.working_set_strategy {
            WorkingSetStrategy::MaxViolatingPair => j_first,
            WorkingSetStrategy::SecondOrder => {
                select_second_order(state, gram, i, m).unwrap_or(j_first)
            }
        };

        Some(WorkingSet { i, j, violation })
    }

    /// Analytic two-variable update along y_i·α_i + y_j·α_j = const
    fn update_pair(
        &self,
        state: &mut SolverState<'_>,
        gram: &mut dyn GramMatrix,
        i: usize,
        j: usize,
    ) {
        let row_i = gram.row(i);
        let row_j = gram.row(j);
        let (y_i, y_j) = (state.y[i], state.y[j]);
        let c = state.c;

        let mut curvature = gram.diagonal(i) + gram.diagonal(j) - 2.0 * row_i[j];
        if curvature <= 0.0 {
            curvature = TAU;
        }

        // Step λ moves α_i by +y_i·λ and α_j by −y_j·λ
        let unclipped = (state.score(i) - state.score(j)) / curvature;
        let bound_i = if y_i > 0.0 { c - state.alpha[i] } else { state.alpha[i] };
        let bound_j = if y_j > 0.0 { state.alpha[j] } else { c - state.alpha[j] };
        let step = unclipped.min(bound_i).min(bound_j);

        let old_i = state.alpha[i];
        let old_j = state.alpha[j];

        let mut new_i = old_i + y_i * step;
        let mut new_j = old_j - y_j * step;

        // Land exactly on the bound that limited the step
        if step >= bound_i {
            new_i = if y_i > 0.0 { c } else { 0.0 };
        }
        if step >= bound_j {
            new_j = if y_j > 0.0 { 0.0 } else { c };
        }
        state.alpha[i] = new_i.clamp(0.0, c);
        state.alpha[j] = new_j.clamp(0.0, c);

        let delta_i = y_i * (state.alpha[i] - old_i);
        let delta_j = y_j * (state.alpha[j] - old_j);

        for k in 0..state.grad.len() {
            state.grad[k] += state.y[k] * (row_i[k] * delta_i + row_j[k] * delta_j);
        }
    }

    /// Bias from free vectors, or the midpoint of the feasible interval
    fn calculate_bias(&self, state: &SolverState<'_>) -> f64 {
        let tol = self.config.sv_tolerance;
        let mut sum = 0.0;
        let mut count = 0;

        // y_t − Σ_j α_j y_j G_tj equals −y_t·g_t
        for t in 0..state.alpha.len() {
            if state.alpha[t] > tol && state.alpha[t] < state.c - tol {
                sum += state.score(t);
                count += 1;
            }
        }

        if count > 0 {
            return sum / count as f64;
        }

        match state.extremes() {
            (Some((_, m)), Some((_, big_m))) => (m + big_m) / 2.0,
            (Some((_, m)), None) => m,
            (None, Some((_, big_m))) => big_m,
            (None, None) => 0.0,
        }
    }
}

/// Second-order choice of j for fixed i: maximise the estimated objective
/// gain b²/a over I_low indices that still violate against i
fn select_second_order(
    state: &SolverState<'_>,
    gram: &mut dyn GramMatrix,
    i: usize,
    m: f64,
) -> Option<usize> {
    let row_i = gram.row(i);
    let k_ii = gram.diagonal(i);
    let mut best: Option<(usize, f64)> = None;

    for t in 0..state.alpha.len() {
        if !state.in_low(t) {
            continue;
        }
        let b = m - state.score(t);
        if b <= 0.0 {
            continue;
        }
        let mut a = k_ii + gram.diagonal(t) - 2.0 * row_i[t];
        if a <= 0.0 {
            a = TAU;
        }
        let gain = b * b / a;
        if best.map_or(true, |(_, g)| gain > g) {
            best = Some((t, gain));
        }
    }

    best.map(|(t, _)| t)
}

/// Dual objective ½ Σ α_t (1 − g_t)
fn calculate_objective(state: &SolverState<'_>) -> f64 {
    state
        .alpha
        .iter()
        .zip(&state.grad)
        .map(|(a, g)| a * (1.0 - g))
        .sum::<f64>()
        / 2.0
}
