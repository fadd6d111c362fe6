//! Batch gradient-descent logistic regression, driven as an explicit state
//! machine.
//!
//! [`GradientDescent`] owns the ephemeral model state for one fit: the
//! weight vector θ (θ[0] is the intercept), the iteration counter, and a
//! borrow of the training rows. One [`GradientDescent::step`] performs
//! exactly one batch iteration; the solver never schedules itself. A driver
//! decides the cadence:
//!
//! - step mode: call [`GradientDescent::step`] directly; pausing, canceling,
//!   and inspecting between iterations is a matter of not calling again
//! - auto-run: [`GradientDescent::run`] drives to completion, and
//!   [`GradientDescent::run_with_observer`] additionally invokes a closure
//!   once per iteration, in iteration order; returning `false` from the
//!   closure cancels the run (completed iterations are not rolled back)
//!
//! The [`FitResult`] is populated only once the final iteration completes;
//! intermediate iterations report cost alone.

use log::{debug, trace};

use crate::error::{ClasificarError, Result};
use crate::primitives::Matrix;

/// Probability clamp used only inside the cost computation, guarding
/// `ln(0)` when a probability saturates.
const COST_EPSILON: f64 = 1e-12;

/// The logistic function σ(z) = 1 / (1 + e^(-z)).
///
/// Two-branch form, stable for large |z|; saturation to exactly 0 or 1
/// follows IEEE semantics and never panics. Training and stored-model
/// replay share this single definition so replayed probabilities reproduce
/// training probabilities exactly.
///
/// # Examples
///
/// ```
/// use clasificar::solver::sigmoid;
///
/// assert!((sigmoid(0.0) - 0.5).abs() < 1e-15);
/// assert!(sigmoid(40.0) > 0.999);
/// assert!(sigmoid(-40.0) < 0.001);
/// assert_eq!(sigmoid(-1000.0), 0.0);
/// ```
#[must_use]
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        let e = (-z).exp();
        1.0 / (1.0 + e)
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Hyperparameters for one fit.
///
/// # Examples
///
/// ```
/// use clasificar::solver::SolverConfig;
///
/// let config = SolverConfig::new()
///     .with_learning_rate(0.5)
///     .with_iterations(100)
///     .with_lambda(0.01);
/// assert!(config.validate().is_ok());
///
/// let bad = SolverConfig::new().with_iterations(0);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Learning rate α.
    pub learning_rate: f64,
    /// Number of batch iterations.
    pub iterations: usize,
    /// L2 regularization strength λ.
    pub lambda: f64,
    /// Force the intercept term to stay at zero through every update.
    pub lock_intercept: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            iterations: 200,
            lambda: 0.0,
            lock_intercept: false,
        }
    }
}

impl SolverConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the learning rate α.
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the iteration count.
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the L2 regularization strength λ.
    #[must_use]
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Locks the intercept term at zero.
    #[must_use]
    pub fn with_lock_intercept(mut self, lock: bool) -> Self {
        self.lock_intercept = lock;
        self
    }

    /// Reject malformed configurations before any work runs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHyperparameter` for a non-positive or non-finite
    /// learning rate, a negative or non-finite lambda, or zero iterations.
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(ClasificarError::hyperparameter(
                "learning_rate",
                self.learning_rate,
                "> 0",
            ));
        }
        if !self.lambda.is_finite() || self.lambda < 0.0 {
            return Err(ClasificarError::hyperparameter(
                "lambda",
                self.lambda,
                ">= 0",
            ));
        }
        if self.iterations == 0 {
            return Err(ClasificarError::hyperparameter(
                "iterations",
                self.iterations,
                ">= 1",
            ));
        }
        Ok(())
    }
}

/// What one completed iteration reports back to the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationOutcome {
    /// 1-based index of the completed iteration.
    pub iteration: usize,
    /// Cost after this iteration's update.
    pub cost: f64,
    /// True exactly on the final iteration, when the fit result exists.
    pub finished: bool,
}

/// The durable output of a completed fit.
///
/// The intercept θ[0] is split off and reported separately from the
/// per-feature weights.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    /// Per-feature weights θ[1:].
    pub weights: Vec<f64>,
    /// Intercept θ[0].
    pub constant_weight_term: f64,
    /// Cost at the end of training.
    pub cost: f64,
}

/// One fit's worth of gradient-descent state.
///
/// Rows come from the vectorizer: feature values with the 0/1 label in the
/// final column. A fresh `GradientDescent` is built per fit; nothing is
/// shared between runs.
///
/// # Examples
///
/// ```
/// use clasificar::primitives::Matrix;
/// use clasificar::solver::{GradientDescent, SolverConfig};
///
/// // Two features plus the label column.
/// let rows = Matrix::from_rows(vec![
///     vec![1.0, 0.0, 1.0],
///     vec![0.0, 1.0, 0.0],
/// ]).unwrap();
///
/// let config = SolverConfig::new().with_iterations(10);
/// let mut solver = GradientDescent::new(&rows, config).unwrap();
/// let fit = solver.run();
/// assert_eq!(fit.weights.len(), 2);
/// ```
#[derive(Debug)]
pub struct GradientDescent<'a> {
    rows: &'a Matrix,
    config: SolverConfig,
    theta: Vec<f64>,
    iteration: usize,
    fit_result: Option<FitResult>,
}

impl<'a> GradientDescent<'a> {
    /// Prepare a fit over `rows` with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a hyperparameter error for an invalid configuration and a
    /// validation error when `rows` is empty or has no feature column.
    pub fn new(rows: &'a Matrix, config: SolverConfig) -> Result<Self> {
        config.validate()?;
        if rows.n_rows() == 0 {
            return Err(ClasificarError::validation("no training rows supplied"));
        }
        if rows.n_cols() < 2 {
            return Err(ClasificarError::validation(
                "training rows must hold at least one feature and the label column",
            ));
        }
        let n_features = rows.n_cols() - 1;
        Ok(Self {
            rows,
            config,
            theta: vec![0.0; n_features + 1],
            iteration: 0,
            fit_result: None,
        })
    }

    /// Number of completed iterations.
    #[must_use]
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// True once the configured iteration count has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.iteration >= self.config.iterations
    }

    /// Full weight vector including the intercept at index 0.
    #[must_use]
    pub fn theta(&self) -> &[f64] {
        &self.theta
    }

    /// Populated only after the final iteration.
    #[must_use]
    pub fn fit_result(&self) -> Option<&FitResult> {
        self.fit_result.as_ref()
    }

    /// Model probability for one training row under the current θ.
    fn probability(&self, row: &[f64]) -> f64 {
        let prefix = if self.config.lock_intercept { 0.0 } else { 1.0 };
        let mut z = self.theta[0] * prefix;
        for (d, x) in row[..row.len() - 1].iter().enumerate() {
            z += self.theta[d + 1] * x;
        }
        sigmoid(z)
    }

    /// Mean negative log-likelihood, plus the L2 penalty when λ is nonzero.
    #[must_use]
    pub fn cost(&self) -> f64 {
        let n = self.rows.n_rows() as f64;
        let mut total = 0.0;
        for r in 0..self.rows.n_rows() {
            let row = self.rows.row(r);
            let y = row[row.len() - 1];
            let p = self
                .probability(row)
                .clamp(COST_EPSILON, 1.0 - COST_EPSILON);
            total -= y * p.ln() + (1.0 - y) * (1.0 - p).ln();
        }
        let mut cost = total / n;
        if self.config.lambda != 0.0 {
            let penalty: f64 = self.theta.iter().map(|t| t * t).sum();
            cost += self.config.lambda / (2.0 * n) * penalty;
        }
        cost
    }

    /// Perform exactly one batch iteration.
    ///
    /// Returns `None` once the configured iteration count has completed;
    /// the state machine performs no further work however often it is
    /// polled. Cooperative cancellation is therefore the driver's choice
    /// not to call again.
    pub fn step(&mut self) -> Option<IterationOutcome> {
        if self.is_finished() {
            return None;
        }

        let n_rows = self.rows.n_rows();
        let n = n_rows as f64;
        let prefix = if self.config.lock_intercept { 0.0 } else { 1.0 };

        let mut gradient = vec![0.0; self.theta.len()];
        for r in 0..n_rows {
            let row = self.rows.row(r);
            let y = row[row.len() - 1];
            let error = self.probability(row) - y;
            gradient[0] += error * prefix;
            for (d, x) in row[..row.len() - 1].iter().enumerate() {
                gradient[d + 1] += error * x;
            }
        }
        for (d, g) in gradient.iter_mut().enumerate() {
            *g = *g / n + self.config.lambda * self.theta[d] / n;
        }
        for (t, g) in self.theta.iter_mut().zip(&gradient) {
            *t -= self.config.learning_rate * g;
        }

        self.iteration += 1;
        let cost = self.cost();
        let finished = self.iteration == self.config.iterations;
        trace!(
            target: "clasificar::solver",
            "iteration {}/{} cost={:.6}",
            self.iteration,
            self.config.iterations,
            cost
        );

        if finished {
            self.fit_result = Some(self.result_from_state(cost));
            debug!(
                target: "clasificar::solver",
                "fit complete after {} iterations, cost={:.6}",
                self.iteration,
                cost
            );
        }

        Some(IterationOutcome {
            iteration: self.iteration,
            cost,
            finished,
        })
    }

    /// Drive the remaining iterations to completion.
    pub fn run(&mut self) -> FitResult {
        while let Some(outcome) = self.step() {
            if outcome.finished {
                break;
            }
        }
        let cost = self.cost();
        self.fit_result
            .clone()
            .unwrap_or_else(|| self.result_from_state(cost))
    }

    /// Drive iterations, reporting each completed one to `observer` in
    /// iteration order. The observer returning `false` cancels the run
    /// before the next iteration is invoked; `None` is returned and no fit
    /// result exists. On the final iteration the outcome has `finished`
    /// set and the returned fit result is populated.
    pub fn run_with_observer<F>(&mut self, mut observer: F) -> Option<FitResult>
    where
        F: FnMut(&IterationOutcome) -> bool,
    {
        while let Some(outcome) = self.step() {
            let keep_going = observer(&outcome);
            if outcome.finished {
                return self.fit_result.clone();
            }
            if !keep_going {
                debug!(
                    target: "clasificar::solver",
                    "run canceled after iteration {}",
                    outcome.iteration
                );
                return None;
            }
        }
        self.fit_result.clone()
    }

    fn result_from_state(&self, cost: f64) -> FitResult {
        FitResult {
            weights: self.theta[1..].to_vec(),
            constant_weight_term: self.theta[0],
            cost,
        }
    }
}

#[cfg(test)]
#[path = "solver_tests.rs"]
mod tests;
