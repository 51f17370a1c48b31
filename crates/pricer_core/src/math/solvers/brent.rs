//! Brent's method root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Brent's method root finder.
///
/// Keeps a sign-changing bracket at every step and tries inverse quadratic
/// or secant steps inside it, falling back to bisection whenever the
/// interpolated step would not shrink the bracket fast enough. Convergence
/// is guaranteed for continuous functions with a valid bracket.
///
/// Termination is on the bracket width, not on `|f(x)|`: the returned root
/// lies within `(tolerance + rel_tolerance·|x|)` of a true sign change.
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::{BrentSolver, SolverConfig};
///
/// let solver = BrentSolver::new(SolverConfig::default());
///
/// // Solve x³ - x - 2 = 0 in bracket [1, 2]
/// let f = |x: f64| x * x * x - x - 2.0;
///
/// let root = solver.find_root(f, 1.0, 2.0).unwrap();
/// assert!((f(root)).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct BrentSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> BrentSolver<T> {
    /// Create a new Brent solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Find a root of `f` in the bracket `[a, b]`.
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - Root located to the configured tolerance
    /// * `Err(SolverError::NoBracket)` - `f(a)` and `f(b)` have same sign
    /// * `Err(SolverError::NumericalInstability)` - `f` returned NaN
    /// * `Err(SolverError::MaxIterationsExceeded)` - Failed to converge
    ///
    /// # Example
    ///
    /// ```
    /// use pricer_core::math::solvers::{BrentSolver, SolverConfig};
    ///
    /// let solver = BrentSolver::new(SolverConfig::default());
    /// let root = solver.find_root(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
    /// assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
    /// ```
    pub fn find_root<F>(&self, f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let zero = T::zero();
        let two = T::one() + T::one();
        let three = two + T::one();

        let mut x_pre = a;
        let mut x_cur = b;
        let mut f_pre = self.evaluate(&f, x_pre)?;
        let mut f_cur = self.evaluate(&f, x_cur)?;

        if f_pre == zero {
            return Ok(x_pre);
        }
        if f_cur == zero {
            return Ok(x_cur);
        }
        if f_pre.is_sign_negative() == f_cur.is_sign_negative() {
            return Err(SolverError::NoBracket {
                a: a.to_f64().unwrap_or(f64::NAN),
                b: b.to_f64().unwrap_or(f64::NAN),
            });
        }

        // x_blk is the contrapoint: f(x_blk) and f(x_cur) always differ in sign.
        let mut x_blk = zero;
        let mut f_blk = zero;
        let mut s_pre = zero;
        let mut s_cur = zero;

        for _ in 0..self.config.max_iterations {
            if f_pre != zero && f_cur != zero && f_pre.is_sign_negative() != f_cur.is_sign_negative() {
                x_blk = x_pre;
                f_blk = f_pre;
                s_pre = x_cur - x_pre;
                s_cur = s_pre;
            }
            if f_blk.abs() < f_cur.abs() {
                x_pre = x_cur;
                x_cur = x_blk;
                x_blk = x_pre;

                f_pre = f_cur;
                f_cur = f_blk;
                f_blk = f_pre;
            }

            let delta = (self.config.tolerance + self.config.rel_tolerance * x_cur.abs()) / two;
            let s_bis = (x_blk - x_cur) / two;
            if f_cur == zero || s_bis.abs() < delta {
                return Ok(x_cur);
            }

            if s_pre.abs() > delta && f_cur.abs() < f_pre.abs() {
                let s_try = if x_pre == x_blk {
                    // secant
                    -f_cur * (x_cur - x_pre) / (f_cur - f_pre)
                } else {
                    // inverse quadratic
                    let d_pre = (f_pre - f_cur) / (x_pre - x_cur);
                    let d_blk = (f_blk - f_cur) / (x_blk - x_cur);
                    -f_cur * (f_blk * d_blk - f_pre * d_pre) / (d_blk * d_pre * (f_blk - f_pre))
                };

                if two * s_try.abs() < s_pre.abs().min(three * s_bis.abs() - delta) {
                    s_pre = s_cur;
                    s_cur = s_try;
                } else {
                    s_pre = s_bis;
                    s_cur = s_bis;
                }
            } else {
                s_pre = s_bis;
                s_cur = s_bis;
            }

            x_pre = x_cur;
            f_pre = f_cur;
            if s_cur.abs() > delta {
                x_cur = x_cur + s_cur;
            } else if s_bis > zero {
                x_cur = x_cur + delta;
            } else {
                x_cur = x_cur - delta;
            }

            f_cur = self.evaluate(&f, x_cur)?;
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }

    fn evaluate<F>(&self, f: &F, x: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let fx = f(x);
        if fx.is_nan() {
            return Err(SolverError::NumericalInstability(format!(
                "objective is NaN at x = {}",
                x.to_f64().unwrap_or(f64::NAN)
            )));
        }
        Ok(fx)
    }
}
