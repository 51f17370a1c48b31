//! Solver configuration types.

use num_traits::Float;

/// Configuration for bracketed root finding.
///
/// The solver stops once the bracket half-width falls below
/// `(tolerance + rel_tolerance·|x|) / 2`, so `tolerance` bounds the
/// absolute error of the root and `rel_tolerance` its relative error.
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::SolverConfig;
///
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert!(config.tolerance < 1e-10);
/// assert_eq!(config.max_iterations, 100);
///
/// let custom = SolverConfig::new(1e-8, 200).with_rel_tolerance(1e-12);
/// assert_eq!(custom.rel_tolerance, 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig<T: Float> {
    /// Absolute tolerance on the root.
    pub tolerance: T,

    /// Relative tolerance on the root.
    pub rel_tolerance: T,

    /// Maximum number of iterations before giving up.
    ///
    /// If the solver doesn't converge within this limit,
    /// it returns `SolverError::MaxIterationsExceeded`.
    pub max_iterations: usize,
}

impl<T: Float> Default for SolverConfig<T> {
    /// Default values:
    /// - `tolerance`: 2e-12
    /// - `rel_tolerance`: 4·ε
    /// - `max_iterations`: 100
    fn default() -> Self {
        Self {
            tolerance: T::from(2e-12).unwrap_or_else(T::epsilon),
            rel_tolerance: default_rel_tolerance(),
            max_iterations: 100,
        }
    }
}

fn default_rel_tolerance<T: Float>() -> T {
    let two = T::one() + T::one();
    two * two * T::epsilon()
}

impl<T: Float> SolverConfig<T> {
    /// Create a new configuration with the default relative tolerance.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance <= 0` or `max_iterations == 0`.
    ///
    /// # Example
    ///
    /// ```
    /// use pricer_core::math::solvers::SolverConfig;
    ///
    /// let config = SolverConfig::new(1e-12, 200);
    /// assert_eq!(config.max_iterations, 200);
    /// ```
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        assert!(tolerance > T::zero(), "tolerance must be positive");
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self {
            tolerance,
            rel_tolerance: default_rel_tolerance(),
            max_iterations,
        }
    }

    /// Replaces the relative tolerance.
    pub fn with_rel_tolerance(mut self, rel_tolerance: T) -> Self {
        self.rel_tolerance = rel_tolerance;
        self
    }

    /// Tighter absolute tolerance (1e-14) and more iterations (500).
    pub fn high_precision() -> Self {
        Self {
            tolerance: T::from(1e-14).unwrap_or_else(T::epsilon),
            rel_tolerance: default_rel_tolerance(),
            max_iterations: 500,
        }
    }

    /// Relaxed absolute tolerance (1e-6) and fewer iterations (50).
    pub fn fast() -> Self {
        Self {
            tolerance: T::from(1e-6).unwrap_or_else(T::epsilon),
            rel_tolerance: default_rel_tolerance(),
            max_iterations: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config: SolverConfig<f64> = SolverConfig::default();
        assert!((config.tolerance - 2e-12).abs() < 1e-20);
        assert_eq!(config.rel_tolerance, 4.0 * f64::EPSILON);
        assert_eq!(config.max_iterations, 100);
    }

    #[test]
    fn test_new_config() {
        let config: SolverConfig<f64> = SolverConfig::new(1e-12, 200);
        assert!((config.tolerance - 1e-12).abs() < 1e-17);
        assert_eq!(config.max_iterations, 200);
    }

    #[test]
    #[should_panic(expected = "tolerance must be positive")]
    fn test_new_config_zero_tolerance_panics() {
        let _: SolverConfig<f64> = SolverConfig::new(0.0, 100);
    }

    #[test]
    #[should_panic(expected = "max_iterations must be > 0")]
    fn test_new_config_zero_iterations_panics() {
        let _: SolverConfig<f64> = SolverConfig::new(1e-10, 0);
    }

    #[test]
    fn test_presets() {
        let precise: SolverConfig<f64> = SolverConfig::high_precision();
        assert!(precise.tolerance < 1e-12);
        assert!(precise.max_iterations >= 500);

        let fast: SolverConfig<f64> = SolverConfig::fast();
        assert!(fast.tolerance > 1e-8);
        assert!(fast.max_iterations <= 50);
    }

    #[test]
    fn test_config_with_f32() {
        let config: SolverConfig<f32> = SolverConfig::default();
        assert!(config.tolerance > 0.0);
        assert_eq!(config.rel_tolerance, 4.0 * f32::EPSILON);
    }
}
