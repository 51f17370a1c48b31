//! Implied volatility by bracketed root finding.

use pricer_core::math::solvers::BrentSolver;

use super::black_scholes::GeneralisedBlackScholes;
use super::error::AnalyticalError;
use super::params::{OptionParams, OptionType, Variable};

/// Lower end of the volatility search bracket (0.01%).
pub const VOLATILITY_LOWER: f64 = 1e-4;

/// Upper end of the volatility search bracket (10000%).
pub const VOLATILITY_UPPER: f64 = 100.0;

/// Solves for the volatility at which the model value equals `price`.
///
/// The input volatility in `params` is ignored. The search runs over
/// [`VOLATILITY_LOWER`, `VOLATILITY_UPPER`], where option value is
/// monotone in σ.
///
/// # Errors
/// - Any error from [`OptionParams::validate`]
/// - `AnalyticalError::ImpliedVolatility` when the price lies outside the
///   values reachable in the bracket, or the solver fails
///
/// # Examples
/// ```
/// use pricer_core::math::solvers::BrentSolver;
/// use pricer_models::analytical::{implied_volatility, OptionParams, OptionType};
///
/// let solver = BrentSolver::with_defaults();
/// let sigma = implied_volatility(3.0, &OptionParams::default(), OptionType::Call, &solver).unwrap();
/// assert!((sigma - 0.250308).abs() < 1e-6);
/// ```
pub fn implied_volatility(
    price: f64,
    params: &OptionParams,
    option_type: OptionType,
    solver: &BrentSolver<f64>,
) -> Result<f64, AnalyticalError> {
    let base = params.with(Variable::Volatility, VOLATILITY_LOWER);
    base.validate()?;

    let objective = |sigma: f64| {
        GeneralisedBlackScholes::build(base.with(Variable::Volatility, sigma), option_type).value() - price
    };

    solver
        .find_root(objective, VOLATILITY_LOWER, VOLATILITY_UPPER)
        .map_err(|source| AnalyticalError::ImpliedVolatility { price, source })
}
