//! Analytic Greeks against central finite differences.
//!
//! Each analytic sensitivity is compared with a central difference of its
//! base quantity, bumped by ±δ/2 in one input:
//!
//! | Greek | Base | Variable | Factor |
//! |-------|------|----------|--------|
//! | Delta | value | S | 1 |
//! | DeltaDual | value | K | 1 |
//! | Gamma | Delta | S | 1 |
//! | GammaDual | DeltaDual | K | 1 |
//! | Theta | value | ttm | -1 |
//! | Theta_daily | value | ttm | -1/365 |
//! | Vega | value | σ | 1 |
//! | Vega_percent | value | σ | 1/100 |
//! | RhoD | value | r | 1 |
//! | RhoF | value | q | 1 |
//! | Charm | Delta | ttm | -1 |
//! | Vanna | Vega | S | 1 |
//! | Volga | Vega | σ | 1 |
//! | Color | Gamma | ttm | 1 |
//!
//! A discrepancy needs both the absolute error and the relative error
//! (against the analytic value, floored) to exceed the tolerance.
//!
//! Exposure Greeks are forward Greeks on a position whose value is held at
//! zero, so an exposure never passes the value-based rows.

use pricer_models::analytical::{Measure, OptionParams, Variable};
use pricer_models::instruments::{Instrument, InstrumentError, InstrumentType};
use rand::Rng;
use rand_distr::StandardNormal;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One row of the check table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreekCheck {
    /// Analytic sensitivity under test
    pub greek: Measure,
    /// Quantity differentiated numerically
    pub base: Measure,
    /// Input bumped
    pub variable: Variable,
    /// Scale applied to the difference quotient
    pub factor: f64,
}

const fn row(greek: Measure, base: Measure, variable: Variable, factor: f64) -> GreekCheck {
    GreekCheck {
        greek,
        base,
        variable,
        factor,
    }
}

/// Every sensitivity with its numerical counterpart.
pub const GREEK_CHECKS: [GreekCheck; 14] = [
    row(Measure::Delta, Measure::Value, Variable::Spot, 1.0),
    row(Measure::DeltaDual, Measure::Value, Variable::Strike, 1.0),
    row(Measure::Gamma, Measure::Delta, Variable::Spot, 1.0),
    row(Measure::GammaDual, Measure::DeltaDual, Variable::Strike, 1.0),
    row(Measure::Theta, Measure::Value, Variable::Ttm, -1.0),
    row(Measure::ThetaDaily, Measure::Value, Variable::Ttm, -1.0 / 365.0),
    row(Measure::Vega, Measure::Value, Variable::Volatility, 1.0),
    row(Measure::VegaPercent, Measure::Value, Variable::Volatility, 0.01),
    row(Measure::RhoD, Measure::Value, Variable::Rate, 1.0),
    row(Measure::RhoF, Measure::Value, Variable::DividendYield, 1.0),
    row(Measure::Charm, Measure::Delta, Variable::Ttm, -1.0),
    row(Measure::Vanna, Measure::Vega, Variable::Spot, 1.0),
    row(Measure::Volga, Measure::Vega, Variable::Volatility, 1.0),
    row(Measure::Color, Measure::Gamma, Variable::Ttm, 1.0),
];

/// Checker settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreekCheckConfig {
    /// Total bump width δ
    pub bump: f64,
    /// Tolerance on both absolute and relative error
    pub tolerance: f64,
    /// Floor on |analytic| in the relative error
    pub relative_floor: f64,
}

impl Default for GreekCheckConfig {
    fn default() -> Self {
        Self {
            bump: 1e-6,
            tolerance: 5e-5,
            relative_floor: 1e-6,
        }
    }
}

impl GreekCheckConfig {
    /// Creates a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bump width.
    #[inline]
    pub fn with_bump(mut self, bump: f64) -> Self {
        self.bump = bump;
        self
    }

    /// Sets the tolerance.
    #[inline]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the relative-error floor.
    #[inline]
    pub fn with_relative_floor(mut self, relative_floor: f64) -> Self {
        self.relative_floor = relative_floor;
        self
    }

    /// First setting that is not strictly positive, if any.
    pub fn invalid_field(&self) -> Option<(&'static str, f64)> {
        [
            ("bump", self.bump),
            ("tolerance", self.tolerance),
            ("relative_floor", self.relative_floor),
        ]
        .into_iter()
        .find(|(_, value)| !(*value > 0.0))
    }
}

/// An analytic Greek that disagrees with its finite difference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreekDiscrepancy {
    /// Greek under test
    pub greek: Measure,
    /// Input bumped
    pub variable: Variable,
    /// Closed-form value
    pub analytic: f64,
    /// Central-difference estimate
    pub numerical: f64,
    /// |analytic - numerical|
    pub abs_error: f64,
    /// Absolute error over the floored |analytic|
    pub rel_error: f64,
}

/// Result of checking one instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct GreekCheckReport {
    /// Inputs checked
    pub params: OptionParams,
    /// Instrument type checked
    pub kind: InstrumentType,
    /// Number of Greeks compared
    pub checked: usize,
    /// Greeks outside tolerance
    pub discrepancies: Vec<GreekDiscrepancy>,
}

impl GreekCheckReport {
    /// True when every Greek agrees with its finite difference.
    pub fn is_consistent(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

/// Outcome of a random-sample run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSummary {
    /// Instruments drawn
    pub sampled: usize,
    /// Draws rejected by input validation
    pub skipped: usize,
    /// Instruments with at least one discrepancy
    pub instruments_with_errors: usize,
    /// Discrepancies across all instruments
    pub total_errors: usize,
    /// Reports of the failing instruments
    pub failing: Vec<GreekCheckReport>,
}

/// Compares analytic Greeks with central finite differences.
///
/// # Examples
/// ```
/// use pricer_models::analytical::OptionParams;
/// use pricer_models::instruments::InstrumentType;
/// use pricer_risk::verification::GreekConsistencyChecker;
///
/// let checker = GreekConsistencyChecker::default();
/// let report = checker.check(&OptionParams::default(), InstrumentType::Put).unwrap();
/// assert!(report.is_consistent());
/// assert_eq!(report.checked, 14);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreekConsistencyChecker {
    config: GreekCheckConfig,
}

impl GreekConsistencyChecker {
    /// Creates a checker.
    pub fn new(config: GreekCheckConfig) -> Self {
        Self { config }
    }

    /// Settings in use.
    pub fn config(&self) -> &GreekCheckConfig {
        &self.config
    }

    /// Checks every Greek of one instrument.
    ///
    /// # Errors
    /// `InstrumentError` if the inputs, or the inputs bumped by δ/2, fail
    /// validation.
    pub fn check(&self, params: &OptionParams, kind: InstrumentType) -> Result<GreekCheckReport, InstrumentError> {
        let instrument = Instrument::new(*params, kind)?;
        self.check_instrument(&instrument)
    }

    /// Checks every Greek of an existing instrument.
    pub fn check_instrument(&self, instrument: &Instrument) -> Result<GreekCheckReport, InstrumentError> {
        let mut discrepancies = Vec::new();
        for check in GREEK_CHECKS.iter() {
            let analytic = instrument.measure(check.greek);
            let numerical = self.numerical(instrument, check)?;
            let abs_error = (analytic - numerical).abs();
            let rel_error = abs_error / analytic.abs().max(self.config.relative_floor);

            if abs_error > self.config.tolerance && rel_error > self.config.tolerance {
                tracing::warn!(
                    kind = %instrument.kind(),
                    greek = %check.greek,
                    variable = %check.variable,
                    analytic,
                    numerical,
                    abs_error,
                    rel_error,
                    params = ?instrument.params(),
                    "Greek disagrees with finite difference"
                );
                discrepancies.push(GreekDiscrepancy {
                    greek: check.greek,
                    variable: check.variable,
                    analytic,
                    numerical,
                    abs_error,
                    rel_error,
                });
            }
        }

        Ok(GreekCheckReport {
            params: *instrument.params(),
            kind: instrument.kind(),
            checked: GREEK_CHECKS.len(),
            discrepancies,
        })
    }

    fn numerical(&self, instrument: &Instrument, check: &GreekCheck) -> Result<f64, InstrumentError> {
        let x = instrument.params().get(check.variable);
        let half = self.config.bump / 2.0;
        let up = instrument.with(check.variable, x + half)?.measure(check.base);
        let down = instrument.with(check.variable, x - half)?.measure(check.base);
        Ok(check.factor * (up - down) / self.config.bump)
    }

    /// Checks `n` random instruments.
    ///
    /// Draws S, K ~ N(100, 10); r, q ~ N(0.05, 0.03); ln σ ~ N(-1.5, 0.5);
    /// ln ttm ~ N(0, 2); and the type call 35%, put 35%, forward 15%,
    /// bond 15%. Draws are taken sequentially from `rng`, so a seeded
    /// generator reproduces the sample; the checks run in parallel.
    pub fn check_random_sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> SampleSummary {
        let draws: Vec<_> = (0..n).map(|_| draw(rng)).collect();

        let results: Vec<_> = draws
            .par_iter()
            .map(|(params, kind)| self.check(params, *kind))
            .collect();

        let mut summary = SampleSummary {
            sampled: n,
            ..SampleSummary::default()
        };
        for result in results {
            match result {
                Ok(report) if report.is_consistent() => {}
                Ok(report) => {
                    summary.instruments_with_errors += 1;
                    summary.total_errors += report.discrepancies.len();
                    summary.failing.push(report);
                }
                Err(err) => {
                    tracing::debug!(error = %err, "Skipping invalid draw");
                    summary.skipped += 1;
                }
            }
        }

        tracing::info!(
            sampled = summary.sampled,
            skipped = summary.skipped,
            instruments_with_errors = summary.instruments_with_errors,
            total_errors = summary.total_errors,
            "Greek consistency sample complete"
        );
        summary
    }
}

fn draw<R: Rng + ?Sized>(rng: &mut R) -> (OptionParams, InstrumentType) {
    let mut normal = |mean: f64, sd: f64| -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        mean + sd * z
    };
    let params = OptionParams::new(
        normal(100.0, 10.0),
        normal(100.0, 10.0),
        normal(-1.5, 0.5).exp(),
        normal(0.0, 2.0).exp(),
        normal(0.05, 0.03),
        normal(0.05, 0.03),
    );

    let u: f64 = rng.gen();
    let kind = if u < 0.35 {
        InstrumentType::Call
    } else if u < 0.70 {
        InstrumentType::Put
    } else if u < 0.85 {
        InstrumentType::Forward
    } else {
        InstrumentType::Bond
    };
    (params, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // ==========================================================
    // Fixed points
    // ==========================================================

    #[test]
    fn test_moderate_grid_is_consistent() {
        let checker = GreekConsistencyChecker::default();
        let kinds = [
            InstrumentType::Call,
            InstrumentType::Put,
            InstrumentType::Bond,
            InstrumentType::Forward,
        ];
        for kind in kinds {
            for spot in [80.0, 100.0, 120.0] {
                for volatility in [0.1, 0.4] {
                    for ttm in [0.25, 3.0] {
                        let params = OptionParams::new(spot, 100.0, volatility, ttm, 0.05, 0.02);
                        let report = checker.check(&params, kind).unwrap();
                        assert!(report.is_consistent(), "{:?}", report);
                    }
                }
            }
        }
    }

    #[test]
    fn test_long_dated_put_rho() {
        let params = OptionParams::new(93.112533, 106.693664, 0.260802, 108.625926, 0.072272, 0.073218);
        let report = GreekConsistencyChecker::default()
            .check(&params, InstrumentType::Put)
            .unwrap();
        assert!(report.is_consistent());
    }

    #[test]
    fn test_tight_tolerance_flags_noise() {
        let checker = GreekConsistencyChecker::new(GreekCheckConfig::new().with_tolerance(1e-12));
        let report = checker.check(&OptionParams::default(), InstrumentType::Call).unwrap();
        assert_eq!(report.discrepancies.len(), 14);
        for d in &report.discrepancies {
            assert!(d.abs_error > 1e-12 && d.rel_error > 1e-12);
        }
    }

    #[test]
    fn test_exposure_value_rows_disagree() {
        let report = GreekConsistencyChecker::default()
            .check(&OptionParams::default(), InstrumentType::Exposure)
            .unwrap();
        let flagged: Vec<_> = report.discrepancies.iter().map(|d| d.greek).collect();
        assert!(flagged.contains(&Measure::Delta));
        assert!(flagged.contains(&Measure::RhoD));
        assert!(!flagged.contains(&Measure::Gamma));
    }

    #[test]
    fn test_bump_past_zero_expiry_is_an_error() {
        let params = OptionParams::default().with_ttm(1e-7);
        let result = GreekConsistencyChecker::default().check(&params, InstrumentType::Call);
        assert!(result.is_err());
    }

    // ==========================================================
    // Random sample
    // ==========================================================

    #[test]
    fn test_random_sample_is_reproducible() {
        let checker = GreekConsistencyChecker::default();
        let a = checker.check_random_sample(50, &mut StdRng::seed_from_u64(7));
        let b = checker.check_random_sample(50, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(a.sampled, 50);
    }

    #[test]
    fn test_random_sample_rarely_flags() {
        let checker = GreekConsistencyChecker::default();
        let summary = checker.check_random_sample(400, &mut StdRng::seed_from_u64(42));
        assert!(summary.instruments_with_errors * 100 <= summary.sampled);
        assert_eq!(summary.failing.len(), summary.instruments_with_errors);
        assert!(summary.total_errors >= summary.instruments_with_errors);
    }

    #[test]
    fn test_config_builders_and_validation() {
        let config = GreekCheckConfig::new().with_bump(1e-4).with_relative_floor(1e-8);
        assert_eq!(config.bump, 1e-4);
        assert_eq!(config.relative_floor, 1e-8);
        assert_eq!(config.invalid_field(), None);
        assert_eq!(GreekCheckConfig::new().with_tolerance(0.0).invalid_field(), Some(("tolerance", 0.0)));
    }
}
