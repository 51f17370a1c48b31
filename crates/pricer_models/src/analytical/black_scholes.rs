//! Generalised Black-Scholes pricing model for European options.
//!
//! This module provides the generalised Black-Scholes model (lognormal
//! underlying with a continuous yield q) together with closed-form Greeks
//! up to third order.
//!
//! ## Mathematical Formulas
//!
//! With DFr = e^(-r·ttm), DFq = e^(-q·ttm), F = S·DFq/DFr and ω = ±1:
//!
//! **Value**: V = ω·DFr·(F·N(ω·d₁) - K·N(ω·d₂))
//!
//! Where:
//! - d₂ = (ln(F/K) - σ²·ttm/2) / (σ√ttm)
//! - d₁ = d₂ + σ√ttm
//!
//! ## Degenerate inputs
//!
//! When F = K and σ√ttm = 0 the d₂ ratio is 0/0. The numerator vanishes
//! faster than the denominator, so d₂ is set to 0. Gamma follows the same
//! policy and is 0 whenever σ√ttm = 0. Charm, Vanna, Volga and Color have
//! no agreed limit at these points and return NaN.

use super::distributions::{norm_cdf, norm_pdf};
use super::error::AnalyticalError;
use super::measure::Measure;
use super::params::{OptionParams, OptionType, Variable};

/// Days per year used by [`GeneralisedBlackScholes::theta_daily`].
const DAYS_PER_YEAR: f64 = 365.0;

/// Generalised Black-Scholes snapshot.
///
/// Holds the inputs and every derived quantity (discount factors, forward,
/// d₁, d₂ and their probabilities). A snapshot never changes piecemeal:
/// [`with`](Self::with) builds a fresh one and the `set_*` methods replace
/// the whole snapshot, so derived fields always match the inputs.
///
/// # Examples
/// ```
/// use pricer_models::analytical::{GeneralisedBlackScholes, OptionParams, OptionType};
///
/// let params = OptionParams::default().with_spot(101.0).with_ttm(1.0);
/// let call = GeneralisedBlackScholes::new(params, OptionType::Call).unwrap();
/// let put = GeneralisedBlackScholes::new(params, OptionType::Put).unwrap();
///
/// // Put-call parity: C - P = S·DFq - K·DFr
/// let parity = call.value() - put.value() - (101.0 * call.df_q() - 100.0 * call.df_r());
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneralisedBlackScholes {
    params: OptionParams,
    option_type: OptionType,
    sign: f64,
    df_r: f64,
    df_q: f64,
    forward: f64,
    sqrt_ttm: f64,
    vol_sqrt_ttm: f64,
    d1: f64,
    d2: f64,
    /// N(ω·d₁)
    cdf_d1: f64,
    /// N(ω·d₂)
    cdf_d2: f64,
}

impl GeneralisedBlackScholes {
    /// Builds a snapshot from validated inputs.
    ///
    /// # Errors
    /// Any error from [`OptionParams::validate`].
    pub fn new(params: OptionParams, option_type: OptionType) -> Result<Self, AnalyticalError> {
        params.validate()?;
        Ok(Self::build(params, option_type))
    }

    /// Builds a call snapshot.
    pub fn call(params: OptionParams) -> Result<Self, AnalyticalError> {
        Self::new(params, OptionType::Call)
    }

    /// Builds a put snapshot.
    pub fn put(params: OptionParams) -> Result<Self, AnalyticalError> {
        Self::new(params, OptionType::Put)
    }

    /// Builds a snapshot without validation; callers guarantee the domain.
    pub(crate) fn build(params: OptionParams, option_type: OptionType) -> Self {
        let OptionParams {
            spot,
            strike,
            volatility,
            ttm,
            rate,
            dividend_yield,
        } = params;
        let sign = option_type.sign();

        let df_r = (-rate * ttm).exp();
        let df_q = (-dividend_yield * ttm).exp();
        let forward = spot * df_q / df_r;
        let sqrt_ttm = ttm.sqrt();
        let vol_sqrt_ttm = volatility * sqrt_ttm;

        let d2 = ((forward / strike).ln() - 0.5 * volatility * volatility * ttm) / vol_sqrt_ttm;
        // 0/0 at F = K with σ√ttm = 0
        let d2 = if d2.is_nan() { 0.0 } else { d2 };
        let d1 = d2 + vol_sqrt_ttm;

        Self {
            params,
            option_type,
            sign,
            df_r,
            df_q,
            forward,
            sqrt_ttm,
            vol_sqrt_ttm,
            d1,
            d2,
            cdf_d1: norm_cdf(sign * d1),
            cdf_d2: norm_cdf(sign * d2),
        }
    }

    // ==========================================================
    // Snapshot updates
    // ==========================================================

    /// Returns a new snapshot with one input replaced.
    ///
    /// # Errors
    /// Any error from [`OptionParams::validate`]; `self` is untouched.
    pub fn with(&self, variable: Variable, value: f64) -> Result<Self, AnalyticalError> {
        Self::new(self.params.with(variable, value), self.option_type)
    }

    /// Replaces one input and rebuilds every derived quantity.
    ///
    /// On error the snapshot is left unchanged.
    ///
    /// # Examples
    /// ```
    /// use pricer_models::analytical::{GeneralisedBlackScholes, OptionParams};
    ///
    /// let mut model = GeneralisedBlackScholes::call(OptionParams::default()).unwrap();
    /// model.set_spot(101.0).unwrap().set_ttm(1.0).unwrap();
    /// assert!((model.value() - 9.823259516).abs() < 1e-8);
    /// ```
    pub fn set(&mut self, variable: Variable, value: f64) -> Result<&mut Self, AnalyticalError> {
        *self = self.with(variable, value)?;
        Ok(self)
    }

    /// Replaces the underlying price.
    pub fn set_spot(&mut self, spot: f64) -> Result<&mut Self, AnalyticalError> {
        self.set(Variable::Spot, spot)
    }

    /// Replaces the strike.
    pub fn set_strike(&mut self, strike: f64) -> Result<&mut Self, AnalyticalError> {
        self.set(Variable::Strike, strike)
    }

    /// Replaces the volatility.
    pub fn set_volatility(&mut self, volatility: f64) -> Result<&mut Self, AnalyticalError> {
        self.set(Variable::Volatility, volatility)
    }

    /// Replaces the time to maturity.
    pub fn set_ttm(&mut self, ttm: f64) -> Result<&mut Self, AnalyticalError> {
        self.set(Variable::Ttm, ttm)
    }

    /// Replaces the domestic rate.
    pub fn set_rate(&mut self, rate: f64) -> Result<&mut Self, AnalyticalError> {
        self.set(Variable::Rate, rate)
    }

    /// Replaces the dividend yield.
    pub fn set_dividend_yield(&mut self, dividend_yield: f64) -> Result<&mut Self, AnalyticalError> {
        self.set(Variable::DividendYield, dividend_yield)
    }

    // ==========================================================
    // Inputs and derived state
    // ==========================================================

    /// Returns the inputs.
    #[inline]
    pub fn params(&self) -> &OptionParams {
        &self.params
    }

    /// Returns the option direction.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Domestic discount factor e^(-r·ttm).
    #[inline]
    pub fn df_r(&self) -> f64 {
        self.df_r
    }

    /// Foreign discount factor e^(-q·ttm).
    #[inline]
    pub fn df_q(&self) -> f64 {
        self.df_q
    }

    /// Forward price S·DFq/DFr.
    #[inline]
    pub fn forward(&self) -> f64 {
        self.forward
    }

    /// d₁.
    #[inline]
    pub fn d1(&self) -> f64 {
        self.d1
    }

    /// d₂ (0 at the degenerate point).
    #[inline]
    pub fn d2(&self) -> f64 {
        self.d2
    }

    /// N(ω·d₁).
    #[inline]
    pub fn cdf_d1(&self) -> f64 {
        self.cdf_d1
    }

    /// N(ω·d₂), the risk-neutral probability of exercise.
    #[inline]
    pub fn cdf_d2(&self) -> f64 {
        self.cdf_d2
    }

    // ==========================================================
    // Value, payoff, profit
    // ==========================================================

    /// Present value ω·DFr·(F·N(ω·d₁) - K·N(ω·d₂)).
    pub fn value(&self) -> f64 {
        self.sign * self.df_r * (self.forward * self.cdf_d1 - self.params.strike * self.cdf_d2)
    }

    /// Alias of [`value`](Self::value).
    pub fn npv(&self) -> f64 {
        self.value()
    }

    /// Terminal payoff max(0, ω·(S_T - K)); `None` uses the current spot.
    pub fn payoff(&self, terminal: Option<f64>) -> f64 {
        let st = terminal.unwrap_or(self.params.spot);
        (self.sign * (st - self.params.strike)).max(0.0)
    }

    /// Payoff less the premium paid today.
    pub fn profit(&self, terminal: Option<f64>) -> f64 {
        self.payoff(terminal) - self.value()
    }

    // ==========================================================
    // First-order Greeks
    // ==========================================================

    /// dV/dS.
    pub fn delta(&self) -> f64 {
        self.sign * self.df_q * self.cdf_d1
    }

    /// dV/dF.
    pub fn delta_fwd(&self) -> f64 {
        self.sign * self.df_r * self.cdf_d1
    }

    /// Delta without carry discounting, ω·N(ω·d₁).
    pub fn delta_driftless(&self) -> f64 {
        self.sign * self.cdf_d1
    }

    /// dV/dK.
    pub fn delta_dual(&self) -> f64 {
        -self.sign * self.df_r * self.cdf_d2
    }

    /// Value change per year elapsed (ttm decreasing).
    pub fn theta(&self) -> f64 {
        let p = &self.params;
        let decay = -self.df_q * norm_pdf(self.d1) * p.spot * p.volatility / (2.0 * self.sqrt_ttm);
        let carry = p.dividend_yield * p.spot * self.df_q * self.cdf_d1
            - p.rate * p.strike * self.df_r * self.cdf_d2;
        decay + self.sign * carry
    }

    /// Theta per calendar day.
    pub fn theta_daily(&self) -> f64 {
        self.theta() / DAYS_PER_YEAR
    }

    /// dV/dσ.
    pub fn vega(&self) -> f64 {
        self.params.spot * self.df_q * self.sqrt_ttm * norm_pdf(self.d1)
    }

    /// Vega per volatility point.
    pub fn vega_percent(&self) -> f64 {
        self.vega() / 100.0
    }

    /// dV/dr.
    pub fn rho_d(&self) -> f64 {
        self.sign * self.params.strike * self.params.ttm * self.df_r * self.cdf_d2
    }

    /// dV/dq.
    pub fn rho_f(&self) -> f64 {
        -self.sign * self.params.spot * self.params.ttm * self.df_q * self.cdf_d1
    }

    // ==========================================================
    // Second- and third-order Greeks
    // ==========================================================

    /// d²V/dS², 0 whenever σ√ttm = 0.
    pub fn gamma(&self) -> f64 {
        if self.vol_sqrt_ttm == 0.0 {
            return 0.0;
        }
        let gamma = self.df_q * norm_pdf(self.d1) / (self.params.spot * self.vol_sqrt_ttm);
        if gamma.is_nan() {
            0.0
        } else {
            gamma
        }
    }

    /// d²V/dK².
    pub fn gamma_dual(&self) -> f64 {
        self.df_r * norm_pdf(self.d2) / (self.params.strike * self.vol_sqrt_ttm)
    }

    /// Delta change per year elapsed.
    pub fn charm(&self) -> f64 {
        let p = &self.params;
        let carry = self.sign * p.dividend_yield * self.df_q * self.cdf_d1;
        let numerator = -self.df_q
            * norm_pdf(self.d1)
            * (2.0 * (p.rate - p.dividend_yield) * p.ttm - self.d2 * self.vol_sqrt_ttm);
        carry + numerator / (2.0 * p.ttm * self.vol_sqrt_ttm)
    }

    /// d²V/dσdS.
    pub fn vanna(&self) -> f64 {
        -self.df_q * norm_pdf(self.d1) * self.d2 / self.params.volatility
    }

    /// d²V/dσ².
    pub fn volga(&self) -> f64 {
        self.vega() * self.d1 * self.d2 / self.params.volatility
    }

    /// dGamma/dttm.
    pub fn color(&self) -> f64 {
        let p = &self.params;
        let scale = -self.df_q * norm_pdf(self.d1) / (2.0 * p.spot * p.ttm * self.vol_sqrt_ttm);
        let drift = (2.0 * (p.rate - p.dividend_yield) * p.ttm - self.d2 * self.vol_sqrt_ttm)
            * self.d1
            / self.vol_sqrt_ttm;
        scale * (2.0 * p.dividend_yield * p.ttm + 1.0 + drift)
    }

    /// Evaluates any named quantity.
    pub fn measure(&self, measure: Measure) -> f64 {
        match measure {
            Measure::Value => self.value(),
            Measure::Delta => self.delta(),
            Measure::DeltaFwd => self.delta_fwd(),
            Measure::DeltaDriftless => self.delta_driftless(),
            Measure::DeltaDual => self.delta_dual(),
            Measure::Theta => self.theta(),
            Measure::ThetaDaily => self.theta_daily(),
            Measure::Vega => self.vega(),
            Measure::VegaPercent => self.vega_percent(),
            Measure::RhoD => self.rho_d(),
            Measure::RhoF => self.rho_f(),
            Measure::Gamma => self.gamma(),
            Measure::GammaDual => self.gamma_dual(),
            Measure::Charm => self.charm(),
            Measure::Vanna => self.vanna(),
            Measure::Volga => self.volga(),
            Measure::Color => self.color(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use proptest::prelude::*;

    fn default_call() -> GeneralisedBlackScholes {
        GeneralisedBlackScholes::call(OptionParams::default()).unwrap()
    }

    /// S = 101, ttm = 1, other inputs at their defaults.
    fn year_call() -> GeneralisedBlackScholes {
        GeneralisedBlackScholes::call(OptionParams::default().with_spot(101.0).with_ttm(1.0)).unwrap()
    }

    // ==========================================================
    // Constructor Tests
    // ==========================================================

    #[test]
    fn test_new_rejects_negative_volatility() {
        let result = GeneralisedBlackScholes::call(OptionParams::default().with_volatility(-0.2));
        match result {
            Err(AnalyticalError::InvalidVolatility { volatility }) => assert_eq!(volatility, -0.2),
            other => panic!("Expected InvalidVolatility error, got {:?}", other),
        }
    }

    #[test]
    fn test_derived_state() {
        let m = default_call();
        let ttm: f64 = 1.0 / 12.0;
        assert_relative_eq!(m.df_r(), (-0.05 * ttm).exp(), epsilon = 1e-15);
        assert_relative_eq!(m.df_q(), (-0.02 * ttm).exp(), epsilon = 1e-15);
        assert_relative_eq!(m.forward(), 100.0 * m.df_q() / m.df_r(), epsilon = 1e-12);
        assert_relative_eq!(m.d1() - m.d2(), 0.2 * ttm.sqrt(), epsilon = 1e-15);
    }

    // ==========================================================
    // Reference Values
    // ==========================================================

    #[test]
    fn test_default_call_reference_values() {
        let m = default_call();
        assert_relative_eq!(m.value(), 2.423056836, epsilon = 1e-8);
        assert_relative_eq!(m.vega(), 11.4673916, epsilon = 1e-6);
        assert_relative_eq!(m.vega_percent(), 0.11467392, epsilon = 1e-8);
        assert_relative_eq!(m.rho_d(), 4.19712579, epsilon = 1e-7);
        assert_relative_eq!(m.rho_f(), -4.39904719, epsilon = 1e-7);
        assert_relative_eq!(m.color(), -0.41635232, epsilon = 1e-7);
    }

    #[test]
    fn test_year_call_reference_values() {
        let m = year_call();
        assert_relative_eq!(m.value(), 9.823259516, epsilon = 1e-8);
        assert_relative_eq!(m.npv(), m.value());
        assert_relative_eq!(m.delta(), 0.60558311, epsilon = 1e-8);
        assert_relative_eq!(m.delta_fwd(), 0.58768543, epsilon = 1e-8);
        assert_relative_eq!(m.delta_driftless(), 0.6178167, epsilon = 1e-7);
        assert_relative_eq!(m.delta_dual(), -0.51340635, epsilon = 1e-8);
        assert_relative_eq!(m.theta(), -5.11977695, epsilon = 1e-7);
        assert_relative_eq!(m.theta_daily(), -0.01402679, epsilon = 1e-8);
        assert_relative_eq!(m.gamma(), 0.0185081, epsilon = 1e-7);
        assert_relative_eq!(m.gamma_dual(), 0.01888012, epsilon = 1e-8);
        assert_relative_eq!(m.charm(), -0.02532113, epsilon = 1e-8);
        assert_relative_eq!(m.vanna(), -0.1864676, epsilon = 1e-7);
        assert_relative_eq!(m.volga(), 5.6452911, epsilon = 1e-6);
    }

    #[test]
    fn test_value_across_volatilities() {
        let expected = [7.94559796, 9.82325952, 11.71625574];
        for (sigma, want) in [0.15, 0.20, 0.25].iter().zip(expected) {
            let m = year_call().with(Variable::Volatility, *sigma).unwrap();
            assert_relative_eq!(m.value(), want, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_call_value_reduces_to_classical_form() {
        let m = year_call();
        let p = m.params();
        let classical = p.spot * m.df_q() * norm_cdf(m.d1()) - p.strike * m.df_r() * norm_cdf(m.d2());
        assert_relative_eq!(m.value(), classical, epsilon = 1e-12);
    }

    // ==========================================================
    // Payoff and Profit
    // ==========================================================

    #[test]
    fn test_call_profit_scenarios() {
        let m = year_call();
        let profits: Vec<f64> = [99.0, 100.0, 101.0].iter().map(|st| m.profit(Some(*st))).collect();
        assert_relative_eq!(profits[0], -9.82326, epsilon = 1e-5);
        assert_relative_eq!(profits[1], -9.82326, epsilon = 1e-5);
        assert_relative_eq!(profits[2], -8.82326, epsilon = 1e-5);
    }

    #[test]
    fn test_put_profit_scenarios() {
        let m = GeneralisedBlackScholes::put(*year_call().params()).unwrap();
        let profits: Vec<f64> = [99.0, 100.0, 101.0].iter().map(|st| m.profit(Some(*st))).collect();
        assert_relative_eq!(profits[0], -4.946136, epsilon = 1e-6);
        assert_relative_eq!(profits[1], -5.946136, epsilon = 1e-6);
        assert_relative_eq!(profits[2], -5.946136, epsilon = 1e-6);
    }

    #[test]
    fn test_payoff_defaults_to_current_spot() {
        let m = year_call();
        assert_eq!(m.payoff(None), 1.0);
        let put = GeneralisedBlackScholes::put(*m.params()).unwrap();
        assert_eq!(put.payoff(None), 0.0);
    }

    // ==========================================================
    // Snapshot Updates
    // ==========================================================

    #[test]
    fn test_set_chain_matches_fresh_construction() {
        let mut m = default_call();
        m.set_spot(101.0).unwrap().set_ttm(1.0).unwrap();
        assert_eq!(m, year_call());
    }

    #[test]
    fn test_failed_set_leaves_snapshot_unchanged() {
        let mut m = default_call();
        let before = m;
        assert!(m.set_ttm(-1.0).is_err());
        assert_eq!(m, before);
    }

    #[test]
    fn test_with_does_not_mutate() {
        let m = default_call();
        let shifted = m.with(Variable::Rate, 0.0).unwrap();
        assert_eq!(m.params().rate, 0.05);
        assert_eq!(shifted.params().rate, 0.0);
        assert_eq!(shifted.df_r(), 1.0);
    }

    #[test]
    fn test_every_setter_targets_its_field() {
        let mut m = default_call();
        m.set_strike(95.0)
            .unwrap()
            .set_volatility(0.3)
            .unwrap()
            .set_rate(0.01)
            .unwrap()
            .set_dividend_yield(0.0)
            .unwrap();
        assert_eq!(
            *m.params(),
            OptionParams::new(100.0, 95.0, 0.3, 1.0 / 12.0, 0.01, 0.0)
        );
    }

    // ==========================================================
    // Degenerate Inputs
    // ==========================================================

    fn at_the_forward(ttm: f64, volatility: f64) -> GeneralisedBlackScholes {
        GeneralisedBlackScholes::call(OptionParams::new(100.0, 100.0, volatility, ttm, 0.0, 0.0)).unwrap()
    }

    #[test]
    fn test_zero_ttm_at_forward() {
        let m = at_the_forward(0.0, 0.2);
        assert_eq!(m.d2(), 0.0);
        assert_eq!(m.gamma(), 0.0);
        assert_eq!(m.value(), 0.0);
        assert!(m.charm().is_nan());
        assert!(m.color().is_nan());
    }

    #[test]
    fn test_zero_volatility_at_forward() {
        let m = at_the_forward(1.0, 0.0);
        assert_eq!(m.d2(), 0.0);
        assert_eq!(m.d1(), 0.0);
        assert_eq!(m.gamma(), 0.0);
        assert!(m.vanna().is_nan());
        assert!(m.volga().is_nan());
    }

    #[test]
    fn test_zero_ttm_away_from_forward_is_intrinsic() {
        let call = GeneralisedBlackScholes::call(OptionParams::new(110.0, 100.0, 0.2, 0.0, 0.05, 0.02)).unwrap();
        assert_eq!(call.d2(), f64::INFINITY);
        assert_abs_diff_eq!(call.value(), 10.0, epsilon = 1e-12);
        assert_eq!(call.delta(), 1.0);
        assert_eq!(call.gamma(), 0.0);

        let put = GeneralisedBlackScholes::put(*call.params()).unwrap();
        assert_eq!(put.value(), 0.0);
    }

    // ==========================================================
    // Measure Dispatch
    // ==========================================================

    #[test]
    fn test_measure_dispatch_matches_methods() {
        let m = year_call();
        assert_eq!(m.measure(Measure::Value), m.value());
        assert_eq!(m.measure(Measure::DeltaDual), m.delta_dual());
        assert_eq!(m.measure(Measure::ThetaDaily), m.theta_daily());
        assert_eq!(m.measure(Measure::Color), m.color());
    }

    // ==========================================================
    // Property Tests
    // ==========================================================

    fn params_strategy() -> impl Strategy<Value = OptionParams> {
        (
            50.0..150.0f64,
            50.0..150.0f64,
            0.05..0.8f64,
            0.01..5.0f64,
            -0.02..0.1f64,
            0.0..0.08f64,
        )
            .prop_map(|(s, k, v, t, r, q)| OptionParams::new(s, k, v, t, r, q))
    }

    proptest! {
        #[test]
        fn prop_put_call_parity(params in params_strategy()) {
            let call = GeneralisedBlackScholes::call(params).unwrap();
            let put = GeneralisedBlackScholes::put(params).unwrap();
            let rhs = params.spot * (-params.dividend_yield * params.ttm).exp()
                - params.strike * (-params.rate * params.ttm).exp();
            prop_assert!((call.value() - put.value() - rhs).abs() < 1e-9);
        }

        #[test]
        fn prop_driftless_delta_identity(params in params_strategy()) {
            let call = GeneralisedBlackScholes::call(params).unwrap();
            let put = GeneralisedBlackScholes::put(params).unwrap();
            prop_assert!((call.delta_driftless() - (1.0 + put.delta_driftless())).abs() < 1e-12);
            prop_assert!((call.delta() - (call.df_q() + put.delta())).abs() < 1e-12);
        }

        #[test]
        fn prop_value_non_negative(params in params_strategy()) {
            let call = GeneralisedBlackScholes::call(params).unwrap();
            let put = GeneralisedBlackScholes::put(params).unwrap();
            prop_assert!(call.value() >= -1e-12);
            prop_assert!(put.value() >= -1e-12);
        }
    }
}
