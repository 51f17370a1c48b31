//! Single-leg instrument over the generalised Black-Scholes model.
//!
//! Calls and puts delegate to [`GeneralisedBlackScholes`]. Bonds, forwards
//! and exposures use their own closed forms, evaluated from the same
//! snapshot (discount factors and forward).
//!
//! | Quantity | Bond | Forward | Exposure |
//! |---|---|---|---|
//! | value | K·DFr | DFr·(F - K) | 0 |
//! | payoff | K | S_T - K | S_T - K |
//! | Delta | 0 | DFq | DFq |
//! | DeltaFwd | 0 | DFr | DFr |
//! | DeltaDriftless | 0 | 1 | 1 |
//! | DeltaDual | DFr | -DFr | -DFr |
//! | Theta | r·DFr·K | q·S·DFq - r·K·DFr | as forward |
//! | RhoD | -ttm·DFr·K | K·ttm·DFr | as forward |
//! | RhoF | 0 | -S·ttm·DFq | as forward |
//! | Charm | 0 | q·DFq | as forward |
//!
//! Vega, Gamma, GammaDual, Vanna, Volga and Color are 0 for every
//! non-option.

use crate::analytical::{GeneralisedBlackScholes, Measure, OptionParams, Variable};

use super::error::InstrumentError;
use super::instrument_type::InstrumentType;

/// One instrument: a pricing snapshot plus its type.
///
/// # Examples
/// ```
/// use pricer_models::analytical::OptionParams;
/// use pricer_models::instruments::Instrument;
///
/// let params = OptionParams::default().with_ttm(1.0).with_rate(0.05);
/// let bond = Instrument::bond(params).unwrap();
/// assert!((bond.value() - 95.122942).abs() < 1e-6);
/// assert_eq!(bond.delta(), 0.0);
/// assert!(bond.theta() > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instrument {
    model: GeneralisedBlackScholes,
    kind: InstrumentType,
}

impl Instrument {
    /// Creates an instrument of the given type.
    ///
    /// # Errors
    /// `InstrumentError::Analytical` if the inputs fail validation.
    pub fn new(params: OptionParams, kind: InstrumentType) -> Result<Self, InstrumentError> {
        let model = GeneralisedBlackScholes::new(params, kind.option_type())?;
        Ok(Self { model, kind })
    }

    /// Creates a call.
    pub fn call(params: OptionParams) -> Result<Self, InstrumentError> {
        Self::new(params, InstrumentType::Call)
    }

    /// Creates a put.
    pub fn put(params: OptionParams) -> Result<Self, InstrumentError> {
        Self::new(params, InstrumentType::Put)
    }

    /// Creates a zero-coupon bond with face value K.
    pub fn bond(params: OptionParams) -> Result<Self, InstrumentError> {
        Self::new(params, InstrumentType::Bond)
    }

    /// Creates a forward struck at K.
    pub fn forward(params: OptionParams) -> Result<Self, InstrumentError> {
        Self::new(params, InstrumentType::Forward)
    }

    /// Creates an exposure with reference level K.
    pub fn exposure(params: OptionParams) -> Result<Self, InstrumentError> {
        Self::new(params, InstrumentType::Exposure)
    }

    pub(crate) fn from_model(model: GeneralisedBlackScholes, kind: InstrumentType) -> Self {
        Self { model, kind }
    }

    /// Instrument type.
    #[inline]
    pub fn kind(&self) -> InstrumentType {
        self.kind
    }

    /// Underlying pricing snapshot.
    #[inline]
    pub fn model(&self) -> &GeneralisedBlackScholes {
        &self.model
    }

    /// Inputs.
    #[inline]
    pub fn params(&self) -> &OptionParams {
        self.model.params()
    }

    // ==========================================================
    // Snapshot updates
    // ==========================================================

    /// Returns a new instrument with one input replaced.
    pub fn with(&self, variable: Variable, value: f64) -> Result<Self, InstrumentError> {
        Ok(Self {
            model: self.model.with(variable, value)?,
            kind: self.kind,
        })
    }

    /// Replaces one input; the type never changes.
    pub fn set(&mut self, variable: Variable, value: f64) -> Result<&mut Self, InstrumentError> {
        self.model.set(variable, value)?;
        Ok(self)
    }

    /// Replaces the underlying price.
    pub fn set_spot(&mut self, spot: f64) -> Result<&mut Self, InstrumentError> {
        self.set(Variable::Spot, spot)
    }

    /// Replaces the strike.
    pub fn set_strike(&mut self, strike: f64) -> Result<&mut Self, InstrumentError> {
        self.set(Variable::Strike, strike)
    }

    /// Replaces the volatility.
    pub fn set_volatility(&mut self, volatility: f64) -> Result<&mut Self, InstrumentError> {
        self.set(Variable::Volatility, volatility)
    }

    /// Replaces the time to maturity.
    pub fn set_ttm(&mut self, ttm: f64) -> Result<&mut Self, InstrumentError> {
        self.set(Variable::Ttm, ttm)
    }

    /// Replaces the domestic rate.
    pub fn set_rate(&mut self, rate: f64) -> Result<&mut Self, InstrumentError> {
        self.set(Variable::Rate, rate)
    }

    /// Replaces the dividend yield.
    pub fn set_dividend_yield(&mut self, dividend_yield: f64) -> Result<&mut Self, InstrumentError> {
        self.set(Variable::DividendYield, dividend_yield)
    }

    // ==========================================================
    // Quantities
    // ==========================================================

    /// Evaluates any named quantity.
    pub fn measure(&self, measure: Measure) -> f64 {
        closed_form(self.kind, &self.model, measure)
    }

    /// Terminal payoff; `None` uses the current spot.
    pub fn payoff(&self, terminal: Option<f64>) -> f64 {
        terminal_payoff(self.kind, &self.model, terminal)
    }

    /// Payoff less today's value.
    pub fn profit(&self, terminal: Option<f64>) -> f64 {
        self.payoff(terminal) - self.value()
    }

    /// Present value.
    pub fn value(&self) -> f64 {
        self.measure(Measure::Value)
    }

    /// Alias of [`value`](Self::value).
    pub fn npv(&self) -> f64 {
        self.value()
    }

    /// dV/dS.
    pub fn delta(&self) -> f64 {
        self.measure(Measure::Delta)
    }

    /// dV/dF.
    pub fn delta_fwd(&self) -> f64 {
        self.measure(Measure::DeltaFwd)
    }

    /// Delta without carry discounting.
    pub fn delta_driftless(&self) -> f64 {
        self.measure(Measure::DeltaDriftless)
    }

    /// dV/dK.
    pub fn delta_dual(&self) -> f64 {
        self.measure(Measure::DeltaDual)
    }

    /// Value change per year elapsed.
    pub fn theta(&self) -> f64 {
        self.measure(Measure::Theta)
    }

    /// Theta per calendar day.
    pub fn theta_daily(&self) -> f64 {
        self.measure(Measure::ThetaDaily)
    }

    /// dV/dσ.
    pub fn vega(&self) -> f64 {
        self.measure(Measure::Vega)
    }

    /// Vega per volatility point.
    pub fn vega_percent(&self) -> f64 {
        self.measure(Measure::VegaPercent)
    }

    /// dV/dr.
    pub fn rho_d(&self) -> f64 {
        self.measure(Measure::RhoD)
    }

    /// dV/dq.
    pub fn rho_f(&self) -> f64 {
        self.measure(Measure::RhoF)
    }

    /// d²V/dS².
    pub fn gamma(&self) -> f64 {
        self.measure(Measure::Gamma)
    }

    /// d²V/dK².
    pub fn gamma_dual(&self) -> f64 {
        self.measure(Measure::GammaDual)
    }

    /// Delta change per year elapsed.
    pub fn charm(&self) -> f64 {
        self.measure(Measure::Charm)
    }

    /// d²V/dσdS.
    pub fn vanna(&self) -> f64 {
        self.measure(Measure::Vanna)
    }

    /// d²V/dσ².
    pub fn volga(&self) -> f64 {
        self.measure(Measure::Volga)
    }

    /// dGamma/dttm.
    pub fn color(&self) -> f64 {
        self.measure(Measure::Color)
    }
}

/// Quantity for one instrument type, evaluated on a shared snapshot.
pub(crate) fn closed_form(kind: InstrumentType, model: &GeneralisedBlackScholes, measure: Measure) -> f64 {
    if kind.is_option() {
        return model.measure(measure);
    }

    let p = model.params();
    let (df_r, df_q) = (model.df_r(), model.df_q());
    let bond = kind == InstrumentType::Bond;

    match measure {
        Measure::Value => match kind {
            InstrumentType::Bond => p.strike * df_r,
            InstrumentType::Exposure => 0.0,
            _ => df_r * (model.forward() - p.strike),
        },
        Measure::Delta if bond => 0.0,
        Measure::Delta => df_q,
        Measure::DeltaFwd if bond => 0.0,
        Measure::DeltaFwd => df_r,
        Measure::DeltaDriftless if bond => 0.0,
        Measure::DeltaDriftless => 1.0,
        Measure::DeltaDual if bond => df_r,
        Measure::DeltaDual => -df_r,
        Measure::Theta => linear_theta(model, bond),
        Measure::ThetaDaily => linear_theta(model, bond) / 365.0,
        Measure::RhoD if bond => -p.ttm * df_r * p.strike,
        Measure::RhoD => p.strike * p.ttm * df_r,
        Measure::RhoF if bond => 0.0,
        Measure::RhoF => -p.spot * p.ttm * df_q,
        Measure::Charm if bond => 0.0,
        Measure::Charm => p.dividend_yield * df_q,
        Measure::Vega
        | Measure::VegaPercent
        | Measure::Gamma
        | Measure::GammaDual
        | Measure::Vanna
        | Measure::Volga
        | Measure::Color => 0.0,
    }
}

fn linear_theta(model: &GeneralisedBlackScholes, bond: bool) -> f64 {
    let p = model.params();
    if bond {
        p.rate * model.df_r() * p.strike
    } else {
        p.dividend_yield * p.spot * model.df_q() - p.rate * p.strike * model.df_r()
    }
}

/// Terminal payoff for one instrument type.
pub(crate) fn terminal_payoff(kind: InstrumentType, model: &GeneralisedBlackScholes, terminal: Option<f64>) -> f64 {
    let strike = model.params().strike;
    match kind {
        InstrumentType::Call | InstrumentType::Put => model.payoff(terminal),
        InstrumentType::Bond => strike,
        InstrumentType::Forward | InstrumentType::Exposure => {
            terminal.unwrap_or(model.params().spot) - strike
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn year(params: OptionParams) -> OptionParams {
        params.with_ttm(1.0)
    }

    // ==========================================================
    // Delegation
    // ==========================================================

    #[test]
    fn test_options_delegate_to_model() {
        let params = OptionParams::default().with_spot(101.0).with_ttm(1.0);
        for kind in [InstrumentType::Call, InstrumentType::Put] {
            let instrument = Instrument::new(params, kind).unwrap();
            let model = GeneralisedBlackScholes::new(params, kind.option_type()).unwrap();
            for measure in Measure::ALL {
                let (a, b) = (instrument.measure(measure), model.measure(measure));
                assert!(a == b || (a.is_nan() && b.is_nan()), "{} differs", measure);
            }
        }
    }

    // ==========================================================
    // Bonds
    // ==========================================================

    #[test]
    fn test_bond_values_across_rates() {
        let expected = [100.0, 95.122942, 81.873075];
        for (rate, want) in [0.0, 0.05, 0.20].iter().zip(expected) {
            let bond = Instrument::bond(year(OptionParams::default()).with_rate(*rate)).unwrap();
            assert_relative_eq!(bond.value(), want, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_bond_sensitivities() {
        let bond = Instrument::bond(OptionParams::default()).unwrap();
        assert_relative_eq!(bond.theta(), 4.97921, epsilon = 1e-5);
        assert_eq!(bond.delta(), 0.0);
        assert_eq!(bond.gamma(), 0.0);
        assert_eq!(bond.vega(), 0.0);
        assert_eq!(bond.vanna(), 0.0);
        assert_eq!(bond.color(), 0.0);
        assert_relative_eq!(bond.delta_dual(), bond.model().df_r());
        assert_relative_eq!(bond.rho_d(), -bond.params().ttm * bond.value(), epsilon = 1e-12);
        assert_eq!(bond.payoff(Some(250.0)), 100.0);
    }

    // ==========================================================
    // Forwards and Exposures
    // ==========================================================

    #[test]
    fn test_forward_values_across_strikes() {
        let expected = [12.409219, 2.896925, -6.615369];
        for (strike, want) in [90.0, 100.0, 110.0].iter().zip(expected) {
            let fwd = Instrument::forward(year(OptionParams::default()).with_strike(*strike)).unwrap();
            assert_relative_eq!(fwd.value(), want, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_forward_sensitivities() {
        let fwd = Instrument::forward(OptionParams::default()).unwrap();
        assert_relative_eq!(fwd.delta(), 0.998335, epsilon = 1e-6);
        assert_relative_eq!(fwd.delta_fwd(), 0.995842, epsilon = 1e-6);
        assert_eq!(fwd.delta_driftless(), 1.0);
        for zero in [fwd.gamma(), fwd.vega(), fwd.vanna(), fwd.color(), fwd.volga()] {
            assert_eq!(zero, 0.0);
        }
    }

    #[test]
    fn test_forward_is_call_minus_put() {
        let params = year(OptionParams::default()).with_strike(95.0);
        let fwd = Instrument::forward(params).unwrap();
        let call = Instrument::call(params).unwrap();
        let put = Instrument::put(params).unwrap();
        for measure in [Measure::Value, Measure::Delta, Measure::Theta, Measure::RhoD, Measure::RhoF, Measure::Charm] {
            assert_relative_eq!(
                fwd.measure(measure),
                call.measure(measure) - put.measure(measure),
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn test_exposure_has_no_premium() {
        let params = OptionParams::default().with_strike(95.0);
        let exposure = Instrument::exposure(params).unwrap();
        let fwd = Instrument::forward(params).unwrap();
        assert_eq!(exposure.value(), 0.0);
        assert_eq!(exposure.payoff(Some(105.0)), 10.0);
        assert_eq!(exposure.profit(Some(105.0)), 10.0);
        assert_eq!(exposure.delta(), fwd.delta());
        assert_eq!(exposure.payoff(None), 5.0);
    }

    // ==========================================================
    // Updates
    // ==========================================================

    #[test]
    fn test_set_keeps_type() {
        let mut bond = Instrument::bond(OptionParams::default()).unwrap();
        bond.set_ttm(1.0).unwrap().set_rate(0.2).unwrap();
        assert_eq!(bond.kind(), InstrumentType::Bond);
        assert_relative_eq!(bond.value(), 81.873075, epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_update_rejected() {
        let fwd = Instrument::forward(OptionParams::default()).unwrap();
        assert!(matches!(
            fwd.with(Variable::Volatility, -1.0),
            Err(InstrumentError::Analytical(_))
        ));
    }
}
