//! Portfolio aggregation.
//!
//! A portfolio holds a sequence of legs and one weight per leg. Quantities
//! reduce over the leg axis by a dot product with the weights. Payoff and
//! profit also take a scenario axis of terminal prices: each scenario is
//! applied to every leg and reduced separately, so a scalar scenario gives
//! a scalar and an array of scenarios gives one value per scenario.

use pricer_core::types::{Broadcast, BroadcastError};
use pricer_models::analytical::{Measure, Variable};
use pricer_models::instruments::{BatchParams, Instrument, InstrumentBatch, InstrumentType};

use super::error::PortfolioError;

/// Weighted collection of instruments.
///
/// # Examples
/// ```
/// use pricer_core::types::Broadcast;
/// use pricer_models::analytical::OptionParams;
/// use pricer_models::instruments::{BatchParams, InstrumentType};
/// use pricer_risk::portfolio::OptionPortfolio;
///
/// // Two calls struck at 99 and 101, long two of the first
/// let mut params = BatchParams::from(OptionParams::new(100.0, 100.0, 0.2, 1.0, 0.01, 0.0));
/// params.strike = vec![99.0, 101.0].into();
/// let portfolio =
///     OptionPortfolio::from_broadcast(params, InstrumentType::Call.into(), vec![2.0, 1.0].into()).unwrap();
///
/// assert!((portfolio.value() - 25.804862).abs() < 1e-6);
/// let profits = portfolio.profit(Some(&Broadcast::from(vec![90.0, 110.0])));
/// assert_eq!(profits.to_vec().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OptionPortfolio {
    legs: Vec<Instrument>,
    weights: Vec<f64>,
}

impl OptionPortfolio {
    /// Creates a portfolio from legs and their weights.
    ///
    /// # Errors
    /// - `PortfolioError::EmptyPortfolio` with no legs
    /// - `PortfolioError::WeightMismatch` if the counts differ
    pub fn new(legs: Vec<Instrument>, weights: Vec<f64>) -> Result<Self, PortfolioError> {
        if legs.is_empty() {
            return Err(PortfolioError::EmptyPortfolio);
        }
        if legs.len() != weights.len() {
            return Err(PortfolioError::WeightMismatch {
                legs: legs.len(),
                weights: weights.len(),
            });
        }
        Ok(Self { legs, weights })
    }

    /// Creates a portfolio from a batch, one leg per element.
    ///
    /// A scalar weight applies to every leg.
    pub fn from_batch(batch: &InstrumentBatch, weights: Broadcast<f64>) -> Result<Self, PortfolioError> {
        let legs = batch.instruments();
        let weights = weights.expand(legs.len()).map_err(|err| match err {
            BroadcastError::ShapeMismatch { expected, found } => PortfolioError::WeightMismatch {
                legs: expected,
                weights: found,
            },
            other => other.into(),
        })?;
        Self::new(legs, weights)
    }

    /// Creates a portfolio from broadcast inputs and types.
    ///
    /// # Errors
    /// Shape or validation errors from the inputs, or a weight mismatch.
    pub fn from_broadcast(
        params: BatchParams,
        kinds: Broadcast<InstrumentType>,
        weights: Broadcast<f64>,
    ) -> Result<Self, PortfolioError> {
        let batch = InstrumentBatch::new(params, kinds)?;
        Self::from_batch(&batch, weights)
    }

    /// Legs in order.
    pub fn legs(&self) -> &[Instrument] {
        &self.legs
    }

    /// Weights in leg order.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of legs.
    pub fn len(&self) -> usize {
        self.legs.len()
    }

    /// Always false; a portfolio has at least one leg.
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    // ==========================================================
    // Reductions
    // ==========================================================

    /// Per-leg quantity, unweighted.
    pub fn leg_measures(&self, measure: Measure) -> Vec<f64> {
        self.legs.iter().map(|leg| leg.measure(measure)).collect()
    }

    /// Weighted sum of a per-leg quantity.
    pub fn measure(&self, measure: Measure) -> f64 {
        self.weighted(|leg| leg.measure(measure))
    }

    fn weighted(&self, f: impl Fn(&Instrument) -> f64) -> f64 {
        self.legs.iter().zip(&self.weights).map(|(leg, w)| w * f(leg)).sum()
    }

    /// Terminal payoff per scenario.
    ///
    /// `None` evaluates every leg at its own current spot and returns a
    /// scalar. A scalar scenario returns a scalar; an array returns one
    /// aggregated payoff per scenario.
    pub fn payoff(&self, terminal: Option<&Broadcast<f64>>) -> Broadcast<f64> {
        match terminal {
            None => Broadcast::Scalar(self.weighted(|leg| leg.payoff(None))),
            Some(scenarios) => scenarios.map(|st| self.weighted(|leg| leg.payoff(Some(st)))),
        }
    }

    /// Payoff less today's value, per scenario.
    pub fn profit(&self, terminal: Option<&Broadcast<f64>>) -> Broadcast<f64> {
        let value = self.value();
        self.payoff(terminal).map(|p| p - value)
    }

    /// Negative of [`value`](Self::value), for minimisers.
    pub fn negated_value(&self) -> f64 {
        -self.value()
    }

    /// Negative of [`payoff`](Self::payoff), for minimisers.
    pub fn negated_payoff(&self, terminal: Option<&Broadcast<f64>>) -> Broadcast<f64> {
        self.payoff(terminal).map(|p| -p)
    }

    /// Negative of [`profit`](Self::profit), for minimisers.
    pub fn negated_profit(&self, terminal: Option<&Broadcast<f64>>) -> Broadcast<f64> {
        self.profit(terminal).map(|p| -p)
    }

    /// Present value.
    pub fn value(&self) -> f64 {
        self.measure(Measure::Value)
    }

    /// Portfolio delta.
    pub fn delta(&self) -> f64 {
        self.measure(Measure::Delta)
    }

    /// Portfolio forward delta.
    pub fn delta_fwd(&self) -> f64 {
        self.measure(Measure::DeltaFwd)
    }

    /// Portfolio driftless delta.
    pub fn delta_driftless(&self) -> f64 {
        self.measure(Measure::DeltaDriftless)
    }

    /// Portfolio dual delta.
    pub fn delta_dual(&self) -> f64 {
        self.measure(Measure::DeltaDual)
    }

    /// Portfolio theta per year.
    pub fn theta(&self) -> f64 {
        self.measure(Measure::Theta)
    }

    /// Portfolio theta per day.
    pub fn theta_daily(&self) -> f64 {
        self.measure(Measure::ThetaDaily)
    }

    /// Portfolio vega.
    pub fn vega(&self) -> f64 {
        self.measure(Measure::Vega)
    }

    /// Portfolio vega per volatility point.
    pub fn vega_percent(&self) -> f64 {
        self.measure(Measure::VegaPercent)
    }

    /// Portfolio domestic rho.
    pub fn rho_d(&self) -> f64 {
        self.measure(Measure::RhoD)
    }

    /// Portfolio foreign rho.
    pub fn rho_f(&self) -> f64 {
        self.measure(Measure::RhoF)
    }

    /// Portfolio gamma.
    pub fn gamma(&self) -> f64 {
        self.measure(Measure::Gamma)
    }

    /// Portfolio dual gamma.
    pub fn gamma_dual(&self) -> f64 {
        self.measure(Measure::GammaDual)
    }

    /// Portfolio charm.
    pub fn charm(&self) -> f64 {
        self.measure(Measure::Charm)
    }

    /// Portfolio vanna.
    pub fn vanna(&self) -> f64 {
        self.measure(Measure::Vanna)
    }

    /// Portfolio volga.
    pub fn volga(&self) -> f64 {
        self.measure(Measure::Volga)
    }

    /// Portfolio color.
    pub fn color(&self) -> f64 {
        self.measure(Measure::Color)
    }

    // ==========================================================
    // Updates
    // ==========================================================

    /// Replaces one input on every leg.
    ///
    /// A scalar applies to all legs; an array gives one value per leg. On
    /// error no leg is changed.
    ///
    /// # Errors
    /// - `PortfolioError::Shape` if an array does not match the leg count
    /// - `PortfolioError::Instrument` if any leg rejects its value
    pub fn set(&mut self, variable: Variable, values: Broadcast<f64>) -> Result<&mut Self, PortfolioError> {
        let values = values.expand(self.legs.len())?;
        let legs = self
            .legs
            .iter()
            .zip(values)
            .map(|(leg, value)| leg.with(variable, value))
            .collect::<Result<Vec<_>, _>>()?;
        self.legs = legs;
        Ok(self)
    }

    /// Replaces the underlying price on every leg.
    pub fn set_spot(&mut self, spot: Broadcast<f64>) -> Result<&mut Self, PortfolioError> {
        self.set(Variable::Spot, spot)
    }

    /// Replaces the strike on every leg.
    pub fn set_strike(&mut self, strike: Broadcast<f64>) -> Result<&mut Self, PortfolioError> {
        self.set(Variable::Strike, strike)
    }

    /// Replaces the volatility on every leg.
    pub fn set_volatility(&mut self, volatility: Broadcast<f64>) -> Result<&mut Self, PortfolioError> {
        self.set(Variable::Volatility, volatility)
    }

    /// Replaces the time to maturity on every leg.
    pub fn set_ttm(&mut self, ttm: Broadcast<f64>) -> Result<&mut Self, PortfolioError> {
        self.set(Variable::Ttm, ttm)
    }

    /// Replaces the domestic rate on every leg.
    pub fn set_rate(&mut self, rate: Broadcast<f64>) -> Result<&mut Self, PortfolioError> {
        self.set(Variable::Rate, rate)
    }

    /// Replaces the dividend yield on every leg.
    pub fn set_dividend_yield(&mut self, dividend_yield: Broadcast<f64>) -> Result<&mut Self, PortfolioError> {
        self.set(Variable::DividendYield, dividend_yield)
    }

    /// Replaces the strike of one leg.
    ///
    /// # Errors
    /// - `PortfolioError::LegOutOfRange` for an index past the end
    /// - `PortfolioError::Instrument` if the leg rejects the strike
    pub fn set_leg_strike(&mut self, index: usize, strike: f64) -> Result<&mut Self, PortfolioError> {
        let len = self.legs.len();
        let leg = self
            .legs
            .get_mut(index)
            .ok_or(PortfolioError::LegOutOfRange { index, len })?;
        leg.set_strike(strike)?;
        Ok(self)
    }

    /// Replaces the weight of one leg.
    pub fn set_weight(&mut self, index: usize, weight: f64) -> Result<&mut Self, PortfolioError> {
        let len = self.weights.len();
        let slot = self
            .weights
            .get_mut(index)
            .ok_or(PortfolioError::LegOutOfRange { index, len })?;
        *slot = weight;
        Ok(self)
    }
}
