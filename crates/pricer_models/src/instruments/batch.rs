//! Vectorised instruments over broadcast inputs.
//!
//! An [`InstrumentBatch`] prices many instruments at once. Every numeric
//! input and the instrument type may be a scalar or an array; arrays must
//! share one length. The type masks are fixed at construction and each
//! quantity is assembled branch-free with [`select`]: the option, bond,
//! forward and exposure closed forms are evaluated for every element and
//! the masks keep the right one.

use pricer_core::math::select;
use pricer_core::types::{common_len, Broadcast};

use crate::analytical::{GeneralisedBlackScholes, Measure, OptionParams, Variable};

use super::error::InstrumentError;
use super::instrument::{closed_form, terminal_payoff, Instrument};
use super::instrument_type::InstrumentType;

/// Broadcast counterpart of [`OptionParams`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchParams {
    /// Underlying price S
    pub spot: Broadcast<f64>,
    /// Strike K
    pub strike: Broadcast<f64>,
    /// Annualised volatility σ
    pub volatility: Broadcast<f64>,
    /// Time to maturity in years
    pub ttm: Broadcast<f64>,
    /// Domestic rate r
    pub rate: Broadcast<f64>,
    /// Dividend yield q
    pub dividend_yield: Broadcast<f64>,
}

impl From<OptionParams> for BatchParams {
    fn from(p: OptionParams) -> Self {
        Self {
            spot: p.spot.into(),
            strike: p.strike.into(),
            volatility: p.volatility.into(),
            ttm: p.ttm.into(),
            rate: p.rate.into(),
            dividend_yield: p.dividend_yield.into(),
        }
    }
}

impl Default for BatchParams {
    fn default() -> Self {
        OptionParams::default().into()
    }
}

impl BatchParams {
    /// One field.
    pub fn get(&self, variable: Variable) -> &Broadcast<f64> {
        match variable {
            Variable::Spot => &self.spot,
            Variable::Strike => &self.strike,
            Variable::Volatility => &self.volatility,
            Variable::Ttm => &self.ttm,
            Variable::Rate => &self.rate,
            Variable::DividendYield => &self.dividend_yield,
        }
    }

    /// Copy with one field replaced.
    pub fn with(&self, variable: Variable, values: Broadcast<f64>) -> Self {
        let mut next = self.clone();
        match variable {
            Variable::Spot => next.spot = values,
            Variable::Strike => next.strike = values,
            Variable::Volatility => next.volatility = values,
            Variable::Ttm => next.ttm = values,
            Variable::Rate => next.rate = values,
            Variable::DividendYield => next.dividend_yield = values,
        }
        next
    }

    /// Array lengths of every field, in [`Variable::ALL`] order.
    fn lens(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        Variable::ALL.iter().map(|v| self.get(*v).array_len())
    }

    /// Scalar inputs of element `index`; `None` past the end of an array.
    pub fn at(&self, index: usize) -> Option<OptionParams> {
        Some(OptionParams::new(
            self.spot.get(index)?,
            self.strike.get(index)?,
            self.volatility.get(index)?,
            self.ttm.get(index)?,
            self.rate.get(index)?,
            self.dividend_yield.get(index)?,
        ))
    }
}

/// Instruments priced element-wise over broadcast inputs.
///
/// # Examples
/// ```
/// use pricer_core::types::Broadcast;
/// use pricer_models::analytical::{Measure, OptionParams};
/// use pricer_models::instruments::{BatchParams, InstrumentBatch, InstrumentType};
///
/// let params = BatchParams::from(OptionParams::default().with_ttm(1.0));
/// let kinds = Broadcast::from(vec![InstrumentType::Call, InstrumentType::Bond, InstrumentType::Forward]);
/// let batch = InstrumentBatch::new(params, kinds).unwrap();
///
/// let delta = batch.measure(Measure::Delta).unwrap().to_vec();
/// assert!(delta[0] > 0.0 && delta[0] < 1.0);
/// assert_eq!(delta[1], 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentBatch {
    params: BatchParams,
    kinds: Broadcast<InstrumentType>,
    len: Option<usize>,
    is_option: Broadcast<bool>,
    is_bond: Broadcast<bool>,
    is_forward: Broadcast<bool>,
    models: Broadcast<GeneralisedBlackScholes>,
}

impl InstrumentBatch {
    /// Builds a batch, resolving one common length.
    ///
    /// # Errors
    /// - `InstrumentError::Shape` if array fields differ in length
    /// - `InstrumentError::Analytical` if any element fails validation
    pub fn new(params: BatchParams, kinds: Broadcast<InstrumentType>) -> Result<Self, InstrumentError> {
        let len = common_len(params.lens().chain([kinds.array_len()]))?;
        let models = build_models(&params, &kinds, len)?;
        Ok(Self {
            is_option: kinds.map(|k| k.is_option()),
            is_bond: kinds.map(|k| k == InstrumentType::Bond),
            is_forward: kinds.map(|k| k == InstrumentType::Forward),
            params,
            kinds,
            len,
            models,
        })
    }

    /// Common array length, `None` when every field is scalar.
    #[inline]
    pub fn array_len(&self) -> Option<usize> {
        self.len
    }

    /// Inputs.
    pub fn params(&self) -> &BatchParams {
        &self.params
    }

    /// Instrument types.
    pub fn kinds(&self) -> &Broadcast<InstrumentType> {
        &self.kinds
    }

    /// Expands the batch into one [`Instrument`] per element.
    pub fn instruments(&self) -> Vec<Instrument> {
        let n = self.len.unwrap_or(1);
        (0..n)
            .filter_map(|i| Some(Instrument::from_model(self.models.get(i)?, self.kinds.get(i)?)))
            .collect()
    }

    // ==========================================================
    // Updates
    // ==========================================================

    /// Replaces one input field for every element.
    ///
    /// Instrument types and their masks are untouched. On error the batch
    /// is left unchanged.
    ///
    /// # Errors
    /// As [`InstrumentBatch::new`].
    pub fn set(&mut self, variable: Variable, values: Broadcast<f64>) -> Result<&mut Self, InstrumentError> {
        let params = self.params.with(variable, values);
        let len = common_len(params.lens().chain([self.kinds.array_len()]))?;
        let models = build_models(&params, &self.kinds, len)?;
        self.params = params;
        self.len = len;
        self.models = models;
        Ok(self)
    }

    /// Replaces the underlying price.
    pub fn set_spot(&mut self, spot: Broadcast<f64>) -> Result<&mut Self, InstrumentError> {
        self.set(Variable::Spot, spot)
    }

    /// Replaces the strike.
    pub fn set_strike(&mut self, strike: Broadcast<f64>) -> Result<&mut Self, InstrumentError> {
        self.set(Variable::Strike, strike)
    }

    /// Replaces the volatility.
    pub fn set_volatility(&mut self, volatility: Broadcast<f64>) -> Result<&mut Self, InstrumentError> {
        self.set(Variable::Volatility, volatility)
    }

    /// Replaces the time to maturity.
    pub fn set_ttm(&mut self, ttm: Broadcast<f64>) -> Result<&mut Self, InstrumentError> {
        self.set(Variable::Ttm, ttm)
    }

    /// Replaces the domestic rate.
    pub fn set_rate(&mut self, rate: Broadcast<f64>) -> Result<&mut Self, InstrumentError> {
        self.set(Variable::Rate, rate)
    }

    /// Replaces the dividend yield.
    pub fn set_dividend_yield(&mut self, dividend_yield: Broadcast<f64>) -> Result<&mut Self, InstrumentError> {
        self.set(Variable::DividendYield, dividend_yield)
    }

    /// Replaces the strike of a single element.
    ///
    /// # Errors
    /// `InstrumentError::Shape` for an index past the end.
    pub fn set_strike_at(&mut self, index: usize, strike: f64) -> Result<&mut Self, InstrumentError> {
        let strikes = self.params.strike.replace_at(self.len, index, strike)?;
        self.set(Variable::Strike, strikes)
    }

    // ==========================================================
    // Quantities
    // ==========================================================

    /// Evaluates a named quantity for every element.
    pub fn measure(&self, measure: Measure) -> Result<Broadcast<f64>, InstrumentError> {
        let option_path = self.models.map(|m| m.measure(measure));
        let bond_path = self.models.map(|m| closed_form(InstrumentType::Bond, &m, measure));
        let forward_path = self.models.map(|m| closed_form(InstrumentType::Forward, &m, measure));
        let exposure_path = self.models.map(|m| closed_form(InstrumentType::Exposure, &m, measure));

        let linear = select(&self.is_forward, &forward_path, &exposure_path)?;
        let non_option = select(&self.is_bond, &bond_path, &linear)?;
        Ok(select(&self.is_option, &option_path, &non_option)?)
    }

    /// Terminal payoff per element; `terminal` broadcasts along the elements.
    ///
    /// # Errors
    /// `InstrumentError::Shape` if `terminal` does not match the batch length.
    pub fn payoff(&self, terminal: Option<&Broadcast<f64>>) -> Result<Broadcast<f64>, InstrumentError> {
        let terminal = match terminal {
            Some(st) => st.clone(),
            None => self.params.spot.clone(),
        };
        let len = common_len([self.len, terminal.array_len()])?;
        let models = match (len, &self.models) {
            (Some(n), Broadcast::Scalar(m)) => Broadcast::Array(vec![*m; n]),
            _ => self.models.clone(),
        };

        let option_path = models.zip_with(&terminal, |m, st| m.payoff(Some(st)))?;
        let bond_path = models.map(|m| terminal_payoff(InstrumentType::Bond, &m, None));
        let linear_path = models.zip_with(&terminal, |m, st| {
            terminal_payoff(InstrumentType::Forward, &m, Some(st))
        })?;

        let non_option = select(&self.is_bond, &bond_path, &linear_path)?;
        Ok(select(&self.is_option, &option_path, &non_option)?)
    }

    /// Payoff less today's value, per element.
    pub fn profit(&self, terminal: Option<&Broadcast<f64>>) -> Result<Broadcast<f64>, InstrumentError> {
        let payoff = self.payoff(terminal)?;
        let value = self.measure(Measure::Value)?;
        Ok(payoff.zip_with(&value, |p, v| p - v)?)
    }
}

fn build_models(
    params: &BatchParams,
    kinds: &Broadcast<InstrumentType>,
    len: Option<usize>,
) -> Result<Broadcast<GeneralisedBlackScholes>, InstrumentError> {
    let model_at = |i: usize| -> Result<GeneralisedBlackScholes, InstrumentError> {
        // Lengths are resolved, so every field has element `i`.
        let p = params.at(i).ok_or(pricer_core::types::BroadcastError::IndexOutOfRange {
            index: i,
            len: len.unwrap_or(1),
        })?;
        let kind = kinds.get(i).unwrap_or_default();
        Ok(GeneralisedBlackScholes::new(p, kind.option_type())?)
    };

    match len {
        None => Ok(Broadcast::Scalar(model_at(0)?)),
        Some(n) => Ok(Broadcast::Array((0..n).map(model_at).collect::<Result<_, _>>()?)),
    }
}
