//! Market and contract inputs to the closed-form formulas.

use super::error::AnalyticalError;
use std::fmt;

/// Option direction used inside the pricing formulas.
///
/// The sign (+1 call, −1 put) enters the formulas directly, so one
/// expression covers both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionType {
    /// Right to buy at the strike.
    #[default]
    Call,
    /// Right to sell at the strike.
    Put,
}

impl OptionType {
    /// +1 for a call, −1 for a put.
    #[inline]
    pub fn sign(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

/// A perturbable pricing input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    /// Underlying price S
    Spot,
    /// Strike K
    Strike,
    /// Annualised volatility σ
    Volatility,
    /// Time to maturity in years
    Ttm,
    /// Domestic continuously compounded rate r
    Rate,
    /// Foreign rate or dividend yield q
    DividendYield,
}

impl Variable {
    /// Every variable, in constructor order.
    pub const ALL: [Variable; 6] = [
        Variable::Spot,
        Variable::Strike,
        Variable::Volatility,
        Variable::Ttm,
        Variable::Rate,
        Variable::DividendYield,
    ];

    /// Conventional short name.
    pub fn name(&self) -> &'static str {
        match self {
            Variable::Spot => "S",
            Variable::Strike => "K",
            Variable::Volatility => "sigma",
            Variable::Ttm => "ttm",
            Variable::Rate => "r",
            Variable::DividendYield => "q",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inputs to the generalised Black-Scholes formulas.
///
/// The default is an at-the-money one-month contract: S = K = 100,
/// σ = 20%, ttm = 1/12, r = 5%, q = 2%.
///
/// # Examples
/// ```
/// use pricer_models::analytical::{OptionParams, Variable};
///
/// let params = OptionParams::default().with_spot(101.0).with_ttm(1.0);
/// assert_eq!(params.get(Variable::Spot), 101.0);
/// assert_eq!(params.with(Variable::Rate, 0.01).rate, 0.01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OptionParams {
    /// Underlying price S
    pub spot: f64,
    /// Strike K
    pub strike: f64,
    /// Annualised volatility σ
    pub volatility: f64,
    /// Time to maturity in years
    pub ttm: f64,
    /// Domestic continuously compounded rate r
    pub rate: f64,
    /// Foreign rate or dividend yield q
    pub dividend_yield: f64,
}

impl Default for OptionParams {
    fn default() -> Self {
        Self {
            spot: 100.0,
            strike: 100.0,
            volatility: 0.2,
            ttm: 1.0 / 12.0,
            rate: 0.05,
            dividend_yield: 0.02,
        }
    }
}

impl OptionParams {
    /// Creates a parameter set from all six inputs.
    pub fn new(spot: f64, strike: f64, volatility: f64, ttm: f64, rate: f64, dividend_yield: f64) -> Self {
        Self {
            spot,
            strike,
            volatility,
            ttm,
            rate,
            dividend_yield,
        }
    }

    /// Reads one input.
    #[inline]
    pub fn get(&self, variable: Variable) -> f64 {
        match variable {
            Variable::Spot => self.spot,
            Variable::Strike => self.strike,
            Variable::Volatility => self.volatility,
            Variable::Ttm => self.ttm,
            Variable::Rate => self.rate,
            Variable::DividendYield => self.dividend_yield,
        }
    }

    /// Returns a copy with one input replaced.
    #[inline]
    pub fn with(mut self, variable: Variable, value: f64) -> Self {
        match variable {
            Variable::Spot => self.spot = value,
            Variable::Strike => self.strike = value,
            Variable::Volatility => self.volatility = value,
            Variable::Ttm => self.ttm = value,
            Variable::Rate => self.rate = value,
            Variable::DividendYield => self.dividend_yield = value,
        }
        self
    }

    /// Sets the underlying price.
    pub fn with_spot(self, spot: f64) -> Self {
        self.with(Variable::Spot, spot)
    }

    /// Sets the strike.
    pub fn with_strike(self, strike: f64) -> Self {
        self.with(Variable::Strike, strike)
    }

    /// Sets the volatility.
    pub fn with_volatility(self, volatility: f64) -> Self {
        self.with(Variable::Volatility, volatility)
    }

    /// Sets the time to maturity.
    pub fn with_ttm(self, ttm: f64) -> Self {
        self.with(Variable::Ttm, ttm)
    }

    /// Sets the domestic rate.
    pub fn with_rate(self, rate: f64) -> Self {
        self.with(Variable::Rate, rate)
    }

    /// Sets the dividend yield.
    pub fn with_dividend_yield(self, dividend_yield: f64) -> Self {
        self.with(Variable::DividendYield, dividend_yield)
    }

    /// Checks the inputs against the domain of the formulas.
    ///
    /// # Errors
    /// - `AnalyticalError::NotANumber` if any input is NaN
    /// - `AnalyticalError::InvalidSpot` / `InvalidStrike` for negative prices
    /// - `AnalyticalError::InvalidVolatility` if σ < 0
    /// - `AnalyticalError::InvalidExpiry` if ttm < 0
    pub fn validate(&self) -> Result<(), AnalyticalError> {
        if let Some(variable) = Variable::ALL.iter().find(|v| self.get(**v).is_nan()) {
            return Err(AnalyticalError::NotANumber {
                parameter: variable.name(),
            });
        }
        if self.spot < 0.0 {
            return Err(AnalyticalError::InvalidSpot { spot: self.spot });
        }
        if self.strike < 0.0 {
            return Err(AnalyticalError::InvalidStrike {
                strike: self.strike,
            });
        }
        if self.volatility < 0.0 {
            return Err(AnalyticalError::InvalidVolatility {
                volatility: self.volatility,
            });
        }
        if self.ttm < 0.0 {
            return Err(AnalyticalError::InvalidExpiry { ttm: self.ttm });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = OptionParams::default();
        assert_eq!((p.spot, p.strike, p.volatility), (100.0, 100.0, 0.2));
        assert_eq!(p.ttm, 1.0 / 12.0);
        assert_eq!((p.rate, p.dividend_yield), (0.05, 0.02));
    }

    #[test]
    fn test_get_with_roundtrip_every_variable() {
        let base = OptionParams::default();
        for (i, variable) in Variable::ALL.iter().enumerate() {
            let value = 0.5 + i as f64;
            let changed = base.with(*variable, value);
            assert_eq!(changed.get(*variable), value);
            for other in Variable::ALL.iter().filter(|v| *v != variable) {
                assert_eq!(changed.get(*other), base.get(*other));
            }
        }
    }

    #[test]
    fn test_validate_accepts_degenerate_inputs() {
        let p = OptionParams::default().with_volatility(0.0).with_ttm(0.0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects() {
        let p = OptionParams::default();
        assert_eq!(
            p.with_volatility(-0.1).validate(),
            Err(AnalyticalError::InvalidVolatility { volatility: -0.1 })
        );
        assert_eq!(
            p.with_ttm(-1.0).validate(),
            Err(AnalyticalError::InvalidExpiry { ttm: -1.0 })
        );
        assert_eq!(
            p.with_rate(f64::NAN).validate(),
            Err(AnalyticalError::NotANumber { parameter: "r" })
        );
        assert!(p.with_spot(-1.0).validate().is_err());
        assert!(p.with_strike(-1.0).validate().is_err());
    }

    #[test]
    fn test_option_type_sign() {
        assert_eq!(OptionType::Call.sign(), 1.0);
        assert_eq!(OptionType::Put.sign(), -1.0);
        assert_eq!(OptionType::default(), OptionType::Call);
    }

    #[test]
    fn test_variable_display() {
        assert_eq!(Variable::Volatility.to_string(), "sigma");
        assert_eq!(Variable::DividendYield.to_string(), "q");
    }
}
