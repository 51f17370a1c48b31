//! Merton structural credit model.
//!
//! Equity is a call on the firm's assets struck at the zero-coupon face
//! value of its debt; debt is the riskless zero less the matching put.
//! Given partial observations of the capital structure, the calibrator
//! recovers whichever of asset value and asset volatility is unknown by
//! bracketed root finding, then reprices every debt and credit metric from
//! the resolved pair.
//!
//! Units follow market quoting: rates, yields, dividend yield, coupon and
//! asset volatility are annualised percentages, credit spreads are basis
//! points.
//!
//! # Examples
//! ```
//! use pricer_models::calibration::{MertonCalibrator, MertonInput};
//!
//! let calibrator = MertonCalibrator::default();
//! let input = MertonInput::new(100.0, 1.0, 5.0)
//!     .with_equity_value(60.0)
//!     .with_asset_volatility(40.0);
//!
//! let out = calibrator.calibrate(&input).unwrap();
//! assert!((out.assets - 156.765966).abs() < 1e-5);
//! assert!((out.equity_value - 60.0).abs() < 1e-8);
//! ```

use pricer_core::math::solvers::{BrentSolver, SolverConfig};
use pricer_core::types::{common_len, Broadcast, BroadcastError};
use rayon::prelude::*;

use crate::analytical::{GeneralisedBlackScholes, OptionParams, OptionType, VOLATILITY_LOWER, VOLATILITY_UPPER};

use super::error::MertonError;
use super::rates::{ccrate, equiv, Frequency};

/// Default cap on assets as a multiple of the observed market value.
///
/// Bounds market-value leverage below at 0.1%.
pub const ASSET_MULTIPLE_CAP: f64 = 1000.0;

/// Merton calibrator settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MertonConfig {
    /// Lower end of the asset volatility bracket, as a fraction
    pub volatility_lower: f64,
    /// Upper end of the asset volatility bracket, as a fraction
    pub volatility_upper: f64,
    /// Cap on the asset bracket as a multiple of the observed market value
    pub asset_multiple_cap: f64,
    /// Root-finder tolerances
    pub solver: SolverConfig<f64>,
}

impl Default for MertonConfig {
    fn default() -> Self {
        Self {
            volatility_lower: VOLATILITY_LOWER,
            volatility_upper: VOLATILITY_UPPER,
            asset_multiple_cap: ASSET_MULTIPLE_CAP,
            solver: SolverConfig::default(),
        }
    }
}

impl MertonConfig {
    /// Checks bracket ordering and the asset cap.
    ///
    /// # Errors
    /// `MertonError::InvalidInput` naming the offending setting.
    pub fn validate(&self) -> Result<(), MertonError> {
        if !(self.volatility_lower > 0.0) {
            return Err(MertonError::InvalidInput {
                field: "volatility_lower",
                value: self.volatility_lower,
            });
        }
        if !(self.volatility_upper > self.volatility_lower) {
            return Err(MertonError::InvalidInput {
                field: "volatility_upper",
                value: self.volatility_upper,
            });
        }
        if !(self.asset_multiple_cap > 1.0) {
            return Err(MertonError::InvalidInput {
                field: "asset_multiple_cap",
                value: self.asset_multiple_cap,
            });
        }
        Ok(())
    }
}

/// One row of capital-structure observations.
///
/// Debt market information may be given as a value, a yield or a credit
/// spread; a spread overrides a yield, which overrides a value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MertonInput {
    /// Book value of debt
    pub debt_book_value: f64,
    /// Maturity of the zero-coupon debt in years
    pub maturity: f64,
    /// Risk-free rate (%)
    pub rate: f64,
    /// Dividend yield on assets (%)
    #[cfg_attr(feature = "serde", serde(default))]
    pub dividend_yield: f64,
    /// Compounding of every quoted rate
    #[cfg_attr(feature = "serde", serde(default))]
    pub frequency: Frequency,
    /// Market value of assets
    #[cfg_attr(feature = "serde", serde(default))]
    pub assets: Option<f64>,
    /// Asset volatility (%)
    #[cfg_attr(feature = "serde", serde(default))]
    pub asset_volatility: Option<f64>,
    /// Market value of equity
    #[cfg_attr(feature = "serde", serde(default))]
    pub equity_value: Option<f64>,
    /// Market value of debt
    #[cfg_attr(feature = "serde", serde(default))]
    pub debt_value: Option<f64>,
    /// Debt yield to maturity (%)
    #[cfg_attr(feature = "serde", serde(default))]
    pub debt_ytm: Option<f64>,
    /// Debt credit spread (bp)
    #[cfg_attr(feature = "serde", serde(default))]
    pub credit_spread: Option<f64>,
    /// Debt coupon (%), compounded to maturity; the risk-free rate when absent
    #[cfg_attr(feature = "serde", serde(default))]
    pub coupon: Option<f64>,
}

impl MertonInput {
    /// Row with only the debt terms; every market observation is unknown.
    pub fn new(debt_book_value: f64, maturity: f64, rate: f64) -> Self {
        Self {
            debt_book_value,
            maturity,
            rate,
            dividend_yield: 0.0,
            frequency: Frequency::Continuous,
            assets: None,
            asset_volatility: None,
            equity_value: None,
            debt_value: None,
            debt_ytm: None,
            credit_spread: None,
            coupon: None,
        }
    }

    /// Sets the dividend yield (%).
    pub fn with_dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = dividend_yield;
        self
    }

    /// Sets the compounding frequency.
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Sets the asset value.
    pub fn with_assets(mut self, assets: f64) -> Self {
        self.assets = Some(assets);
        self
    }

    /// Sets the asset volatility (%).
    pub fn with_asset_volatility(mut self, asset_volatility: f64) -> Self {
        self.asset_volatility = Some(asset_volatility);
        self
    }

    /// Sets the equity market value.
    pub fn with_equity_value(mut self, equity_value: f64) -> Self {
        self.equity_value = Some(equity_value);
        self
    }

    /// Sets the debt market value.
    pub fn with_debt_value(mut self, debt_value: f64) -> Self {
        self.debt_value = Some(debt_value);
        self
    }

    /// Sets the debt yield to maturity (%).
    pub fn with_debt_ytm(mut self, debt_ytm: f64) -> Self {
        self.debt_ytm = Some(debt_ytm);
        self
    }

    /// Sets the credit spread (bp).
    pub fn with_credit_spread(mut self, credit_spread: f64) -> Self {
        self.credit_spread = Some(credit_spread);
        self
    }

    /// Sets the coupon (%).
    pub fn with_coupon(mut self, coupon: f64) -> Self {
        self.coupon = Some(coupon);
        self
    }

    fn validate(&self) -> Result<(), MertonError> {
        let positive = [
            ("debt_book_value", Some(self.debt_book_value)),
            ("maturity", Some(self.maturity)),
            ("assets", self.assets),
            ("asset_volatility", self.asset_volatility),
            ("debt_value", self.debt_value),
        ];
        for (field, value) in positive {
            if let Some(value) = value {
                if !(value > 0.0) {
                    return Err(MertonError::InvalidInput { field, value });
                }
            }
        }
        if let Some(value) = self.equity_value {
            if !(value >= 0.0) {
                return Err(MertonError::InvalidInput {
                    field: "equity_value",
                    value,
                });
            }
        }
        if let Frequency::PerYear(0) = self.frequency {
            return Err(MertonError::InvalidInput {
                field: "frequency",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// Resolved capital structure and credit metrics for one row.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MertonOutput {
    /// Continuously compounded risk-free rate used
    pub rho: f64,
    /// Continuously compounded dividend yield used
    pub q: f64,
    /// Continuously compounded coupon used
    pub coupon: f64,
    /// Face value of the equivalent zero-coupon debt
    pub zero_face_value: f64,
    /// Market value of assets
    pub assets: f64,
    /// Asset volatility (%)
    pub asset_volatility: f64,
    /// Market value of equity
    pub equity_value: f64,
    /// Market value of debt
    pub debt_value: f64,
    /// Debt yield to maturity (%) at the input frequency
    pub debt_ytm: f64,
    /// Credit spread (bp)
    pub credit_spread: f64,
    /// Risk-neutral default probability (%)
    pub default_probability: f64,
    /// Intensity of default (% per year)
    pub default_intensity: f64,
    /// Equity delta with respect to assets
    pub call_delta: f64,
}

/// Column-oriented input: every field scalar or an array of one shared
/// length, expanded into rows.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MertonInputs {
    /// Book value of debt
    pub debt_book_value: Broadcast<f64>,
    /// Maturity in years
    pub maturity: Broadcast<f64>,
    /// Risk-free rate (%)
    pub rate: Broadcast<f64>,
    /// Dividend yield (%)
    pub dividend_yield: Broadcast<f64>,
    /// Compounding frequency
    pub frequency: Broadcast<Frequency>,
    /// Asset value
    pub assets: Broadcast<Option<f64>>,
    /// Asset volatility (%)
    pub asset_volatility: Broadcast<Option<f64>>,
    /// Equity market value
    pub equity_value: Broadcast<Option<f64>>,
    /// Debt market value
    pub debt_value: Broadcast<Option<f64>>,
    /// Debt yield to maturity (%)
    pub debt_ytm: Broadcast<Option<f64>>,
    /// Credit spread (bp)
    pub credit_spread: Broadcast<Option<f64>>,
    /// Coupon (%)
    pub coupon: Broadcast<Option<f64>>,
}

impl MertonInputs {
    /// Table with the given debt terms and no market observations.
    pub fn new(debt_book_value: Broadcast<f64>, maturity: Broadcast<f64>, rate: Broadcast<f64>) -> Self {
        Self {
            debt_book_value,
            maturity,
            rate,
            dividend_yield: Broadcast::Scalar(0.0),
            frequency: Broadcast::Scalar(Frequency::Continuous),
            assets: Broadcast::Scalar(None),
            asset_volatility: Broadcast::Scalar(None),
            equity_value: Broadcast::Scalar(None),
            debt_value: Broadcast::Scalar(None),
            debt_ytm: Broadcast::Scalar(None),
            credit_spread: Broadcast::Scalar(None),
            coupon: Broadcast::Scalar(None),
        }
    }

    /// Number of rows; 1 when every field is scalar.
    ///
    /// # Errors
    /// `MertonError::UnequalLengths` if array fields differ in length.
    pub fn row_count(&self) -> Result<usize, MertonError> {
        let len = common_len([
            self.debt_book_value.array_len(),
            self.maturity.array_len(),
            self.rate.array_len(),
            self.dividend_yield.array_len(),
            self.frequency.array_len(),
            self.assets.array_len(),
            self.asset_volatility.array_len(),
            self.equity_value.array_len(),
            self.debt_value.array_len(),
            self.debt_ytm.array_len(),
            self.credit_spread.array_len(),
            self.coupon.array_len(),
        ])?;
        Ok(len.unwrap_or(1))
    }

    /// Expands the table into rows.
    ///
    /// # Errors
    /// `MertonError::UnequalLengths` if array fields differ in length.
    pub fn rows(&self) -> Result<Vec<MertonInput>, MertonError> {
        let n = self.row_count()?;
        (0..n).map(|i| self.row(i, n)).collect()
    }

    fn row(&self, index: usize, len: usize) -> Result<MertonInput, MertonError> {
        fn at<T: Copy>(column: &Broadcast<T>, index: usize, len: usize) -> Result<T, BroadcastError> {
            column.get(index).ok_or(BroadcastError::IndexOutOfRange { index, len })
        }
        Ok(MertonInput {
            debt_book_value: at(&self.debt_book_value, index, len)?,
            maturity: at(&self.maturity, index, len)?,
            rate: at(&self.rate, index, len)?,
            dividend_yield: at(&self.dividend_yield, index, len)?,
            frequency: at(&self.frequency, index, len)?,
            assets: at(&self.assets, index, len)?,
            asset_volatility: at(&self.asset_volatility, index, len)?,
            equity_value: at(&self.equity_value, index, len)?,
            debt_value: at(&self.debt_value, index, len)?,
            debt_ytm: at(&self.debt_ytm, index, len)?,
            credit_spread: at(&self.credit_spread, index, len)?,
            coupon: at(&self.coupon, index, len)?,
        })
    }
}

/// Debt terms shared by every pricing call in one row.
#[derive(Debug, Clone, Copy)]
struct DebtTerms {
    zero_face_value: f64,
    maturity: f64,
    rho: f64,
    q: f64,
}

impl DebtTerms {
    fn params(&self, assets: f64, sigma: f64) -> OptionParams {
        OptionParams::new(assets, self.zero_face_value, sigma, self.maturity, self.rho, self.q)
    }

    fn riskless_value(&self) -> f64 {
        self.zero_face_value * (-self.rho * self.maturity).exp()
    }

    fn price(&self, assets: f64, sigma: f64, option_type: OptionType) -> f64 {
        GeneralisedBlackScholes::build(self.params(assets, sigma), option_type).value()
    }
}

/// The observed side of the capital structure used to pin down an unknown.
#[derive(Debug, Clone, Copy)]
enum MarketValue {
    Equity(f64),
    Debt(f64),
}

impl MarketValue {
    /// Option priced off assets and the value it must match.
    fn target(&self, terms: &DebtTerms) -> (OptionType, f64) {
        match *self {
            MarketValue::Equity(equity) => (OptionType::Call, equity),
            MarketValue::Debt(debt) => (OptionType::Put, terms.riskless_value() - debt),
        }
    }
}

/// Merton calibrator.
#[derive(Debug, Clone)]
pub struct MertonCalibrator {
    config: MertonConfig,
    solver: BrentSolver<f64>,
}

impl Default for MertonCalibrator {
    fn default() -> Self {
        Self::new(MertonConfig::default())
    }
}

impl MertonCalibrator {
    /// Creates a calibrator.
    pub fn new(config: MertonConfig) -> Self {
        let solver = BrentSolver::new(config.solver);
        Self { config, solver }
    }

    /// Settings in use.
    pub fn config(&self) -> &MertonConfig {
        &self.config
    }

    /// Calibrates one row.
    ///
    /// When both equity and debt market values are known, assets are their
    /// sum and asset volatility is calibrated. When asset volatility and one
    /// market value are known, assets are calibrated and the other market
    /// value is derived.
    ///
    /// # Errors
    /// - `MertonError::MissingAssetsAndVolatility` / `MissingMarketValue`
    ///   when the row does not determine the unknowns
    /// - `MertonError::Solver` when no root lies in the search bracket
    /// - `MertonError::InvalidInput` / `Analytical` for inputs outside
    ///   the model domain
    pub fn calibrate(&self, input: &MertonInput) -> Result<MertonOutput, MertonError> {
        input.validate()?;
        let frequency = input.frequency;
        let rho = ccrate(input.rate, frequency);
        let q = ccrate(input.dividend_yield, frequency);
        let coupon = input.coupon.map_or(rho, |c| ccrate(c, frequency));
        let maturity = input.maturity;
        let terms = DebtTerms {
            zero_face_value: input.debt_book_value * (coupon * maturity).exp(),
            maturity,
            rho,
            q,
        };

        let mut debt_value = input.debt_value;
        if let Some(ytm) = input.debt_ytm {
            debt_value = Some(terms.zero_face_value * (-ccrate(ytm, frequency) * maturity).exp());
        }
        if let Some(spread) = input.credit_spread {
            let yield_rate = ccrate(input.rate + spread / 100.0, frequency);
            debt_value = Some(terms.zero_face_value * (-yield_rate * maturity).exp());
        }

        let mut assets = input.assets;
        if let (Some(debt), Some(equity)) = (debt_value, input.equity_value) {
            assets = Some(debt + equity);
        }

        let market = match (input.equity_value, debt_value) {
            (Some(equity), _) => Some(MarketValue::Equity(equity)),
            (None, Some(debt)) => Some(MarketValue::Debt(debt)),
            (None, None) => None,
        };

        let (assets, sigma) = match (assets, input.asset_volatility) {
            (Some(assets), Some(volatility)) => (assets, volatility / 100.0),
            (None, None) => return Err(MertonError::MissingAssetsAndVolatility),
            (Some(assets), None) => {
                let market = market.ok_or(MertonError::MissingMarketValue)?;
                (assets, self.solve_volatility(&terms, assets, market)?)
            }
            (None, Some(volatility)) => {
                let market = market.ok_or(MertonError::MissingMarketValue)?;
                let sigma = volatility / 100.0;
                (self.solve_assets(&terms, sigma, market)?, sigma)
            }
        };

        let put = GeneralisedBlackScholes::put(terms.params(assets, sigma))?;
        let debt_value = terms.riskless_value() - put.value();
        let debt_ytm = equiv(-(debt_value / terms.zero_face_value).ln() / maturity, frequency);
        let default_probability = put.cdf_d2() * 100.0;

        let output = MertonOutput {
            rho,
            q,
            coupon,
            zero_face_value: terms.zero_face_value,
            assets,
            asset_volatility: sigma * 100.0,
            equity_value: assets - debt_value,
            debt_value,
            debt_ytm,
            credit_spread: (debt_ytm - input.rate) * 100.0,
            default_probability,
            default_intensity: -100.0 * (-default_probability / 100.0).ln_1p() / maturity,
            call_delta: 1.0 + put.delta(),
        };
        tracing::debug!(
            assets = output.assets,
            asset_volatility = output.asset_volatility,
            debt_value = output.debt_value,
            default_probability = output.default_probability,
            "Merton row calibrated"
        );
        Ok(output)
    }

    /// Calibrates rows in parallel; each row succeeds or fails on its own.
    pub fn calibrate_batch(&self, inputs: &[MertonInput]) -> Vec<Result<MertonOutput, MertonError>> {
        let results: Vec<_> = inputs.par_iter().map(|input| self.calibrate(input)).collect();
        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            tracing::warn!(rows = inputs.len(), failed, "Merton batch had failing rows");
        }
        results
    }

    /// Expands a column table and calibrates every row.
    ///
    /// # Errors
    /// `MertonError::UnequalLengths` if the table cannot be expanded; row
    /// failures are reported per row.
    pub fn calibrate_table(
        &self,
        table: &MertonInputs,
    ) -> Result<Vec<Result<MertonOutput, MertonError>>, MertonError> {
        Ok(self.calibrate_batch(&table.rows()?))
    }

    fn solve_volatility(&self, terms: &DebtTerms, assets: f64, market: MarketValue) -> Result<f64, MertonError> {
        let (option_type, target) = market.target(terms);
        terms.params(assets, self.config.volatility_lower).validate()?;
        tracing::debug!(assets, target, ?option_type, "Solving for asset volatility");

        let objective = |sigma: f64| terms.price(assets, sigma, option_type) - target;
        self.solver
            .find_root(objective, self.config.volatility_lower, self.config.volatility_upper)
            .map_err(|source| {
                tracing::warn!(assets, target, error = %source, "Asset volatility bracket failed");
                MertonError::Solver {
                    quantity: "asset volatility",
                    source,
                }
            })
    }

    fn solve_assets(&self, terms: &DebtTerms, sigma: f64, market: MarketValue) -> Result<f64, MertonError> {
        let (option_type, target) = market.target(terms);
        let objective = |assets: f64| terms.price(assets, sigma, option_type) - target;

        let (lower, upper) = match market {
            MarketValue::Equity(equity) => {
                // Equity is worth at most the assets, so assets ≥ equity. The
                // upper end doubles until equity is exceeded.
                let cap = (equity + terms.zero_face_value) * self.config.asset_multiple_cap;
                let mut upper = equity + terms.zero_face_value;
                while objective(upper) < 0.0 && upper * 2.0 <= cap {
                    upper *= 2.0;
                }
                (equity, upper)
            }
            MarketValue::Debt(debt) => (debt, debt * self.config.asset_multiple_cap),
        };
        terms.params(lower, sigma).validate()?;
        tracing::debug!(lower, upper, target, ?option_type, "Solving for asset value");

        self.solver.find_root(objective, lower, upper).map_err(|source| {
            tracing::warn!(lower, upper, target, error = %source, "Asset value bracket failed");
            MertonError::Solver {
                quantity: "asset value",
                source,
            }
        })
    }
}
