//! Compounding conventions.
//!
//! Quoted rates are annualised percentages compounded at a [`Frequency`];
//! the pricing model works with continuously compounded fractions.

use std::fmt;

/// Compounding frequency of a quoted rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Frequency {
    /// Continuous compounding
    #[default]
    Continuous,
    /// Compounded n times a year
    PerYear(u32),
}

impl Frequency {
    /// Annual compounding.
    pub const ANNUAL: Frequency = Frequency::PerYear(1);
    /// Semi-annual compounding.
    pub const SEMI_ANNUAL: Frequency = Frequency::PerYear(2);
    /// Monthly compounding.
    pub const MONTHLY: Frequency = Frequency::PerYear(12);
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Continuous => f.write_str("continuous"),
            Frequency::PerYear(n) => write!(f, "{}/year", n),
        }
    }
}

/// Continuously compounded fraction equivalent to `y` percent at `frequency`.
///
/// # Examples
/// ```
/// use pricer_models::calibration::{ccrate, Frequency};
///
/// assert_eq!(ccrate(5.0, Frequency::Continuous), 0.05);
/// assert!((ccrate(5.0, Frequency::ANNUAL) - 1.05f64.ln()).abs() < 1e-15);
/// ```
pub fn ccrate(y: f64, frequency: Frequency) -> f64 {
    match frequency {
        Frequency::Continuous => y / 100.0,
        Frequency::PerYear(n) => {
            let n = f64::from(n);
            n * (y / 100.0 / n).ln_1p()
        }
    }
}

/// Percent rate at `frequency` equivalent to the continuous fraction `y`.
///
/// Inverse of [`ccrate`].
pub fn equiv(y: f64, frequency: Frequency) -> f64 {
    match frequency {
        Frequency::Continuous => y * 100.0,
        Frequency::PerYear(n) => {
            let n = f64::from(n);
            100.0 * n * (y / n).exp_m1()
        }
    }
}
