//! Named pricing quantities.

use std::fmt;

/// A quantity every pricing surface can report: the value or one Greek.
///
/// Models, instruments, batches and portfolios all expose
/// `measure(Measure)` so callers can iterate over quantities generically.
///
/// # Examples
/// ```
/// use pricer_models::analytical::{GeneralisedBlackScholes, Measure, OptionParams, OptionType};
///
/// let model = GeneralisedBlackScholes::new(OptionParams::default(), OptionType::Call).unwrap();
/// assert_eq!(model.measure(Measure::Vega), model.vega());
/// assert_eq!(Measure::ThetaDaily.to_string(), "Theta_daily");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measure {
    /// Present value
    Value,
    /// dV/dS
    Delta,
    /// dV/dF
    DeltaFwd,
    /// Probability-form delta without carry
    DeltaDriftless,
    /// dV/dK
    DeltaDual,
    /// Value decay per year elapsed
    Theta,
    /// Theta / 365
    ThetaDaily,
    /// dV/dσ
    Vega,
    /// Vega per volatility point
    VegaPercent,
    /// dV/dr
    RhoD,
    /// dV/dq
    RhoF,
    /// d²V/dS²
    Gamma,
    /// d²V/dK²
    GammaDual,
    /// Delta decay per year elapsed
    Charm,
    /// d²V/dσdS
    Vanna,
    /// d²V/dσ²
    Volga,
    /// dGamma/dttm
    Color,
}

impl Measure {
    /// Every measure, value first.
    pub const ALL: [Measure; 17] = [
        Measure::Value,
        Measure::Delta,
        Measure::DeltaFwd,
        Measure::DeltaDriftless,
        Measure::DeltaDual,
        Measure::Theta,
        Measure::ThetaDaily,
        Measure::Vega,
        Measure::VegaPercent,
        Measure::RhoD,
        Measure::RhoF,
        Measure::Gamma,
        Measure::GammaDual,
        Measure::Charm,
        Measure::Vanna,
        Measure::Volga,
        Measure::Color,
    ];

    /// Report label.
    pub fn name(&self) -> &'static str {
        match self {
            Measure::Value => "value",
            Measure::Delta => "Delta",
            Measure::DeltaFwd => "DeltaFwd",
            Measure::DeltaDriftless => "DeltaDriftless",
            Measure::DeltaDual => "DeltaDual",
            Measure::Theta => "Theta",
            Measure::ThetaDaily => "Theta_daily",
            Measure::Vega => "Vega",
            Measure::VegaPercent => "Vega_percent",
            Measure::RhoD => "RhoD",
            Measure::RhoF => "RhoF",
            Measure::Gamma => "Gamma",
            Measure::GammaDual => "GammaDual",
            Measure::Charm => "Charm",
            Measure::Vanna => "Vanna",
            Measure::Volga => "Volga",
            Measure::Color => "Color",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
