//! Instrument taxonomy.

use std::fmt;
use std::str::FromStr;

use pricer_core::types::Broadcast;

use super::error::InstrumentError;
use crate::analytical::OptionType;

/// Closed set of instruments priced by the engine.
///
/// Calls and puts use the option formulas; bonds, forwards and exposures
/// have their own closed forms. The integer codes are +1 call, −1 put,
/// 2 bond, 3 forward and 4 exposure.
///
/// # Examples
/// ```
/// use pricer_models::instruments::InstrumentType;
///
/// let kind: InstrumentType = "forward".parse().unwrap();
/// assert_eq!(kind.code(), 3);
/// assert_eq!(InstrumentType::try_from(-1).unwrap(), InstrumentType::Put);
/// assert!(!kind.is_option());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InstrumentType {
    /// European call
    #[default]
    Call,
    /// European put
    Put,
    /// Zero-coupon bond paying K at maturity
    Bond,
    /// Forward purchase at K
    Forward,
    /// Position already held; pays S_T - K with no premium
    Exposure,
}

impl InstrumentType {
    /// Every instrument type.
    pub const ALL: [InstrumentType; 5] = [
        InstrumentType::Call,
        InstrumentType::Put,
        InstrumentType::Bond,
        InstrumentType::Forward,
        InstrumentType::Exposure,
    ];

    /// Integer code.
    pub fn code(&self) -> i32 {
        match self {
            InstrumentType::Call => 1,
            InstrumentType::Put => -1,
            InstrumentType::Bond => 2,
            InstrumentType::Forward => 3,
            InstrumentType::Exposure => 4,
        }
    }

    /// Lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            InstrumentType::Call => "call",
            InstrumentType::Put => "put",
            InstrumentType::Bond => "bond",
            InstrumentType::Forward => "forward",
            InstrumentType::Exposure => "exposure",
        }
    }

    /// True for calls and puts.
    #[inline]
    pub fn is_option(&self) -> bool {
        matches!(self, InstrumentType::Call | InstrumentType::Put)
    }

    /// Direction used by the option formulas; non-options carry the call sign.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        match self {
            InstrumentType::Put => OptionType::Put,
            _ => OptionType::Call,
        }
    }
}

impl TryFrom<i32> for InstrumentType {
    type Error = InstrumentError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        InstrumentType::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or(InstrumentError::UnknownTypeCode { code })
    }
}

impl FromStr for InstrumentType {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        InstrumentType::ALL
            .into_iter()
            .find(|kind| kind.name() == lowered)
            .ok_or(InstrumentError::UnknownTypeName { name: s.to_string() })
    }
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<InstrumentType> for Broadcast<InstrumentType> {
    fn from(kind: InstrumentType) -> Self {
        Broadcast::Scalar(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip() {
        for kind in InstrumentType::ALL {
            assert_eq!(InstrumentType::try_from(kind.code()).unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(
            InstrumentType::try_from(0),
            Err(InstrumentError::UnknownTypeCode { code: 0 })
        );
    }

    #[test]
    fn test_names_parse_case_insensitive() {
        assert_eq!("Exposure".parse::<InstrumentType>().unwrap(), InstrumentType::Exposure);
        assert_eq!(InstrumentType::Bond.to_string(), "bond");
        assert!("straddle".parse::<InstrumentType>().is_err());
    }

    #[test]
    fn test_option_classification() {
        assert!(InstrumentType::Call.is_option());
        assert!(InstrumentType::Put.is_option());
        assert!(!InstrumentType::Exposure.is_option());
        assert_eq!(InstrumentType::Put.option_type(), OptionType::Put);
        assert_eq!(InstrumentType::Bond.option_type(), OptionType::Call);
    }
}
