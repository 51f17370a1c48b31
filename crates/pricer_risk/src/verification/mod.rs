//! Consistency checks for the analytic sensitivities.
//!
//! [`GreekConsistencyChecker`] bumps one input at a time and compares each
//! closed-form Greek with the central difference of the quantity it is the
//! derivative of.

mod greek_check;

pub use greek_check::{
    GreekCheck, GreekCheckConfig, GreekCheckReport, GreekConsistencyChecker, GreekDiscrepancy,
    SampleSummary, GREEK_CHECKS,
};
