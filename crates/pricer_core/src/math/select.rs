//! Branch-free conditional selection over broadcast values.
//!
//! [`select`] is a value-level ternary: both branches are already evaluated
//! by the caller and the condition only decides which values survive. A
//! scalar condition short-circuits to one branch unchanged; an array
//! condition picks element-wise after broadcasting the branches to its
//! length.
//!
//! # Examples
//!
//! ```
//! use pricer_core::math::select;
//! use pricer_core::types::Broadcast;
//!
//! let is_bond = Broadcast::from(vec![false, true, false]);
//! let option_delta = Broadcast::from(vec![0.55, 0.55, 0.40]);
//! let bond_delta = Broadcast::from(0.0);
//!
//! let delta = select(&is_bond, &bond_delta, &option_delta).unwrap();
//! assert_eq!(delta, Broadcast::from(vec![0.55, 0.0, 0.40]));
//! ```

use crate::types::{Broadcast, BroadcastError};

/// Chooses between `when_true` and `when_false` according to `condition`.
///
/// # Errors
/// `BroadcastError::ShapeMismatch` if an array branch does not match the
/// length of an array condition.
pub fn select<T: Copy>(
    condition: &Broadcast<bool>,
    when_true: &Broadcast<T>,
    when_false: &Broadcast<T>,
) -> Result<Broadcast<T>, BroadcastError> {
    match condition {
        Broadcast::Scalar(true) => Ok(when_true.clone()),
        Broadcast::Scalar(false) => Ok(when_false.clone()),
        Broadcast::Array(mask) => {
            let len = mask.len();
            let picked_true = when_true.expand(len)?;
            let picked_false = when_false.expand(len)?;
            Ok(Broadcast::Array(
                mask.iter()
                    .zip(picked_true.into_iter().zip(picked_false))
                    .map(|(&c, (t, f))| if c { t } else { f })
                    .collect(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_scalar_condition_short_circuits() {
        let a = Broadcast::from(vec![1.0, 2.0]);
        let b = Broadcast::from(0.0);
        assert_eq!(select(&Broadcast::from(true), &a, &b).unwrap(), a);
        assert_eq!(select(&Broadcast::from(false), &a, &b).unwrap(), b);
    }

    #[test]
    fn test_array_condition_with_scalar_branches() {
        let mask = Broadcast::from(vec![true, false, true]);
        let out = select(&mask, &Broadcast::from(1.0), &Broadcast::from(-1.0)).unwrap();
        assert_eq!(out, Broadcast::from(vec![1.0, -1.0, 1.0]));
    }

    #[test]
    fn test_array_condition_shape_mismatch() {
        let mask = Broadcast::from(vec![true, false]);
        let err = select(&mask, &Broadcast::from(vec![1.0, 2.0, 3.0]), &Broadcast::from(0.0))
            .unwrap_err();
        assert_eq!(
            err,
            BroadcastError::ShapeMismatch {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_nan_in_unselected_branch_is_discarded() {
        let mask = Broadcast::from(vec![true, false]);
        let out = select(
            &mask,
            &Broadcast::from(vec![1.0, f64::NAN]),
            &Broadcast::from(vec![f64::NAN, 2.0]),
        )
        .unwrap();
        assert_eq!(out, Broadcast::from(vec![1.0, 2.0]));
    }

    proptest! {
        #[test]
        fn prop_select_matches_ternary(
            pairs in proptest::collection::vec((any::<bool>(), -1e6..1e6f64, -1e6..1e6f64), 0..32)
        ) {
            let mask: Vec<bool> = pairs.iter().map(|p| p.0).collect();
            let a: Vec<f64> = pairs.iter().map(|p| p.1).collect();
            let b: Vec<f64> = pairs.iter().map(|p| p.2).collect();

            let out = select(&Broadcast::from(mask), &Broadcast::from(a), &Broadcast::from(b)).unwrap();
            let expected: Vec<f64> = pairs.iter().map(|&(c, x, y)| if c { x } else { y }).collect();
            prop_assert_eq!(out, Broadcast::Array(expected));
        }
    }
}
