//! Scalar-or-array values with length broadcasting.
//!
//! Pricing inputs may be supplied either as a single value shared by every
//! element or as one value per element. [`Broadcast`] captures that choice,
//! and [`common_len`] resolves the length a set of operands agrees on.
//!
//! Broadcasting follows one rule: scalars stretch to any length, arrays must
//! all have the same length.
//!
//! # Examples
//!
//! ```
//! use pricer_core::types::{common_len, Broadcast};
//!
//! let spot = Broadcast::from(100.0);
//! let strike = Broadcast::from(vec![90.0, 100.0, 110.0]);
//!
//! let len = common_len([spot.array_len(), strike.array_len()]).unwrap();
//! assert_eq!(len, Some(3));
//!
//! let moneyness = spot.zip_with(&strike, |s, k| s / k).unwrap();
//! assert_eq!(moneyness.array_len(), Some(3));
//! ```

use super::error::BroadcastError;

/// A value that is either one scalar or an array of per-element values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Broadcast<T> {
    /// One value shared by every element.
    Scalar(T),
    /// One value per element.
    Array(Vec<T>),
}

impl<T> Broadcast<T> {
    /// Returns `true` for the scalar variant.
    #[inline]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Broadcast::Scalar(_))
    }

    /// Array length, or `None` for a scalar.
    #[inline]
    pub fn array_len(&self) -> Option<usize> {
        match self {
            Broadcast::Scalar(_) => None,
            Broadcast::Array(values) => Some(values.len()),
        }
    }

    /// Views the values as a slice (length one for a scalar).
    pub fn as_slice(&self) -> &[T] {
        match self {
            Broadcast::Scalar(value) => std::slice::from_ref(value),
            Broadcast::Array(values) => values,
        }
    }
}

impl<T: Copy> Broadcast<T> {
    /// Element at `index`; a scalar answers for every index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<T> {
        match self {
            Broadcast::Scalar(value) => Some(*value),
            Broadcast::Array(values) => values.get(index).copied(),
        }
    }

    /// The scalar value, if this is a scalar.
    #[inline]
    pub fn as_scalar(&self) -> Option<T> {
        match self {
            Broadcast::Scalar(value) => Some(*value),
            Broadcast::Array(_) => None,
        }
    }

    /// Applies `f` element-wise, preserving the shape.
    pub fn map<U, F>(&self, f: F) -> Broadcast<U>
    where
        F: Fn(T) -> U,
    {
        match self {
            Broadcast::Scalar(value) => Broadcast::Scalar(f(*value)),
            Broadcast::Array(values) => Broadcast::Array(values.iter().map(|v| f(*v)).collect()),
        }
    }

    /// Combines two operands element-wise after broadcasting.
    ///
    /// # Errors
    /// `BroadcastError::ShapeMismatch` when both operands are arrays of
    /// different lengths.
    pub fn zip_with<U, V, F>(&self, other: &Broadcast<U>, f: F) -> Result<Broadcast<V>, BroadcastError>
    where
        U: Copy,
        F: Fn(T, U) -> V,
    {
        match (self, other) {
            (Broadcast::Scalar(a), Broadcast::Scalar(b)) => Ok(Broadcast::Scalar(f(*a, *b))),
            _ => {
                let len = common_len([self.array_len(), other.array_len()])?.unwrap_or(1);
                let lhs = self.expand(len)?;
                let rhs = other.expand(len)?;
                Ok(Broadcast::Array(
                    lhs.into_iter().zip(rhs).map(|(a, b)| f(a, b)).collect(),
                ))
            }
        }
    }

    /// Materialises `len` values, repeating a scalar.
    ///
    /// # Errors
    /// `BroadcastError::ShapeMismatch` if this is an array of another length.
    pub fn expand(&self, len: usize) -> Result<Vec<T>, BroadcastError> {
        match self {
            Broadcast::Scalar(value) => Ok(vec![*value; len]),
            Broadcast::Array(values) if values.len() == len => Ok(values.clone()),
            Broadcast::Array(values) => Err(BroadcastError::ShapeMismatch {
                expected: len,
                found: values.len(),
            }),
        }
    }

    /// Returns a copy with element `index` replaced.
    ///
    /// `len` is the common length of the record this value belongs to; a
    /// scalar is first expanded to that length so that only one element
    /// changes. With `len == None` the record is scalar and only index 0
    /// exists.
    ///
    /// # Errors
    /// - `BroadcastError::IndexOutOfRange` for an index past the end
    /// - `BroadcastError::ShapeMismatch` if this array disagrees with `len`
    pub fn replace_at(&self, len: Option<usize>, index: usize, value: T) -> Result<Self, BroadcastError> {
        match len {
            None if index == 0 => Ok(Broadcast::Scalar(value)),
            None => Err(BroadcastError::IndexOutOfRange { index, len: 1 }),
            Some(n) if index >= n => Err(BroadcastError::IndexOutOfRange { index, len: n }),
            Some(n) => {
                let mut values = self.expand(n)?;
                values[index] = value;
                Ok(Broadcast::Array(values))
            }
        }
    }

    /// Copies the values into a vector (one element for a scalar).
    pub fn to_vec(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }
}

impl From<f64> for Broadcast<f64> {
    fn from(value: f64) -> Self {
        Broadcast::Scalar(value)
    }
}

impl From<bool> for Broadcast<bool> {
    fn from(value: bool) -> Self {
        Broadcast::Scalar(value)
    }
}

impl<T> From<Vec<T>> for Broadcast<T> {
    fn from(values: Vec<T>) -> Self {
        Broadcast::Array(values)
    }
}

impl<T, const N: usize> From<[T; N]> for Broadcast<T> {
    fn from(values: [T; N]) -> Self {
        Broadcast::Array(values.into())
    }
}

/// Resolves the length shared by a set of operands.
///
/// Scalars (`None`) are compatible with anything. Returns `None` when every
/// operand is scalar.
///
/// # Errors
/// `BroadcastError::ShapeMismatch` if two arrays disagree.
pub fn common_len<I>(lens: I) -> Result<Option<usize>, BroadcastError>
where
    I: IntoIterator<Item = Option<usize>>,
{
    let mut resolved: Option<usize> = None;
    for len in lens.into_iter().flatten() {
        match resolved {
            None => resolved = Some(len),
            Some(expected) if expected != len => {
                return Err(BroadcastError::ShapeMismatch {
                    expected,
                    found: len,
                })
            }
            Some(_) => {}
        }
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================
    // Shape resolution
    // ==========================================================

    #[test]
    fn test_common_len_all_scalar() {
        assert_eq!(common_len([None, None]).unwrap(), None);
    }

    #[test]
    fn test_common_len_mixed() {
        assert_eq!(common_len([None, Some(4), None, Some(4)]).unwrap(), Some(4));
    }

    #[test]
    fn test_common_len_mismatch() {
        let err = common_len([Some(2), None, Some(3)]).unwrap_err();
        assert_eq!(
            err,
            BroadcastError::ShapeMismatch {
                expected: 2,
                found: 3
            }
        );
    }

    // ==========================================================
    // Element access and transformation
    // ==========================================================

    #[test]
    fn test_scalar_answers_every_index() {
        let b = Broadcast::from(2.5);
        assert_eq!(b.get(0), Some(2.5));
        assert_eq!(b.get(99), Some(2.5));
        assert!(b.is_scalar());
        assert_eq!(b.as_slice(), &[2.5]);
    }

    #[test]
    fn test_array_get_out_of_range() {
        let b = Broadcast::from(vec![1.0, 2.0]);
        assert_eq!(b.get(1), Some(2.0));
        assert_eq!(b.get(2), None);
        assert_eq!(b.as_scalar(), None);
    }

    #[test]
    fn test_map_preserves_shape() {
        let b = Broadcast::from([1.0, 2.0, 3.0]).map(|x| x * 2.0);
        assert_eq!(b, Broadcast::Array(vec![2.0, 4.0, 6.0]));

        let s = Broadcast::from(3.0).map(|x| x > 2.0);
        assert_eq!(s, Broadcast::Scalar(true));
    }

    #[test]
    fn test_zip_with_scalar_and_array() {
        let a = Broadcast::from(10.0);
        let b = Broadcast::from(vec![1.0, 2.0]);
        let c = a.zip_with(&b, |x, y| x - y).unwrap();
        assert_eq!(c, Broadcast::Array(vec![9.0, 8.0]));
    }

    #[test]
    fn test_zip_with_two_scalars_stays_scalar() {
        let c = Broadcast::from(1.0).zip_with(&Broadcast::from(2.0), |x, y| x + y);
        assert_eq!(c.unwrap(), Broadcast::Scalar(3.0));
    }

    #[test]
    fn test_zip_with_mismatch() {
        let a = Broadcast::from(vec![1.0, 2.0]);
        let b = Broadcast::from(vec![1.0, 2.0, 3.0]);
        assert!(a.zip_with(&b, |x, y| x + y).is_err());
    }

    #[test]
    fn test_expand() {
        assert_eq!(Broadcast::from(1.0).expand(3).unwrap(), vec![1.0; 3]);
        assert!(Broadcast::from(vec![1.0]).expand(3).is_err());
    }

    // ==========================================================
    // Single-element replacement
    // ==========================================================

    #[test]
    fn test_replace_at_expands_scalar() {
        let b = Broadcast::from(100.0).replace_at(Some(3), 1, 105.0).unwrap();
        assert_eq!(b, Broadcast::Array(vec![100.0, 105.0, 100.0]));
    }

    #[test]
    fn test_replace_at_scalar_record() {
        let b = Broadcast::from(100.0).replace_at(None, 0, 90.0).unwrap();
        assert_eq!(b, Broadcast::Scalar(90.0));
        assert!(Broadcast::from(100.0).replace_at(None, 1, 90.0).is_err());
    }

    #[test]
    fn test_replace_at_out_of_range() {
        let b = Broadcast::from(vec![1.0, 2.0]);
        assert_eq!(
            b.replace_at(Some(2), 2, 0.0).unwrap_err(),
            BroadcastError::IndexOutOfRange { index: 2, len: 2 }
        );
    }
}
