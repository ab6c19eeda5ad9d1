//! Interpolating lookup tables over scattered samples.
//!
//! A table of dimension `DIM` is one [`BalancedTree`](crate::tree::BalancedTree)
//! keyed by the first coordinate. In the 1-D [`LookupTable`] each entry holds a
//! value; in a [`NestedTable`] each entry owns a table over the remaining
//! coordinates. A lookup interpolates the inner dimensions first and then
//! blends the two results linearly along the outer coordinate. For samples
//! that do not form a full grid this cascade is an approximation of, and not
//! the same as, multilinear interpolation over the enclosing hyper-rectangle.

use std::cmp::Ordering;

use num_traits::Float;
use ordered_float::OrderedFloat;

mod base;
mod error;
mod nested;

pub use base::LookupTable;
pub use error::LookupError;
pub use nested::{LookupTable2, LookupTable3, NestedTable};

/// One stored sample: an outer key and either a value or a sub-table.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<K, P> {
    pub key: K,
    pub payload: P,
}

impl<K: Float, P> Entry<K, P> {
    pub fn new(key: K, payload: P) -> Entry<K, P> {
        Entry { key, payload }
    }

    /// Ordering of `key` relative to this entry's key.
    pub fn locate(&self, key: K) -> Ordering {
        order_keys(key, self.key)
    }
}

/// Comparator every table tree is built with.
pub(crate) type KeyOrder<K, P> = fn(&Entry<K, P>, &Entry<K, P>) -> Ordering;

pub(crate) fn compare_entries<K: Float, P>(lhs: &Entry<K, P>, rhs: &Entry<K, P>) -> Ordering {
    order_keys(lhs.key, rhs.key)
}

// NaN sorts above every number, which keeps the order total
fn order_keys<K: Float>(lhs: K, rhs: K) -> Ordering {
    OrderedFloat(lhs).cmp(&OrderedFloat(rhs))
}

/// Values that can be blended linearly along a key of type `K`.
///
/// `Default` is what an empty table evaluates to.
pub trait Lerp<K>: Clone + Default {
    /// The value a fraction `t` of the way from `self` to `upper`.
    fn lerp(&self, upper: &Self, t: K) -> Self;
}

impl<T: Float + Default> Lerp<T> for T {
    fn lerp(&self, upper: &T, t: T) -> T {
        *self + t * (*upper - *self)
    }
}

/// Behaviour shared by tables of every dimension.
pub trait Table: Default {
    type Key: Float;
    type Value: Lerp<Self::Key>;

    const DIM: usize;

    /// Number of entries along the outermost dimension.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Interpolated value at the first `DIM` coordinates of `point`.
    ///
    /// # Panics
    ///
    /// If `point` has fewer than `DIM` coordinates.
    fn interpolate(&self, point: &[Self::Key]) -> Self::Value;

    /// Stores a sample at the first `DIM` coordinates of `point`, creating
    /// inner tables on the way. Returns `false` if the point was already set.
    ///
    /// # Panics
    ///
    /// If `point` has fewer than `DIM` coordinates.
    fn place(&mut self, point: &[Self::Key], value: Self::Value) -> bool;

    fn lookup_point(&self, point: &[Self::Key]) -> Result<Self::Value, LookupError> {
        check_dimension::<Self>(point)?;
        Ok(self.interpolate(point))
    }

    fn insert_point(&mut self, point: &[Self::Key], value: Self::Value) -> Result<bool, LookupError> {
        check_dimension::<Self>(point)?;
        Ok(self.place(point, value))
    }
}

fn check_dimension<T: Table>(point: &[T::Key]) -> Result<(), LookupError> {
    if point.len() == T::DIM {
        Ok(())
    } else {
        Err(LookupError::DimensionMismatch {
            expected: T::DIM,
            found: point.len(),
        })
    }
}

/// Turns the bracket around `key` into a value.
///
/// Outside the stored range the nearest side is used unchanged, and a key
/// that lands on a sample never interpolates.
pub(crate) fn blend<K, P, V, F>(bracket: (Option<&Entry<K, P>>, Option<&Entry<K, P>>), key: K, mut eval: F) -> V
where
    K: Float,
    V: Lerp<K>,
    F: FnMut(&P) -> V,
{
    match bracket {
        (None, None) => V::default(),
        (Some(only), None) | (None, Some(only)) => eval(&only.payload),
        (Some(lower), Some(upper)) => {
            if key == lower.key {
                eval(&lower.payload)
            } else if key == upper.key {
                eval(&upper.payload)
            } else {
                let t = (key - lower.key) / (upper.key - lower.key);
                let lower_value = eval(&lower.payload);
                let upper_value = eval(&upper.payload);
                lower_value.lerp(&upper_value, t)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_for_floats() {
        assert_eq!(Lerp::lerp(&20.0_f64, &10.0, 0.75), 12.5);
        assert_eq!(Lerp::lerp(&1.0_f32, &3.0, 0.5), 2.0);
    }

    #[test]
    fn test_keys_order_totally() {
        assert_eq!(order_keys(1.0, 2.0), Ordering::Less);
        assert_eq!(order_keys(2.0, 2.0), Ordering::Equal);
        assert_eq!(order_keys(f64::NAN, f64::INFINITY), Ordering::Greater);
        assert_eq!(order_keys(f64::NAN, f64::NAN), Ordering::Equal);
    }

    #[test]
    fn test_blend_policies() {
        let lower = Entry::new(1.0, 10.0);
        let upper = Entry::new(3.0, 30.0);
        let value = |payload: &f64| *payload;

        assert_eq!(blend::<f64, f64, f64, _>((None, None), 2.0, value), 0.0);
        assert_eq!(blend((Some(&lower), None), 9.0, value), 10.0);
        assert_eq!(blend((None, Some(&upper)), -9.0, value), 30.0);
        assert_eq!(blend((Some(&lower), Some(&upper)), 2.0, value), 20.0);
        assert_eq!(blend((Some(&lower), Some(&upper)), 3.0, value), 30.0);
    }

    #[test]
    fn test_blend_on_a_sample_skips_the_other_side() {
        let sample = Entry::new(2.0, 5.0);
        let mut calls = 0;
        let result = blend((Some(&sample), Some(&sample)), 2.0, |payload: &f64| {
            calls += 1;
            *payload
        });
        assert_eq!(result, 5.0);
        assert_eq!(calls, 1);
    }
}
