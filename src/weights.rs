use super::{Result, Dataset, Key, Value};

/// A [`Dataset`] with the same shape as another, holding `1.0` where the other
/// has a valid value and `0.0` where it does not.
///
/// A value is invalid if it is NaN, equals the `FILL_VALUE` property, or lies
/// outside `VALID_MIN`..=`VALID_MAX`. Nothing is stored; each weight is
/// computed from the source on demand.
///
/// ```
/// use qubeops::{Dataset, ArrayDataset, Key, weights_of};
/// let a = ArrayDataset::rank1(vec![1.0, -1e31, f64::NAN, 2.0])
///     .with_property(Key::FillValue, -1e31);
/// let w = weights_of(&a);
/// let ws: Vec<f64> = (0..4).map(|i| w.value(&[i]).unwrap()).collect();
/// assert_eq!(ws, [1.0, 0.0, 0.0, 1.0]);
/// ```
#[derive(Debug, Copy, Clone)]
pub struct Weights<D> {
    ds: D,
    fill: Option<f64>,
    valid_min: f64,
    valid_max: f64,
}

/// Returns the [`Weights`] of `ds`.
pub fn weights_of<D: Dataset>(ds: D) -> Weights<D> {
    let number = |key| ds.property(key).as_ref().and_then(Value::as_number);
    let fill = number(Key::FillValue);
    let valid_min = number(Key::ValidMin).unwrap_or(f64::NEG_INFINITY);
    let valid_max = number(Key::ValidMax).unwrap_or(f64::INFINITY);
    Weights {ds, fill, valid_min, valid_max}
}

impl<D: Dataset> Weights<D> {
    /// Whether `x` would be a valid value of the source dataset.
    #[inline(always)]
    pub fn is_valid(&self, x: f64) -> bool {
        !x.is_nan()
            && self.fill != Some(x)
            && self.valid_min <= x
            && x <= self.valid_max
    }
}

impl<D: Dataset> Dataset for Weights<D> {
    fn rank(&self) -> usize { self.ds.rank() }

    fn length(&self, index: &[usize]) -> Result<usize> { self.ds.length(index) }

    #[inline(always)]
    fn value(&self, index: &[usize]) -> Result<f64> {
        Ok(if self.is_valid(self.ds.value(index)?) { 1.0 } else { 0.0 })
    }

    fn property(&self, key: Key) -> Option<Value> {
        match key {
            Key::Qube => self.ds.property(key),
            _ => None,
        }
    }

    fn qube_dims(&self) -> Option<Vec<usize>> { self.ds.qube_dims() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArrayDataset;

    #[test]
    fn valid_range_is_inclusive() {
        let a = ArrayDataset::rank1(vec![-1.0, 0.0, 10.0, 10.5])
            .with_property(Key::ValidMin, 0.0)
            .with_property(Key::ValidMax, 10.0);
        let w = weights_of(&a);
        assert!(!w.is_valid(-1.0));
        assert!(w.is_valid(0.0));
        assert!(w.is_valid(10.0));
        assert!(!w.is_valid(10.5));
        assert_eq!(w.qube_dims(), Some(vec![4]));
    }

    #[test]
    fn no_properties_means_only_nan_is_invalid() {
        let w = weights_of(ArrayDataset::scalar(-1e31));
        assert_eq!(w.value(&[]).unwrap(), 1.0);
        assert!(!w.is_valid(f64::NAN));
    }
}
