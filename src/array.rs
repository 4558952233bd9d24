use super::{Error, Result, Dataset, WritableDataset, Key, Value, Properties, MAX_RANK};
use super::dataset::{check_length_index, check_value_index};

/// A dense rectangular (qube) dataset of rank 0 to 4.
///
/// The values are stored in a [`Box<[f64]>`] in row-major order. The
/// [`Key::Qube`] property always reads as `true`.
#[derive(Debug, Clone)]
pub struct ArrayDataset {
    shape: Vec<usize>,
    items: Box<[f64]>,
    properties: Properties,
}

impl ArrayDataset {
    fn new_inner(shape: Vec<usize>, items: Box<[f64]>) -> Result<Self> {
        if shape.len() > MAX_RANK { return Err(Error::RankUnsupported(shape.len())); }
        let expected: usize = shape.iter().product();
        if expected != items.len() {
            return Err(Error::ShapeMismatch {shape, expected, got: items.len()});
        }
        Ok(Self {shape, items, properties: Properties::new()})
    }

    /// Constructs an `ArrayDataset` of shape `shape` given its elements.
    ///
    /// ```
    /// use qubeops::{Dataset, ArrayDataset};
    /// let a = ArrayDataset::new([2, 2], [0.0, 1.0, -1.0, 2.0]).unwrap();
    /// assert_eq!(a.value(&[0, 1]).unwrap(), 1.0);
    /// assert_eq!(a.value(&[1, 0]).unwrap(), -1.0);
    /// assert!(ArrayDataset::new([2, 2], [0.0]).is_err());
    /// ```
    pub fn new(shape: impl Into<Vec<usize>>, items: impl Into<Box<[f64]>>) -> Result<Self> {
        Self::new_inner(shape.into(), items.into())
    }

    /// A rank 0 dataset holding `x`.
    pub fn scalar(x: f64) -> Self {
        Self {shape: Vec::new(), items: Box::new([x]), properties: Properties::new()}
    }

    /// A rank 1 dataset holding `items`.
    pub fn rank1(items: impl Into<Box<[f64]>>) -> Self {
        let items = items.into();
        Self {shape: vec![items.len()], items, properties: Properties::new()}
    }

    /// A dataset of shape `shape` filled with `0.0`.
    pub fn zeros(shape: impl Into<Vec<usize>>) -> Result<Self> {
        let shape = shape.into();
        let n = shape.iter().product();
        Self::new_inner(shape, vec![0.0; n].into())
    }

    /// Construct an `ArrayDataset` of shape `shape` from a function of the
    /// index.
    ///
    /// ```
    /// use qubeops::{Dataset, ArrayDataset};
    /// let a = ArrayDataset::from_fn([2, 3], |i| (10 * i[0] + i[1]) as f64).unwrap();
    /// assert_eq!(a.as_slice(), [0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
    /// ```
    pub fn from_fn(shape: impl Into<Vec<usize>>, mut f: impl FnMut(&[usize]) -> f64) -> Result<Self> {
        let mut ret = Self::zeros(shape)?;
        let rank = ret.shape.len();
        let mut index = [0; MAX_RANK];
        for item in ret.items.iter_mut() {
            *item = f(&index[..rank]);
            // Odometer increment, last axis fastest.
            for axis in (0..rank).rev() {
                index[axis] += 1;
                if index[axis] < ret.shape[axis] { break; }
                index[axis] = 0;
            }
        }
        Ok(ret)
    }

    /// Builder-style [`WritableDataset::put_property()`].
    pub fn with_property(mut self, key: Key, value: impl Into<Value>) -> Self {
        self.properties.insert(key, value);
        self
    }

    pub fn shape(&self) -> &[usize] { &self.shape }

    pub fn properties(&self) -> &Properties { &self.properties }

    /// Returns the raw elements in row-major order.
    pub fn as_slice(&self) -> &[f64] { &self.items }

    pub fn as_mut_slice(&mut self) -> &mut [f64] { &mut self.items }

    /// Returns the raw elements.
    pub fn to_raw(self) -> Box<[f64]> { self.items }

    /// The position in `as_slice()` of the value at `index`.
    pub fn offset(&self, index: &[usize]) -> Result<usize> {
        check_value_index(self.shape.len(), index)?;
        let mut offset = 0;
        for (&i, &length) in index.iter().zip(&self.shape) {
            if i >= length { return Err(Error::IndexOutOfBounds {index: i, length}); }
            offset = offset * length + i;
        }
        Ok(offset)
    }
}

impl Dataset for ArrayDataset {
    #[inline(always)]
    fn rank(&self) -> usize { self.shape.len() }

    fn length(&self, index: &[usize]) -> Result<usize> {
        check_length_index(self.shape.len(), index)?;
        for (&i, &length) in index.iter().zip(&self.shape) {
            if i >= length { return Err(Error::IndexOutOfBounds {index: i, length}); }
        }
        Ok(self.shape[index.len()])
    }

    #[inline(always)]
    fn value(&self, index: &[usize]) -> Result<f64> { Ok(self.items[self.offset(index)?]) }

    fn property(&self, key: Key) -> Option<Value> {
        match key {
            Key::Qube => Some(Value::Bool(true)),
            _ => self.properties.get(key).cloned(),
        }
    }

    fn qube_dims(&self) -> Option<Vec<usize>> { Some(self.shape.clone()) }
}

impl WritableDataset for ArrayDataset {
    #[inline(always)]
    fn set_value(&mut self, index: &[usize], x: f64) -> Result<()> {
        let offset = self.offset(index)?;
        self.items[offset] = x;
        Ok(())
    }

    fn put_property(&mut self, key: Key, value: Value) {
        self.properties.insert(key, value);
    }
}

impl std::convert::AsRef<[f64]> for ArrayDataset {
    fn as_ref(&self) -> &[f64] { &self.items }
}

impl std::convert::AsMut<[f64]> for ArrayDataset {
    fn as_mut(&mut self) -> &mut [f64] { &mut self.items }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_row_major() {
        let a = ArrayDataset::zeros([2, 3, 4]).unwrap();
        assert_eq!(a.offset(&[0, 0, 0]).unwrap(), 0);
        assert_eq!(a.offset(&[0, 0, 3]).unwrap(), 3);
        assert_eq!(a.offset(&[0, 1, 0]).unwrap(), 4);
        assert_eq!(a.offset(&[1, 2, 3]).unwrap(), 23);
        assert_eq!(a.offset(&[0, 3, 0]), Err(Error::IndexOutOfBounds {index: 3, length: 3}));
    }

    #[test]
    fn scalar_has_rank_zero() {
        let s = ArrayDataset::scalar(2.5);
        assert_eq!(s.rank(), 0);
        assert_eq!(s.value(&[]).unwrap(), 2.5);
        assert_eq!(s.qube_dims(), Some(vec![]));
        assert_eq!(s.length(&[]), Err(Error::NoSuchAxis {rank: 0, axis: 0}));
    }

    #[test]
    fn rank_five_is_rejected() {
        assert_eq!(ArrayDataset::zeros([1, 1, 1, 1, 1]).err(), Some(Error::RankUnsupported(5)));
    }

    #[test]
    fn writes_land_in_place() {
        let mut a = ArrayDataset::zeros([2, 2]).unwrap();
        a.set_value(&[1, 0], 7.0).unwrap();
        assert_eq!(a.as_slice(), [0.0, 0.0, 7.0, 0.0]);
        assert_eq!(a.property(Key::Qube), Some(Value::Bool(true)));
    }
}
