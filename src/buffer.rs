use log::{trace};

use super::{Result, Dataset, WritableDataset, Key, Value, ArrayDataset, JoinDataset, Slice, each_index};

/// An owned, writable dataset: either a rectangular [`ArrayDataset`] or a
/// ragged [`JoinDataset`].
///
/// This is the type of every result returned by the binary-operator engine.
#[derive(Debug, Clone)]
pub enum Buffer {
    Array(ArrayDataset),
    Join(JoinDataset),
}

impl Buffer {
    /// Copy the values and geometry of `ds`. Properties are not copied.
    ///
    /// A dataset with [`qube_dims()`] becomes an [`ArrayDataset`]; anything
    /// else becomes a [`JoinDataset`] of copied slices.
    ///
    /// ```
    /// use qubeops::{Dataset, ArrayDataset, JoinDataset, Buffer};
    /// let j = JoinDataset::new(vec![
    ///     ArrayDataset::rank1(vec![1.0, 2.0]).into(),
    ///     ArrayDataset::rank1(vec![3.0]).into(),
    /// ]).unwrap();
    /// let copy = Buffer::copy_of(&j).unwrap();
    /// assert!(copy.as_array().is_none());
    /// assert_eq!(copy.value(&[1, 0]).unwrap(), 3.0);
    /// ```
    ///
    /// [`qube_dims()`]: Dataset::qube_dims()
    pub fn copy_of(ds: &dyn Dataset) -> Result<Buffer> {
        if let Some(dims) = ds.qube_dims() {
            trace!("copying qube of shape {dims:?}");
            let mut ret = ArrayDataset::zeros(dims)?;
            let mut items = ret.as_mut_slice().iter_mut();
            // `each_index` visits in row-major order, the order of `items`.
            each_index(ds, |index| {
                if let Some(item) = items.next() { *item = ds.value(index)?; }
                Ok(())
            })?;
            return Ok(Buffer::Array(ret));
        }
        let mut ret = JoinDataset::with_rank(ds.rank())?;
        for i in 0..ds.length(&[])? {
            ret.push(Buffer::copy_of(&Slice::new(ds, i)?)?)?;
        }
        Ok(Buffer::Join(ret))
    }

    pub fn as_array(&self) -> Option<&ArrayDataset> {
        if let Buffer::Array(a) = self { Some(a) } else { None }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut ArrayDataset> {
        if let Buffer::Array(a) = self { Some(a) } else { None }
    }

    pub fn into_array(self) -> Option<ArrayDataset> {
        if let Buffer::Array(a) = self { Some(a) } else { None }
    }

    /// The values of a rectangular buffer in row-major order.
    pub fn as_slice(&self) -> Option<&[f64]> { self.as_array().map(ArrayDataset::as_slice) }

    /// Every value, in row-major order, whatever the geometry.
    pub fn to_vec(&self) -> Result<Vec<f64>> {
        let mut ret = Vec::new();
        each_index(self, |index| {
            ret.push(self.value(index)?);
            Ok(())
        })?;
        Ok(ret)
    }
}

impl From<ArrayDataset> for Buffer {
    fn from(a: ArrayDataset) -> Self { Buffer::Array(a) }
}

impl From<JoinDataset> for Buffer {
    fn from(j: JoinDataset) -> Self { Buffer::Join(j) }
}

impl Dataset for Buffer {
    fn rank(&self) -> usize {
        match self { Buffer::Array(a) => a.rank(), Buffer::Join(j) => j.rank() }
    }

    fn length(&self, index: &[usize]) -> Result<usize> {
        match self { Buffer::Array(a) => a.length(index), Buffer::Join(j) => j.length(index) }
    }

    #[inline(always)]
    fn value(&self, index: &[usize]) -> Result<f64> {
        match self { Buffer::Array(a) => a.value(index), Buffer::Join(j) => j.value(index) }
    }

    fn property(&self, key: Key) -> Option<Value> {
        match self { Buffer::Array(a) => a.property(key), Buffer::Join(j) => j.property(key) }
    }

    fn property_at(&self, key: Key, i: usize) -> Option<Value> {
        match self { Buffer::Array(a) => a.property_at(key, i), Buffer::Join(j) => j.property_at(key, i) }
    }

    fn qube_dims(&self) -> Option<Vec<usize>> {
        match self { Buffer::Array(a) => a.qube_dims(), Buffer::Join(j) => j.qube_dims() }
    }
}

impl WritableDataset for Buffer {
    #[inline(always)]
    fn set_value(&mut self, index: &[usize], x: f64) -> Result<()> {
        match self { Buffer::Array(a) => a.set_value(index, x), Buffer::Join(j) => j.set_value(index, x) }
    }

    fn put_property(&mut self, key: Key, value: Value) {
        match self { Buffer::Array(a) => a.put_property(key, value), Buffer::Join(j) => j.put_property(key, value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_of_qube_is_dense() {
        let a = ArrayDataset::from_fn([2, 2], |i| (i[0] * 2 + i[1]) as f64).unwrap()
            .with_property(Key::Label, "x");
        let copy = Buffer::copy_of(&a).unwrap();
        assert_eq!(copy.as_slice(), Some(a.as_slice()));
        assert_eq!(copy.property(Key::Label), None);
    }

    #[test]
    fn array_access() {
        let mut b = Buffer::from(ArrayDataset::zeros([3]).unwrap());
        b.as_array_mut().unwrap().as_mut_slice()[1] = 4.0;
        assert_eq!(b.value(&[1]).unwrap(), 4.0);
        let raw = b.into_array().unwrap().to_raw();
        assert_eq!(&raw[..], [0.0, 4.0, 0.0]);

        let mut j = Buffer::from(JoinDataset::with_rank(2).unwrap());
        assert!(j.as_array_mut().is_none());
        assert!(j.into_array().is_none());
    }

    #[test]
    fn copy_of_ragged_rank3_keeps_geometry() {
        let j = JoinDataset::new(vec![
            ArrayDataset::zeros([2, 3]).unwrap().into(),
            ArrayDataset::from_fn([1, 2], |i| i[1] as f64 + 1.0).unwrap().into(),
        ]).unwrap();
        let copy = Buffer::copy_of(&j).unwrap();
        assert_eq!(copy.rank(), 3);
        assert_eq!(copy.length(&[0]).unwrap(), 2);
        assert_eq!(copy.length(&[1, 0]).unwrap(), 2);
        assert_eq!(copy.to_vec().unwrap(), [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 2.0]);
    }
}
