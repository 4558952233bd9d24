use super::{Error, Result, Dataset, WritableDataset, Key, Value, Properties, Buffer, MAX_RANK};
use super::dataset::{check_length_index, check_value_index};

/// A dataset of rank `n` made by stacking rank `n - 1` slices, which need not
/// have the same shape.
///
/// This is how ragged ("non-qube") data is represented.
///
/// ```
/// use qubeops::{Dataset, ArrayDataset, JoinDataset};
/// let j = JoinDataset::new(vec![
///     ArrayDataset::rank1(vec![1.0, 2.0, 3.0]).into(),
///     ArrayDataset::rank1(vec![4.0]).into(),
/// ]).unwrap();
/// assert_eq!(j.rank(), 2);
/// assert_eq!(j.length(&[0]).unwrap(), 3);
/// assert_eq!(j.length(&[1]).unwrap(), 1);
/// assert_eq!(j.value(&[1, 0]).unwrap(), 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct JoinDataset {
    rank: usize,
    slices: Vec<Buffer>,
    properties: Properties,
}

impl JoinDataset {
    /// An empty dataset of rank `rank`, to be filled with [`push()`].
    ///
    /// [`push()`]: Self::push()
    pub fn with_rank(rank: usize) -> Result<Self> {
        if rank == 0 || rank > MAX_RANK { return Err(Error::RankUnsupported(rank)); }
        Ok(Self {rank, slices: Vec::new(), properties: Properties::new()})
    }

    /// Stack `slices`, which must all have the same rank. An empty list
    /// makes an empty rank 1 dataset.
    pub fn new(slices: Vec<Buffer>) -> Result<Self> {
        let rank = slices.first().map_or(0, |s| s.rank()) + 1;
        let mut ret = Self::with_rank(rank)?;
        for slice in slices { ret.push(slice)?; }
        Ok(ret)
    }

    /// Append a slice of rank `self.rank() - 1`.
    pub fn push(&mut self, slice: impl Into<Buffer>) -> Result<()> {
        let slice = slice.into();
        if slice.rank() + 1 != self.rank {
            return Err(Error::RankMismatch {from: slice.rank(), onto: self.rank - 1});
        }
        self.slices.push(slice);
        Ok(())
    }

    /// Builder-style [`WritableDataset::put_property()`].
    pub fn with_property(mut self, key: Key, value: impl Into<Value>) -> Self {
        self.properties.insert(key, value);
        self
    }

    pub fn slices(&self) -> &[Buffer] { &self.slices }

    pub fn properties(&self) -> &Properties { &self.properties }

    fn slice(&self, i: usize) -> Result<&Buffer> {
        self.slices.get(i).ok_or(Error::IndexOutOfBounds {index: i, length: self.slices.len()})
    }
}

impl Dataset for JoinDataset {
    fn rank(&self) -> usize { self.rank }

    fn length(&self, index: &[usize]) -> Result<usize> {
        check_length_index(self.rank, index)?;
        match index.split_first() {
            None => Ok(self.slices.len()),
            Some((&i, rest)) => self.slice(i)?.length(rest),
        }
    }

    fn value(&self, index: &[usize]) -> Result<f64> {
        check_value_index(self.rank, index)?;
        self.slice(index[0])?.value(&index[1..])
    }

    fn property(&self, key: Key) -> Option<Value> { self.properties.get(key).cloned() }

    /// The slice's own property, or else the whole dataset's.
    fn property_at(&self, key: Key, i: usize) -> Option<Value> {
        self.slices.get(i)
            .and_then(|s| s.property(key))
            .filter(|_| key != Key::Qube)
            .or_else(|| self.property(key))
    }
}

impl WritableDataset for JoinDataset {
    fn set_value(&mut self, index: &[usize], x: f64) -> Result<()> {
        check_value_index(self.rank, index)?;
        let length = self.slices.len();
        let slice = self.slices.get_mut(index[0]).ok_or(Error::IndexOutOfBounds {index: index[0], length})?;
        slice.set_value(&index[1..], x)
    }

    fn put_property(&mut self, key: Key, value: Value) {
        self.properties.insert(key, value);
    }
}
