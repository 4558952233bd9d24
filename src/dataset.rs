use std::fmt::{self, Debug};
use std::ops::{Deref};

use super::{Error, Result, Key, Value, MAX_RANK};

/// Implemented by types that behave like an N-dimensional array of `f64`s
/// with attached [properties].
///
/// A `Dataset` has a rank between 0 and 4. Its shape is described by
/// [`length()`], which takes the leading indices of the axis being measured:
/// `length(&[])` is the length of the first axis, `length(&[i])` the length
/// of the second axis within row `i`, and so on. Datasets whose inner lengths
/// vary with the outer index are "ragged". Datasets whose shape is a true
/// rectangle are "qubes", and advertise it with the [`Key::Qube`] property.
///
/// ### Ownership
///
/// If `D` implements `Dataset`, then so do `&D`, `Box<D>`, `Arc<D>` and all
/// other thread-safe types that [`Deref`] to `D`, including `&dyn Dataset`.
/// Views that draw data from another dataset should own it; callers can then
/// choose to lend them a reference instead.
///
/// ```
/// use qubeops::{Dataset, ArrayDataset};
/// let a = ArrayDataset::new([2, 3], [0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// let r: &dyn Dataset = &a;
/// assert_eq!(r.rank(), 2);
/// assert_eq!(r.length(&[]).unwrap(), 2);
/// assert_eq!(r.length(&[1]).unwrap(), 3);
/// assert_eq!(r.value(&[1, 2]).unwrap(), 5.0);
/// assert_eq!(r.qube_dims(), Some(vec![2, 3]));
/// ```
///
/// [properties]: super::Properties
/// [`length()`]: Dataset::length()
pub trait Dataset: Send + Sync {
    /// The number of indices needed to address one value.
    fn rank(&self) -> usize;

    /// The length of axis `index.len()` at the position given by `index`.
    fn length(&self, index: &[usize]) -> Result<usize>;

    /// The value at `index`, which must have exactly `rank()` entries.
    fn value(&self, index: &[usize]) -> Result<f64>;

    /// Look up a property of the whole dataset.
    fn property(&self, key: Key) -> Option<Value>;

    /// Look up a property of the slice at outer index `i`.
    fn property_at(&self, key: Key, i: usize) -> Option<Value> {
        let _ = i;
        self.property(key)
    }

    /// The rectangular dimensions of `self`, if it has them.
    ///
    /// Rank 0 and rank 1 datasets are always rectangular. Higher ranks must
    /// advertise [`Key::Qube`].
    fn qube_dims(&self) -> Option<Vec<usize>> { qube_dims(self) }
}

impl<D: ?Sized + Dataset, T: Deref<Target=D> + Send + Sync> Dataset for T {
    #[inline(always)]
    fn rank(&self) -> usize { D::rank(self) }
    #[inline(always)]
    fn length(&self, index: &[usize]) -> Result<usize> { D::length(self, index) }
    #[inline(always)]
    fn value(&self, index: &[usize]) -> Result<f64> { D::value(self, index) }
    fn property(&self, key: Key) -> Option<Value> { D::property(self, key) }
    fn property_at(&self, key: Key, i: usize) -> Option<Value> { D::property_at(self, key, i) }
    fn qube_dims(&self) -> Option<Vec<usize>> { D::qube_dims(self) }
}

impl Debug for dyn Dataset + '_ {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Dataset(rank {})", self.rank())
    }
}

/// Computes [`Dataset::qube_dims()`] from the shape queries of `ds`.
pub fn qube_dims(ds: &(impl Dataset + ?Sized)) -> Option<Vec<usize>> {
    let rank = ds.rank();
    if rank >= 2 && ds.property(Key::Qube).and_then(|v| v.as_bool()) != Some(true) {
        return None;
    }
    // Measure along the first row at each depth.
    let mut index = [0; MAX_RANK];
    let mut dims = Vec::with_capacity(rank);
    let mut empty = false;
    for axis in 0..rank {
        let n = if empty { 0 } else { ds.length(&index[..axis]).ok()? };
        empty |= n == 0;
        dims.push(n);
    }
    Some(dims)
}

/// Check that `index` addresses a single value of a rank `rank` dataset.
pub(crate) fn check_value_index(rank: usize, index: &[usize]) -> Result<()> {
    if index.len() < rank {
        Err(Error::RankTooLow {rank, given: index.len()})
    } else if index.len() > rank {
        Err(Error::NoSuchAxis {rank, axis: rank})
    } else {
        Ok(())
    }
}

/// Check that `index` names an axis of a rank `rank` dataset.
pub(crate) fn check_length_index(rank: usize, index: &[usize]) -> Result<()> {
    if index.len() >= rank { return Err(Error::NoSuchAxis {rank, axis: index.len()}); }
    Ok(())
}

// ----------------------------------------------------------------------------

/// A [`Dataset`] that can be filled in.
pub trait WritableDataset: Dataset {
    /// Overwrite the value at `index`.
    fn set_value(&mut self, index: &[usize], x: f64) -> Result<()>;

    /// Set (or replace) a property of the whole dataset.
    fn put_property(&mut self, key: Key, value: Value);
}

// ----------------------------------------------------------------------------

/// A rank `n - 1` view of row `i` of a rank `n` [`Dataset`].
///
/// Properties are looked up per index on the parent. The slice never claims
/// to be a qube; a rank-1 slice is rectangular anyway.
#[derive(Debug, Copy, Clone)]
pub struct Slice<D>(D, usize);

impl<D: Dataset> Slice<D> {
    pub fn new(ds: D, i: usize) -> Result<Self> {
        if ds.rank() == 0 { return Err(Error::NoSuchAxis {rank: 0, axis: 0}); }
        let length = ds.length(&[])?;
        if i >= length { return Err(Error::IndexOutOfBounds {index: i, length}); }
        Ok(Slice(ds, i))
    }

    fn outer(&self, index: &[usize]) -> [usize; MAX_RANK] {
        let mut full = [0; MAX_RANK];
        full[0] = self.1;
        full[1..=index.len()].copy_from_slice(index);
        full
    }
}

impl<D: Dataset> Dataset for Slice<D> {
    fn rank(&self) -> usize { self.0.rank() - 1 }

    fn length(&self, index: &[usize]) -> Result<usize> {
        check_length_index(self.rank(), index)?;
        self.0.length(&self.outer(index)[..=index.len()])
    }

    fn value(&self, index: &[usize]) -> Result<f64> {
        check_value_index(self.rank(), index)?;
        self.0.value(&self.outer(index)[..=index.len()])
    }

    fn property(&self, key: Key) -> Option<Value> {
        match key {
            Key::Qube => None,
            _ => self.0.property_at(key, self.1),
        }
    }
}
