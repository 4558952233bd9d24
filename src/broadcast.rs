//! Reconciling two datasets of different rank into a common geometry.
//!
//! When two datasets are combined, the lower-rank one is "promoted" to the
//! rank of the other. The promoted dataset repeats each of its values across
//! the extra trailing axes contributed by the higher-rank dataset: a rank 1
//! dataset `a` promoted onto a rank 2 dataset `b` reads `a.value(&[i])` at
//! every `(i, j)`. Each row of `b` therefore shares one value of `a`, which is
//! how a measurement's context (e.g. a timetag) broadcasts over the nested
//! measurements it indexes.
//!
//! Promotion makes a [`Promoted`] view, not a copy.

use log::{debug, trace};

use super::{Error, Result, Dataset, Key, Value, Buffer, ArrayDataset, MAX_RANK};
use super::dataset::check_value_index;

/// Returns `true` if `a` and `b` have the same geometry.
///
/// The ranks must match. Rectangular datasets compare dimensions; ragged ones
/// compare the length of every row, recursively. Values are not compared.
///
/// ```
/// use qubeops::{ArrayDataset, JoinDataset, geometry_equal};
/// let a = ArrayDataset::zeros([2, 3]).unwrap();
/// let b = ArrayDataset::zeros([2, 3]).unwrap();
/// let c = JoinDataset::new(vec![
///     ArrayDataset::zeros([3]).unwrap().into(),
///     ArrayDataset::zeros([4]).unwrap().into(),
/// ]).unwrap();
/// assert!(geometry_equal(&a, &b));
/// assert!(!geometry_equal(&a, &c));
/// ```
pub fn geometry_equal(a: &dyn Dataset, b: &dyn Dataset) -> bool {
    let rank = a.rank();
    if rank != b.rank() { return false; }
    if let (Some(da), Some(db)) = (a.qube_dims(), b.qube_dims()) { return da == db; }
    if rank > MAX_RANK { return false; }
    let mut index = [0; MAX_RANK];
    rows_equal(a, b, &mut index, 0, rank).unwrap_or(false)
}

/// Compare every row length below `index[..axis]`.
fn rows_equal(
    a: &dyn Dataset,
    b: &dyn Dataset,
    index: &mut [usize; MAX_RANK],
    axis: usize,
    rank: usize,
) -> Result<bool> {
    if axis == rank { return Ok(true); }
    let n = a.length(&index[..axis])?;
    if n != b.length(&index[..axis])? { return Ok(false); }
    if axis + 1 == rank { return Ok(true); }
    for i in 0..n {
        index[axis] = i;
        if !rows_equal(a, b, index, axis + 1, rank)? { return Ok(false); }
    }
    Ok(true)
}

// ----------------------------------------------------------------------------

/// A lower-rank dataset (the "source") viewed with the shape of a
/// higher-rank one (the "donor").
///
/// Shape queries go to the donor. Value queries go to the source, dropping
/// the trailing indices the source does not have. Properties come from the
/// source, except [`Key::Qube`], which describes the shape and so comes from
/// the donor.
///
/// The view holds both datasets for as long as it lives, which can keep a
/// large donor in memory.
///
/// ```
/// use qubeops::{Dataset, ArrayDataset, promote_from1};
/// let a = ArrayDataset::rank1(vec![10.0, 20.0]);
/// let b = ArrayDataset::zeros([2, 3]).unwrap();
/// let p = promote_from1(&a, &b).unwrap();
/// assert_eq!(p.rank(), 2);
/// assert_eq!(p.value(&[1, 2]).unwrap(), 20.0);
/// ```
#[derive(Debug, Copy, Clone)]
pub struct Promoted<S, D> {
    source: S,
    donor: D,
}

impl<S: Dataset, D: Dataset> Promoted<S, D> {
    fn new(source: S, donor: D) -> Result<Self> {
        let (from, onto) = (source.rank(), donor.rank());
        if onto <= from || onto > MAX_RANK { return Err(Error::RankMismatch {from, onto}); }
        Ok(Promoted {source, donor})
    }

    pub fn source(&self) -> &S { &self.source }

    pub fn donor(&self) -> &D { &self.donor }
}

impl<S: Dataset, D: Dataset> Dataset for Promoted<S, D> {
    #[inline(always)]
    fn rank(&self) -> usize { self.donor.rank() }

    #[inline(always)]
    fn length(&self, index: &[usize]) -> Result<usize> { self.donor.length(index) }

    #[inline(always)]
    fn value(&self, index: &[usize]) -> Result<f64> {
        check_value_index(self.donor.rank(), index)?;
        self.source.value(&index[..self.source.rank()])
    }

    fn property(&self, key: Key) -> Option<Value> {
        match key {
            Key::Qube => self.donor.property(key),
            _ => self.source.property(key),
        }
    }

    fn property_at(&self, key: Key, i: usize) -> Option<Value> { self.source.property_at(key, i) }

    fn qube_dims(&self) -> Option<Vec<usize>> { self.donor.qube_dims() }
}

/// Promote a rank 0 `source` to the shape of `donor`.
///
/// ```
/// use qubeops::{Dataset, ArrayDataset, promote_from0};
/// let s = ArrayDataset::scalar(4.0);
/// let d = ArrayDataset::zeros([2, 2]).unwrap();
/// let p = promote_from0(&s, &d).unwrap();
/// assert_eq!(p.value(&[1, 1]).unwrap(), 4.0);
/// assert_eq!(p.qube_dims(), Some(vec![2, 2]));
/// ```
pub fn promote_from0<S: Dataset, D: Dataset>(source: S, donor: D) -> Result<Promoted<S, D>> {
    if source.rank() != 0 { return Err(Error::RankMismatch {from: source.rank(), onto: 0}); }
    Promoted::new(source, donor)
}

/// Promote a rank 1 `source` to the shape of `donor`. The lengths of their
/// first axes must match.
pub fn promote_from1<S: Dataset, D: Dataset>(source: S, donor: D) -> Result<Promoted<S, D>> {
    if source.rank() != 1 { return Err(Error::RankMismatch {from: source.rank(), onto: 1}); }
    let ret = Promoted::new(source, donor)?;
    check_lengths(&ret.source, &ret.donor, &[])?;
    Ok(ret)
}

/// Promote a rank 2 `source` to the shape of `donor`. The lengths of their
/// first axes must match, and so must the length of every row.
pub fn promote_from2<S: Dataset, D: Dataset>(source: S, donor: D) -> Result<Promoted<S, D>> {
    if source.rank() != 2 { return Err(Error::RankMismatch {from: source.rank(), onto: 2}); }
    let ret = Promoted::new(source, donor)?;
    let n = check_lengths(&ret.source, &ret.donor, &[])?;
    for i in 0..n { check_lengths(&ret.source, &ret.donor, &[i])?; }
    Ok(ret)
}

fn check_lengths(source: &impl Dataset, donor: &impl Dataset, index: &[usize]) -> Result<usize> {
    let (left, right) = (source.length(index)?, donor.length(index)?);
    if left != right { return Err(Error::IncompatibleLengths {left, right}); }
    Ok(left)
}

// ----------------------------------------------------------------------------

/// One side of a [`Reconciled`] pair: either an input as given, or an input
/// promoted to the shape of the other.
#[derive(Debug, Copy, Clone)]
pub enum Operand<'a> {
    Given(&'a dyn Dataset),
    Promoted(Promoted<&'a dyn Dataset, &'a dyn Dataset>),
}

impl<'a> Operand<'a> {
    pub fn is_promoted(&self) -> bool { matches!(self, Operand::Promoted(_)) }

    /// The dataset this operand reads its values from.
    pub fn source(&self) -> &'a dyn Dataset {
        match *self {
            Operand::Given(ds) => ds,
            Operand::Promoted(p) => p.source,
        }
    }
}

impl<'a> Dataset for Operand<'a> {
    #[inline(always)]
    fn rank(&self) -> usize {
        match self { Operand::Given(ds) => ds.rank(), Operand::Promoted(p) => p.rank() }
    }

    #[inline(always)]
    fn length(&self, index: &[usize]) -> Result<usize> {
        match self { Operand::Given(ds) => ds.length(index), Operand::Promoted(p) => p.length(index) }
    }

    #[inline(always)]
    fn value(&self, index: &[usize]) -> Result<f64> {
        match self { Operand::Given(ds) => ds.value(index), Operand::Promoted(p) => p.value(index) }
    }

    fn property(&self, key: Key) -> Option<Value> {
        match self { Operand::Given(ds) => ds.property(key), Operand::Promoted(p) => p.property(key) }
    }

    fn property_at(&self, key: Key, i: usize) -> Option<Value> {
        match self {
            Operand::Given(ds) => ds.property_at(key, i),
            Operand::Promoted(p) => p.property_at(key, i),
        }
    }

    fn qube_dims(&self) -> Option<Vec<usize>> {
        match self { Operand::Given(ds) => ds.qube_dims(), Operand::Promoted(p) => p.qube_dims() }
    }
}

/// Two datasets brought to the same geometry by [`reconcile()`].
#[derive(Debug)]
pub struct Reconciled<'a> {
    pub first: Operand<'a>,
    pub second: Operand<'a>,
    /// A writable buffer for the combined result, if one was asked for.
    pub result: Option<Buffer>,
}

/// Bring `a` and `b` to a common geometry, promoting the one of lower rank.
///
/// Datasets of equal rank must already have equal geometry; they are passed
/// through unchanged. Otherwise the lower-rank one, which must have rank 0, 1
/// or 2, is promoted onto the other.
///
/// If `need_result`, also allocates a buffer for the result: a rectangular
/// one shaped like whichever operand is a qube (preferring `a`), or, if
/// neither is and `b` has rank 0, a copy of `a`.
///
/// ```
/// use qubeops::{Dataset, ArrayDataset, reconcile};
/// let a = ArrayDataset::rank1(vec![1.0, 2.0, 3.0]);
/// let b = ArrayDataset::scalar(2.0);
/// let r = reconcile(&a, &b, true).unwrap();
/// assert!(r.second.is_promoted());
/// assert_eq!(r.second.value(&[2]).unwrap(), 2.0);
/// assert_eq!(r.result.unwrap().qube_dims(), Some(vec![3]));
/// ```
pub fn reconcile<'a>(a: &'a dyn Dataset, b: &'a dyn Dataset, need_result: bool) -> Result<Reconciled<'a>> {
    let (first, second) = match a.rank().cmp(&b.rank()) {
        std::cmp::Ordering::Equal => {
            if !geometry_equal(a, b) { return Err(Error::IncompatibleGeometry {rank: a.rank()}); }
            trace!("rank {} operands already share geometry", a.rank());
            (Operand::Given(a), Operand::Given(b))
        },
        std::cmp::Ordering::Less => (Operand::Promoted(promote(a, b)?), Operand::Given(b)),
        std::cmp::Ordering::Greater => (Operand::Given(a), Operand::Promoted(promote(b, a)?)),
    };
    let result = if need_result { Some(allocate_result(&first, &second, b.rank() == 0)?) } else { None };
    Ok(Reconciled {first, second, result})
}

fn promote<'a>(source: &'a dyn Dataset, donor: &'a dyn Dataset)
-> Result<Promoted<&'a dyn Dataset, &'a dyn Dataset>> {
    debug!("promoting rank {} operand onto rank {}", source.rank(), donor.rank());
    match source.rank() {
        0 => promote_from0(source, donor),
        1 => promote_from1(source, donor),
        2 => promote_from2(source, donor),
        rank => Err(Error::RankLimit {rank}),
    }
}

/// Allocate a buffer for the combination of `first` and `second`.
fn allocate_result(first: &Operand, second: &Operand, second_is_scalar: bool) -> Result<Buffer> {
    if let Some(dims) = first.qube_dims().or_else(|| second.qube_dims()) {
        return Ok(ArrayDataset::zeros(dims)?.into());
    }
    if second_is_scalar {
        debug!("no qube operand; copying the first operand as the result");
        return Buffer::copy_of(first);
    }
    Err(Error::NoQubeOperand)
}
