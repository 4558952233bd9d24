//! Walking the index tuples of a [`Dataset`].

use super::{Error, Result, Dataset};

/// The highest rank of any [`Dataset`].
pub const MAX_RANK: usize = 4;

/// Call `f` with every valid index tuple of `ds`, in row-major order.
///
/// This follows the geometry of `ds` row by row, so it is correct for ragged
/// datasets. A rank 0 dataset has exactly one index tuple, `&[]`. Stops at the
/// first error returned by `f` or by a length query.
///
/// ```
/// use qubeops::{ArrayDataset, JoinDataset, each_index};
/// let j = JoinDataset::new(vec![
///     ArrayDataset::rank1(vec![1.0, 2.0]).into(),
///     ArrayDataset::rank1(vec![3.0]).into(),
/// ]).unwrap();
/// let mut seen = Vec::new();
/// each_index(&j, |i| { seen.push(i.to_vec()); Ok(()) }).unwrap();
/// assert_eq!(seen, [vec![0, 0], vec![0, 1], vec![1, 0]]);
/// ```
pub fn each_index<D: ?Sized + Dataset>(
    ds: &D,
    mut f: impl FnMut(&[usize]) -> Result<()>,
) -> Result<()> {
    let rank = ds.rank();
    if rank > MAX_RANK { return Err(Error::RankUnsupported(rank)); }
    let mut index = [0; MAX_RANK];
    walk(ds, &mut index, 0, rank, &mut f)
}

fn walk<D: ?Sized + Dataset, F: FnMut(&[usize]) -> Result<()>>(
    ds: &D,
    index: &mut [usize; MAX_RANK],
    axis: usize,
    rank: usize,
    f: &mut F,
) -> Result<()> {
    if axis == rank { return f(&index[..rank]); }
    for i in 0..ds.length(&index[..axis])? {
        index[axis] = i;
        walk(ds, index, axis + 1, rank, f)?;
    }
    Ok(())
}

/// The number of values in `ds`.
pub fn count<D: ?Sized + Dataset>(ds: &D) -> Result<usize> {
    if let Some(dims) = ds.qube_dims() { return Ok(dims.iter().product()); }
    let mut n = 0;
    each_index(ds, |_| { n += 1; Ok(()) })?;
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArrayDataset;

    #[test]
    fn scalar_has_one_index() {
        let mut n = 0;
        each_index(&ArrayDataset::scalar(1.0), |i| {
            assert!(i.is_empty());
            n += 1;
            Ok(())
        }).unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn qube_walk_matches_storage_order() {
        let a = ArrayDataset::from_fn([2, 3, 2], |i| (i[0] * 6 + i[1] * 2 + i[2]) as f64).unwrap();
        let mut expected = 0.0;
        each_index(&a, |i| {
            assert_eq!(a.value(i)?, expected);
            expected += 1.0;
            Ok(())
        }).unwrap();
        assert_eq!(count(&a).unwrap(), 12);
    }

    #[test]
    fn errors_stop_the_walk() {
        let a = ArrayDataset::zeros([5]).unwrap();
        let mut n = 0;
        let r = each_index(&a, |i| {
            n += 1;
            if i[0] == 2 { Err(Error::NoQubeOperand) } else { Ok(()) }
        });
        assert_eq!(r, Err(Error::NoQubeOperand));
        assert_eq!(n, 3);
    }
}
