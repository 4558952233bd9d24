//! Applying a scalar binary operator elementwise to two datasets.

use log::{debug};
use rayon::prelude::*;

use super::{Error, Result, Dataset, WritableDataset, Key, Value, Buffer, Operand, Weights};
use super::{reconcile, weights_of, merge, each_index};

/// The value written wherever either input is invalid.
pub const FILL_VALUE: f64 = -1e31;

/// The number of workers [`Strategy::Parallel`] uses by default.
pub const DEFAULT_WORKERS: usize = 4;

/// How [`BinaryOp`] walks the reconciled operands.
///
/// All strategies give bit-identical results. `Direct` and `Parallel` only
/// apply when both reconciled operands have rank 1; otherwise they quietly
/// fall back to `Generic`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Walk every index tuple of the reconciled geometry, which may be
    /// ragged.
    #[default]
    Generic,
    /// A flat loop over `0..n` on the calling thread.
    Direct,
    /// Split `0..n` into `workers` interleaved slices, worker `w` taking
    /// `w, w + workers, w + 2 * workers, ...`, and run them concurrently.
    Parallel(usize),
}

impl Strategy {
    /// Create a strategy from a thread count.
    ///
    /// - `0` → parallel with rayon's current thread count
    /// - `1` → direct
    /// - `n > 1` → parallel with `n` workers
    pub fn from_threads(n_threads: usize) -> Self {
        match n_threads {
            0 => Strategy::Parallel(rayon::current_num_threads()),
            1 => Strategy::Direct,
            n => Strategy::Parallel(n),
        }
    }
}

// ----------------------------------------------------------------------------

/// An elementwise binary operator over datasets, built from a plain function
/// of two `f64`s.
///
/// ```
/// use qubeops::{Dataset, ArrayDataset, BinaryOp, Strategy, Key, Value, FILL_VALUE};
/// let a = ArrayDataset::rank1(vec![1.0, 2.0, 3.0]).with_property(Key::Depend0, "t");
/// let b = ArrayDataset::scalar(2.0);
/// let sum = BinaryOp::new(|x, y| x + y).strategy(Strategy::Direct).apply(&a, &b).unwrap();
/// assert_eq!(sum.as_slice(), Some(&[3.0, 4.0, 5.0][..]));
/// assert_eq!(sum.property(Key::Depend0), Some(Value::from("t")));
/// assert_eq!(sum.property(Key::FillValue), Some(Value::Number(FILL_VALUE)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BinaryOp<F> {
    op: F,
    strategy: Strategy,
    fill: f64,
}

impl<F: Fn(f64, f64) -> f64 + Send + Sync> BinaryOp<F> {
    pub fn new(op: F) -> Self {
        Self {op, strategy: Strategy::default(), fill: FILL_VALUE}
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Use `fill` instead of [`FILL_VALUE`] to mark invalid results.
    pub fn fill(mut self, fill: f64) -> Self {
        self.fill = fill;
        self
    }

    /// Combine `a` and `b` elementwise.
    ///
    /// The operands are reconciled first (see [`reconcile()`]). Wherever
    /// either operand is invalid the result holds the fill value, which is
    /// also recorded as the result's `FILL_VALUE` property. The other
    /// properties of the result come from [`merge()`].
    ///
    /// Operands of equal rank must have equal length.
    pub fn apply(&self, a: &dyn Dataset, b: &dyn Dataset) -> Result<Buffer> {
        if a.rank() == b.rank() && a.rank() > 0 {
            let (left, right) = (a.length(&[])?, b.length(&[])?);
            if left != right { return Err(Error::IncompatibleLengths {left, right}); }
        }
        let reconciled = reconcile(a, b, true)?;
        let (first, second) = (reconciled.first, reconciled.second);
        let mut result = reconciled.result.ok_or(Error::NoQubeOperand)?;
        let (w1, w2) = (weights_of(first), weights_of(second));
        let pair = Pair {first, second, w1, w2};

        let fast = match (self.strategy, pair.flat_len()) {
            (Strategy::Generic, _) | (_, None) => None,
            (strategy, Some(n)) => Some((strategy, n)),
        };
        match (fast, &mut result) {
            (Some((Strategy::Parallel(workers), n)), Buffer::Array(out)) => {
                debug!("parallel loop over {n} values with {workers} workers");
                self.run_parallel(&pair, out.as_mut_slice(), n, workers)?;
            },
            (Some((_, n)), Buffer::Array(out)) => {
                debug!("direct loop over {n} values");
                self.run_direct(&pair, out.as_mut_slice(), n)?;
            },
            (_, result) => {
                if self.strategy != Strategy::Generic {
                    debug!("{:?} needs rank 1 operands; using the generic walk", self.strategy);
                }
                self.run_generic(&pair, result)?;
            },
        }

        let properties = merge(&first, &second, a.rank() == 0, b.rank() == 0);
        properties.apply_to(&mut result);
        result.put_property(Key::FillValue, Value::Number(self.fill));
        Ok(result)
    }

    /// Visit every index tuple of the reconciled geometry.
    fn run_generic(&self, pair: &Pair, result: &mut Buffer) -> Result<()> {
        each_index(&pair.first, |index| {
            let x = self.at(pair, index)?;
            result.set_value(index, x)
        })
    }

    fn run_direct(&self, pair: &Pair, out: &mut [f64], n: usize) -> Result<()> {
        for (i, item) in out.iter_mut().enumerate().take(n) {
            *item = self.at(pair, &[i])?;
        }
        Ok(())
    }

    /// Each worker computes its own interleaved slice; the slices are then
    /// written back into `out` once every worker has finished.
    ///
    /// Runs on the current rayon pool if it has at least `workers` threads.
    /// Otherwise a pool of `workers` threads is built for this call alone.
    fn run_parallel(&self, pair: &Pair, out: &mut [f64], n: usize, workers: usize) -> Result<()> {
        let workers = workers.max(1);
        let gather = || {
            (0..workers).into_par_iter().map(|w| {
                (w..n).step_by(workers).map(|i| self.at(pair, &[i])).collect::<Result<Vec<f64>>>()
            }).collect::<Result<Vec<_>>>()
        };
        let slices: Vec<Vec<f64>> = if workers <= rayon::current_num_threads() {
            gather()?
        } else {
            debug!("building a pool of {workers} threads");
            rayon::ThreadPoolBuilder::new().num_threads(workers).build()?.install(gather)?
        };
        for (w, slice) in slices.into_iter().enumerate() {
            for (k, x) in slice.into_iter().enumerate() { out[w + k * workers] = x; }
        }
        Ok(())
    }

    /// The result at `index`.
    #[inline(always)]
    fn at(&self, pair: &Pair, index: &[usize]) -> Result<f64> {
        let x = pair.first.value(index)?;
        let y = pair.second.value(index)?;
        if pair.w1.value(index)? == 0.0 || pair.w2.value(index)? == 0.0 {
            Ok(self.fill)
        } else {
            Ok((self.op)(x, y))
        }
    }
}

/// Reconciled operands with their weights.
struct Pair<'a> {
    first: Operand<'a>,
    second: Operand<'a>,
    w1: Weights<Operand<'a>>,
    w2: Weights<Operand<'a>>,
}

impl<'a> Pair<'a> {
    /// The length of both operands, if they are rank 1 and rectangular.
    fn flat_len(&self) -> Option<usize> {
        match (self.first.qube_dims()?.as_slice(), self.second.qube_dims()?.as_slice()) {
            (&[n], &[m]) if n == m => Some(n),
            _ => None,
        }
    }
}

// ----------------------------------------------------------------------------

/// Combine `a` and `b` elementwise with `op`, walking every index tuple.
///
/// ```
/// use qubeops::{ArrayDataset, apply_binary_op};
/// let a = ArrayDataset::new([2, 2], [1.0, 2.0, 3.0, 4.0]).unwrap();
/// let b = ArrayDataset::rank1(vec![10.0, 100.0]);
/// let r = apply_binary_op(&a, &b, |x, y| x * y).unwrap();
/// assert_eq!(r.as_slice(), Some(&[10.0, 20.0, 300.0, 400.0][..]));
/// ```
pub fn apply_binary_op(
    a: &dyn Dataset,
    b: &dyn Dataset,
    op: impl Fn(f64, f64) -> f64 + Send + Sync,
) -> Result<Buffer> {
    BinaryOp::new(op).apply(a, b)
}

/// Like [`apply_binary_op()`], but a rank 1 pair is combined with a flat loop.
pub fn apply_binary_op_direct(
    a: &dyn Dataset,
    b: &dyn Dataset,
    op: impl Fn(f64, f64) -> f64 + Send + Sync,
) -> Result<Buffer> {
    BinaryOp::new(op).strategy(Strategy::Direct).apply(a, b)
}

/// Like [`apply_binary_op()`], but a rank 1 pair is combined by
/// [`DEFAULT_WORKERS`] concurrent workers.
pub fn apply_binary_op_parallel(
    a: &dyn Dataset,
    b: &dyn Dataset,
    op: impl Fn(f64, f64) -> f64 + Send + Sync,
) -> Result<Buffer> {
    BinaryOp::new(op).strategy(Strategy::Parallel(DEFAULT_WORKERS)).apply(a, b)
}
