//! Broadcasting and elementwise arithmetic over scientific measurement
//! datasets.
//!
//! A [`Dataset`] is a logical array of `f64`s of rank 0 to 4, carrying
//! [`Properties`] such as the fill value marking missing measurements and
//! the `DEPEND_n` datasets that index its axes. Datasets may be rectangular
//! ("qubes", e.g. [`ArrayDataset`]) or ragged, with inner lengths that vary
//! by outer index (e.g. [`JoinDataset`]).
//!
//! Combining two datasets happens in two steps. First, [`reconcile()`] brings
//! them to a common geometry: if their ranks differ, the lower-rank one is
//! wrapped in a [`Promoted`] view that repeats its values across the extra
//! axes of the other. Promotion never copies data. Then [`BinaryOp`] walks the
//! reconciled geometry applying a plain `Fn(f64, f64) -> f64`, writing
//! [`FILL_VALUE`] wherever either input is invalid according to its
//! [`Weights`], and [`merge()`]s the operands' metadata into the result.
//!
//! ```
//! use qubeops::{Dataset, ArrayDataset, Key, Value, apply_binary_op};
//! let a = ArrayDataset::rank1(vec![1.0, 2.0, 3.0]).with_property(Key::Depend0, "t");
//! let b = ArrayDataset::scalar(2.0);
//! let r = apply_binary_op(&a, &b, |x, y| x + y).unwrap();
//! assert_eq!(r.as_slice(), Some(&[3.0, 4.0, 5.0][..]));
//! assert_eq!(r.property(Key::Depend0), Some(Value::from("t")));
//! ```
//!
//! Named operators built on the engine live in [`ops`].

mod error;
pub use error::{Error, Result};

mod property;
pub use property::{Key, Value, Properties};

mod units;
pub use units::{Family, Units, Converter, loose_converter};

mod index;
pub use index::{MAX_RANK, each_index, count};

mod dataset;
pub use dataset::{Dataset, WritableDataset, Slice, qube_dims};

mod array;
pub use array::{ArrayDataset};

mod join;
pub use join::{JoinDataset};

mod buffer;
pub use buffer::{Buffer};

mod weights;
pub use weights::{Weights, weights_of};

mod broadcast;
pub use broadcast::{
    geometry_equal, Promoted, promote_from0, promote_from1, promote_from2,
    Operand, Reconciled, reconcile,
};

mod metadata;
pub use metadata::{extract, merge};

mod binary;
pub use binary::{
    FILL_VALUE, DEFAULT_WORKERS, Strategy, BinaryOp,
    apply_binary_op, apply_binary_op_direct, apply_binary_op_parallel,
};

pub mod ops;
pub use ops::{Binary, eq};
