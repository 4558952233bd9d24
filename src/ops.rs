//! Generic programming over binary operators on datasets.
//!
//! For each operator this module contains a type that cannot be instantiated
//! and that implements [`Binary`], and a function of the same name in lower
//! case that applies it. For example, [`Add`] corresponds to [`add()`]. The
//! types can be passed as a type parameter to generic code, e.g.
//! [`apply_with()`].
//!
//! Comparisons and additive operators first convert the second operand into
//! the units of the first, using [`loose_converter()`].
//!
//! [`loose_converter()`]: super::loose_converter

use super::{Result, Dataset, Buffer, BinaryOp, Strategy, Key, Value, loose_converter};

/// A function that combines two `f64`s.
///
/// This trait has no methods that take `self`. It makes sense to implement it
/// for types that cannot be instantiated, such as empty enumerations.
pub trait Binary {
    /// Whether the second operand is converted to the first operand's units
    /// before [`call()`].
    ///
    /// [`call()`]: Self::call()
    const COMMENSURATE: bool = false;

    fn call(x: f64, y: f64) -> f64;
}

/// Apply `B` elementwise to `a` and `b` using `strategy`.
pub fn apply_with<B: Binary>(a: &dyn Dataset, b: &dyn Dataset, strategy: Strategy) -> Result<Buffer> {
    let converter = if B::COMMENSURATE {
        let units = |ds: &dyn Dataset| ds.property(Key::Units).as_ref().and_then(Value::as_units);
        loose_converter(units(b), units(a))
    } else {
        super::Converter::IDENTITY
    };
    BinaryOp::new(move |x, y| B::call(x, converter.convert(y))).strategy(strategy).apply(a, b)
}

/// Apply `B` elementwise to `a` and `b`.
pub fn apply<B: Binary>(a: &dyn Dataset, b: &dyn Dataset) -> Result<Buffer> {
    apply_with::<B>(a, b, Strategy::default())
}

fn truth(b: bool) -> f64 { if b { 1.0 } else { 0.0 } }

macro_rules! binary {
    ($(#[$doc:meta])* $ty:ident, $f:ident, $commensurate:literal, |$x:ident, $y:ident| $body:expr) => {
        $(#[$doc])*
        pub enum $ty {}

        impl Binary for $ty {
            const COMMENSURATE: bool = $commensurate;
            #[inline(always)]
            fn call($x: f64, $y: f64) -> f64 { $body }
        }

        $(#[$doc])*
        pub fn $f(a: &dyn Dataset, b: &dyn Dataset) -> Result<Buffer> { apply::<$ty>(a, b) }
    };
}

// ----------------------------------------------------------------------------

binary!(/// `x + y`.
    Add, add, true, |x, y| x + y);
binary!(/// `x - y`.
    Subtract, subtract, true, |x, y| x - y);
binary!(/// `x * y`.
    Multiply, multiply, false, |x, y| x * y);
binary!(/// `x / y`.
    Divide, divide, false, |x, y| x / y);
binary!(/// `x % y`, with the sign of `x`.
    Modulo, modulo, false, |x, y| x % y);
binary!(/// `x` raised to the power `y`.
    Pow, pow, false, |x, y| x.powf(y));
binary!(/// The four-quadrant arctangent of `x / y`.
    Atan2, atan2, false, |x, y| x.atan2(y));
binary!(/// The smaller of `x` and `y`.
    Min, min, true, |x, y| x.min(y));
binary!(/// The larger of `x` and `y`.
    Max, max, true, |x, y| x.max(y));

// ----------------------------------------------------------------------------

binary!(
    /// `1.0` where `x == y`, else `0.0`.
    ///
    /// ```
    /// use qubeops::{ArrayDataset, FILL_VALUE, ops::eq};
    /// let a = ArrayDataset::rank1(vec![1.0, f64::NAN]);
    /// let b = ArrayDataset::rank1(vec![1.0, 1.0]);
    /// let r = eq(&a, &b).unwrap();
    /// assert_eq!(r.as_slice(), Some(&[1.0, FILL_VALUE][..]));
    /// ```
    Eq, eq, true, |x, y| truth(x == y)
);
binary!(/// `1.0` where `x != y`, else `0.0`.
    Ne, ne, true, |x, y| truth(x != y));
binary!(/// `1.0` where `x < y`, else `0.0`.
    Lt, lt, true, |x, y| truth(x < y));
binary!(/// `1.0` where `x <= y`, else `0.0`.
    Le, le, true, |x, y| truth(x <= y));
binary!(/// `1.0` where `x > y`, else `0.0`.
    Gt, gt, true, |x, y| truth(x > y));
binary!(/// `1.0` where `x >= y`, else `0.0`.
    Ge, ge, true, |x, y| truth(x >= y));
