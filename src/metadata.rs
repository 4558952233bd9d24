//! Merging the metadata of two operands into the metadata of their result.

use log::{trace};

use super::{Dataset, Key, Properties};

/// The properties of `ds` that take part in a merge: the structural keys and
/// [`Key::Qube`]. Anything else never survives a merge, so it must not make
/// an operand look as if it carries context.
pub fn extract(ds: &(impl Dataset + ?Sized)) -> Properties {
    Properties::subset(ds, Key::ALL.iter().copied().filter(|k| k.is_structural() || *k == Key::Qube))
}

/// Merge the properties of two reconciled operands into the properties of
/// the dataset obtained by combining them elementwise.
///
/// - `first_is_scalar`, `second_is_scalar` - whether each operand had rank 0
///   before it was reconciled.
///
/// The result is a qube if either operand is. A structural property
/// (`DEPEND_n`, `BINS_n`, `CONTEXT_0`) survives if both operands agree on it.
/// An operand with no metadata, or a rank 0 operand, contributes no context,
/// so the other operand's structural properties survive unopposed.
/// Properties describing the physical quantity (units, labels, valid range,
/// ...) and `BUNDLE_1` never survive.
///
/// ```
/// use qubeops::{ArrayDataset, Key, Value, merge};
/// let a = ArrayDataset::rank1(vec![1.0, 2.0])
///     .with_property(Key::Depend0, "t")
///     .with_property(Key::Label, "flux");
/// let s = ArrayDataset::scalar(2.0).with_property(Key::Label, "gain");
/// let m = merge(&a, &s, false, true);
/// assert_eq!(m.get(Key::Depend0), Some(&Value::from("t")));
/// assert_eq!(m.get(Key::Label), None);
/// assert_eq!(m.qube(), Some(true));
/// ```
pub fn merge(
    first: &dyn Dataset,
    second: &dyn Dataset,
    first_is_scalar: bool,
    second_is_scalar: bool,
) -> Properties {
    let mut m1 = extract(first);
    let mut m2 = extract(second);
    let is_qube = m1.qube() == Some(true) || m2.qube() == Some(true);
    m1.remove(Key::Qube);
    m2.remove(Key::Qube);
    if m1.is_empty() || first_is_scalar { backfill(&mut m1, &m2); }
    if m2.is_empty() || second_is_scalar { backfill(&mut m2, &m1); }
    let mut ret = m1.intersect(&m2);
    if is_qube { ret.insert(Key::Qube, true); }
    ret.retain(|key, _| !key.is_dimensional() && key != Key::Bundle1);
    trace!("merged properties: {:?}", ret.keys().collect::<Vec<_>>());
    ret
}

/// Copy the structural properties of `from` into `to`.
fn backfill(to: &mut Properties, from: &Properties) {
    for (key, value) in from.iter() {
        if key.is_structural() { to.insert(key, value.clone()); }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArrayDataset, Value};

    fn with_depend0(name: &str) -> ArrayDataset {
        ArrayDataset::rank1(vec![1.0, 2.0, 3.0]).with_property(Key::Depend0, name)
    }

    #[test]
    fn agreeing_depend_survives() {
        let m = merge(&with_depend0("t"), &with_depend0("t"), false, false);
        assert_eq!(m.get(Key::Depend0), Some(&Value::from("t")));
    }

    #[test]
    fn disagreeing_depend_is_dropped() {
        let m = merge(&with_depend0("t"), &with_depend0("u"), false, false);
        assert_eq!(m.get(Key::Depend0), None);
        assert_eq!(m.qube(), Some(true));
    }

    #[test]
    fn bare_operand_defers_to_the_other() {
        let bare = ArrayDataset::rank1(vec![0.0, 0.0, 0.0]);
        let m = merge(&bare, &with_depend0("t"), false, false);
        assert_eq!(m.get(Key::Depend0), Some(&Value::from("t")));
    }

    #[test]
    fn scalar_context_is_overridden() {
        let s = ArrayDataset::scalar(1.0)
            .with_property(Key::Context0, "other")
            .with_property(Key::Units, crate::Units::Seconds);
        let a = with_depend0("t").with_property(Key::Context0, "mine");
        let m = merge(&a, &s, false, true);
        assert_eq!(m.get(Key::Context0), Some(&Value::from("mine")));
        assert_eq!(m.get(Key::Depend0), Some(&Value::from("t")));
        assert_eq!(m.get(Key::Units), None);
    }

    #[test]
    fn descriptive_properties_are_not_context() {
        let fill_only = ArrayDataset::rank1(vec![0.0, 0.0, 0.0])
            .with_property(Key::FillValue, -1.0)
            .with_property(Key::Label, "counts");
        let units_only = ArrayDataset::rank1(vec![0.0, 0.0, 0.0])
            .with_property(Key::Units, crate::Units::Seconds);
        assert_eq!(extract(&fill_only).keys().collect::<Vec<_>>(), [Key::Qube]);
        let m = merge(&with_depend0("t"), &fill_only, false, false);
        assert_eq!(m.get(Key::Depend0), Some(&Value::from("t")));
        let m = merge(&units_only, &with_depend0("t"), false, false);
        assert_eq!(m.get(Key::Depend0), Some(&Value::from("t")));
        assert!(!m.contains(Key::Units));
    }

    #[test]
    fn bundle_and_dimensional_keys_are_stripped() {
        let a = with_depend0("t")
            .with_property(Key::Bundle1, "columns")
            .with_property(Key::Label, "flux")
            .with_property(Key::FillValue, -1.0);
        let m = merge(&a, &a, false, false);
        assert_eq!(m.keys().collect::<Vec<_>>(), [Key::Depend0, Key::Qube]);
    }
}
