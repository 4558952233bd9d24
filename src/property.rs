//! Metadata attached to a [`Dataset`].
//!
//! Properties are a closed set of [`Key`]s, each mapped to a typed [`Value`].
//! Keeping the key set closed means every merge rule can `match` on it
//! exhaustively.
//!
//! [`Dataset`]: super::Dataset

use std::collections::BTreeMap;
use std::fmt::{self, Debug};
use std::sync::Arc;

use super::{Dataset, Units, WritableDataset};

/// The recognized property keys.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Key {
    Depend0,
    Depend1,
    Depend2,
    Depend3,
    Bins0,
    Bins1,
    Context0,
    Bundle1,
    Qube,
    FillValue,
    ValidMin,
    ValidMax,
    Units,
    Label,
    Title,
    Format,
    ScaleType,
    TypicalMin,
    TypicalMax,
    Cadence,
    Name,
}

impl Key {
    pub const ALL: &'static [Key] = &[
        Key::Depend0, Key::Depend1, Key::Depend2, Key::Depend3,
        Key::Bins0, Key::Bins1, Key::Context0, Key::Bundle1, Key::Qube,
        Key::FillValue, Key::ValidMin, Key::ValidMax,
        Key::Units, Key::Label, Key::Title, Key::Format, Key::ScaleType,
        Key::TypicalMin, Key::TypicalMax, Key::Cadence, Key::Name,
    ];

    /// The `DEPEND_n` key for `axis`, if there is one.
    pub fn depend(axis: usize) -> Option<Key> {
        match axis {
            0 => Some(Key::Depend0),
            1 => Some(Key::Depend1),
            2 => Some(Key::Depend2),
            3 => Some(Key::Depend3),
            _ => None,
        }
    }

    /// The conventional upper-case name, e.g. `"DEPEND_0"`.
    pub fn name(self) -> &'static str {
        match self {
            Key::Depend0 => "DEPEND_0",
            Key::Depend1 => "DEPEND_1",
            Key::Depend2 => "DEPEND_2",
            Key::Depend3 => "DEPEND_3",
            Key::Bins0 => "BINS_0",
            Key::Bins1 => "BINS_1",
            Key::Context0 => "CONTEXT_0",
            Key::Bundle1 => "BUNDLE_1",
            Key::Qube => "QUBE",
            Key::FillValue => "FILL_VALUE",
            Key::ValidMin => "VALID_MIN",
            Key::ValidMax => "VALID_MAX",
            Key::Units => "UNITS",
            Key::Label => "LABEL",
            Key::Title => "TITLE",
            Key::Format => "FORMAT",
            Key::ScaleType => "SCALE_TYPE",
            Key::TypicalMin => "TYPICAL_MIN",
            Key::TypicalMax => "TYPICAL_MAX",
            Key::Cadence => "CADENCE",
            Key::Name => "NAME",
        }
    }

    /// True for keys linking an axis to the dataset that indexes it:
    /// `DEPEND_n`, `BINS_n` and `CONTEXT_0`.
    pub fn is_structural(self) -> bool {
        match self {
            Key::Depend0 | Key::Depend1 | Key::Depend2 | Key::Depend3
            | Key::Bins0 | Key::Bins1 | Key::Context0 => true,
            Key::Bundle1 | Key::Qube
            | Key::FillValue | Key::ValidMin | Key::ValidMax
            | Key::Units | Key::Label | Key::Title | Key::Format | Key::ScaleType
            | Key::TypicalMin | Key::TypicalMax | Key::Cadence | Key::Name => false,
        }
    }

    /// True for keys describing the physical quantity of the values. These
    /// stop being true once two datasets have been combined.
    pub fn is_dimensional(self) -> bool {
        match self {
            Key::FillValue | Key::ValidMin | Key::ValidMax
            | Key::Units | Key::Label | Key::Title | Key::Format | Key::ScaleType
            | Key::TypicalMin | Key::TypicalMax | Key::Cadence | Key::Name => true,
            Key::Depend0 | Key::Depend1 | Key::Depend2 | Key::Depend3
            | Key::Bins0 | Key::Bins1 | Key::Context0
            | Key::Bundle1 | Key::Qube => false,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str(self.name()) }
}

// ----------------------------------------------------------------------------

/// The value of a property.
#[derive(Clone)]
pub enum Value {
    /// Another dataset, e.g. the timetags a `DEPEND_0` points at.
    Dataset(Arc<dyn Dataset>),
    Bool(bool),
    Number(f64),
    Text(String),
    Units(Units),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Bool(b) = self { Some(*b) } else { None }
    }

    pub fn as_number(&self) -> Option<f64> {
        if let Value::Number(x) = self { Some(*x) } else { None }
    }

    pub fn as_units(&self) -> Option<Units> {
        if let Value::Units(u) = self { Some(*u) } else { None }
    }

    pub fn as_dataset(&self) -> Option<&Arc<dyn Dataset>> {
        if let Value::Dataset(ds) = self { Some(ds) } else { None }
    }
}

/// Datasets compare by identity, everything else by value.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Dataset(a), Value::Dataset(b)) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            },
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Units(a), Value::Units(b)) => a == b,
            _ => false,
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Dataset(ds) => write!(f, "Dataset(rank {})", ds.rank()),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(x) => write!(f, "Number({x})"),
            Value::Text(s) => write!(f, "Text({s:?})"),
            Value::Units(u) => write!(f, "Units({u})"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self { Value::Number(x) }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::Text(s.to_owned()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::Text(s) }
}

impl From<Units> for Value {
    fn from(u: Units) -> Self { Value::Units(u) }
}

impl From<Arc<dyn Dataset>> for Value {
    fn from(ds: Arc<dyn Dataset>) -> Self { Value::Dataset(ds) }
}

// ----------------------------------------------------------------------------

/// A bag of properties.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Properties(BTreeMap<Key, Value>);

impl Properties {
    pub fn new() -> Self { Self::default() }

    /// Collect the properties of `ds` named in `keys`.
    pub fn subset(ds: &(impl Dataset + ?Sized), keys: impl IntoIterator<Item=Key>) -> Self {
        let mut ret = Self::new();
        for key in keys {
            if let Some(value) = ds.property(key) { ret.insert(key, value); }
        }
        ret
    }

    pub fn get(&self, key: Key) -> Option<&Value> { self.0.get(&key) }

    pub fn insert(&mut self, key: Key, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key, value.into())
    }

    pub fn remove(&mut self, key: Key) -> Option<Value> { self.0.remove(&key) }

    pub fn contains(&self, key: Key) -> bool { self.0.contains_key(&key) }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn keys(&self) -> impl Iterator<Item=Key> + '_ { self.0.keys().copied() }

    pub fn iter(&self) -> impl Iterator<Item=(Key, &Value)> { self.0.iter().map(|(k, v)| (*k, v)) }

    /// Keep only the entries for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(Key, &Value) -> bool) {
        self.0.retain(|k, v| f(*k, v));
    }

    /// The entries present in both `self` and `other` with equal values.
    pub fn intersect(&self, other: &Properties) -> Properties {
        Properties(
            self.0.iter()
                .filter(|(k, v)| other.0.get(*k) == Some(*v))
                .map(|(k, v)| (*k, v.clone()))
                .collect()
        )
    }

    /// Write every entry onto `ds`.
    pub fn apply_to(&self, ds: &mut (impl WritableDataset + ?Sized)) {
        for (key, value) in self.iter() { ds.put_property(key, value.clone()); }
    }

    pub fn qube(&self) -> Option<bool> { self.get(Key::Qube).and_then(Value::as_bool) }

    pub fn fill_value(&self) -> Option<f64> { self.get(Key::FillValue).and_then(Value::as_number) }

    pub fn units(&self) -> Option<Units> { self.get(Key::Units).and_then(Value::as_units) }
}

impl FromIterator<(Key, Value)> for Properties {
    fn from_iter<T: IntoIterator<Item=(Key, Value)>>(iter: T) -> Self {
        Properties(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArrayDataset;

    #[test]
    fn intersect_keeps_equal_entries_only() {
        let mut a = Properties::new();
        a.insert(Key::Depend0, "t");
        a.insert(Key::Depend1, "y");
        a.insert(Key::Label, "flux");
        let mut b = Properties::new();
        b.insert(Key::Depend0, "t");
        b.insert(Key::Depend1, "energy");
        let c = a.intersect(&b);
        assert_eq!(c.keys().collect::<Vec<_>>(), [Key::Depend0]);
    }

    #[test]
    fn datasets_compare_by_identity() {
        let t: Arc<dyn Dataset> = Arc::new(ArrayDataset::rank1(vec![1.0, 2.0]));
        let same_values: Arc<dyn Dataset> = Arc::new(ArrayDataset::rank1(vec![1.0, 2.0]));
        assert_eq!(Value::Dataset(t.clone()), Value::Dataset(t.clone()));
        assert_ne!(Value::Dataset(t), Value::Dataset(same_values));
    }

    #[test]
    fn typed_accessors() {
        let t: Arc<dyn Dataset> = Arc::new(ArrayDataset::rank1(vec![1.0, 2.0]));
        let mut p = Properties::new();
        p.insert(Key::FillValue, -1e31);
        p.insert(Key::Units, Units::Kilometers);
        p.insert(Key::Depend0, t.clone());
        assert!(p.contains(Key::Units));
        assert!(!p.contains(Key::Label));
        assert_eq!(p.fill_value(), Some(-1e31));
        assert_eq!(p.units(), Some(Units::Kilometers));
        assert_eq!(p.qube(), None);
        let depend = p.get(Key::Depend0).and_then(Value::as_dataset).unwrap();
        assert!(Arc::ptr_eq(depend, &t));
        assert_eq!(depend.length(&[]).unwrap(), 2);
        assert!(Value::from(2.0).as_dataset().is_none());
    }

    #[test]
    fn key_groups_are_disjoint() {
        for &key in Key::ALL {
            assert!(!(key.is_structural() && key.is_dimensional()), "{key}");
        }
        assert_eq!(Key::depend(2), Some(Key::Depend2));
        assert_eq!(Key::depend(4), None);
    }
}
