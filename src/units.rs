//! Physical units and conversion between them.

use std::fmt;

/// The physical quantity a [`Units`] measures. Conversion is only possible
/// within a family.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum Family {
    Dimensionless,
    Time,
    Length,
    Frequency,
    Energy,
}

/// A unit of measurement.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum Units {
    Dimensionless,
    Percent,
    Seconds,
    Milliseconds,
    Microseconds,
    Nanoseconds,
    Minutes,
    Hours,
    Days,
    Meters,
    Kilometers,
    Centimeters,
    Hertz,
    Kilohertz,
    Megahertz,
    ElectronVolts,
    KiloElectronVolts,
}

impl Units {
    pub fn family(self) -> Family {
        match self {
            Units::Dimensionless | Units::Percent => Family::Dimensionless,
            Units::Seconds | Units::Milliseconds | Units::Microseconds | Units::Nanoseconds
            | Units::Minutes | Units::Hours | Units::Days => Family::Time,
            Units::Meters | Units::Kilometers | Units::Centimeters => Family::Length,
            Units::Hertz | Units::Kilohertz | Units::Megahertz => Family::Frequency,
            Units::ElectronVolts | Units::KiloElectronVolts => Family::Energy,
        }
    }

    /// How many of the family's base unit one of `self` is.
    pub fn scale(self) -> f64 {
        match self {
            Units::Dimensionless => 1.0,
            Units::Percent => 0.01,
            Units::Seconds => 1.0,
            Units::Milliseconds => 1e-3,
            Units::Microseconds => 1e-6,
            Units::Nanoseconds => 1e-9,
            Units::Minutes => 60.0,
            Units::Hours => 3600.0,
            Units::Days => 86400.0,
            Units::Meters => 1.0,
            Units::Kilometers => 1e3,
            Units::Centimeters => 1e-2,
            Units::Hertz => 1.0,
            Units::Kilohertz => 1e3,
            Units::Megahertz => 1e6,
            Units::ElectronVolts => 1.0,
            Units::KiloElectronVolts => 1e3,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Units::Dimensionless => "",
            Units::Percent => "%",
            Units::Seconds => "s",
            Units::Milliseconds => "ms",
            Units::Microseconds => "μs",
            Units::Nanoseconds => "ns",
            Units::Minutes => "min",
            Units::Hours => "hr",
            Units::Days => "days",
            Units::Meters => "m",
            Units::Kilometers => "km",
            Units::Centimeters => "cm",
            Units::Hertz => "Hz",
            Units::Kilohertz => "kHz",
            Units::Megahertz => "MHz",
            Units::ElectronVolts => "eV",
            Units::KiloElectronVolts => "keV",
        }
    }

    pub fn is_convertible_to(self, other: Units) -> bool { self.family() == other.family() }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str(self.symbol()) }
}

// ----------------------------------------------------------------------------

/// Converts values from one unit to another.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Converter {
    factor: f64,
}

impl Converter {
    pub const IDENTITY: Converter = Converter {factor: 1.0};

    #[inline(always)]
    pub fn convert(&self, x: f64) -> f64 {
        if self.factor == 1.0 { x } else { x * self.factor }
    }

    pub fn is_identity(&self) -> bool { self.factor == 1.0 }
}

/// Returns a [`Converter`] from `from` to `to`.
///
/// The conversion is "loose": a missing unit on either side, or units of
/// different families, are treated as already commensurate and give the
/// identity.
///
/// ```
/// use qubeops::{Units, loose_converter};
/// assert_eq!(loose_converter(Some(Units::Kilometers), Some(Units::Meters)).convert(1.5), 1500.0);
/// assert_eq!(loose_converter(Some(Units::Seconds), Some(Units::Meters)).convert(1.5), 1.5);
/// assert_eq!(loose_converter(None, Some(Units::Meters)).convert(1.5), 1.5);
/// ```
pub fn loose_converter(from: Option<Units>, to: Option<Units>) -> Converter {
    match (from, to) {
        (Some(from), Some(to)) if from != to && from.is_convertible_to(to) => {
            Converter {factor: from.scale() / to.scale()}
        },
        _ => Converter::IDENTITY,
    }
}
