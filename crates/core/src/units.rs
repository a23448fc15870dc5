//! Fixed-precision board units.
//!
//! Coordinates are stored as signed nanometers, the format's smallest
//! addressable unit. No coordinate field is ever held as a host float, so
//! a parse -> format round trip cannot drift. Parsing goes through
//! [`Decimal`] to keep the token's exact value before scaling.

use crate::error::SchemaError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;

const NM_PER_MM: i64 = 1_000_000;

/// A length or position component in nanometers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord(i64);

impl Coord {
    pub const ZERO: Coord = Coord(0);

    pub fn from_nm(nm: i64) -> Coord {
        Coord(nm)
    }

    pub fn nm(self) -> i64 {
        self.0
    }

    /// Millimeters as a float, for length arithmetic only -- never for
    /// storage or formatting.
    pub fn mm(self) -> f64 {
        self.0 as f64 / NM_PER_MM as f64
    }

    /// Exact conversion from a millimeter token value. Values finer than
    /// one nanometer are rounded to the nearest nanometer, matching the
    /// source tool's own resolution.
    pub fn from_mm_decimal(mm: Decimal) -> Option<Coord> {
        let nm = (mm * Decimal::from(NM_PER_MM)).round();
        nm.to_i64().map(Coord)
    }

    /// Convenience for literal values in tests and factory defaults.
    pub fn from_mm_str(mm: &str) -> Coord {
        let d: Decimal = mm.parse().expect("invalid coordinate literal");
        Coord::from_mm_decimal(d).expect("coordinate out of range")
    }
}

/// Canonical rendering: millimeters with trailing zeros trimmed but at
/// least one post-decimal digit retained, so whole values render as
/// `50.0` and fractional ones as `0.25`.
impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / NM_PER_MM as u64;
        let frac = abs % NM_PER_MM as u64;
        if frac == 0 {
            return write!(f, "{sign}{whole}.0");
        }
        let mut digits = format!("{frac:06}");
        while digits.ends_with('0') {
            digits.pop();
        }
        write!(f, "{sign}{whole}.{digits}")
    }
}

/// An angle in degrees, kept as an exact decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Angle(Decimal);

impl Angle {
    pub const ZERO: Angle = Angle(Decimal::ZERO);

    pub fn from_degrees(deg: Decimal) -> Angle {
        Angle(deg)
    }

    pub fn degrees(self) -> Decimal {
        self.0
    }
}

impl Default for Angle {
    fn default() -> Self {
        Angle::ZERO
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let normalized = self.0.normalize();
        if normalized.is_integer() {
            write!(f, "{normalized}.0")
        } else {
            write!(f, "{normalized}")
        }
    }
}

/// A two-value coordinate pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    pub fn new(x: Coord, y: Coord) -> Point {
        Point { x, y }
    }

    pub fn from_mm(x: &str, y: &str) -> Point {
        Point {
            x: Coord::from_mm_str(x),
            y: Coord::from_mm_str(y),
        }
    }

    /// Euclidean distance in millimeters.
    pub fn distance_mm(self, other: Point) -> f64 {
        let dx = self.x.mm() - other.x.mm();
        let dy = self.y.mm() - other.y.mm();
        (dx * dx + dy * dy).sqrt()
    }
}

/// A position group: two coordinates plus an optional rotation. The
/// rotation is omitted from output when absent, matching the source
/// format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct At {
    pub x: Coord,
    pub y: Coord,
    pub rotation: Option<Angle>,
}

impl At {
    pub fn new(x: Coord, y: Coord) -> At {
        At {
            x,
            y,
            rotation: None,
        }
    }

    pub fn with_rotation(x: Coord, y: Coord, rotation: Angle) -> At {
        At {
            x,
            y,
            rotation: Some(rotation),
        }
    }

    pub fn point(self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }
}

/// Read a coordinate out of a numeric node value, failing with a schema
/// error that names the owning tag and field.
pub(crate) fn coord_from(
    value: Decimal,
    tag: &'static str,
    field: &'static str,
) -> Result<Coord, SchemaError> {
    Coord::from_mm_decimal(value)
        .ok_or_else(|| SchemaError::invalid(tag, field, format!("coordinate out of range: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_values_keep_one_decimal_digit() {
        assert_eq!(Coord::from_mm_str("50").to_string(), "50.0");
        assert_eq!(Coord::from_mm_str("-3").to_string(), "-3.0");
        assert_eq!(Coord::ZERO.to_string(), "0.0");
    }

    #[test]
    fn trailing_zeros_are_trimmed() {
        assert_eq!(Coord::from_mm_str("0.250").to_string(), "0.25");
        assert_eq!(Coord::from_mm_str("1.500000").to_string(), "1.5");
        assert_eq!(Coord::from_mm_str("-0.875").to_string(), "-0.875");
    }

    #[test]
    fn full_native_precision_survives() {
        assert_eq!(Coord::from_mm_str("1.234567").nm(), 1_234_567);
        assert_eq!(Coord::from_mm_str("1.234567").to_string(), "1.234567");
    }

    #[test]
    fn sub_nanometer_input_rounds() {
        let c = Coord::from_mm_decimal("0.0000004".parse().unwrap()).unwrap();
        assert_eq!(c.nm(), 0);
    }

    #[test]
    fn angle_rendering_matches_coordinate_style() {
        assert_eq!(Angle::from_degrees("90".parse().unwrap()).to_string(), "90.0");
        assert_eq!(Angle::from_degrees("45.5".parse().unwrap()).to_string(), "45.5");
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Point::from_mm("0", "0");
        let b = Point::from_mm("3", "4");
        assert!((a.distance_mm(b) - 5.0).abs() < 1e-9);
    }
}
