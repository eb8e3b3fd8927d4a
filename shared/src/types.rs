//! Common types used across the platform

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Measurement unit for ingredient quantities.
///
/// `g`, `kg`, `ml`, `l` and `pcs` are the canonical units; anything else is
/// carried as [`Unit::Other`] and treated as incomparable rather than
/// rejected, so data with a unit this system does not know about still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Unit {
    Gram,
    Kilogram,
    Milliliter,
    Liter,
    Piece,
    Other(String),
}

/// Category of a unit, used to select the low-stock threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitClass {
    Mass,
    Volume,
    Count,
}

impl Unit {
    /// Parse a unit string. Unknown units become [`Unit::Other`], never an error.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "g" => Unit::Gram,
            "kg" => Unit::Kilogram,
            "ml" => Unit::Milliliter,
            "l" => Unit::Liter,
            "pcs" => Unit::Piece,
            other => Unit::Other(other.to_string()),
        }
    }

    /// The string representation stored in records.
    pub fn code(&self) -> &str {
        match self {
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Milliliter => "ml",
            Unit::Liter => "l",
            Unit::Piece => "pcs",
            Unit::Other(s) => s,
        }
    }

    /// Whether this is one of the five canonical units.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Unit::Other(_))
    }

    /// The base unit quantities are compared in (`kg` compares in `g`,
    /// `l` in `ml`). Unknown units pass through unchanged.
    pub fn base_unit(&self) -> Unit {
        match self {
            Unit::Kilogram => Unit::Gram,
            Unit::Liter => Unit::Milliliter,
            other => other.clone(),
        }
    }

    /// Convert a quantity in this unit to the base unit.
    ///
    /// `kg -> g` and `l -> ml` multiply by 1000; everything else, including
    /// unrecognized units, passes through unchanged.
    pub fn normalize(&self, quantity: Decimal) -> (Decimal, Unit) {
        match self {
            Unit::Kilogram => (quantity * Decimal::from(1000), Unit::Gram),
            Unit::Liter => (quantity * Decimal::from(1000), Unit::Milliliter),
            other => (quantity, other.clone()),
        }
    }

    /// Multiplier from this unit to its base unit.
    fn base_factor(&self) -> Decimal {
        match self {
            Unit::Kilogram | Unit::Liter => Decimal::from(1000),
            _ => Decimal::ONE,
        }
    }

    /// Convert a quantity in this unit to `target`. Returns `None` when the
    /// two units do not share a base unit; quantities in incompatible units
    /// cannot be compared or combined.
    pub fn convert(&self, quantity: Decimal, target: &Unit) -> Option<Decimal> {
        if self == target {
            return Some(quantity);
        }
        if !self.is_compatible_with(target) {
            return None;
        }
        Some(quantity * self.base_factor() / target.base_factor())
    }

    /// The unit class, or `None` for unrecognized units (callers skip
    /// threshold checks for those instead of failing).
    pub fn class(&self) -> Option<UnitClass> {
        match self {
            Unit::Gram | Unit::Kilogram => Some(UnitClass::Mass),
            Unit::Milliliter | Unit::Liter => Some(UnitClass::Volume),
            Unit::Piece => Some(UnitClass::Count),
            Unit::Other(_) => None,
        }
    }

    /// Two units are compatible when they normalize to the same base unit.
    pub fn is_compatible_with(&self, other: &Unit) -> bool {
        self.base_unit() == other.base_unit()
    }
}

impl From<String> for Unit {
    fn from(s: String) -> Self {
        Unit::parse(&s)
    }
}

impl From<Unit> for String {
    fn from(u: Unit) -> Self {
        u.code().to_string()
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Inclusive date range for queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: chrono::NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_parse_canonical_units() {
        assert_eq!(Unit::parse("g"), Unit::Gram);
        assert_eq!(Unit::parse("kg"), Unit::Kilogram);
        assert_eq!(Unit::parse("ml"), Unit::Milliliter);
        assert_eq!(Unit::parse("l"), Unit::Liter);
        assert_eq!(Unit::parse("pcs"), Unit::Piece);
    }

    #[test]
    fn test_parse_unknown_unit_passes_through() {
        let unit = Unit::parse("dozen");
        assert_eq!(unit, Unit::Other("dozen".to_string()));
        assert!(!unit.is_recognized());
        assert_eq!(unit.class(), None);
    }

    #[test]
    fn test_normalize_kg_to_g() {
        let (qty, base) = Unit::Kilogram.normalize(Decimal::new(25, 1)); // 2.5 kg
        assert_eq!(qty, Decimal::from(2500));
        assert_eq!(base, Unit::Gram);
    }

    #[test]
    fn test_normalize_l_to_ml() {
        let (qty, base) = Unit::Liter.normalize(Decimal::from(3));
        assert_eq!(qty, Decimal::from(3000));
        assert_eq!(base, Unit::Milliliter);
    }

    #[test]
    fn test_normalize_identity_units() {
        for unit in [Unit::Gram, Unit::Milliliter, Unit::Piece] {
            let (qty, base) = unit.normalize(Decimal::from(42));
            assert_eq!(qty, Decimal::from(42));
            assert_eq!(base, unit);
        }
    }

    #[test]
    fn test_normalize_unknown_unit_identity() {
        let unit = Unit::Other("bag".to_string());
        let (qty, base) = unit.normalize(Decimal::from(7));
        assert_eq!(qty, Decimal::from(7));
        assert_eq!(base, unit);
    }

    #[test]
    fn test_convert_between_compatible_units() {
        // 0.04 kg is 40 g
        assert_eq!(
            Unit::Kilogram.convert(Decimal::new(4, 2), &Unit::Gram),
            Some(Decimal::from(40))
        );
        // 40 g back to kg
        assert_eq!(
            Unit::Gram.convert(Decimal::from(40), &Unit::Kilogram),
            Some(Decimal::new(4, 2))
        );
        assert_eq!(
            Unit::Liter.convert(Decimal::new(15, 2), &Unit::Milliliter),
            Some(Decimal::from(150))
        );
    }

    #[test]
    fn test_convert_identity() {
        assert_eq!(
            Unit::Gram.convert(Decimal::from(7), &Unit::Gram),
            Some(Decimal::from(7))
        );
        let bag = Unit::Other("bag".to_string());
        assert_eq!(bag.convert(Decimal::from(3), &bag), Some(Decimal::from(3)));
    }

    #[test]
    fn test_convert_incompatible_units() {
        assert_eq!(Unit::Gram.convert(Decimal::from(10), &Unit::Milliliter), None);
        assert_eq!(Unit::Piece.convert(Decimal::from(10), &Unit::Gram), None);
        let bag = Unit::Other("bag".to_string());
        let bottle = Unit::Other("bottle".to_string());
        assert_eq!(bag.convert(Decimal::from(1), &bottle), None);
    }

    #[test]
    fn test_unit_compatibility() {
        assert!(Unit::Kilogram.is_compatible_with(&Unit::Gram));
        assert!(Unit::Liter.is_compatible_with(&Unit::Milliliter));
        assert!(!Unit::Gram.is_compatible_with(&Unit::Milliliter));
        assert!(!Unit::Piece.is_compatible_with(&Unit::Gram));
    }

    #[test]
    fn test_date_range_contains_is_inclusive() {
        let range = DateRange {
            start: chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end: chrono::NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        };
        assert!(range.contains(range.start));
        assert!(range.contains(range.end));
        assert!(!range.contains(chrono::NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()));
    }
}
