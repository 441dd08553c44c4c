//! Units of measure and quantity rounding.

use serde::{Deserialize, Serialize};

/// Rounding class of a unit of measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Sold only in whole units (cases, packs, each).
    Whole,
    /// Weight/volume units that can be ordered in tenths.
    Decimal,
    /// Anything we don't recognise.
    Other,
}

const WHOLE_UNITS: &[&str] = &["CS", "CASE", "CASES", "PK", "PACK", "PACKS", "EA", "EACH"];
const DECIMAL_UNITS: &[&str] = &["LB", "LBS", "GAL", "OZ", "KG", "L"];

/// Anything closer than this to an integer is treated as that integer before
/// taking a ceiling.
const CEIL_EPSILON: f64 = 1e-9;

impl UnitKind {
    /// Classify a free-form unit label (case-insensitive, surrounding whitespace ignored).
    pub fn classify(unit: &str) -> Self {
        let upper = unit.trim().to_ascii_uppercase();
        if WHOLE_UNITS.contains(&upper.as_str()) {
            UnitKind::Whole
        } else if DECIMAL_UNITS.contains(&upper.as_str()) {
            UnitKind::Decimal
        } else {
            UnitKind::Other
        }
    }
}

/// Round a quantity according to the unit's ordering granularity.
///
/// - whole units: ceiling
/// - decimal units: nearest 0.1
/// - other units: ceiling
pub fn round_quantity(qty: f64, unit: &str) -> f64 {
    match UnitKind::classify(unit) {
        UnitKind::Decimal => (qty * 10.0).round() / 10.0,
        UnitKind::Whole | UnitKind::Other => ceil_tolerant(qty),
    }
}

fn ceil_tolerant(qty: f64) -> f64 {
    let nearest = qty.round();
    if (qty - nearest).abs() < CEIL_EPSILON {
        nearest
    } else {
        qty.ceil()
    }
}
