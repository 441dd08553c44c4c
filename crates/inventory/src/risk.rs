//! Stock-to-PAR risk classification.

use serde::{Deserialize, Serialize};

/// Below this share of PAR an item is critical.
pub const CRITICAL_RATIO: f64 = 0.5;

/// Qualitative bucket derived from the stock-to-PAR ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Critical: under half of PAR.
    Red,
    /// Low: under PAR.
    Yellow,
    /// Ok: at or above PAR.
    Green,
    /// No target set.
    NoPar,
}

impl RiskLevel {
    /// Sort key, most urgent first.
    pub fn severity_rank(self) -> u8 {
        match self {
            RiskLevel::Red => 0,
            RiskLevel::Yellow => 1,
            RiskLevel::Green => 2,
            RiskLevel::NoPar => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Red => "critical",
            RiskLevel::Yellow => "low",
            RiskLevel::Green => "ok",
            RiskLevel::NoPar => "no-target",
        }
    }
}

/// Classify current stock against a PAR level.
///
/// A missing, zero, negative or non-finite PAR yields [`RiskLevel::NoPar`].
pub fn classify_risk(current_stock: f64, par_level: Option<f64>) -> RiskLevel {
    let par = match par_level {
        Some(p) if p.is_finite() && p > 0.0 => p,
        _ => return RiskLevel::NoPar,
    };

    if current_stock < par * CRITICAL_RATIO {
        RiskLevel::Red
    } else if current_stock < par {
        RiskLevel::Yellow
    } else {
        RiskLevel::Green
    }
}
