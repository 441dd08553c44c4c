//! Reorder quantity rule.

use crate::unit::round_quantity;

/// Quantity to order to bring `current_stock` back up to `par_level`.
///
/// The shortfall is rounded with the unit's ordering granularity (see
/// [`round_quantity`]). No usable PAR, or stock already at PAR, yields `0`.
pub fn compute_order_qty(current_stock: f64, par_level: Option<f64>, unit: &str) -> f64 {
    let par = match par_level {
        Some(p) if p.is_finite() && p > 0.0 => p,
        _ => return 0.0,
    };
    let stock = if current_stock.is_finite() { current_stock } else { 0.0 };

    let shortfall = (par - stock).max(0.0);
    round_quantity(shortfall, unit)
}
