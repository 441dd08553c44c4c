//! Smart order suggestions and saved runs.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{
    DomainError, DomainResult, Entity, ItemId, LocationId, SmartOrderRunId, TenantId, UserId,
};

use crate::entity::{InventoryItem, InventorySession, approved_newest_first};
use crate::order::compute_order_qty;
use crate::risk::{RiskLevel, classify_risk};

/// One suggested reorder line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartOrderLine {
    pub item_id: ItemId,
    pub item_name: String,
    pub unit: String,
    pub vendor: Option<String>,
    pub current_stock: f64,
    pub par_level: Option<f64>,
    pub risk: RiskLevel,
    pub suggested_qty: f64,
    pub estimated_cost: Option<f64>,
}

/// Build reorder suggestions for `items`.
///
/// Items without a stock figure are treated as empty. Lines with nothing to
/// order are dropped. Result is ordered by risk (most urgent first), then name.
pub fn build_smart_order(
    items: &[InventoryItem],
    stock_by_item: &HashMap<ItemId, f64>,
) -> Vec<SmartOrderLine> {
    let mut lines: Vec<SmartOrderLine> = items
        .iter()
        .filter_map(|item| {
            let stock = stock_by_item.get(&item.id).copied().unwrap_or(0.0);
            let par = item.effective_par();
            let suggested_qty = compute_order_qty(stock, par, &item.unit);
            if suggested_qty <= 0.0 {
                return None;
            }

            Some(SmartOrderLine {
                item_id: item.id,
                item_name: item.name.clone(),
                unit: item.unit.clone(),
                vendor: item.vendor.clone(),
                current_stock: stock,
                par_level: par,
                risk: classify_risk(stock, par),
                suggested_qty,
                estimated_cost: item.unit_cost.map(|c| c * suggested_qty),
            })
        })
        .collect();

    lines.sort_by(|a, b| {
        a.risk
            .severity_rank()
            .cmp(&b.risk.severity_rank())
            .then_with(|| a.item_name.to_lowercase().cmp(&b.item_name.to_lowercase()))
    });
    lines
}

/// Longest list name accepted for a saved run.
pub const MAX_LIST_NAME_CHARS: usize = 120;

/// Trimmed list name for a new run.
pub fn normalize_list_name(raw: &str) -> DomainResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation("list_name", "cannot be empty"));
    }
    if name.chars().count() > MAX_LIST_NAME_CHARS {
        return Err(DomainError::validation(
            "list_name",
            format!("at most {MAX_LIST_NAME_CHARS} characters"),
        ));
    }
    Ok(name.to_string())
}

/// Latest counted quantity per item across approved sessions.
///
/// Each item takes its value from the most recent approved session that
/// counted it; optionally restricted to one location.
pub fn latest_stock(
    sessions: &[InventorySession],
    location_id: Option<LocationId>,
) -> HashMap<ItemId, f64> {
    let mut stock = HashMap::new();
    for session in approved_newest_first(sessions) {
        if location_id.is_some_and(|loc| loc != session.location_id) {
            continue;
        }
        for count in &session.counts {
            stock.entry(count.item_id).or_insert(count.quantity);
        }
    }
    stock
}

/// A saved snapshot of suggested reorder quantities for a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartOrderRun {
    pub id: SmartOrderRunId,
    pub tenant_id: TenantId,
    pub location_id: Option<LocationId>,
    pub list_name: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<SmartOrderLine>,
}

impl SmartOrderRun {
    /// Sum of line cost estimates; lines without a unit cost are skipped.
    pub fn total_estimated_cost(&self) -> f64 {
        self.lines.iter().filter_map(|l| l.estimated_cost).sum()
    }

    /// Lines to be ordered from `vendor` (case-insensitive).
    pub fn lines_for_vendor(&self, vendor: &str) -> Vec<&SmartOrderLine> {
        self.lines
            .iter()
            .filter(|l| {
                l.vendor
                    .as_deref()
                    .is_some_and(|v| v.eq_ignore_ascii_case(vendor))
            })
            .collect()
    }

    pub fn count_by_risk(&self, risk: RiskLevel) -> usize {
        self.lines.iter().filter(|l| l.risk == risk).count()
    }
}

impl Entity for SmartOrderRun {
    type Id = SmartOrderRunId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
