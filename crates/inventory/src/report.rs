//! Multi-location reporting.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use larder_core::{ItemId, LocationId};

use crate::entity::{InventoryItem, InventorySession};
use crate::risk::{RiskLevel, classify_risk};
use crate::smart_order::latest_stock;

/// Stock health of one location, from its latest approved counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    pub location_id: LocationId,
    pub items_counted: usize,
    pub red: usize,
    pub yellow: usize,
    pub green: usize,
    pub no_par: usize,
    /// Sum of `quantity * unit_cost` over items with a known cost.
    pub inventory_value: f64,
}

impl LocationSummary {
    fn empty(location_id: LocationId) -> Self {
        Self {
            location_id,
            items_counted: 0,
            red: 0,
            yellow: 0,
            green: 0,
            no_par: 0,
            inventory_value: 0.0,
        }
    }

    fn record(&mut self, risk: RiskLevel, value: Option<f64>) {
        self.items_counted += 1;
        match risk {
            RiskLevel::Red => self.red += 1,
            RiskLevel::Yellow => self.yellow += 1,
            RiskLevel::Green => self.green += 1,
            RiskLevel::NoPar => self.no_par += 1,
        }
        self.inventory_value += value.unwrap_or(0.0);
    }
}

/// One summary per location that has at least one approved session.
///
/// Counts for items not present in `items` are ignored.
pub fn summarize_locations(
    items: &[InventoryItem],
    sessions: &[InventorySession],
) -> Vec<LocationSummary> {
    let by_id: HashMap<ItemId, &InventoryItem> = items.iter().map(|i| (i.id, i)).collect();

    let mut locations: BTreeMap<LocationId, LocationSummary> = BTreeMap::new();
    for session in sessions.iter().filter(|s| s.approval_time().is_some()) {
        locations
            .entry(session.location_id)
            .or_insert_with(|| LocationSummary::empty(session.location_id));
    }

    for (location_id, summary) in locations.iter_mut() {
        for (item_id, qty) in latest_stock(sessions, Some(*location_id)) {
            let Some(item) = by_id.get(&item_id) else {
                continue;
            };
            let risk = classify_risk(qty, item.effective_par());
            summary.record(risk, item.unit_cost.map(|c| c * qty));
        }
    }

    locations.into_values().collect()
}
