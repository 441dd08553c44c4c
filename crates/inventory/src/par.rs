//! PAR level recommendations.
//!
//! Three independent heuristics run per item and location; each may produce
//! its own recommendation:
//!
//! - **consistently low**: the last three approved counts were all under 50%
//!   of PAR → raise PAR by 15%.
//! - **consistently high**: the last three approved counts were all over 130%
//!   of PAR → lower PAR by 15%.
//! - **high usage**: weekly usage exceeds 80% of PAR → raise PAR to 1.2× the
//!   weekly usage.

use serde::{Deserialize, Serialize};

use larder_core::{ItemId, LocationId};

use crate::entity::{InventoryItem, InventorySession, approved_by_location};
use crate::unit::round_quantity;
use crate::usage::ItemUsage;

/// Number of consecutive approved counts the stock-level rules look at.
pub const STREAK_LEN: usize = 3;

const LOW_RATIO: f64 = 0.5;
const HIGH_RATIO: f64 = 1.3;
const RAISE_FACTOR: f64 = 1.15;
const LOWER_FACTOR: f64 = 0.85;
const USAGE_TRIGGER_RATIO: f64 = 0.8;
const USAGE_HEADROOM: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParRule {
    ConsistentlyLow,
    ConsistentlyHigh,
    HighUsage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParRecommendation {
    pub item_id: ItemId,
    pub item_name: String,
    pub location_id: LocationId,
    pub rule: ParRule,
    pub current_par: f64,
    pub recommended_par: f64,
    pub reason: String,
}

/// Evaluate every PAR rule for every item with a usable PAR level.
///
/// Rules run separately for each location: the count streak only looks at
/// that location's sessions, and the usage rule only at its usage figures.
/// `usage` is the output of [`crate::compute_usage_analytics`] for the same
/// items; items missing from it simply skip the usage rule. `location_id`
/// restricts the result to one location.
pub fn compute_par_recommendations(
    items: &[InventoryItem],
    sessions: &[InventorySession],
    usage: &[ItemUsage],
    location_id: Option<LocationId>,
) -> Vec<ParRecommendation> {
    let by_location = approved_by_location(sessions, location_id);
    let mut out = Vec::new();

    for item in items {
        let Some(par) = item.effective_par() else {
            continue;
        };

        for (&location_id, approved) in &by_location {
            let recent: Vec<f64> = approved
                .iter()
                .take(STREAK_LEN)
                .map_while(|s| s.count_for(item.id))
                .collect();

            if recent.len() == STREAK_LEN {
                if recent.iter().all(|&q| q < par * LOW_RATIO) {
                    out.push(recommend(
                        item,
                        location_id,
                        par,
                        ParRule::ConsistentlyLow,
                        par * RAISE_FACTOR,
                        format!(
                            "stock was under {:.0}% of PAR in the last {STREAK_LEN} approved counts",
                            LOW_RATIO * 100.0
                        ),
                    ));
                }
                if recent.iter().all(|&q| q > par * HIGH_RATIO) {
                    out.push(recommend(
                        item,
                        location_id,
                        par,
                        ParRule::ConsistentlyHigh,
                        par * LOWER_FACTOR,
                        format!(
                            "stock was over {:.0}% of PAR in the last {STREAK_LEN} approved counts",
                            HIGH_RATIO * 100.0
                        ),
                    ));
                }
            }

            let weekly = usage
                .iter()
                .find(|u| u.item_id == item.id && u.location_id == location_id)
                .and_then(|u| u.weekly_usage);
            if let Some(weekly) = weekly {
                if weekly > par * USAGE_TRIGGER_RATIO {
                    out.push(recommend(
                        item,
                        location_id,
                        par,
                        ParRule::HighUsage,
                        weekly * USAGE_HEADROOM,
                        format!(
                            "weekly usage of {weekly:.1} {} is above {:.0}% of PAR",
                            item.unit,
                            USAGE_TRIGGER_RATIO * 100.0
                        ),
                    ));
                }
            }
        }
    }

    out
}

fn recommend(
    item: &InventoryItem,
    location_id: LocationId,
    current_par: f64,
    rule: ParRule,
    raw: f64,
    reason: String,
) -> ParRecommendation {
    ParRecommendation {
        item_id: item.id,
        item_name: item.name.clone(),
        location_id,
        rule,
        current_par,
        recommended_par: round_quantity(raw, &item.unit),
        reason,
    }
}
