//! Inventory rows as the rule code sees them.
//!
//! These mirror the hosted database's tables closely enough to be
//! deserialized straight from request payloads.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{DomainError, DomainResult, Entity, ItemId, LocationId, SessionId};

/// A stocked item with its ordering attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub name: String,
    /// Free-form unit label (`CS`, `LB`, `each`, ...).
    pub unit: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub par_level: Option<f64>,
    #[serde(default)]
    pub unit_cost: Option<f64>,
}

impl InventoryItem {
    /// PAR level if one is set to a usable (positive, finite) value.
    pub fn effective_par(&self) -> Option<f64> {
        self.par_level.filter(|p| p.is_finite() && *p > 0.0)
    }
}

impl Entity for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Review lifecycle of a count session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Draft,
    InReview,
    Approved,
}

/// One counted quantity inside a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCount {
    pub item_id: ItemId,
    pub quantity: f64,
}

/// An inventory count taken at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySession {
    pub id: SessionId,
    pub location_id: LocationId,
    pub status: SessionStatus,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub counts: Vec<ItemCount>,
}

impl InventorySession {
    /// Approval timestamp, only for sessions that are actually approved.
    pub fn approval_time(&self) -> Option<DateTime<Utc>> {
        match self.status {
            SessionStatus::Approved => self.approved_at,
            _ => None,
        }
    }

    /// Counted quantity for `item_id`, if the session counted it.
    pub fn count_for(&self, item_id: ItemId) -> Option<f64> {
        self.counts
            .iter()
            .find(|c| c.item_id == item_id)
            .map(|c| c.quantity)
    }
}

impl Entity for InventorySession {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Approved sessions ordered newest first.
pub(crate) fn approved_newest_first(sessions: &[InventorySession]) -> Vec<&InventorySession> {
    let mut approved: Vec<&InventorySession> = sessions
        .iter()
        .filter(|s| s.approval_time().is_some())
        .collect();
    approved.sort_by(|a, b| b.approval_time().cmp(&a.approval_time()));
    approved
}

/// Approved sessions grouped by location, each group newest first.
///
/// With `only` set, the result holds at most that one location.
pub(crate) fn approved_by_location(
    sessions: &[InventorySession],
    only: Option<LocationId>,
) -> BTreeMap<LocationId, Vec<&InventorySession>> {
    let mut grouped: BTreeMap<LocationId, Vec<&InventorySession>> = BTreeMap::new();
    for session in approved_newest_first(sessions) {
        if only.is_some_and(|loc| loc != session.location_id) {
            continue;
        }
        grouped.entry(session.location_id).or_default().push(session);
    }
    grouped
}

/// A received delivery of an item (purchase history row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub item_id: ItemId,
    pub quantity: f64,
    pub received_at: DateTime<Utc>,
    /// Receiving location; `None` for tenants that do not track one.
    #[serde(default)]
    pub location_id: Option<LocationId>,
}

impl PurchaseRecord {
    /// Whether this delivery counts toward stock at `location_id`.
    pub fn received_at_location(&self, location_id: LocationId) -> bool {
        self.location_id.is_none_or(|loc| loc == location_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParGuideEntry {
    pub item_id: ItemId,
    pub par_level: f64,
}

/// A named set of PAR targets (e.g. "Weekend", "Summer patio").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParGuide {
    pub name: String,
    #[serde(default)]
    pub location_id: Option<LocationId>,
    pub entries: Vec<ParGuideEntry>,
}

impl ParGuide {
    /// Every target must be a finite, non-negative quantity.
    pub fn validate(&self) -> DomainResult<()> {
        match self
            .entries
            .iter()
            .find(|e| !e.par_level.is_finite() || e.par_level < 0.0)
        {
            Some(bad) => Err(DomainError::validation(
                "par_guide",
                format!("PAR for item {} must be a non-negative number", bad.item_id),
            )),
            None => Ok(()),
        }
    }

    /// Override item PAR levels with this guide's targets.
    ///
    /// Items the guide does not mention keep their own PAR.
    pub fn apply_to(&self, items: &[InventoryItem]) -> Vec<InventoryItem> {
        items
            .iter()
            .map(|item| {
                let mut item = item.clone();
                if let Some(entry) = self.entries.iter().find(|e| e.item_id == item.id) {
                    item.par_level = Some(entry.par_level);
                }
                item
            })
            .collect()
    }
}
