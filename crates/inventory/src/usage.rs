//! Usage analytics between the two most recent approved counts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{ItemId, LocationId};

use crate::entity::{InventoryItem, InventorySession, PurchaseRecord, approved_by_location};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Consumption of one item at one location over the latest counting interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemUsage {
    pub item_id: ItemId,
    pub item_name: String,
    pub location_id: LocationId,
    pub beginning_stock: f64,
    pub purchases: f64,
    pub ending_stock: f64,
    /// `beginning_stock + purchases - ending_stock`. Negative values point at
    /// a miscount or an unrecorded delivery and are reported as-is.
    pub usage: f64,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub elapsed_days: f64,
    /// Usage scaled to seven days; `None` when both counts share a timestamp.
    pub weekly_usage: Option<f64>,
}

/// Compute usage for every item counted in at least two approved sessions at
/// the same location.
///
/// Counts are only ever paired within a location: for each location the two
/// most recent approved sessions that counted the item form the interval.
/// Purchases received there after the older count and up to (and including)
/// the newer count are added to the beginning stock. `location_id` restricts
/// the result to one location.
pub fn compute_usage_analytics(
    items: &[InventoryItem],
    sessions: &[InventorySession],
    purchases: &[PurchaseRecord],
    location_id: Option<LocationId>,
) -> Vec<ItemUsage> {
    let by_location = approved_by_location(sessions, location_id);

    let mut out = Vec::new();
    for item in items {
        for (&location_id, approved) in &by_location {
            let mut counted = approved.iter().filter_map(|s| {
                let qty = s.count_for(item.id)?;
                Some((s.approval_time()?, qty))
            });
            let (Some((end_at, ending_stock)), Some((start_at, beginning_stock))) =
                (counted.next(), counted.next())
            else {
                continue;
            };

            let purchased: f64 = purchases
                .iter()
                .filter(|p| {
                    p.item_id == item.id
                        && p.received_at_location(location_id)
                        && p.received_at > start_at
                        && p.received_at <= end_at
                })
                .map(|p| p.quantity)
                .sum();

            let usage = beginning_stock + purchased - ending_stock;
            let elapsed_days = (end_at - start_at).num_seconds() as f64 / SECONDS_PER_DAY;
            let weekly_usage = (elapsed_days > 0.0).then(|| usage / elapsed_days * 7.0);

            out.push(ItemUsage {
                item_id: item.id,
                item_name: item.name.clone(),
                location_id,
                beginning_stock,
                purchases: purchased,
                ending_stock,
                usage,
                period_start: start_at,
                period_end: end_at,
                elapsed_days,
                weekly_usage,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ItemCount, SessionStatus};
    use chrono::TimeZone;
    use larder_core::SessionId;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 10, 0, 0).unwrap()
    }

    fn item(name: &str) -> InventoryItem {
        InventoryItem {
            id: ItemId::new(),
            name: name.to_string(),
            unit: "LB".to_string(),
            category: None,
            vendor: None,
            par_level: Some(20.0),
            unit_cost: None,
        }
    }

    fn approved(location_id: LocationId, day: u32, counts: &[(ItemId, f64)]) -> InventorySession {
        InventorySession {
            id: SessionId::new(),
            location_id,
            status: SessionStatus::Approved,
            approved_at: Some(at(day)),
            counts: counts
                .iter()
                .map(|(item_id, quantity)| ItemCount {
                    item_id: *item_id,
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    fn purchase(item_id: ItemId, quantity: f64, day: u32) -> PurchaseRecord {
        PurchaseRecord {
            item_id,
            quantity,
            received_at: at(day),
            location_id: None,
        }
    }

    #[test]
    fn usage_adds_purchases_inside_the_interval() {
        let loc = LocationId::new();
        let beef = item("Beef");
        let sessions = vec![
            approved(loc, 1, &[(beef.id, 50.0)]),
            approved(loc, 8, &[(beef.id, 30.0)]),
            approved(loc, 15, &[(beef.id, 20.0)]),
        ];
        let purchases = vec![
            // before the interval
            purchase(beef.id, 100.0, 5),
            // inside
            purchase(beef.id, 10.0, 10),
            // exactly at the closing count is included
            purchase(beef.id, 4.0, 15),
        ];

        let usage = compute_usage_analytics(&[beef.clone()], &sessions, &purchases, None);
        assert_eq!(usage.len(), 1);
        let u = &usage[0];
        assert_eq!(u.location_id, loc);
        assert_eq!(u.beginning_stock, 30.0);
        assert_eq!(u.ending_stock, 20.0);
        assert_eq!(u.purchases, 14.0);
        assert_eq!(u.usage, 24.0);
        assert_eq!(u.elapsed_days, 7.0);
        assert_eq!(u.weekly_usage, Some(24.0));
    }

    #[test]
    fn weekly_rate_scales_with_elapsed_days() {
        let loc = LocationId::new();
        let milk = item("Milk");
        let sessions = vec![approved(loc, 1, &[(milk.id, 10.0)]), approved(loc, 15, &[(milk.id, 2.0)])];

        let usage = compute_usage_analytics(&[milk], &sessions, &[], None);
        assert_eq!(usage[0].usage, 8.0);
        assert_eq!(usage[0].weekly_usage, Some(4.0));
    }

    #[test]
    fn items_with_a_single_count_are_skipped() {
        let loc = LocationId::new();
        let milk = item("Milk");
        let cream = item("Cream");
        let sessions = vec![
            approved(loc, 1, &[(milk.id, 10.0)]),
            approved(loc, 8, &[(milk.id, 6.0), (cream.id, 3.0)]),
        ];

        let usage = compute_usage_analytics(&[milk, cream], &sessions, &[], None);
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0].item_name, "Milk");
    }

    #[test]
    fn unapproved_sessions_are_ignored() {
        let loc = LocationId::new();
        let milk = item("Milk");
        let mut draft = approved(loc, 20, &[(milk.id, 0.0)]);
        draft.status = SessionStatus::Draft;
        let sessions = vec![approved(loc, 1, &[(milk.id, 10.0)]), approved(loc, 8, &[(milk.id, 6.0)]), draft];

        let usage = compute_usage_analytics(&[milk], &sessions, &[], None);
        assert_eq!(usage[0].ending_stock, 6.0);
    }

    #[test]
    fn same_timestamp_counts_have_no_weekly_rate() {
        let loc = LocationId::new();
        let milk = item("Milk");
        let sessions = vec![approved(loc, 3, &[(milk.id, 10.0)]), approved(loc, 3, &[(milk.id, 6.0)])];

        let usage = compute_usage_analytics(&[milk], &sessions, &[], None);
        assert_eq!(usage[0].elapsed_days, 0.0);
        assert_eq!(usage[0].weekly_usage, None);
    }

    #[test]
    fn counts_are_never_paired_across_locations() {
        let downtown = LocationId::new();
        let airport = LocationId::new();
        let oil = item("Fryer oil");
        // Interleaved: each location holds steady, but alternating between
        // them would look like 45 used in a day.
        let sessions = vec![
            approved(downtown, 1, &[(oil.id, 50.0)]),
            approved(airport, 2, &[(oil.id, 5.0)]),
            approved(downtown, 8, &[(oil.id, 50.0)]),
            approved(airport, 9, &[(oil.id, 5.0)]),
        ];

        let usage = compute_usage_analytics(&[oil.clone()], &sessions, &[], None);
        assert_eq!(usage.len(), 2);
        for u in &usage {
            assert_eq!(u.usage, 0.0);
            assert_eq!(u.elapsed_days, 7.0);
            assert_eq!(u.weekly_usage, Some(0.0));
        }

        let only = compute_usage_analytics(&[oil], &sessions, &[], Some(airport));
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].location_id, airport);
        assert_eq!(only[0].ending_stock, 5.0);
    }

    #[test]
    fn purchases_count_only_at_their_receiving_location() {
        let downtown = LocationId::new();
        let airport = LocationId::new();
        let oil = item("Fryer oil");
        let sessions = vec![
            approved(downtown, 1, &[(oil.id, 10.0)]),
            approved(airport, 1, &[(oil.id, 10.0)]),
            approved(downtown, 8, &[(oil.id, 10.0)]),
            approved(airport, 8, &[(oil.id, 10.0)]),
        ];
        let mut delivery = purchase(oil.id, 6.0, 4);
        delivery.location_id = Some(airport);

        let usage = compute_usage_analytics(&[oil], &sessions, &[delivery], None);
        let at_loc = |loc| usage.iter().find(|u| u.location_id == loc).unwrap();
        assert_eq!(at_loc(downtown).usage, 0.0);
        assert_eq!(at_loc(airport).usage, 6.0);
    }
}
