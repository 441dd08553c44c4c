//! Inventory rules module.
//!
//! This crate contains the business rules for counts, PAR levels and reorder
//! suggestions, implemented purely as deterministic functions (no IO, no HTTP,
//! no storage). Rows are loaded by the caller from the hosted database.

pub mod entity;
pub mod order;
pub mod par;
pub mod report;
pub mod risk;
pub mod smart_order;
pub mod unit;
pub mod usage;

pub use entity::{
    InventoryItem, InventorySession, ItemCount, ParGuide, ParGuideEntry, PurchaseRecord,
    SessionStatus,
};
pub use order::compute_order_qty;
pub use par::{ParRecommendation, ParRule, compute_par_recommendations};
pub use report::{LocationSummary, summarize_locations};
pub use risk::{RiskLevel, classify_risk};
pub use smart_order::{
    SmartOrderLine, SmartOrderRun, build_smart_order, latest_stock, normalize_list_name,
};
pub use unit::{UnitKind, round_quantity};
pub use usage::{ItemUsage, compute_usage_analytics};
