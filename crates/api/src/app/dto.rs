use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;

use larder_core::{ItemId, LocationId};
use larder_inventory::{InventoryItem, InventorySession, ParGuide, PurchaseRecord};

// -------------------------
// Inventory
// -------------------------

/// Upper bound on rows accepted in one analysis request.
pub const MAX_BATCH: usize = 10_000;

#[derive(Debug, Deserialize)]
pub struct StockLevel {
    #[serde(default)]
    pub item_id: Option<ItemId>,
    pub current_stock: f64,
    #[serde(default)]
    pub par_level: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StockLevelsRequest {
    pub entries: Vec<StockLevel>,
}

#[derive(Debug, Deserialize)]
pub struct UsageRequest {
    /// Restrict the analysis to one location.
    #[serde(default)]
    pub location_id: Option<LocationId>,
    pub items: Vec<InventoryItem>,
    pub sessions: Vec<InventorySession>,
    #[serde(default)]
    pub purchases: Vec<PurchaseRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ParRecommendationsRequest {
    #[serde(default)]
    pub location_id: Option<LocationId>,
    pub items: Vec<InventoryItem>,
    pub sessions: Vec<InventorySession>,
    #[serde(default)]
    pub purchases: Vec<PurchaseRecord>,
    #[serde(default)]
    pub par_guide: Option<ParGuide>,
}

#[derive(Debug, Deserialize)]
pub struct LocationSummaryRequest {
    pub items: Vec<InventoryItem>,
    pub sessions: Vec<InventorySession>,
}

// -------------------------
// Smart orders
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateSmartOrderRequest {
    pub list_name: String,
    #[serde(default)]
    pub location_id: Option<LocationId>,
    pub items: Vec<InventoryItem>,
    #[serde(default)]
    pub sessions: Vec<InventorySession>,
    /// Manual stock figures; these win over counted quantities.
    #[serde(default)]
    pub stock: HashMap<ItemId, f64>,
    #[serde(default)]
    pub par_guide: Option<ParGuide>,
}

// -------------------------
// Functions
// -------------------------

#[derive(Debug, Deserialize)]
pub struct ParseInvoiceRequest {
    pub invoice_text: String,
    #[serde(default)]
    pub vendor_hint: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SendEmailRequest {
    /// Caller-provided content.
    Raw {
        to: Vec<String>,
        subject: String,
        #[serde(default)]
        html: Option<String>,
        #[serde(default)]
        text: Option<String>,
    },
    /// Staff invitation.
    Invitation {
        to: String,
        restaurant_name: String,
        role: String,
        invite_url: String,
    },
    /// A saved smart order run, filtered to one vendor's lines.
    SmartOrder {
        to: String,
        restaurant_name: String,
        vendor: String,
        run_id: String,
        #[serde(default)]
        notes: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
pub struct VendorInvoicesRequest {
    pub vendor: String,
    #[serde(default)]
    pub since: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct VendorInvoiceDetailRequest {
    pub vendor: String,
    pub invoice_id: String,
}
