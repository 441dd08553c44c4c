use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VendorError {
    #[error("unknown vendor: {0}")]
    UnknownVendor(String),

    #[error("invoice {invoice_id} not found for vendor {vendor}")]
    InvoiceNotFound { vendor: String, invoice_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorInvoiceLine {
    pub sku: String,
    pub description: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
}

impl VendorInvoiceLine {
    pub fn extended_price(&self) -> f64 {
        ((self.quantity * self.unit_price) * 100.0).round() / 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorInvoice {
    pub vendor: String,
    pub invoice_id: String,
    pub invoice_date: NaiveDate,
    pub lines: Vec<VendorInvoiceLine>,
}

impl VendorInvoice {
    pub fn total(&self) -> f64 {
        let cents: f64 = self.lines.iter().map(|l| l.extended_price() * 100.0).sum();
        cents.round() / 100.0
    }

    pub fn summary(&self) -> VendorInvoiceSummary {
        VendorInvoiceSummary {
            vendor: self.vendor.clone(),
            invoice_id: self.invoice_id.clone(),
            invoice_date: self.invoice_date,
            line_count: self.lines.len(),
            total: self.total(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorInvoiceSummary {
    pub vendor: String,
    pub invoice_id: String,
    pub invoice_date: NaiveDate,
    pub line_count: usize,
    pub total: f64,
}

/// Invoices keyed by normalized vendor key.
#[derive(Debug, Clone, Default)]
pub struct VendorCatalog {
    vendors: BTreeMap<String, Vec<VendorInvoice>>,
}

impl VendorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, invoice: VendorInvoice) {
        self.vendors
            .entry(normalize(&invoice.vendor))
            .or_default()
            .push(invoice);
    }

    pub fn vendors(&self) -> impl Iterator<Item = &str> {
        self.vendors.keys().map(String::as_str)
    }

    /// Invoices for `vendor`, newest first, optionally only those on or after `since`.
    pub fn list_invoices(
        &self,
        vendor: &str,
        since: Option<NaiveDate>,
    ) -> Result<Vec<VendorInvoiceSummary>, VendorError> {
        let invoices = self.invoices_for(vendor)?;
        let mut out: Vec<VendorInvoiceSummary> = invoices
            .iter()
            .filter(|i| since.is_none_or(|s| i.invoice_date >= s))
            .map(VendorInvoice::summary)
            .collect();
        out.sort_by(|a, b| {
            b.invoice_date
                .cmp(&a.invoice_date)
                .then_with(|| b.invoice_id.cmp(&a.invoice_id))
        });
        Ok(out)
    }

    pub fn invoice_detail(&self, vendor: &str, invoice_id: &str) -> Result<VendorInvoice, VendorError> {
        self.invoices_for(vendor)?
            .iter()
            .find(|i| i.invoice_id.eq_ignore_ascii_case(invoice_id.trim()))
            .cloned()
            .ok_or_else(|| VendorError::InvoiceNotFound {
                vendor: vendor.to_string(),
                invoice_id: invoice_id.to_string(),
            })
    }

    fn invoices_for(&self, vendor: &str) -> Result<&[VendorInvoice], VendorError> {
        self.vendors
            .get(&normalize(vendor))
            .map(Vec::as_slice)
            .ok_or_else(|| VendorError::UnknownVendor(vendor.to_string()))
    }

    /// Fixed demo data for `sysco`, `usfoods` and `restaurant-depot`.
    pub fn mock() -> Self {
        let mut catalog = Self::new();
        for (vendor, prefix, base_day, products) in MOCK_VENDORS {
            for (n, day_offset) in [0u32, 7, 14].into_iter().enumerate() {
                let Some(invoice_date) = NaiveDate::from_ymd_opt(2024, 9, base_day + day_offset) else {
                    continue;
                };
                let lines = products
                    .iter()
                    .enumerate()
                    // rotate quantities so invoices differ
                    .map(|(i, (sku, description, unit, unit_price))| VendorInvoiceLine {
                        sku: sku.to_string(),
                        description: description.to_string(),
                        quantity: ((i + n) % 3 + 1) as f64,
                        unit: unit.to_string(),
                        unit_price: *unit_price,
                    })
                    .collect();
                catalog.insert(VendorInvoice {
                    vendor: vendor.to_string(),
                    invoice_id: format!("{prefix}-{:04}", 1001 + n),
                    invoice_date,
                    lines,
                });
            }
        }
        catalog
    }
}

type MockProduct = (&'static str, &'static str, &'static str, f64);

const MOCK_VENDORS: &[(&str, &str, u32, &[MockProduct])] = &[
    (
        "sysco",
        "SYS",
        2,
        &[
            ("SY-10021", "Chicken breast, boneless 4x10lb", "CS", 89.5),
            ("SY-20413", "Romaine hearts 12ct", "CS", 32.75),
            ("SY-30877", "Canola oil 35lb", "EA", 41.2),
            ("SY-41002", "Heavy cream 36%", "GAL", 14.9),
        ],
    ),
    (
        "usfoods",
        "USF",
        3,
        &[
            ("UF-5520", "Ground beef 80/20", "LB", 4.85),
            ("UF-6614", "Yellow onions 50lb", "CS", 28.0),
            ("UF-7003", "Mozzarella, shredded 4x5lb", "CS", 67.4),
        ],
    ),
    (
        "restaurant-depot",
        "RD",
        5,
        &[
            ("RD-118", "Deli containers 16oz 240ct", "PK", 23.99),
            ("RD-245", "All-purpose flour 50lb", "EA", 19.49),
            ("RD-390", "Kosher salt 3lb", "EA", 3.29),
        ],
    ),
];

fn normalize(vendor: &str) -> String {
    vendor
        .trim()
        .to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_catalog_serves_three_vendors() {
        let catalog = VendorCatalog::mock();
        let vendors: Vec<&str> = catalog.vendors().collect();
        assert_eq!(vendors, vec!["restaurant-depot", "sysco", "usfoods"]);
    }

    #[test]
    fn listing_is_newest_first_and_case_insensitive() {
        let catalog = VendorCatalog::mock();
        let list = catalog.list_invoices("  SYSCO ", None).unwrap();
        assert_eq!(list.len(), 3);
        assert!(list[0].invoice_date > list[1].invoice_date);
        assert_eq!(list[0].invoice_id, "SYS-1003");
        assert_eq!(list[0].line_count, 4);
    }

    #[test]
    fn since_filters_older_invoices() {
        let catalog = VendorCatalog::mock();
        let since = NaiveDate::from_ymd_opt(2024, 9, 10).unwrap();
        let list = catalog.list_invoices("usfoods", Some(since)).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|i| i.invoice_date >= since));
    }

    #[test]
    fn unknown_vendor_and_invoice_are_distinct_errors() {
        let catalog = VendorCatalog::mock();
        assert_eq!(
            catalog.list_invoices("costco", None),
            Err(VendorError::UnknownVendor("costco".to_string()))
        );
        assert!(matches!(
            catalog.invoice_detail("sysco", "SYS-9999"),
            Err(VendorError::InvoiceNotFound { .. })
        ));
    }

    #[test]
    fn detail_totals_match_summary() {
        let catalog = VendorCatalog::mock();
        let detail = catalog.invoice_detail("restaurant-depot", "rd-1001").unwrap();
        let summary = catalog
            .list_invoices("restaurant-depot", None)
            .unwrap()
            .into_iter()
            .find(|s| s.invoice_id == "RD-1001")
            .unwrap();
        assert_eq!(detail.total(), summary.total);
        // 1 x 23.99 + 2 x 19.49 + 3 x 3.29
        assert_eq!(detail.total(), 72.84);
    }
}
