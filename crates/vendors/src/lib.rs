//! Vendor data import.
//!
//! Distributor portals aren't integrated yet; [`VendorCatalog::mock`] serves a
//! fixed set of invoices per supported vendor so the import flow can be built
//! and tested end to end.

pub mod catalog;

pub use catalog::{
    VendorCatalog, VendorError, VendorInvoice, VendorInvoiceLine, VendorInvoiceSummary,
};
