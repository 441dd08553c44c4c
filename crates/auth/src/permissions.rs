use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are modeled as opaque strings (e.g. "inventory.read").
/// The wildcard `"*"` grants everything within the tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const WILDCARD: Permission = Permission(Cow::Borrowed("*"));
    pub const INVENTORY_READ: Permission = Permission(Cow::Borrowed("inventory.read"));
    pub const INVENTORY_ANALYZE: Permission = Permission(Cow::Borrowed("inventory.analyze"));
    pub const SMART_ORDERS_READ: Permission = Permission(Cow::Borrowed("smart_orders.read"));
    pub const SMART_ORDERS_WRITE: Permission = Permission(Cow::Borrowed("smart_orders.write"));
    pub const INVOICES_PARSE: Permission = Permission(Cow::Borrowed("invoices.parse"));
    pub const VENDORS_IMPORT: Permission = Permission(Cow::Borrowed("vendors.import"));
    pub const EMAIL_SEND: Permission = Permission(Cow::Borrowed("email.send"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        *self == Self::WILDCARD
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
