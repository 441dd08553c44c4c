//! Shared handler dependencies.

use std::sync::Arc;

use larder_ai::{ChatCompletion, HttpChatClient, InvoiceParser};
use larder_core::{DomainError, DomainResult, Entity, SmartOrderRunId, TenantId};
use larder_inventory::SmartOrderRun;
use larder_mailer::{EmailSender, HttpEmailClient};
use larder_vendors::VendorCatalog;

use crate::app::store::{InMemoryTenantStore, TenantStore};
use crate::config::ApiConfig;

/// Everything handlers need beyond the request itself.
///
/// Integrations are optional: a deployment without an AI or email key still
/// serves every other route.
pub struct AppServices {
    invoice_parser: Option<InvoiceParser>,
    email: Option<(Arc<dyn EmailSender>, String)>,
    vendors: VendorCatalog,
    smart_orders: InMemoryTenantStore<SmartOrderRunId, SmartOrderRun>,
}

impl AppServices {
    /// Services with no integrations and the mock vendor catalog.
    pub fn new() -> Self {
        Self {
            invoice_parser: None,
            email: None,
            vendors: VendorCatalog::mock(),
            smart_orders: InMemoryTenantStore::new(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> anyhow::Result<Self> {
        let mut services = Self::new();

        if let Some(ai) = &config.ai {
            let client = HttpChatClient::new(&ai.base_url, ai.api_key.clone(), ai.model.clone())?;
            tracing::info!(model = client.model(), "invoice parsing enabled");
            services = services.with_chat(Arc::new(client));
        }

        if let Some(email) = &config.email {
            let client = HttpEmailClient::new(&email.base_url, email.api_key.clone())?;
            tracing::info!("email delivery enabled");
            services = services.with_email(Arc::new(client), email.from.clone());
        }

        Ok(services)
    }

    pub fn with_chat(mut self, chat: Arc<dyn ChatCompletion>) -> Self {
        self.invoice_parser = Some(InvoiceParser::new(chat));
        self
    }

    pub fn with_email(mut self, sender: Arc<dyn EmailSender>, from: String) -> Self {
        self.email = Some((sender, from));
        self
    }

    pub fn invoice_parser(&self) -> Option<&InvoiceParser> {
        self.invoice_parser.as_ref()
    }

    /// Sender plus the configured `from` mailbox.
    pub fn email(&self) -> Option<(&dyn EmailSender, &str)> {
        self.email
            .as_ref()
            .map(|(sender, from)| (sender.as_ref(), from.as_str()))
    }

    pub fn vendors(&self) -> &VendorCatalog {
        &self.vendors
    }

    pub fn save_smart_order(&self, run: SmartOrderRun) {
        self.smart_orders.upsert(run.tenant_id, *run.id(), run);
    }

    /// One of the tenant's runs; other tenants' runs are reported as missing.
    pub fn smart_order(&self, tenant_id: TenantId, id: &SmartOrderRunId) -> DomainResult<SmartOrderRun> {
        self.smart_orders
            .get(tenant_id, id)
            .ok_or(DomainError::NotFound("smart order run"))
    }

    /// A tenant's runs, newest first.
    pub fn smart_orders(&self, tenant_id: TenantId) -> Vec<SmartOrderRun> {
        let mut runs = self.smart_orders.list(tenant_id);
        runs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        runs
    }
}

impl Default for AppServices {
    fn default() -> Self {
        Self::new()
    }
}
