//! Invoice text → structured line items.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use larder_inventory::UnitKind;

use crate::chat::{ChatCompletion, ChatMessage, ChatRequest};
use crate::error::AiError;

/// Longest invoice text accepted, in characters.
pub const MAX_INVOICE_CHARS: usize = 20_000;

const SYSTEM_PROMPT: &str = "You extract data from restaurant supplier invoices. \
Reply with a single JSON object and nothing else, using this shape: \
{\"vendor_name\": string|null, \"invoice_number\": string|null, \"invoice_date\": \"YYYY-MM-DD\"|null, \
\"line_items\": [{\"description\": string, \"quantity\": number|null, \"unit\": string|null, \
\"unit_price\": number|null, \"total\": number|null}], \
\"subtotal\": number|null, \"tax\": number|null, \"total\": number|null}. \
Use case/pack/each/lb/oz/gal/kg/l abbreviations (CS, PK, EA, LB, OZ, GAL, KG, L) for units when they are clear. \
Do not invent values; use null when a field is missing.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLineItem {
    pub description: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
}

impl ParsedLineItem {
    /// Rounding class of the parsed unit, if any.
    pub fn unit_kind(&self) -> UnitKind {
        self.unit
            .as_deref()
            .map(UnitKind::classify)
            .unwrap_or(UnitKind::Other)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedInvoice {
    #[serde(default)]
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub invoice_date: Option<String>,
    #[serde(default)]
    pub line_items: Vec<ParsedLineItem>,
    #[serde(default)]
    pub subtotal: Option<f64>,
    #[serde(default)]
    pub tax: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
}

impl ParsedInvoice {
    /// Sum of line totals, falling back to `quantity * unit_price` per line.
    pub fn computed_total(&self) -> f64 {
        self.line_items
            .iter()
            .filter_map(|l| l.total.or_else(|| Some(l.quantity? * l.unit_price?)))
            .sum()
    }
}

/// Parses invoice text through a chat-completion backend.
#[derive(Clone)]
pub struct InvoiceParser {
    chat: Arc<dyn ChatCompletion>,
}

impl InvoiceParser {
    pub fn new(chat: Arc<dyn ChatCompletion>) -> Self {
        Self { chat }
    }

    pub async fn parse(
        &self,
        invoice_text: &str,
        vendor_hint: Option<&str>,
    ) -> Result<ParsedInvoice, AiError> {
        let text = invoice_text.trim();
        if text.is_empty() {
            return Err(AiError::InvalidInput("invoice text is empty".to_string()));
        }

        let len = text.chars().count();
        if len > MAX_INVOICE_CHARS {
            tracing::warn!(chars = len, max = MAX_INVOICE_CHARS, "invoice text too long");
            return Err(AiError::InvalidInput(format!(
                "invoice text is {len} characters; at most {MAX_INVOICE_CHARS} are accepted"
            )));
        }

        let mut user = String::new();
        if let Some(vendor) = vendor_hint.map(str::trim).filter(|v| !v.is_empty()) {
            user.push_str(&format!("Vendor (from the user): {vendor}\n\n"));
        }
        user.push_str("Invoice:\n");
        user.push_str(text);

        let reply = self
            .chat
            .complete(ChatRequest {
                messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user)],
                temperature: Some(0.0),
            })
            .await?;

        let json = extract_json_object(&reply)
            .ok_or_else(|| AiError::MalformedResponse("no JSON object in reply".to_string()))?;

        let invoice: ParsedInvoice =
            serde_json::from_str(json).map_err(|e| AiError::MalformedResponse(e.to_string()))?;

        tracing::debug!(line_items = invoice.line_items.len(), "invoice parsed");
        Ok(invoice)
    }
}

/// Slice out the outermost `{...}` of a model reply.
///
/// Models wrap JSON in ```json fences or add a sentence around it; both are
/// tolerated.
fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}
