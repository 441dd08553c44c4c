//! `larder-ai`
//!
//! **Responsibility:** AI chat-completion gateway boundary, used to turn
//! pasted or OCR'd invoice text into structured line items.
//!
//! This crate does not touch inventory rows. It returns parsed invoices for a
//! human to review before anything is recorded as a purchase.

pub mod chat;
pub mod error;
pub mod invoice;

pub use chat::{ChatCompletion, ChatMessage, ChatRequest, HttpChatClient};
pub use error::AiError;
pub use invoice::{InvoiceParser, ParsedInvoice, ParsedLineItem};
