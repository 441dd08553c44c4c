//! `larder-mailer`: transactional email delivery.
//!
//! Messages are validated locally, then handed to a hosted email provider
//! over HTTP. Templates for the product's own emails (staff invitations,
//! vendor orders) live in [`templates`].

pub mod client;
pub mod error;
pub mod message;
pub mod templates;

pub use client::{EmailSender, HttpEmailClient};
pub use error::MailerError;
pub use message::{EmailMessage, is_valid_address, mailbox_address};
