use serde::{Deserialize, Serialize};

use crate::error::MailerError;

/// An outgoing email, in the provider's JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl EmailMessage {
    pub fn validate(&self) -> Result<(), MailerError> {
        if self.to.is_empty() {
            return Err(MailerError::invalid("at least one recipient is required"));
        }
        if let Some(bad) = self.to.iter().find(|a| !is_valid_address(a)) {
            return Err(MailerError::invalid(format!("invalid recipient address: {bad}")));
        }
        if !is_valid_address(mailbox_address(&self.from)) {
            return Err(MailerError::invalid("invalid sender address"));
        }
        if self.subject.trim().is_empty() {
            return Err(MailerError::invalid("subject cannot be empty"));
        }
        let has_body = |b: &Option<String>| b.as_deref().is_some_and(|s| !s.trim().is_empty());
        if !has_body(&self.html) && !has_body(&self.text) {
            return Err(MailerError::invalid("an html or text body is required"));
        }
        Ok(())
    }
}

/// Address part of a mailbox like `Name <addr@host>`; the input itself otherwise.
pub fn mailbox_address(mailbox: &str) -> &str {
    let mailbox = mailbox.trim();
    match (mailbox.rfind('<'), mailbox.ends_with('>')) {
        (Some(open), true) => &mailbox[open + 1..mailbox.len() - 1],
        _ => mailbox,
    }
}

/// Loose address check: one `@`, non-empty local part, dotted domain, no spaces.
pub fn is_valid_address(addr: &str) -> bool {
    let addr = addr.trim();
    if addr.chars().any(char::is_whitespace) {
        return false;
    }
    match addr.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> EmailMessage {
        EmailMessage {
            from: "Larder <orders@larder.app>".to_string(),
            to: vec!["chef@bistro.com".to_string()],
            subject: "Hello".to_string(),
            html: None,
            text: Some("Body".to_string()),
        }
    }

    #[test]
    fn address_check() {
        assert!(is_valid_address("a@b.co"));
        assert!(!is_valid_address("a@b"));
        assert!(!is_valid_address("@b.co"));
        assert!(!is_valid_address("a@@b.co"));
        assert!(!is_valid_address("a b@c.co"));
        assert!(!is_valid_address("a@b.co."));
    }

    #[test]
    fn mailbox_extracts_angle_address() {
        assert_eq!(mailbox_address("Larder <orders@larder.app>"), "orders@larder.app");
        assert_eq!(mailbox_address("orders@larder.app"), "orders@larder.app");
    }

    #[test]
    fn valid_message_passes() {
        assert!(message().validate().is_ok());
    }

    #[test]
    fn rejects_missing_pieces() {
        let mut m = message();
        m.to.clear();
        assert!(m.validate().is_err());

        let mut m = message();
        m.subject = "  ".to_string();
        assert!(m.validate().is_err());

        let mut m = message();
        m.text = None;
        assert!(m.validate().is_err());

        let mut m = message();
        m.to.push("nope".to_string());
        assert!(matches!(m.validate(), Err(MailerError::InvalidMessage(msg)) if msg.contains("nope")));
    }
}
