//! Bodies for the emails the product sends on its own behalf.

use larder_inventory::SmartOrderLine;

/// Subject + bodies, ready to be wrapped in an [`crate::EmailMessage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Invitation for a new staff member to join a restaurant account.
pub fn invitation(restaurant_name: &str, role: &str, invite_url: &str) -> RenderedEmail {
    let subject = format!("You're invited to join {restaurant_name} on Larder");
    let text = format!(
        "You've been invited to join {restaurant_name} as {role}.\n\n\
         Accept the invitation: {invite_url}\n\n\
         If you weren't expecting this, you can ignore this email."
    );
    let html = format!(
        "<p>You've been invited to join <strong>{}</strong> as <strong>{}</strong>.</p>\
         <p><a href=\"{}\">Accept the invitation</a></p>\
         <p>If you weren't expecting this, you can ignore this email.</p>",
        escape_html(restaurant_name),
        escape_html(role),
        escape_html(invite_url),
    );
    RenderedEmail { subject, html, text }
}

/// Purchase order sent to a vendor from a smart order run.
pub fn smart_order(
    restaurant_name: &str,
    vendor: &str,
    lines: &[SmartOrderLine],
    notes: Option<&str>,
) -> RenderedEmail {
    let subject = format!("Order from {restaurant_name}");

    let mut text = format!("Hello {vendor},\n\nPlease deliver the following to {restaurant_name}:\n\n");
    let mut rows = String::new();
    for line in lines {
        let qty = format_qty(line.suggested_qty);
        text.push_str(&format!("- {} {} {}\n", qty, line.unit, line.item_name));
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&line.item_name),
            qty,
            escape_html(&line.unit),
        ));
    }
    if let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) {
        text.push_str(&format!("\nNotes: {notes}\n"));
    }
    text.push_str("\nThank you!");

    let mut html = format!(
        "<p>Hello {},</p><p>Please deliver the following to <strong>{}</strong>:</p>\
         <table><thead><tr><th>Item</th><th>Qty</th><th>Unit</th></tr></thead><tbody>{rows}</tbody></table>",
        escape_html(vendor),
        escape_html(restaurant_name),
    );
    if let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) {
        html.push_str(&format!("<p>Notes: {}</p>", escape_html(notes)));
    }
    html.push_str("<p>Thank you!</p>");

    RenderedEmail { subject, html, text }
}

/// Whole numbers without a trailing `.0`, tenths otherwise.
fn format_qty(qty: f64) -> String {
    if qty.fract() == 0.0 {
        format!("{qty:.0}")
    } else {
        format!("{qty:.1}")
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
