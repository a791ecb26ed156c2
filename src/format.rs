//! Display helpers for assistant text, timestamps and prices.

use chrono::{DateTime, Local, Utc};

/// Convert assistant text to inline HTML: newlines become `<br>` and
/// `**bold**` spans become `<strong>` elements.
///
/// An unmatched `**` is kept verbatim.
pub fn nl2br(text: &str) -> String {
    let with_breaks = text.replace("\r\n", "\n").replace('\n', "<br>");
    bold_to_strong(&with_breaks)
}

fn bold_to_strong(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        match after.find("**") {
            Some(end) => {
                out.push_str(&rest[..start]);
                out.push_str("<strong>");
                out.push_str(&after[..end]);
                out.push_str("</strong>");
                rest = &after[end + 2..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Message time as `HH:MM` in the local time zone.
pub fn format_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}

/// Price with two decimals followed by the currency, e.g. `25.00 DT`.
pub fn format_price(price: f64, currency: &str) -> String {
    if currency.is_empty() {
        format!("{:.2}", price)
    } else {
        format!("{:.2} {}", price, currency)
    }
}
