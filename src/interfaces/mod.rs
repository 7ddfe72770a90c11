//! User interfaces: one-shot CLI commands and the interactive console.

pub mod cli;
pub mod console;

use chrono::{DateTime, Utc};

use crate::storage::ShortLink;

/// Remaining lifetime of a link as `Hh Mm`, or `expired`.
pub fn format_ttl(now: DateTime<Utc>, link: &ShortLink) -> String {
    if link.is_expired(now) {
        return "expired".to_string();
    }
    let remaining = link.expires_at - now;
    let hours = remaining.num_hours();
    let minutes = remaining.num_minutes() - hours * 60;
    format!("{}h {}m", hours, minutes)
}
