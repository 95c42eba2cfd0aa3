use chrono::{DateTime, Local, Utc};

/// Format a session's last activity with tiered display:
/// - Relative for <7 days: "Just now", "5m ago", "2h ago", "3d ago"
/// - Local calendar date for ≥7 days: "10/5/2026"
pub fn format_time_ago(timestamp: &DateTime<Utc>) -> String {
    format_time_ago_at(timestamp, &Utc::now())
}

/// [`format_time_ago`] against an explicit "now"
pub fn format_time_ago_at(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    // Future timestamps (clock skew) count as "Just now"
    let minutes = now.signed_duration_since(*timestamp).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if days < 7 {
        format!("{}d ago", days)
    } else {
        format_local_date(timestamp)
    }
}

/// Sessions the server never stamped show no age
pub fn format_last_active(timestamp: Option<&DateTime<Utc>>) -> String {
    timestamp.map(format_time_ago).unwrap_or_default()
}

fn format_local_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%-m/%-d/%Y").to_string()
}
