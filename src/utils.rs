//! Formatting helpers shared by the views

use chrono::{DateTime, Utc};

/// Formats a DateTime the way the backend stores timestamps
///
/// Example output: "2025-06-14T10:03:54.374Z"
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Gets the current time formatted for the backend
pub fn current_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Renders just the date part of a stored timestamp, or the raw value when
/// it does not parse
pub fn format_date(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt.format("%Y-%m-%d").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// Formats an amount in Kenyan shillings with thousands separators
///
/// Example output: "KSh 12,500"
pub fn format_ksh(amount: u64) -> String {
    format!("KSh {}", group_thousands(amount))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Formats a percentage with one decimal place
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Turns a status code such as `in-progress` into a label like `In progress`
pub fn status_label(status: &str) -> String {
    let spaced = status.replacen('-', " ", 1);
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap();
        assert_eq!(format_timestamp(dt), "2024-03-15T09:30:00.000Z");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-15T09:30:00.000Z"), "2024-03-15");
        assert_eq!(format_date("soon"), "soon");
    }

    #[test]
    fn test_format_ksh() {
        assert_eq!(format_ksh(0), "KSh 0");
        assert_eq!(format_ksh(999), "KSh 999");
        assert_eq!(format_ksh(2500), "KSh 2,500");
        assert_eq!(format_ksh(1234567), "KSh 1,234,567");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(66.666), "66.7%");
        assert_eq!(format_percent(0.0), "0.0%");
    }

    #[test]
    fn test_status_label() {
        assert_eq!(status_label("pending"), "Pending");
        assert_eq!(status_label("in-progress"), "In progress");
        assert_eq!(status_label(""), "");
    }
}
