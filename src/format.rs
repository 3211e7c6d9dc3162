// File: src/format.rs
// Display formatters shared by every interface

use chrono::{TimeZone, Utc};

const IEC_UNITS: [&str; 9] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];

/// Format a Unix timestamp as a short date, empty when absent or out of range
pub fn unix_to_short_date(timestamp: Option<u64>) -> String {
    timestamp
        .and_then(|ts| i64::try_from(ts).ok())
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Format a byte count with IEC units, e.g. `1.5 KiB`
pub fn format_bytes(bytes: u128) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < IEC_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", value, IEC_UNITS[unit])
}

/// Truncate hash string to specified length with ellipsis
pub fn truncate_hash(hash: &str, max_len: usize) -> String {
    if hash.chars().count() > max_len {
        let head: String = hash.chars().take(max_len).collect();
        format!("{}...", head)
    } else {
        hash.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_date_is_utc() {
        assert_eq!(unix_to_short_date(Some(1_600_000_000)), "2020-09-13 12:26:40");
    }

    #[test]
    fn short_date_missing_is_empty() {
        assert_eq!(unix_to_short_date(None), "");
        assert_eq!(unix_to_short_date(Some(u64::MAX)), "");
    }

    #[test]
    fn bytes_scale_through_iec_units() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(3 * 1024u128.pow(6)), "3.0 EiB");
        assert_eq!(format_bytes(2048 * 1024u128.pow(8)), "2048.0 YiB");
    }

    #[test]
    fn hash_truncation() {
        assert_eq!(truncate_hash("0xabcdef", 4), "0xab...");
        assert_eq!(truncate_hash("0xab", 4), "0xab");
    }
}
