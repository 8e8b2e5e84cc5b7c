use chrono::{DateTime, FixedOffset};

/// Offset used for every displayed time (KST).
const DISPLAY_OFFSET_SECS: i32 = 9 * 3600;
pub const DISPLAY_ZONE_LABEL: &str = "KST";

fn display_offset() -> FixedOffset {
    FixedOffset::east_opt(DISPLAY_OFFSET_SECS).expect("offset within a day")
}

/// Parse an RFC 3339 instant and shift it into the display offset.
pub fn to_display_zone(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&display_offset()))
}

/// `HH:MM:SS` in the display offset. Unparseable input is returned as-is.
pub fn local_clock(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    match to_display_zone(raw) {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => raw.to_string(),
    }
}

/// `YYYY-MM-DD HH:MM` in the display offset, or `None` if unparseable.
pub fn local_date_minute(raw: &str) -> Option<String> {
    to_display_zone(raw).map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
}
