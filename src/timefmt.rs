use chrono::{DateTime, Utc};

/// Formats a timestamp relative to now, e.g. "3 hours ago".
pub fn date_ago(timestamp: DateTime<Utc>) -> String {
    date_ago_from(timestamp, Utc::now())
}

pub fn date_ago_from(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - timestamp).num_seconds();
    if secs < 5 {
        // Also covers small clock skew into the future.
        return "just now".to_string();
    }

    const UNITS: [(&str, i64); 6] = [
        ("year", 365 * 24 * 3600),
        ("month", 30 * 24 * 3600),
        ("week", 7 * 24 * 3600),
        ("day", 24 * 3600),
        ("hour", 3600),
        ("minute", 60),
    ];

    for (unit, size) in UNITS {
        let count = secs / size;
        if count >= 1 {
            return plural(count, unit);
        }
    }

    plural(secs, "second")
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
