use chrono::{TimeZone, Utc};

#[derive(Debug, Clone, Copy)]
pub enum SmartDateFormat {
    Year,      // 1838
    MonthYear, // Jan 1838
    FullDate,  // January 12, 1838
}

/// Picks a date format for the visible time range (in seconds): full dates
/// while zoomed in, coarser labels across multi-year spans.
pub fn determine_date_format(visible_range_sec: f64) -> SmartDateFormat {
    const DAY: f64 = 24.0 * 3600.0;
    const YEAR: f64 = 365.0 * DAY;

    if visible_range_sec > YEAR * 4.0 {
        SmartDateFormat::Year
    } else if visible_range_sec > YEAR {
        SmartDateFormat::MonthYear
    } else {
        SmartDateFormat::FullDate
    }
}

/// Formats a unix-seconds timestamp with the chosen format.
pub fn format_timestamp(value: f64, format: SmartDateFormat) -> String {
    let dt = match Utc.timestamp_opt(value as i64, 0) {
        chrono::LocalResult::Single(d) => d,
        chrono::LocalResult::Ambiguous(d, _) => d,
        chrono::LocalResult::None => return format!("{:.0}", value),
    };

    match format {
        SmartDateFormat::Year => dt.format("%Y").to_string(),
        SmartDateFormat::MonthYear => dt.format("%b %Y").to_string(),
        SmartDateFormat::FullDate => dt.format("%B %d, %Y").to_string(),
    }
}
