use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

use crate::{
    calendar::DateRange,
    time::{Period, TimeFormat},
};

pub const DEFAULT_DATE_FORMAT: &str = "MM/DD/YYYY";

/// Formats `date` by replacing the first `YYYY`, `MM` and `DD` in `pattern`.
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    pattern
        .replacen("YYYY", &format!("{:04}", date.year()), 1)
        .replacen("MM", &format!("{:02}", date.month()), 1)
        .replacen("DD", &format!("{:02}", date.day()), 1)
}

/// `"start - end"`, `"start - "` while the end is still missing, or an empty
/// string when nothing is selected.
pub fn format_range(range: &DateRange, pattern: &str) -> String {
    match (range.start(), range.end()) {
        (Some(start), Some(end)) => {
            format!("{} - {}", format_date(start, pattern), format_date(end, pattern))
        }
        (Some(start), None) => format!("{} - ", format_date(start, pattern)),
        _ => String::new(),
    }
}

pub fn format_time(time: NaiveTime, format: TimeFormat, show_seconds: bool) -> String {
    let mut formatted = match format {
        TimeFormat::H24 => format!("{:02}:{:02}", time.hour(), time.minute()),
        TimeFormat::H12 => format!("{}:{:02}", time.hour12().1, time.minute()),
    };

    if show_seconds {
        formatted.push_str(&format!(":{:02}", time.second()));
    }

    if format == TimeFormat::H12 {
        formatted.push(' ');
        formatted.push_str(Period::of(time).label());
    }

    formatted
}
