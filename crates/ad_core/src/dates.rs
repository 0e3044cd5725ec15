use chrono::{Datelike, NaiveDate};

/// ISO date used for artifact file names.
pub const ISO_DATE: &str = "%Y-%m-%d";

/// `Oct 12-18, 2026`, or `Sep 28 - Oct 04, 2026` when the range spans months.
pub fn range_label(start: NaiveDate, end: NaiveDate) -> String {
    if start.year() == end.year() && start.month() == end.month() {
        format!("{}-{}", start.format("%b %d"), end.format("%d, %Y"))
    } else if start.year() == end.year() {
        format!("{} - {}", start.format("%b %d"), end.format("%b %d, %Y"))
    } else {
        format!("{} - {}", start.format("%b %d, %Y"), end.format("%b %d, %Y"))
    }
}
