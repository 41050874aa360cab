//! Naming for the bookings spreadsheet export.

use chrono::NaiveDate;

/// MIME type of the export payload.
pub const EXPORT_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// `visvas-bookings-YYYY-MM-DD.xlsx` for the day the export was taken.
pub fn export_filename(day: NaiveDate) -> String {
    format!("visvas-bookings-{}.xlsx", day.format("%Y-%m-%d"))
}
