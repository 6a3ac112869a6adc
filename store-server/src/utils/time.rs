//! Date boundary helpers
//!
//! Timestamps are stored as i64 Unix millis (UTC). Date→timestamp
//! conversion happens at the handler/repository boundary; queries only ever
//! see millis.

use chrono::NaiveDate;

/// Start of the given UTC date in Unix millis (00:00:00, inclusive)
pub fn day_start_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|t| t.and_utc().timestamp_millis())
        .unwrap_or_default()
}

/// Start of the next UTC day in Unix millis, for `< end` (exclusive) bounds
pub fn day_end_millis(date: NaiveDate) -> i64 {
    let next = date.succ_opt().unwrap_or(date);
    day_start_millis(next)
}

/// Today's UTC `[start, end)` range in Unix millis
pub fn today_range_millis() -> (i64, i64) {
    let today = chrono::Utc::now().date_naive();
    (day_start_millis(today), day_end_millis(today))
}
