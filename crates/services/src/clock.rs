use chrono::{Local, NaiveDate};

/// The calendar date usage is recorded and reported against.
///
/// Resolved from the server's local wall clock, not UTC, so a session logged
/// at 23:50 local time lands on the same day the user experienced it.
/// Handlers resolve this once per request and thread it through every
/// accumulator and aggregator call; re-deriving it at each query site risks
/// a read/write mismatch when a request straddles midnight.
pub fn report_date() -> NaiveDate {
    Local::now().date_naive()
}
