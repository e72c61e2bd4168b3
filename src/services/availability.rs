use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;

use crate::db::queries;
use crate::services::calendar;

/// Bookable days of the viewed month. Derived state: recomputed from
/// `today` on every call, never cached.
///
/// A month strictly before today's yields nothing (the UI blocks that
/// navigation, but the engine must not return past days regardless). In
/// the current month days start at today inclusive; in a future month at
/// day 1. Sundays are excluded throughout.
pub fn available_days(view_year: i32, view_month_index: u32, today: NaiveDate) -> Vec<u32> {
    let is_past_month = view_year < today.year()
        || (view_year == today.year() && view_month_index < today.month0());
    if is_past_month {
        return Vec::new();
    }

    let is_current_month = view_year == today.year() && view_month_index == today.month0();
    let start_day = if is_current_month { today.day() } else { 1 };

    let mut days = Vec::new();
    for d in start_day..=calendar::days_in_month(view_year, view_month_index) {
        match calendar::weekday_of(view_year, view_month_index, d) {
            // Closed on Sundays
            Some(0) | None => {}
            Some(_) => days.push(d),
        }
    }
    days
}

/// A slot is taken iff a non-cancelled appointment already occupies the
/// same (date, month name, time, service). Different services may share a
/// slot. `exclude_id` lets a reschedule-in-progress ignore its own
/// original booking.
pub fn is_slot_available(
    conn: &Connection,
    date: u32,
    month: &str,
    time: &str,
    service_id: &str,
    exclude_id: Option<&str>,
) -> anyhow::Result<bool> {
    let taken = queries::get_appointments_for_slot(conn, date, month, time, service_id)?;
    let conflict = taken.iter().any(|a| Some(a.id.as_str()) != exclude_id);
    Ok(!conflict)
}
