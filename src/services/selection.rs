use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Appointment;
use crate::services::calendar;

/// Bookable times. Fixed configuration, not derived from anything.
pub const TIME_SLOTS: [&str; 8] = [
    "08:00", "09:00", "10:00", "11:00", "14:00", "15:00", "16:00", "17:00",
];

pub const DEFAULT_TIME: &str = "10:00";

/// One in-progress booking flow. The view cursor (the month being looked
/// at) is tracked independently of the selection (the pending choice):
/// browsing forward and back must not corrupt a selection already made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSession {
    pub view_year: i32,
    /// 0=Janeiro..11=Dezembro.
    pub view_month_index: u32,

    pub selected_day: u32,
    pub selected_month_index: u32,
    pub selected_year: i32,
    pub selected_time: String,

    pub service_id: Option<String>,
    /// Id of the appointment being replaced when this flow is a reschedule.
    pub rescheduling_id: Option<String>,

    pub touched: NaiveDateTime,
}

impl BookingSession {
    /// Fresh flow: cursor on today's month, selection on today at the
    /// default time, no reschedule marker left over from a previous flow.
    pub fn start(today: NaiveDate, service_id: Option<String>) -> Self {
        Self {
            view_year: today.year(),
            view_month_index: today.month0(),
            selected_day: today.day(),
            selected_month_index: today.month0(),
            selected_year: today.year(),
            selected_time: DEFAULT_TIME.to_string(),
            service_id,
            rescheduling_id: None,
            touched: Utc::now().naive_utc(),
        }
    }

    /// Unbounded forward navigation; December rolls the year over.
    pub fn next_month(&mut self) {
        if self.view_month_index == 11 {
            self.view_month_index = 0;
            self.view_year += 1;
        } else {
            self.view_month_index += 1;
        }
    }

    /// Backward navigation with a hard floor at the current real-world
    /// month. Returns false and leaves the cursor unchanged when the
    /// candidate month lies in the past.
    pub fn prev_month(&mut self, today: NaiveDate) -> bool {
        let (year, month) = if self.view_month_index == 0 {
            (self.view_year - 1, 11)
        } else {
            (self.view_year, self.view_month_index - 1)
        };

        if year < today.year() || (year == today.year() && month < today.month0()) {
            return false;
        }

        self.view_year = year;
        self.view_month_index = month;
        true
    }

    /// Selecting a date always binds the selection to the month currently
    /// being viewed.
    pub fn select_date(&mut self, day: u32) {
        self.selected_day = day;
        self.selected_month_index = self.view_month_index;
        self.selected_year = self.view_year;
    }

    pub fn select_time(&mut self, time: &str) {
        self.selected_time = time.to_string();
    }

    /// Overwrites cursor and selection from the appointment being
    /// rescheduled. The stored month name is resolved back to an index;
    /// when it cannot be resolved, the month navigation is silently
    /// skipped. Stored months carry no year, so the current real-world
    /// year is assumed.
    pub fn load_reschedule(&mut self, appointment: &Appointment, today: NaiveDate) {
        self.rescheduling_id = Some(appointment.id.clone());
        self.service_id = Some(appointment.service_id.clone());

        if let Some(month) = calendar::month_index(&appointment.month) {
            self.view_year = today.year();
            self.view_month_index = month;
            self.selected_month_index = month;
            self.selected_year = today.year();
        }

        self.selected_day = appointment.date;
        self.selected_time = appointment.time.clone();
    }

    /// Rendering contract: a calendar cell is selected only when the
    /// selection's day, month and year all match the viewed month.
    pub fn is_day_selected(&self, day: u32) -> bool {
        self.selected_day == day
            && self.selected_month_index == self.view_month_index
            && self.selected_year == self.view_year
    }

    pub fn touch(&mut self) {
        self.touched = Utc::now().naive_utc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentStatus;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn appointment(month: &str) -> Appointment {
        Appointment {
            id: "a1".to_string(),
            service_id: "volume-russo".to_string(),
            service_name: "Volume Russo".to_string(),
            client_name: "Maria Valentina".to_string(),
            client_whatsapp: "11987654321".to_string(),
            date: 20,
            month: month.to_string(),
            time: "14:00".to_string(),
            status: AppointmentStatus::Upcoming,
            price: "R$ 130,00".to_string(),
        }
    }

    #[test]
    fn test_start_selects_today() {
        let session = BookingSession::start(day("2024-03-15"), None);
        assert_eq!(session.view_year, 2024);
        assert_eq!(session.view_month_index, 2);
        assert_eq!(session.selected_day, 15);
        assert_eq!(session.selected_time, DEFAULT_TIME);
        assert!(session.rescheduling_id.is_none());
    }

    #[test]
    fn test_next_month_rolls_year() {
        let mut session = BookingSession::start(day("2024-12-10"), None);
        session.next_month();
        assert_eq!(session.view_year, 2025);
        assert_eq!(session.view_month_index, 0);
    }

    #[test]
    fn test_prev_month_floor_at_current_month() {
        let today = day("2024-03-15");
        let mut session = BookingSession::start(today, None);

        assert!(!session.prev_month(today));
        assert_eq!(session.view_year, 2024);
        assert_eq!(session.view_month_index, 2);

        session.next_month();
        assert!(session.prev_month(today));
        assert_eq!(session.view_month_index, 2);
    }

    #[test]
    fn test_prev_month_floor_across_year_boundary() {
        let today = day("2025-01-10");
        let mut session = BookingSession::start(today, None);
        assert!(!session.prev_month(today));
        assert_eq!(session.view_year, 2025);
        assert_eq!(session.view_month_index, 0);
    }

    #[test]
    fn test_select_date_binds_to_viewed_month() {
        let today = day("2024-03-15");
        let mut session = BookingSession::start(today, None);
        session.next_month();
        session.select_date(5);

        assert_eq!(session.selected_day, 5);
        assert_eq!(session.selected_month_index, 3);
        assert_eq!(session.selected_year, 2024);
    }

    #[test]
    fn test_selection_survives_browsing() {
        let today = day("2024-03-15");
        let mut session = BookingSession::start(today, None);
        session.select_date(20);
        session.next_month();

        // Browsing to April does not show March's selection...
        assert!(!session.is_day_selected(20));
        // ...and coming back restores it.
        assert!(session.prev_month(today));
        assert!(session.is_day_selected(20));
    }

    #[test]
    fn test_load_reschedule_overwrites_cursor_and_selection() {
        let today = day("2024-03-15");
        let mut session = BookingSession::start(today, None);
        session.load_reschedule(&appointment("Maio"), today);

        assert_eq!(session.rescheduling_id.as_deref(), Some("a1"));
        assert_eq!(session.service_id.as_deref(), Some("volume-russo"));
        assert_eq!(session.view_month_index, 4);
        assert_eq!(session.view_year, 2024);
        assert_eq!(session.selected_day, 20);
        assert_eq!(session.selected_time, "14:00");
        assert!(session.is_day_selected(20));
    }

    #[test]
    fn test_load_reschedule_unknown_month_skips_navigation() {
        let today = day("2024-03-15");
        let mut session = BookingSession::start(today, None);
        session.load_reschedule(&appointment("Thermidor"), today);

        // Day and time still load, the cursor stays where it was
        assert_eq!(session.view_month_index, 2);
        assert_eq!(session.selected_day, 20);
        assert_eq!(session.selected_time, "14:00");
    }
}
