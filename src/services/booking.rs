use anyhow::Context;
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::models::{Appointment, AppointmentStatus, Client};
use crate::services::availability;
use crate::services::calendar;
use crate::services::selection::BookingSession;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("please fill in your name and WhatsApp number to continue")]
    MissingContact,

    #[error("could not identify the selected service")]
    NoService,

    #[error("this technique is already booked at that date and time, please pick another slot")]
    SlotTaken,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub struct ContactInfo {
    pub name: String,
    pub whatsapp: String,
    pub email: Option<String>,
}

/// Confirms the session's pending choice as a new appointment.
///
/// Validation failures leave every collection untouched. On success the
/// write is a single transaction: a pending reschedule removes its
/// original booking from the ledger and the client's history, the new
/// appointment (fresh id, status upcoming) lands in both, and a client
/// record is registered the first time a whatsapp number books.
pub fn confirm_booking(
    conn: &mut Connection,
    session: &BookingSession,
    contact: &ContactInfo,
) -> Result<Appointment, BookingError> {
    if contact.name.trim().is_empty() || contact.whatsapp.trim().is_empty() {
        return Err(BookingError::MissingContact);
    }

    let service_id = session
        .service_id
        .as_deref()
        .ok_or(BookingError::NoService)?;
    let service = queries::get_service(conn, service_id)?.ok_or(BookingError::NoService)?;

    let month = calendar::month_name(session.selected_month_index)
        .context("selected month index out of range")?;

    // The day-granularity availability view cannot see slot-level
    // conflicts, so the check is repeated here. A reschedule ignores its
    // own original booking.
    if !availability::is_slot_available(
        conn,
        session.selected_day,
        month,
        &session.selected_time,
        &service.id,
        session.rescheduling_id.as_deref(),
    )? {
        return Err(BookingError::SlotTaken);
    }

    let appointment = Appointment {
        id: Uuid::new_v4().to_string(),
        service_id: service.id.clone(),
        service_name: service.name.clone(),
        client_name: contact.name.trim().to_string(),
        client_whatsapp: contact.whatsapp.trim().to_string(),
        date: session.selected_day,
        month: month.to_string(),
        time: session.selected_time.clone(),
        status: AppointmentStatus::Upcoming,
        price: service.price.clone(),
    };

    let tx = conn
        .transaction()
        .context("failed to open booking transaction")?;

    // Reschedule is replace, never in-place mutation: the old booking
    // goes away and the new one gets its own id.
    if let Some(old_id) = session.rescheduling_id.as_deref() {
        queries::delete_appointment(&tx, old_id)?;
    }
    queries::insert_appointment(&tx, &appointment)?;

    if queries::get_client_by_whatsapp(&tx, &appointment.client_whatsapp)?.is_none() {
        queries::insert_client(
            &tx,
            &Client {
                id: Uuid::new_v4().to_string(),
                name: appointment.client_name.clone(),
                whatsapp: appointment.client_whatsapp.clone(),
                email: contact.email.clone().unwrap_or_default(),
                total_spent: 0.0,
            },
        )?;
    }

    tx.commit().context("failed to commit booking")?;

    tracing::info!(
        appointment_id = %appointment.id,
        service = %appointment.service_name,
        "booking confirmed"
    );

    Ok(appointment)
}

/// Cancellation is a status transition, never a removal: the record stays
/// in the ledger and the client's history for reporting.
pub fn cancel_appointment(conn: &mut Connection, id: &str) -> anyhow::Result<bool> {
    let tx = conn.transaction()?;
    let updated = queries::set_appointment_status(&tx, id, AppointmentStatus::Cancelled)?;
    tx.commit()?;

    if updated {
        tracing::info!(appointment_id = %id, "appointment cancelled");
    }
    Ok(updated)
}

pub fn update_status(
    conn: &mut Connection,
    id: &str,
    status: AppointmentStatus,
) -> anyhow::Result<bool> {
    let tx = conn.transaction()?;
    let updated = queries::set_appointment_status(&tx, id, status)?;
    tx.commit()?;
    Ok(updated)
}

/// Human-readable summary sent to the studio's WhatsApp. The appointment
/// stores no year, so the caller supplies the one the selection was made
/// in.
pub fn booking_summary(appointment: &Appointment, year: i32) -> String {
    let month_number = calendar::month_index(&appointment.month)
        .map(|m| m + 1)
        .unwrap_or(0);
    let formatted_date = format!(
        "{:02}/{:02}/{:02}",
        appointment.date,
        month_number,
        year.rem_euclid(100)
    );

    [
        format!("Olá, {}!", appointment.client_name),
        String::new(),
        "Sua solicitação de agendamento foi enviada!".to_string(),
        String::new(),
        format!("Procedimento: {}", appointment.service_name),
        format!("Data: {formatted_date}"),
        format!("Horário: {}", appointment.time),
        String::new(),
        "Responda com \"CONFIRMAR\" para validar seu horário.".to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::db;
    use crate::services::selection::BookingSession;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    /// Session with a concrete selection, as the handlers would have
    /// built it through navigation.
    fn session(day_of_month: u32, month_index: u32, time: &str, service: &str) -> BookingSession {
        let mut s = BookingSession::start(day("2024-03-15"), Some(service.to_string()));
        s.selected_day = day_of_month;
        s.selected_month_index = month_index;
        s.selected_year = 2024;
        s.selected_time = time.to_string();
        s
    }

    fn contact(name: &str, whatsapp: &str) -> ContactInfo {
        ContactInfo {
            name: name.to_string(),
            whatsapp: whatsapp.to_string(),
            email: None,
        }
    }

    #[test]
    fn test_confirm_writes_ledger_and_history() {
        let mut conn = setup_db();
        let appointment = confirm_booking(
            &mut conn,
            &session(20, 2, "10:00", "volume-russo"),
            &contact("Maria Valentina", "11987654321"),
        )
        .unwrap();

        assert_eq!(appointment.month, "Março");
        assert_eq!(appointment.status, AppointmentStatus::Upcoming);
        assert_eq!(appointment.price, "R$ 130,00");

        let ledger = queries::get_all_appointments(&conn, None, 10).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].id, appointment.id);

        let history = queries::get_client_appointments(&conn, "11987654321").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, appointment.id);
    }

    #[test]
    fn test_confirm_registers_new_client_once() {
        let mut conn = setup_db();
        confirm_booking(
            &mut conn,
            &session(20, 2, "10:00", "volume-russo"),
            &contact("Maria Valentina", "11987654321"),
        )
        .unwrap();

        let client = queries::get_client_by_whatsapp(&conn, "11987654321")
            .unwrap()
            .expect("client registered on first booking");
        assert_eq!(client.total_spent, 0.0);

        // A second booking from the same number adds no duplicate
        confirm_booking(
            &mut conn,
            &session(21, 2, "11:00", "volume-russo"),
            &contact("Maria Valentina", "11987654321"),
        )
        .unwrap();
        assert_eq!(queries::get_clients(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_confirm_missing_contact_mutates_nothing() {
        let mut conn = setup_db();
        let result = confirm_booking(
            &mut conn,
            &session(20, 2, "10:00", "volume-russo"),
            &contact("", "11987654321"),
        );
        assert!(matches!(result, Err(BookingError::MissingContact)));

        let result = confirm_booking(
            &mut conn,
            &session(20, 2, "10:00", "volume-russo"),
            &contact("Maria", "   "),
        );
        assert!(matches!(result, Err(BookingError::MissingContact)));

        assert!(queries::get_all_appointments(&conn, None, 10)
            .unwrap()
            .is_empty());
        assert!(queries::get_clients(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_confirm_unknown_service_rejected() {
        let mut conn = setup_db();
        let mut s = session(20, 2, "10:00", "nope");
        let result = confirm_booking(&mut conn, &s, &contact("Maria", "11987654321"));
        assert!(matches!(result, Err(BookingError::NoService)));

        s.service_id = None;
        let result = confirm_booking(&mut conn, &s, &contact("Maria", "11987654321"));
        assert!(matches!(result, Err(BookingError::NoService)));
    }

    #[test]
    fn test_confirm_slot_conflict_rejected() {
        let mut conn = setup_db();
        confirm_booking(
            &mut conn,
            &session(20, 2, "10:00", "volume-russo"),
            &contact("Beatriz Costa", "11888888888"),
        )
        .unwrap();

        // Same service, same slot
        let result = confirm_booking(
            &mut conn,
            &session(20, 2, "10:00", "volume-russo"),
            &contact("Maria Valentina", "11987654321"),
        );
        assert!(matches!(result, Err(BookingError::SlotTaken)));
        assert_eq!(queries::get_all_appointments(&conn, None, 10).unwrap().len(), 1);

        // Another technique may share the slot: multiple chairs
        confirm_booking(
            &mut conn,
            &session(20, 2, "10:00", "fio-a-fio"),
            &contact("Maria Valentina", "11987654321"),
        )
        .unwrap();
    }

    #[test]
    fn test_reschedule_replaces_in_both_views() {
        let mut conn = setup_db();
        let original = confirm_booking(
            &mut conn,
            &session(20, 2, "10:00", "volume-russo"),
            &contact("Maria Valentina", "11987654321"),
        )
        .unwrap();

        let mut s = session(22, 2, "15:00", "volume-russo");
        s.rescheduling_id = Some(original.id.clone());
        let replacement = confirm_booking(&mut conn, &s, &contact("Maria Valentina", "11987654321"))
            .unwrap();
        assert_ne!(replacement.id, original.id);

        let ledger = queries::get_all_appointments(&conn, None, 10).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].id, replacement.id);
        assert_eq!(ledger[0].date, 22);
        assert_eq!(ledger[0].time, "15:00");

        let history = queries::get_client_appointments(&conn, "11987654321").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, replacement.id);
    }

    #[test]
    fn test_reschedule_to_own_slot_is_allowed() {
        let mut conn = setup_db();
        let original = confirm_booking(
            &mut conn,
            &session(20, 2, "10:00", "volume-russo"),
            &contact("Maria Valentina", "11987654321"),
        )
        .unwrap();

        // Re-confirming the very same slot must not conflict with itself
        let mut s = session(20, 2, "10:00", "volume-russo");
        s.rescheduling_id = Some(original.id.clone());
        confirm_booking(&mut conn, &s, &contact("Maria Valentina", "11987654321")).unwrap();
    }

    #[test]
    fn test_cancel_keeps_record_in_both_views() {
        let mut conn = setup_db();
        let appointment = confirm_booking(
            &mut conn,
            &session(20, 2, "10:00", "volume-russo"),
            &contact("Maria Valentina", "11987654321"),
        )
        .unwrap();

        assert!(cancel_appointment(&mut conn, &appointment.id).unwrap());

        let ledger = queries::get_all_appointments(&conn, None, 10).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].status, AppointmentStatus::Cancelled);

        let history = queries::get_client_appointments(&conn, "11987654321").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, AppointmentStatus::Cancelled);

        // Unknown ids are reported, not fatal
        assert!(!cancel_appointment(&mut conn, "missing").unwrap());
    }

    #[test]
    fn test_update_status_keeps_views_consistent() {
        let mut conn = setup_db();
        let appointment = confirm_booking(
            &mut conn,
            &session(20, 2, "10:00", "volume-russo"),
            &contact("Maria Valentina", "11987654321"),
        )
        .unwrap();

        assert!(update_status(&mut conn, &appointment.id, AppointmentStatus::Completed).unwrap());

        let ledger = queries::get_appointment(&conn, &appointment.id).unwrap().unwrap();
        assert_eq!(ledger.status, AppointmentStatus::Completed);
        let history = queries::get_client_appointments(&conn, "11987654321").unwrap();
        assert_eq!(history[0].status, AppointmentStatus::Completed);
    }

    #[test]
    fn test_booking_summary_contents() {
        let appointment = Appointment {
            id: "a1".to_string(),
            service_id: "volume-russo".to_string(),
            service_name: "Volume Russo".to_string(),
            client_name: "Maria Valentina".to_string(),
            client_whatsapp: "11987654321".to_string(),
            date: 5,
            month: "Março".to_string(),
            time: "14:00".to_string(),
            status: AppointmentStatus::Upcoming,
            price: "R$ 130,00".to_string(),
        };

        let summary = booking_summary(&appointment, 2024);
        assert!(summary.contains("Olá, Maria Valentina!"));
        assert!(summary.contains("Volume Russo"));
        assert!(summary.contains("Data: 05/03/24"));
        assert!(summary.contains("Horário: 14:00"));
    }
}
