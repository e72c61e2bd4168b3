use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Appointment;
use crate::services::booking::{self, ContactInfo};
use crate::services::selection::{BookingSession, TIME_SLOTS};
use crate::services::{availability, calendar};
use crate::state::AppState;

const SESSION_TTL_HOURS: i64 = 2;

/// Read per request: a session left open across midnight must keep
/// computing against the real current date.
fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn prune_sessions(sessions: &mut HashMap<String, BookingSession>) {
    let cutoff = Utc::now().naive_utc() - chrono::Duration::hours(SESSION_TTL_HOURS);
    sessions.retain(|_, s| s.touched > cutoff);
}

// ── Calendar payload ──

#[derive(Serialize)]
pub struct DayCell {
    pub day: u32,
    pub available: bool,
    pub selected: bool,
}

#[derive(Serialize)]
pub struct CalendarView {
    pub view_year: i32,
    pub view_month_index: u32,
    pub view_month_name: String,
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
    pub times: Vec<String>,
    pub selected_day: u32,
    pub selected_month_index: u32,
    pub selected_year: i32,
    pub selected_time: String,
    pub service_id: Option<String>,
    pub rescheduling: bool,
}

/// The full rendering contract for the viewed month: grid alignment,
/// day-level availability (recomputed on every call) and the selection
/// highlight, which only shows when the viewed month matches the
/// selection's month and year.
fn calendar_view(session: &BookingSession, today: NaiveDate) -> CalendarView {
    let grid = calendar::month_grid(session.view_year, session.view_month_index);
    let available =
        availability::available_days(session.view_year, session.view_month_index, today);

    let days = grid
        .days
        .iter()
        .map(|&day| DayCell {
            day,
            available: available.contains(&day),
            selected: session.is_day_selected(day),
        })
        .collect();

    CalendarView {
        view_year: session.view_year,
        view_month_index: session.view_month_index,
        view_month_name: calendar::month_name(session.view_month_index)
            .unwrap_or_default()
            .to_string(),
        leading_blanks: grid.leading_blanks,
        days,
        times: TIME_SLOTS.iter().map(|t| t.to_string()).collect(),
        selected_day: session.selected_day,
        selected_month_index: session.selected_month_index,
        selected_year: session.selected_year,
        selected_time: session.selected_time.clone(),
        service_id: session.service_id.clone(),
        rescheduling: session.rescheduling_id.is_some(),
    }
}

fn with_session<F>(
    state: &AppState,
    session_id: &str,
    apply: F,
) -> Result<Json<CalendarView>, AppError>
where
    F: FnOnce(&mut BookingSession, NaiveDate) -> Result<(), AppError>,
{
    let now = today();
    let mut sessions = state.sessions.lock().unwrap();
    let session = sessions
        .get_mut(session_id)
        .ok_or_else(|| AppError::NotFound(format!("session {session_id}")))?;

    apply(session, now)?;
    session.touch();
    Ok(Json(calendar_view(session, now)))
}

// ── Flow endpoints ──

#[derive(Deserialize, Default)]
pub struct StartRequest {
    #[serde(default)]
    pub service_id: Option<String>,
}

#[derive(Serialize)]
pub struct StartResponse {
    pub session_id: String,
}

// POST /api/booking/start
pub async fn start_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartRequest>,
) -> Result<Json<StartResponse>, AppError> {
    if let Some(service_id) = req.service_id.as_deref() {
        let db = state.db.lock().unwrap();
        if queries::get_service(&db, service_id)?.is_none() {
            return Err(AppError::NotFound(format!("service {service_id}")));
        }
    }

    let session = BookingSession::start(today(), req.service_id);
    let session_id = Uuid::new_v4().to_string();

    let mut sessions = state.sessions.lock().unwrap();
    prune_sessions(&mut sessions);
    sessions.insert(session_id.clone(), session);

    Ok(Json(StartResponse { session_id }))
}

#[derive(Deserialize)]
pub struct RescheduleRequest {
    pub appointment_id: String,
}

// POST /api/booking/reschedule
pub async fn start_reschedule(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RescheduleRequest>,
) -> Result<Json<StartResponse>, AppError> {
    let appointment = {
        let db = state.db.lock().unwrap();
        queries::get_appointment(&db, &req.appointment_id)?
    }
    .ok_or_else(|| AppError::NotFound(format!("appointment {}", req.appointment_id)))?;

    let now = today();
    let mut session = BookingSession::start(now, None);
    session.load_reschedule(&appointment, now);

    let session_id = Uuid::new_v4().to_string();
    let mut sessions = state.sessions.lock().unwrap();
    prune_sessions(&mut sessions);
    sessions.insert(session_id.clone(), session);

    Ok(Json(StartResponse { session_id }))
}

// GET /api/booking/:session_id/calendar
pub async fn get_calendar(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<CalendarView>, AppError> {
    let sessions = state.sessions.lock().unwrap();
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(format!("session {session_id}")))?;
    Ok(Json(calendar_view(session, today())))
}

// POST /api/booking/:session_id/next-month
pub async fn next_month(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<CalendarView>, AppError> {
    with_session(&state, &session_id, |session, _| {
        session.next_month();
        Ok(())
    })
}

// POST /api/booking/:session_id/prev-month
//
// A rejected transition (below the current-month floor) is not an error:
// the cursor simply stays put and the unchanged view is returned.
pub async fn prev_month(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<CalendarView>, AppError> {
    with_session(&state, &session_id, |session, now| {
        session.prev_month(now);
        Ok(())
    })
}

#[derive(Deserialize)]
pub struct SelectDateRequest {
    pub day: u32,
}

// POST /api/booking/:session_id/select-date
pub async fn select_date(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<SelectDateRequest>,
) -> Result<Json<CalendarView>, AppError> {
    with_session(&state, &session_id, |session, now| {
        let available =
            availability::available_days(session.view_year, session.view_month_index, now);
        if !available.contains(&req.day) {
            return Err(AppError::Validation(format!(
                "day {} is not available for booking",
                req.day
            )));
        }
        session.select_date(req.day);
        Ok(())
    })
}

#[derive(Deserialize)]
pub struct SelectTimeRequest {
    pub time: String,
}

// POST /api/booking/:session_id/select-time
pub async fn select_time(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<SelectTimeRequest>,
) -> Result<Json<CalendarView>, AppError> {
    if !TIME_SLOTS.contains(&req.time.as_str()) {
        return Err(AppError::Validation(format!(
            "{} is not a bookable time",
            req.time
        )));
    }
    with_session(&state, &session_id, |session, _| {
        session.select_time(&req.time);
        Ok(())
    })
}

#[derive(Deserialize)]
pub struct SelectServiceRequest {
    pub service_id: String,
}

// POST /api/booking/:session_id/select-service
pub async fn select_service(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<SelectServiceRequest>,
) -> Result<Json<CalendarView>, AppError> {
    {
        let db = state.db.lock().unwrap();
        if queries::get_service(&db, &req.service_id)?.is_none() {
            return Err(AppError::NotFound(format!("service {}", req.service_id)));
        }
    }
    with_session(&state, &session_id, |session, _| {
        session.service_id = Some(req.service_id.clone());
        Ok(())
    })
}

#[derive(Deserialize)]
pub struct ConfirmRequest {
    pub name: String,
    pub whatsapp: String,
    #[serde(default)]
    pub email: Option<String>,
}

// POST /api/booking/:session_id/confirm
pub async fn confirm(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<ConfirmRequest>,
) -> Result<Json<Appointment>, AppError> {
    let session = {
        let sessions = state.sessions.lock().unwrap();
        sessions
            .get(&session_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("session {session_id}")))?
    };

    let contact = ContactInfo {
        name: req.name,
        whatsapp: req.whatsapp,
        email: req.email,
    };

    let (appointment, recipient) = {
        let mut db = state.db.lock().unwrap();
        let appointment = booking::confirm_booking(&mut db, &session, &contact)?;
        let recipient = queries::get_studio(&db)?
            .map(|s| s.whatsapp)
            .filter(|w| !w.is_empty())
            .unwrap_or_else(|| state.config.studio_whatsapp.clone());
        (appointment, recipient)
    };

    // The flow is done; a later booking starts from a fresh session.
    state.sessions.lock().unwrap().remove(&session_id);

    let summary = booking::booking_summary(&appointment, session.selected_year);
    if let Err(e) = state.notifier.send_message(&recipient, &summary).await {
        tracing::warn!("failed to deliver booking notification: {e:#}");
    }

    Ok(Json(appointment))
}
