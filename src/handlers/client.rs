use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Appointment;
use crate::services::booking;
use crate::state::AppState;

// GET /api/clients/:whatsapp/appointments
//
// The personal history view, served from its own collection rather than
// filtered out of the ledger.
pub async fn get_client_appointments(
    State(state): State<Arc<AppState>>,
    Path(whatsapp): Path<String>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let db = state.db.lock().unwrap();
    Ok(Json(queries::get_client_appointments(&db, &whatsapp)?))
}

// POST /api/appointments/:id/cancel
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cancelled = {
        let mut db = state.db.lock().unwrap();
        booking::cancel_appointment(&mut db, &id)?
    };

    if !cancelled {
        return Err(AppError::NotFound(format!("appointment {id}")));
    }
    Ok(Json(serde_json::json!({ "cancelled": true })))
}
