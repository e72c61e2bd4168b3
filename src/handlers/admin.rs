use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Appointment, AppointmentStatus, Client, Service, Studio};
use crate::services::booking;
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// ── Appointments ──

#[derive(Deserialize)]
pub struct AppointmentsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

// GET /api/admin/appointments
pub async fn get_appointments(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let limit = query.limit.unwrap_or(50);
    let db = state.db.lock().unwrap();
    Ok(Json(queries::get_all_appointments(
        &db,
        query.status.as_deref(),
        limit,
    )?))
}

#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: AppointmentStatus,
}

// POST /api/admin/appointments/:id/status
pub async fn update_appointment_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdate>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let updated = {
        let mut db = state.db.lock().unwrap();
        booking::update_status(&mut db, &id, req.status)?
    };

    if !updated {
        return Err(AppError::NotFound(format!("appointment {id}")));
    }
    Ok(Json(
        serde_json::json!({ "id": id, "status": req.status.as_str() }),
    ))
}

// ── Clients ──

// GET /api/admin/clients
pub async fn get_clients(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Client>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.db.lock().unwrap();
    Ok(Json(queries::get_clients(&db)?))
}

#[derive(Deserialize)]
pub struct ClientPayload {
    pub name: String,
    pub whatsapp: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub total_spent: f64,
}

// PUT /api/admin/clients/:id
pub async fn update_client(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<ClientPayload>,
) -> Result<Json<Client>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let client = Client {
        id,
        name: req.name,
        whatsapp: req.whatsapp,
        email: req.email,
        total_spent: req.total_spent,
    };

    let db = state.db.lock().unwrap();
    if !queries::update_client(&db, &client)? {
        return Err(AppError::NotFound(format!("client {}", client.id)));
    }
    Ok(Json(client))
}

// DELETE /api/admin/clients/:id
pub async fn delete_client(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.db.lock().unwrap();
    if !queries::delete_client(&db, &id)? {
        return Err(AppError::NotFound(format!("client {id}")));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}

// ── Services ──

#[derive(Deserialize)]
pub struct ServicePayload {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub price: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub maintenance: String,
    #[serde(default)]
    pub image: String,
}

impl ServicePayload {
    fn into_service(self, id: String) -> Service {
        Service {
            id,
            name: self.name,
            price: self.price,
            description: self.description,
            long_description: self.long_description,
            duration: self.duration,
            maintenance: self.maintenance,
            image: self.image,
        }
    }
}

// POST /api/admin/services
pub async fn create_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<ServicePayload>,
) -> Result<Json<Service>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let id = req
        .id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let db = state.db.lock().unwrap();
    if queries::get_service(&db, &id)?.is_some() {
        return Err(AppError::Conflict(format!("service {id} already exists")));
    }

    let service = req.into_service(id);
    queries::create_service(&db, &service)?;
    Ok(Json(service))
}

// PUT /api/admin/services/:id
pub async fn update_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<ServicePayload>,
) -> Result<Json<Service>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let service = req.into_service(id);
    let db = state.db.lock().unwrap();
    if !queries::update_service(&db, &service)? {
        return Err(AppError::NotFound(format!("service {}", service.id)));
    }
    Ok(Json(service))
}

// DELETE /api/admin/services/:id
pub async fn delete_service(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.db.lock().unwrap();
    if !queries::delete_service(&db, &id)? {
        return Err(AppError::NotFound(format!("service {id}")));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}

// ── Studio profile ──

// PUT /api/admin/studio
pub async fn update_studio(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(studio): Json<Studio>,
) -> Result<Json<Studio>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.db.lock().unwrap();
    queries::save_studio(&db, &studio)?;
    Ok(Json(studio))
}

// ── Dashboard ──

#[derive(Serialize)]
pub struct StatsResponse {
    pub completed_revenue: f64,
    pub projected_revenue: f64,
    pub completed_count: i64,
    pub upcoming_count: i64,
    pub client_count: i64,
}

// GET /api/admin/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let stats = {
        let db = state.db.lock().unwrap();
        queries::get_studio_stats(&db)?
    };

    Ok(Json(StatsResponse {
        completed_revenue: stats.completed_revenue,
        projected_revenue: stats.projected_revenue,
        completed_count: stats.completed_count,
        upcoming_count: stats.upcoming_count,
        client_count: stats.client_count,
    }))
}
