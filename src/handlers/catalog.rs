use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Service, Studio};
use crate::state::AppState;

// GET /api/services
pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Service>>, AppError> {
    let db = state.db.lock().unwrap();
    Ok(Json(queries::get_services(&db)?))
}

// GET /api/services/:id
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Service>, AppError> {
    let db = state.db.lock().unwrap();
    queries::get_service(&db, &id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("service {id}")))
}

// GET /api/studio
pub async fn get_studio(State(state): State<Arc<AppState>>) -> Result<Json<Studio>, AppError> {
    let db = state.db.lock().unwrap();
    queries::get_studio(&db)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("studio profile".to_string()))
}
