use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, put},
    Extension, Json, Router,
};
use chrono::Utc;
use skyfare_core::{Flight, NewFlight};
use uuid::Uuid;

use crate::{
    error::AppError,
    middleware::auth::{admin_auth_middleware, session_auth_middleware, CurrentSession},
    state::AppState,
};

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/flights", get(list_flights).post(create_flight))
        .route("/admin/flights/{id}", put(update_flight).delete(delete_flight))
        .route_layer(middleware::from_fn(admin_auth_middleware))
        .route_layer(middleware::from_fn_with_state(state, session_auth_middleware))
}

pub async fn list_flights(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Result<Json<Vec<Flight>>, AppError> {
    Ok(Json(state.admin_service(session).list().await?))
}

pub async fn create_flight(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Json(req): Json<NewFlight>,
) -> Result<(StatusCode, Json<Flight>), AppError> {
    let flight = state.admin_service(session).create(req).await?;
    Ok((StatusCode::CREATED, Json(flight)))
}

pub async fn update_flight(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Path(id): Path<Uuid>,
    Json(req): Json<NewFlight>,
) -> Result<Json<Flight>, AppError> {
    let flight = Flight::from_new(id, req, Utc::now());
    Ok(Json(state.admin_service(session).update(flight).await?))
}

pub async fn delete_flight(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.admin_service(session).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFoundError("Flight not found".to_string()))
    }
}
