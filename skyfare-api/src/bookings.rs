use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use skyfare_core::Booking;
use uuid::Uuid;

use crate::{
    error::AppError,
    middleware::auth::{session_auth_middleware, CurrentSession},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub flight_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CancelBookingResponse {
    pub id: Uuid,
    pub cancelled: bool,
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/{id}/cancel", post(cancel_booking))
        .route_layer(middleware::from_fn_with_state(state, session_auth_middleware))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = state.booking_service(session).book(req.flight_id).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn list_bookings(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Json<Vec<Booking>> {
    Json(state.booking_service(session).list_mine().await)
}

async fn cancel_booking(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Path(id): Path<Uuid>,
) -> Result<Json<CancelBookingResponse>, AppError> {
    if state.booking_service(session).cancel(id).await {
        Ok(Json(CancelBookingResponse { id, cancelled: true }))
    } else {
        Err(AppError::ConflictError("Booking could not be cancelled".to_string()))
    }
}
