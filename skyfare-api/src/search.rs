use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use skyfare_catalog::{cities, city, popular_routes, PopularRoute};
use skyfare_core::{City, Flight, FlightSearchQuery};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cities", get(list_cities))
        .route("/cities/{code}", get(get_city))
        .route("/routes/popular", get(list_popular_routes))
        .route("/flights", get(search_flights))
        .route("/flights/{id}", get(get_flight))
}

async fn list_cities() -> Json<&'static [City]> {
    Json(cities())
}

async fn get_city(Path(code): Path<String>) -> Result<Json<&'static City>, AppError> {
    city(&code.to_uppercase())
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("Unknown city code {}", code)))
}

async fn list_popular_routes() -> Json<&'static [PopularRoute]> {
    Json(popular_routes())
}

/// `GET /flights?source=JFK&destination=LAX&date=2025-04-15`; omitted or blank
/// parameters match every flight.
///
/// Codes match exactly and case-sensitively, so `jfk` finds nothing. Only
/// `/cities/{code}` upper-cases its input.
async fn search_flights(
    State(state): State<AppState>,
    query: Result<Query<FlightSearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Flight>>, AppError> {
    let Query(query) = query.map_err(|e| AppError::ValidationError(e.body_text()))?;
    Ok(Json(state.search_service().search(&query).await))
}

async fn get_flight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Flight>, AppError> {
    state
        .search_service()
        .get_by_id(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError("Flight not found".to_string()))
}
