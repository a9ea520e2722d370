use skyfare_catalog::is_known_city;
use skyfare_core::{CoreError, CoreResult, Flight, FlightRepository, NewFlight, Notifier};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::session::SessionAdapter;

/// Flight inventory management. Every operation requires an admin session
/// and is rejected before storage is touched otherwise.
#[derive(Clone)]
pub struct AdminInventoryService {
    flights: Arc<dyn FlightRepository>,
    session: SessionAdapter,
    notifier: Arc<dyn Notifier>,
}

impl AdminInventoryService {
    pub fn new(
        flights: Arc<dyn FlightRepository>,
        session: SessionAdapter,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            flights,
            session,
            notifier,
        }
    }

    pub async fn list(&self) -> CoreResult<Vec<Flight>> {
        self.session.require_admin().await?;
        self.flights.list_flights().await.map_err(|e| {
            error!("Failed to list inventory: {}", e);
            self.notifier.error("Failed to fetch flights");
            e.into()
        })
    }

    pub async fn create(&self, flight: NewFlight) -> CoreResult<Flight> {
        let admin = self.session.require_admin().await?;
        self.validate(&flight)?;

        match self.flights.create_flight(&flight).await {
            Ok(created) => {
                info!("Admin {} added flight {} ({})", admin.id, created.flight_number, created.id);
                self.notifier.success("Flight added successfully");
                Ok(created)
            }
            Err(e) => {
                error!("Failed to add flight {}: {}", flight.flight_number, e);
                self.notifier.error("Failed to add flight");
                Err(e.into())
            }
        }
    }

    /// Replace every editable field of the flight with the same id.
    pub async fn update(&self, flight: Flight) -> CoreResult<Flight> {
        let admin = self.session.require_admin().await?;
        let (id, details) = flight.into_parts();
        self.validate(&details)?;

        match self.flights.update_flight(id, &details).await {
            Ok(Some(updated)) => {
                info!("Admin {} updated flight {}", admin.id, id);
                self.notifier.success("Flight updated successfully");
                Ok(updated)
            }
            Ok(None) => {
                self.notifier.error("Flight not found");
                Err(CoreError::NotFound(format!("Flight {}", id)))
            }
            Err(e) => {
                error!("Failed to update flight {}: {}", id, e);
                self.notifier.error("Failed to update flight");
                Err(e.into())
            }
        }
    }

    /// `Ok(false)` when no flight had this id.
    pub async fn delete(&self, id: Uuid) -> CoreResult<bool> {
        let admin = self.session.require_admin().await?;

        match self.flights.delete_flight(id).await {
            Ok(true) => {
                info!("Admin {} deleted flight {}", admin.id, id);
                self.notifier.success("Flight deleted successfully");
                Ok(true)
            }
            Ok(false) => {
                self.notifier.error("Flight not found");
                Ok(false)
            }
            Err(e) => {
                error!("Failed to delete flight {}: {}", id, e);
                self.notifier.error("Failed to delete flight");
                Err(e.into())
            }
        }
    }

    fn validate(&self, flight: &NewFlight) -> CoreResult<()> {
        let result = flight.validate().and_then(|()| {
            for code in [&flight.source, &flight.destination] {
                if !is_known_city(code) {
                    return Err(CoreError::ValidationFailure(format!("unknown city code {}", code)));
                }
            }
            Ok(())
        });

        if let Err(e) = &result {
            self.notifier.error(&e.to_string());
        }
        result
    }
}
