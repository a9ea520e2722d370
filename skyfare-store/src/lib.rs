pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod error;
pub mod flight_repo;
pub mod identity;
pub mod memory;

use std::sync::Arc;

use skyfare_core::{BookingRepository, Flight, FlightRepository};
use tracing::info;

pub use app_config::{Config, StorageBackend};
pub use booking_repo::PostgresBookingRepository;
pub use database::DbClient;
pub use error::StoreError;
pub use flight_repo::PostgresFlightRepository;
pub use identity::{validate_email, validate_password, AccountDirectory, LocalIdentityProvider};
pub use memory::{InMemoryBookingRepository, InMemoryFlightRepository};

/// Repositories selected by `storage.backend`.
#[derive(Clone)]
pub struct Storage {
    pub flights: Arc<dyn FlightRepository>,
    pub bookings: Arc<dyn BookingRepository>,
}

impl Storage {
    pub fn in_memory(seed: Vec<Flight>) -> Self {
        Self {
            flights: Arc::new(InMemoryFlightRepository::with_flights(seed)),
            bookings: Arc::new(InMemoryBookingRepository::new()),
        }
    }

    pub async fn connect(config: &Config, seed: Vec<Flight>) -> Result<Self, StoreError> {
        let seed = if config.storage.seed_catalog { seed } else { Vec::new() };

        match config.storage.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage with {} catalog flights", seed.len());
                Ok(Self::in_memory(seed))
            }
            StorageBackend::Postgres => {
                let database = config.database.as_ref().ok_or(StoreError::MissingDatabaseUrl)?;
                let db = DbClient::new(&database.url, database.max_connections).await?;
                db.migrate().await?;
                db.seed_flights(&seed).await?;
                Ok(Self {
                    flights: Arc::new(PostgresFlightRepository::new(db.pool.clone())),
                    bookings: Arc::new(PostgresBookingRepository::new(db.pool)),
                })
            }
        }
    }
}
