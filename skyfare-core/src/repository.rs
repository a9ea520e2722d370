use async_trait::async_trait;
use uuid::Uuid;

use crate::booking::{Booking, NewBooking};
use crate::flight::{Flight, NewFlight};
use crate::search::FlightSearchQuery;

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Repository trait for the flight inventory
#[async_trait]
pub trait FlightRepository: Send + Sync {
    /// All flights in catalog order.
    async fn list_flights(&self) -> Result<Vec<Flight>, RepoError>;

    async fn search_flights(&self, query: &FlightSearchQuery) -> Result<Vec<Flight>, RepoError>;

    async fn get_flight(&self, id: Uuid) -> Result<Option<Flight>, RepoError>;

    async fn create_flight(&self, flight: &NewFlight) -> Result<Flight, RepoError>;

    /// `None` when no flight has this id.
    async fn update_flight(&self, id: Uuid, flight: &NewFlight) -> Result<Option<Flight>, RepoError>;

    async fn delete_flight(&self, id: Uuid) -> Result<bool, RepoError>;
}

/// Repository trait for the `flight_bookings` table
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert and return the stored row with server-assigned fields.
    async fn insert_booking(&self, booking: &NewBooking) -> Result<Booking, RepoError>;

    /// Bookings owned by `user_id`, newest first.
    async fn list_bookings(&self, user_id: Uuid) -> Result<Vec<Booking>, RepoError>;

    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>, RepoError>;

    /// Flip to cancelled when both id and owner match and the status allows it.
    /// `None` when nothing matched.
    async fn cancel_booking(&self, id: Uuid, user_id: Uuid) -> Result<Option<Booking>, RepoError>;
}
