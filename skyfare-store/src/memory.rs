use async_trait::async_trait;
use chrono::Utc;
use skyfare_core::{
    Booking, BookingRepository, Flight, FlightRepository, FlightSearchQuery, NewBooking, NewFlight,
    RepoError,
};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory flight inventory. Keeps insertion order as catalog order.
#[derive(Default)]
pub struct InMemoryFlightRepository {
    flights: RwLock<Vec<Flight>>,
}

impl InMemoryFlightRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flights(flights: Vec<Flight>) -> Self {
        Self {
            flights: RwLock::new(flights),
        }
    }
}

#[async_trait]
impl FlightRepository for InMemoryFlightRepository {
    async fn list_flights(&self) -> Result<Vec<Flight>, RepoError> {
        Ok(self.flights.read().await.clone())
    }

    async fn search_flights(&self, query: &FlightSearchQuery) -> Result<Vec<Flight>, RepoError> {
        let flights = self.flights.read().await;
        Ok(flights.iter().filter(|f| query.matches(f)).cloned().collect())
    }

    async fn get_flight(&self, id: Uuid) -> Result<Option<Flight>, RepoError> {
        let flights = self.flights.read().await;
        Ok(flights.iter().find(|f| f.id == id).cloned())
    }

    async fn create_flight(&self, flight: &NewFlight) -> Result<Flight, RepoError> {
        let flight = Flight::from_new(Uuid::new_v4(), flight.clone(), Utc::now());
        self.flights.write().await.push(flight.clone());
        Ok(flight)
    }

    async fn update_flight(&self, id: Uuid, flight: &NewFlight) -> Result<Option<Flight>, RepoError> {
        let mut flights = self.flights.write().await;
        Ok(flights.iter_mut().find(|f| f.id == id).map(|existing| {
            existing.apply(flight, Utc::now());
            existing.clone()
        }))
    }

    async fn delete_flight(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut flights = self.flights.write().await;
        let before = flights.len();
        flights.retain(|f| f.id != id);
        Ok(flights.len() < before)
    }
}

/// In-memory `flight_bookings` table.
#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: RwLock<Vec<Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.bookings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.bookings.read().await.is_empty()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert_booking(&self, booking: &NewBooking) -> Result<Booking, RepoError> {
        let stored = Booking::from_new(Uuid::new_v4(), booking.clone(), Utc::now());
        self.bookings.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn list_bookings(&self, user_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        let bookings = self.bookings.read().await;
        // reverse first so equal timestamps keep newest-inserted on top
        let mut mine: Vec<Booking> = bookings
            .iter()
            .rev()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>, RepoError> {
        let bookings = self.bookings.read().await;
        Ok(bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn cancel_booking(&self, id: Uuid, user_id: Uuid) -> Result<Option<Booking>, RepoError> {
        let mut bookings = self.bookings.write().await;
        let Some(booking) = bookings.iter_mut().find(|b| b.id == id && b.user_id == user_id) else {
            return Ok(None);
        };

        if booking.cancel(Utc::now()) {
            Ok(Some(booking.clone()))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyfare_catalog::seed_flights;
    use skyfare_core::{BookingStatus, SeatNumber};

    fn new_booking(flight: &Flight, user_id: Uuid) -> NewBooking {
        NewBooking {
            user_id,
            flight_id: flight.id,
            flight: flight.snapshot(),
            seat_number: SeatNumber::new(3, 'B').unwrap(),
            passenger_name: "Jane Doe".to_string(),
            passenger_email: "jane@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_flight_crud_lifecycle() {
        let repo = InMemoryFlightRepository::with_flights(seed_flights());
        let seeded = repo.list_flights().await.unwrap().len();

        let (_, details) = seed_flights().remove(0).into_parts();
        let created = repo.create_flight(&details).await.unwrap();
        assert_eq!(repo.list_flights().await.unwrap().len(), seeded + 1);
        assert_eq!(repo.list_flights().await.unwrap().last().unwrap().id, created.id);

        let mut changed = details.clone();
        changed.price = 350;
        let updated = repo.update_flight(created.id, &changed).await.unwrap().unwrap();
        assert_eq!(updated.price, 350);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at.is_some());

        assert!(repo.update_flight(Uuid::new_v4(), &changed).await.unwrap().is_none());

        assert!(repo.delete_flight(created.id).await.unwrap());
        assert!(!repo.delete_flight(created.id).await.unwrap());
        assert!(repo.get_flight(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bookings_are_listed_newest_first_per_user() {
        let repo = InMemoryBookingRepository::new();
        let flight = seed_flights().remove(0);
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();

        let first = repo.insert_booking(&new_booking(&flight, user)).await.unwrap();
        repo.insert_booking(&new_booking(&flight, other)).await.unwrap();
        let second = repo.insert_booking(&new_booking(&flight, user)).await.unwrap();

        let mine = repo.list_bookings(user).await.unwrap();
        assert_eq!(mine.iter().map(|b| b.id).collect::<Vec<_>>(), vec![second.id, first.id]);
        assert_eq!(repo.len().await, 3);
    }

    #[tokio::test]
    async fn test_cancel_requires_owner() {
        let repo = InMemoryBookingRepository::new();
        let flight = seed_flights().remove(0);
        let owner = Uuid::new_v4();
        let booking = repo.insert_booking(&new_booking(&flight, owner)).await.unwrap();

        assert!(repo.cancel_booking(booking.id, Uuid::new_v4()).await.unwrap().is_none());
        let untouched = repo.get_booking(booking.id).await.unwrap().unwrap();
        assert_eq!(untouched.status, BookingStatus::Confirmed);

        let cancelled = repo.cancel_booking(booking.id, owner).await.unwrap().unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
    }
}
