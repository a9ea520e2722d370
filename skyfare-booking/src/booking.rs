use skyfare_core::{
    Booking, BookingRepository, CoreError, CoreResult, FlightRepository, NewBooking, Notifier,
};
use skyfare_shared::Masked;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::seat::SeatAllocator;
use crate::session::SessionAdapter;

const GUEST_PASSENGER: &str = "Guest User";

/// Books seats for the signed-in user and manages their bookings.
///
/// Seat inventory is not decremented on booking and a drawn seat may already
/// be held by another passenger on the same flight.
#[derive(Clone)]
pub struct BookingService {
    flights: Arc<dyn FlightRepository>,
    bookings: Arc<dyn BookingRepository>,
    session: SessionAdapter,
    seats: Arc<dyn SeatAllocator>,
    notifier: Arc<dyn Notifier>,
}

impl BookingService {
    pub fn new(
        flights: Arc<dyn FlightRepository>,
        bookings: Arc<dyn BookingRepository>,
        session: SessionAdapter,
        seats: Arc<dyn SeatAllocator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            flights,
            bookings,
            session,
            seats,
            notifier,
        }
    }

    pub async fn book(&self, flight_id: Uuid) -> CoreResult<Booking> {
        let Some(user) = self.session.current_user().await else {
            self.notifier.error("You must be logged in to book a flight");
            return Err(CoreError::Unauthenticated);
        };

        let flight = match self.flights.get_flight(flight_id).await {
            Ok(Some(flight)) => flight,
            Ok(None) => {
                self.notifier.error("Flight not found");
                return Err(CoreError::NotFound(format!("Flight {}", flight_id)));
            }
            Err(e) => {
                error!("Failed to load flight {} for booking: {}", flight_id, e);
                self.notifier.error("Failed to book flight");
                return Err(e.into());
            }
        };

        if flight.is_sold_out() {
            warn!("Rejected booking on sold-out flight {}", flight.flight_number);
            self.notifier.error("No seats available on this flight");
            return Err(CoreError::SoldOut(flight.flight_number));
        }

        let passenger_name = match user.display_name() {
            name if name.is_empty() => GUEST_PASSENGER.to_string(),
            name => name,
        };
        let request = NewBooking {
            user_id: user.id,
            flight_id: flight.id,
            flight: flight.snapshot(),
            seat_number: self.seats.assign(),
            passenger_name,
            passenger_email: user.email,
        };

        match self.bookings.insert_booking(&request).await {
            Ok(booking) => {
                info!(
                    "Booked seat {} on {} for {}",
                    booking.seat_number,
                    booking.flight.flight_number,
                    Masked(&booking.passenger_email)
                );
                self.notifier.success("Flight booked successfully!");
                Ok(booking)
            }
            Err(e) => {
                error!("Failed to insert booking on {}: {}", request.flight.flight_number, e);
                self.notifier.error("Failed to book flight");
                Err(e.into())
            }
        }
    }

    /// `true` once the booking is cancelled, including when it already was.
    pub async fn cancel(&self, booking_id: Uuid) -> bool {
        let Some(user) = self.session.current_user().await else {
            self.notifier.error("You must be logged in to cancel a booking");
            return false;
        };

        match self.bookings.cancel_booking(booking_id, user.id).await {
            Ok(Some(_)) => {
                info!("Cancelled booking {} for user {}", booking_id, user.id);
                self.notifier.success("Booking cancelled successfully");
                true
            }
            Ok(None) => {
                warn!("Booking {} not cancellable by user {}", booking_id, user.id);
                self.notifier.error("Failed to cancel booking");
                false
            }
            Err(e) => {
                error!("Failed to cancel booking {}: {}", booking_id, e);
                self.notifier.error("Failed to cancel booking");
                false
            }
        }
    }

    /// Bookings of the current user, newest first.
    pub async fn list_mine(&self) -> Vec<Booking> {
        let Some(user) = self.session.current_user().await else {
            return Vec::new();
        };

        match self.bookings.list_bookings(user.id).await {
            Ok(bookings) => bookings,
            Err(e) => {
                error!("Failed to list bookings for user {}: {}", user.id, e);
                self.notifier.error("Failed to fetch bookings");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seat::RandomSeatAllocator;
    use crate::testing::{catalog, session_for, FailingBookings, FailingFlights, RecordingNotifier};
    use skyfare_catalog::seed_flights;
    use skyfare_core::{BookingStatus, Flight, PaymentStatus};
    use skyfare_store::InMemoryBookingRepository;

    struct Fixture {
        service: BookingService,
        flights: Arc<dyn FlightRepository>,
        bookings: Arc<InMemoryBookingRepository>,
        notifier: Arc<RecordingNotifier>,
    }

    async fn fixture(email: Option<&str>) -> Fixture {
        let (session, notifier) = session_for(email).await;
        let flights = catalog();
        let bookings = Arc::new(InMemoryBookingRepository::new());
        let service = BookingService::new(
            flights.clone(),
            bookings.clone(),
            session,
            Arc::new(RandomSeatAllocator::seeded(11)),
            notifier.clone(),
        );
        Fixture { service, flights, bookings, notifier }
    }

    fn flight(number: &str) -> Flight {
        seed_flights()
            .into_iter()
            .find(|f| f.flight_number == number)
            .unwrap()
    }

    fn is_valid_seat(seat: &str) -> bool {
        let (row, letter) = seat.split_at(seat.len() - 1);
        !row.starts_with('0')
            && row.parse::<u8>().is_ok_and(|r| (1..=30).contains(&r))
            && ["A", "B", "C", "D", "E", "F"].contains(&letter)
    }

    #[tokio::test]
    async fn test_book_persists_snapshot_and_defaults() {
        let fx = fixture(Some("user@example.com")).await;
        let sf101 = flight("SF101");

        let booking = fx.service.book(sf101.id).await.unwrap();
        assert_eq!(booking.flight_id, sf101.id);
        assert_eq!(booking.flight, sf101.snapshot());
        assert_eq!(booking.passenger_name, "John Doe");
        assert_eq!(booking.passenger_email, "user@example.com");
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
        assert!(!booking.id.is_nil());
        assert!(is_valid_seat(&booking.seat_number.to_string()));
        assert_eq!(fx.notifier.last_success().as_deref(), Some("Flight booked successfully!"));
        assert_eq!(fx.bookings.len().await, 1);
    }

    #[tokio::test]
    async fn test_booking_does_not_touch_seat_inventory() {
        let fx = fixture(Some("user@example.com")).await;
        let sf101 = flight("SF101");
        fx.service.book(sf101.id).await.unwrap();
        fx.service.book(sf101.id).await.unwrap();

        let after = fx.flights.get_flight(sf101.id).await.unwrap().unwrap();
        assert_eq!(after.available_seats, sf101.available_seats);
    }

    #[tokio::test]
    async fn test_unauthenticated_booking_persists_nothing() {
        let fx = fixture(None).await;
        let result = fx.service.book(flight("SF101").id).await;
        assert!(matches!(result, Err(CoreError::Unauthenticated)));
        assert!(fx.bookings.is_empty().await);
        assert_eq!(
            fx.notifier.last_error().as_deref(),
            Some("You must be logged in to book a flight")
        );
    }

    #[tokio::test]
    async fn test_sold_out_booking_persists_nothing() {
        let fx = fixture(Some("user@example.com")).await;
        let result = fx.service.book(flight("AF1681").id).await;
        assert!(matches!(result, Err(CoreError::SoldOut(ref n)) if n == "AF1681"));
        assert!(fx.bookings.is_empty().await);
        assert_eq!(
            fx.notifier.last_error().as_deref(),
            Some("No seats available on this flight")
        );
    }

    #[tokio::test]
    async fn test_unknown_flight_is_not_found() {
        let fx = fixture(Some("user@example.com")).await;
        let result = fx.service.book(Uuid::new_v4()).await;
        assert!(matches!(result, Err(CoreError::NotFound(_))));
        assert!(fx.bookings.is_empty().await);
    }

    #[tokio::test]
    async fn test_backend_failures_surface() {
        let (session, notifier) = session_for(Some("user@example.com")).await;
        let service = BookingService::new(
            catalog(),
            Arc::new(FailingBookings),
            session.clone(),
            Arc::new(RandomSeatAllocator::seeded(3)),
            notifier.clone(),
        );
        let result = service.book(flight("SF101").id).await;
        assert!(matches!(result, Err(CoreError::BackendFailure(_))));
        assert_eq!(notifier.last_error().as_deref(), Some("Failed to book flight"));
        assert!(service.list_mine().await.is_empty());
        assert_eq!(notifier.last_error().as_deref(), Some("Failed to fetch bookings"));
        assert!(!service.cancel(Uuid::new_v4()).await);

        let service = BookingService::new(
            Arc::new(FailingFlights),
            Arc::new(InMemoryBookingRepository::new()),
            session,
            Arc::new(RandomSeatAllocator::seeded(3)),
            notifier,
        );
        assert!(matches!(
            service.book(flight("SF101").id).await,
            Err(CoreError::BackendFailure(_))
        ));
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let fx = fixture(Some("user@example.com")).await;
        let booking = fx.service.book(flight("SF101").id).await.unwrap();

        assert!(fx.service.cancel(booking.id).await);
        assert!(fx.service.cancel(booking.id).await);
        assert_eq!(fx.notifier.last_success().as_deref(), Some("Booking cancelled successfully"));

        let mine = fx.service.list_mine().await;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].status, BookingStatus::Cancelled);
        assert!(mine[0].updated_at.is_some());
    }

    #[tokio::test]
    async fn test_cancel_requires_ownership() {
        let (owner_session, notifier) = session_for(Some("user@example.com")).await;
        let (other_session, _) = session_for(Some("admin@example.com")).await;
        let bookings = Arc::new(InMemoryBookingRepository::new());
        let seats: Arc<dyn SeatAllocator> = Arc::new(RandomSeatAllocator::seeded(5));

        let owner = BookingService::new(catalog(), bookings.clone(), owner_session, seats.clone(), notifier.clone());
        let other = BookingService::new(catalog(), bookings.clone(), other_session, seats, notifier);

        let booking = owner.book(flight("SF101").id).await.unwrap();
        assert!(!other.cancel(booking.id).await);
        assert!(other.list_mine().await.is_empty());

        let stored = bookings.get_booking(booking.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_cancel_and_list_when_signed_out() {
        let fx = fixture(None).await;
        assert!(!fx.service.cancel(Uuid::new_v4()).await);
        assert!(fx.service.list_mine().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_mine_newest_first() {
        let fx = fixture(Some("user@example.com")).await;
        let first = fx.service.book(flight("SF101").id).await.unwrap();
        let second = fx.service.book(flight("BA178").id).await.unwrap();

        let ids: Vec<_> = fx.service.list_mine().await.into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
