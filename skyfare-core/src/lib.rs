pub mod booking;
pub mod flight;
pub mod identity;
pub mod notify;
pub mod repository;
pub mod search;

pub use booking::{Booking, BookingStatus, FlightSnapshot, NewBooking, PaymentStatus, SeatNumber};
pub use flight::{City, Flight, NewFlight};
pub use identity::{AuthChange, AuthError, AuthEvent, AuthSubscription, IdentityProvider, Session, SignUp, User};
pub use notify::{Notifier, TracingNotifier};
pub use repository::{BookingRepository, FlightRepository, RepoError};
pub use search::FlightSearchQuery;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("You must be logged in to continue")]
    Unauthenticated,
    #[error("Administrator privileges required")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(String),
    #[error("No seats available on flight {0}")]
    SoldOut(String),
    #[error("Backend failure: {0}")]
    BackendFailure(String),
    #[error("Validation failed: {0}")]
    ValidationFailure(String),
}

impl From<RepoError> for CoreError {
    fn from(err: RepoError) -> Self {
        CoreError::BackendFailure(err.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
