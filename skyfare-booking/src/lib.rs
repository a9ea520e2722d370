pub mod admin;
pub mod booking;
pub mod search;
pub mod seat;
pub mod session;

pub use admin::AdminInventoryService;
pub use booking::BookingService;
pub use search::FlightSearchService;
pub use seat::{RandomSeatAllocator, SeatAllocator};
pub use session::SessionAdapter;
