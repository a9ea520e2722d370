pub mod cities;
pub mod seed;

pub use cities::{cities, city, is_known_city};
pub use seed::{popular_routes, seed_flights, PopularRoute, DEFAULT_TRAVEL_DATE};
