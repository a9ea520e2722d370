use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use skyfare_core::{Flight, NewFlight};
use uuid::Uuid;

/// Date the featured routes prefill into the search form.
pub const DEFAULT_TRAVEL_DATE: &str = "2025-04-15";

/// A featured route shown on the landing page.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PopularRoute {
    pub city: &'static str,
    pub source: &'static str,
    pub destination: &'static str,
    pub from_price: i32,
    pub date: &'static str,
}

const POPULAR_ROUTES: &[PopularRoute] = &[
    PopularRoute { city: "New York", source: "JFK", destination: "LAX", from_price: 299, date: DEFAULT_TRAVEL_DATE },
    PopularRoute { city: "London", source: "LHR", destination: "JFK", from_price: 549, date: DEFAULT_TRAVEL_DATE },
    PopularRoute { city: "Singapore", source: "SIN", destination: "HKG", from_price: 189, date: DEFAULT_TRAVEL_DATE },
];

pub fn popular_routes() -> &'static [PopularRoute] {
    POPULAR_ROUTES
}

struct SeedFlight {
    flight_number: &'static str,
    airline: &'static str,
    source: &'static str,
    destination: &'static str,
    departure: (&'static str, &'static str),
    arrival: (&'static str, &'static str),
    price: i32,
    available_seats: i32,
    total_seats: i32,
    duration: &'static str,
    aircraft: &'static str,
}

const SEED_FLIGHTS: &[SeedFlight] = &[
    SeedFlight {
        flight_number: "SF101", airline: "SkyFare Air", source: "JFK", destination: "LAX",
        departure: ("2025-04-15", "08:00:00"), arrival: ("2025-04-15", "11:30:00"),
        price: 299, available_seats: 45, total_seats: 180, duration: "6h 30m", aircraft: "Boeing 737",
    },
    SeedFlight {
        flight_number: "SF102", airline: "SkyFare Air", source: "LAX", destination: "JFK",
        departure: ("2025-04-16", "09:15:00"), arrival: ("2025-04-16", "17:45:00"),
        price: 319, available_seats: 12, total_seats: 180, duration: "5h 30m", aircraft: "Boeing 737",
    },
    SeedFlight {
        flight_number: "BA178", airline: "British Airways", source: "LHR", destination: "JFK",
        departure: ("2025-04-15", "10:30:00"), arrival: ("2025-04-15", "13:40:00"),
        price: 549, available_seats: 60, total_seats: 275, duration: "8h 10m", aircraft: "Boeing 777",
    },
    SeedFlight {
        flight_number: "AF1681", airline: "Air France", source: "LHR", destination: "CDG",
        departure: ("2025-04-17", "07:05:00"), arrival: ("2025-04-17", "09:20:00"),
        price: 129, available_seats: 0, total_seats: 150, duration: "1h 15m", aircraft: "Airbus A320",
    },
    SeedFlight {
        flight_number: "SQ890", airline: "Singapore Airlines", source: "SIN", destination: "HKG",
        departure: ("2025-04-15", "14:00:00"), arrival: ("2025-04-15", "18:00:00"),
        price: 189, available_seats: 88, total_seats: 300, duration: "4h 00m", aircraft: "Airbus A350",
    },
    SeedFlight {
        flight_number: "EK215", airline: "Emirates", source: "DXB", destination: "LAX",
        departure: ("2025-04-18", "08:40:00"), arrival: ("2025-04-18", "14:15:00"),
        price: 899, available_seats: 30, total_seats: 354, duration: "16h 35m", aircraft: "Airbus A380",
    },
    SeedFlight {
        flight_number: "UA857", airline: "United Airlines", source: "SFO", destination: "HND",
        departure: ("2025-04-19", "11:50:00"), arrival: ("2025-04-20", "15:25:00"),
        price: 1049, available_seats: 5, total_seats: 276, duration: "11h 35m", aircraft: "Boeing 787",
    },
    SeedFlight {
        flight_number: "LH400", airline: "Lufthansa", source: "FRA", destination: "JFK",
        departure: ("2025-04-20", "10:20:00"), arrival: ("2025-04-20", "12:55:00"),
        price: 612, available_seats: 41, total_seats: 364, duration: "8h 35m", aircraft: "Boeing 747",
    },
];

impl SeedFlight {
    fn to_new_flight(&self) -> NewFlight {
        NewFlight {
            flight_number: self.flight_number.to_string(),
            airline: self.airline.to_string(),
            source: self.source.to_string(),
            destination: self.destination.to_string(),
            departure_date: parse_date(self.departure.0),
            departure_time: parse_time(self.departure.1),
            arrival_date: parse_date(self.arrival.0),
            arrival_time: parse_time(self.arrival.1),
            price: self.price,
            available_seats: self.available_seats,
            total_seats: self.total_seats,
            duration: self.duration.to_string(),
            aircraft: self.aircraft.to_string(),
        }
    }
}

fn parse_date(value: &str) -> NaiveDate {
    value.parse().expect("seed dates are valid ISO dates")
}

fn parse_time(value: &str) -> NaiveTime {
    value.parse().expect("seed times are valid HH:MM:SS")
}

/// Seed inventory with stable identifiers (`00000000-...-0001` onwards) so
/// bookings made against a fresh store stay resolvable across restarts.
pub fn seed_flights() -> Vec<Flight> {
    let created_at = DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default();
    SEED_FLIGHTS
        .iter()
        .enumerate()
        .map(|(index, seed)| {
            Flight::from_new(Uuid::from_u128(index as u128 + 1), seed.to_new_flight(), created_at)
        })
        .collect()
}
