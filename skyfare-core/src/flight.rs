use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking::FlightSnapshot;
use crate::{CoreError, CoreResult};

/// Static reference data for an airport city.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct City {
    pub code: &'static str,
    pub name: &'static str,
    pub country: &'static str,
}

/// A scheduled flight in the inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flight {
    pub id: Uuid,
    pub flight_number: String,
    pub airline: String,
    pub source: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub arrival_date: NaiveDate,
    pub arrival_time: NaiveTime,
    pub price: i32,
    pub available_seats: i32,
    pub total_seats: i32,
    pub duration: String,
    pub aircraft: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Flight fields as submitted by the admin entry form (no id, no timestamps).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewFlight {
    pub flight_number: String,
    pub airline: String,
    pub source: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub arrival_date: NaiveDate,
    pub arrival_time: NaiveTime,
    pub price: i32,
    pub available_seats: i32,
    pub total_seats: i32,
    pub duration: String,
    pub aircraft: String,
}

impl Flight {
    pub fn from_new(id: Uuid, flight: NewFlight, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            flight_number: flight.flight_number,
            airline: flight.airline,
            source: flight.source,
            destination: flight.destination,
            departure_date: flight.departure_date,
            departure_time: flight.departure_time,
            arrival_date: flight.arrival_date,
            arrival_time: flight.arrival_time,
            price: flight.price,
            available_seats: flight.available_seats,
            total_seats: flight.total_seats,
            duration: flight.duration,
            aircraft: flight.aircraft,
            created_at,
            updated_at: None,
        }
    }

    /// Split into the identifier and the editable fields.
    pub fn into_parts(self) -> (Uuid, NewFlight) {
        let details = NewFlight {
            flight_number: self.flight_number,
            airline: self.airline,
            source: self.source,
            destination: self.destination,
            departure_date: self.departure_date,
            departure_time: self.departure_time,
            arrival_date: self.arrival_date,
            arrival_time: self.arrival_time,
            price: self.price,
            available_seats: self.available_seats,
            total_seats: self.total_seats,
            duration: self.duration,
            aircraft: self.aircraft,
        };
        (self.id, details)
    }

    /// Overwrite the editable fields, keeping id and creation time.
    pub fn apply(&mut self, flight: &NewFlight, now: DateTime<Utc>) {
        self.flight_number = flight.flight_number.clone();
        self.airline = flight.airline.clone();
        self.source = flight.source.clone();
        self.destination = flight.destination.clone();
        self.departure_date = flight.departure_date;
        self.departure_time = flight.departure_time;
        self.arrival_date = flight.arrival_date;
        self.arrival_time = flight.arrival_time;
        self.price = flight.price;
        self.available_seats = flight.available_seats;
        self.total_seats = flight.total_seats;
        self.duration = flight.duration.clone();
        self.aircraft = flight.aircraft.clone();
        self.updated_at = Some(now);
    }

    pub fn is_sold_out(&self) -> bool {
        self.available_seats <= 0
    }

    /// Denormalized copy stored on a booking row.
    pub fn snapshot(&self) -> FlightSnapshot {
        FlightSnapshot {
            flight_number: self.flight_number.clone(),
            airline: self.airline.clone(),
            source: self.source.clone(),
            destination: self.destination.clone(),
            departure_date: self.departure_date,
            departure_time: self.departure_time,
            arrival_date: self.arrival_date,
            arrival_time: self.arrival_time,
            price: self.price,
            aircraft: self.aircraft.clone(),
        }
    }
}

impl NewFlight {
    /// Field checks the entry form enforces. Duplicate flight numbers and
    /// overlapping schedules are accepted.
    pub fn validate(&self) -> CoreResult<()> {
        let required = [
            ("flight_number", &self.flight_number),
            ("airline", &self.airline),
            ("source", &self.source),
            ("destination", &self.destination),
            ("duration", &self.duration),
            ("aircraft", &self.aircraft),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(CoreError::ValidationFailure(format!("{} is required", field)));
            }
        }

        if self.price < 0 {
            return Err(CoreError::ValidationFailure("price must not be negative".into()));
        }
        if self.available_seats < 0 || self.total_seats < 0 {
            return Err(CoreError::ValidationFailure("seat counts must not be negative".into()));
        }
        if self.available_seats > self.total_seats {
            return Err(CoreError::ValidationFailure(format!(
                "available seats ({}) exceed total seats ({})",
                self.available_seats, self.total_seats
            )));
        }
        if self.source == self.destination {
            return Err(CoreError::ValidationFailure(
                "source and destination must differ".into(),
            ));
        }

        Ok(())
    }
}
