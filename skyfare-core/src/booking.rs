use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Booking lifecycle. The only transition is Confirmed -> Cancelled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Pending,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Pending => "pending",
        }
    }

    /// Cancelling is allowed from Confirmed, and is a no-op from Cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "pending" => Ok(BookingStatus::Pending),
            other => Err(format!("unknown booking status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(PaymentStatus::Paid),
            "pending" => Ok(PaymentStatus::Pending),
            "failed" => Ok(PaymentStatus::Failed),
            other => Err(format!("unknown payment status: {}", other)),
        }
    }
}

/// Cabin seat such as `12C`: a row in 1..=30 and a letter in A..=F.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeatNumber {
    row: u8,
    letter: char,
}

impl SeatNumber {
    pub const ROWS: u8 = 30;
    pub const LETTERS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

    pub fn new(row: u8, letter: char) -> Option<Self> {
        if (1..=Self::ROWS).contains(&row) && Self::LETTERS.contains(&letter) {
            Some(Self { row, letter })
        } else {
            None
        }
    }

    /// Number of distinct seats on the grid.
    pub const CAPACITY: usize = Self::ROWS as usize * Self::LETTERS.len();

    /// Seat at `index` in row-major order, wrapping past the last seat.
    pub fn nth(index: usize) -> Self {
        let index = index % Self::CAPACITY;
        Self {
            row: (index / Self::LETTERS.len()) as u8 + 1,
            letter: Self::LETTERS[index % Self::LETTERS.len()],
        }
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn letter(&self) -> char {
        self.letter
    }
}

impl fmt::Display for SeatNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.letter)
    }
}

impl FromStr for SeatNumber {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid seat number: {}", s);
        let letter = s.chars().last().ok_or_else(invalid)?;
        let row_part = &s[..s.len() - letter.len_utf8()];
        if row_part.starts_with('0') {
            return Err(invalid());
        }
        let row: u8 = row_part.parse().map_err(|_| invalid())?;
        SeatNumber::new(row, letter).ok_or_else(invalid)
    }
}

impl Serialize for SeatNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeatNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Flight fields copied onto the booking row at booking time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightSnapshot {
    pub flight_number: String,
    pub airline: String,
    pub source: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub arrival_date: NaiveDate,
    pub arrival_time: NaiveTime,
    pub price: i32,
    pub aircraft: String,
}

/// Row to insert into `flight_bookings`; the store assigns id, status and timestamps.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub flight_id: Uuid,
    pub flight: FlightSnapshot,
    pub seat_number: SeatNumber,
    pub passenger_name: String,
    pub passenger_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub flight_id: Uuid,
    pub flight: FlightSnapshot,
    pub seat_number: SeatNumber,
    pub passenger_name: String,
    pub passenger_email: String,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub booking_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Build the stored row with the defaults the store applies on insert.
    pub fn from_new(id: Uuid, booking: NewBooking, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: booking.user_id,
            flight_id: booking.flight_id,
            flight: booking.flight,
            seat_number: booking.seat_number,
            passenger_name: booking.passenger_name,
            passenger_email: booking.passenger_email,
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Pending,
            booking_date: now,
            created_at: now,
            updated_at: None,
        }
    }

    /// Returns false when the current status cannot move to Cancelled.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> bool {
        match self.status {
            BookingStatus::Confirmed => {
                self.status = BookingStatus::Cancelled;
                self.updated_at = Some(now);
                true
            }
            BookingStatus::Cancelled => true,
            BookingStatus::Pending => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_booking() -> Booking {
        let snapshot = FlightSnapshot {
            flight_number: "SF101".into(),
            airline: "SkyFare Air".into(),
            source: "JFK".into(),
            destination: "LAX".into(),
            departure_date: NaiveDate::from_ymd_opt(2025, 4, 15).unwrap(),
            departure_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            arrival_date: NaiveDate::from_ymd_opt(2025, 4, 15).unwrap(),
            arrival_time: NaiveTime::from_hms_opt(11, 30, 0).unwrap(),
            price: 299,
            aircraft: "Boeing 737".into(),
        };
        let new = NewBooking {
            user_id: Uuid::new_v4(),
            flight_id: Uuid::new_v4(),
            flight: snapshot,
            seat_number: SeatNumber::new(12, 'C').unwrap(),
            passenger_name: "Jane Doe".into(),
            passenger_email: "jane@example.com".into(),
        };
        Booking::from_new(Uuid::new_v4(), new, Utc::now())
    }

    #[test]
    fn test_seat_number_bounds() {
        assert!(SeatNumber::new(1, 'A').is_some());
        assert!(SeatNumber::new(30, 'F').is_some());
        assert!(SeatNumber::new(0, 'A').is_none());
        assert!(SeatNumber::new(31, 'A').is_none());
        assert!(SeatNumber::new(10, 'G').is_none());
    }

    #[test]
    fn test_nth_walks_the_grid() {
        assert_eq!(SeatNumber::nth(0).to_string(), "1A");
        assert_eq!(SeatNumber::nth(5).to_string(), "1F");
        assert_eq!(SeatNumber::nth(6).to_string(), "2A");
        assert_eq!(SeatNumber::nth(SeatNumber::CAPACITY - 1).to_string(), "30F");
        assert_eq!(SeatNumber::nth(SeatNumber::CAPACITY), SeatNumber::nth(0));
    }

    #[test]
    fn test_seat_number_parse() {
        let seat: SeatNumber = "27E".parse().unwrap();
        assert_eq!(seat.row(), 27);
        assert_eq!(seat.letter(), 'E');
        assert_eq!(seat.to_string(), "27E");

        assert!("07E".parse::<SeatNumber>().is_err());
        assert!("E".parse::<SeatNumber>().is_err());
        assert!("".parse::<SeatNumber>().is_err());
        assert!("31A".parse::<SeatNumber>().is_err());
    }

    #[test]
    fn test_status_strings() {
        assert_eq!("cancelled".parse::<BookingStatus>().unwrap(), BookingStatus::Cancelled);
        assert_eq!(PaymentStatus::Failed.to_string(), "failed");
        assert!("refunded".parse::<PaymentStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&BookingStatus::Confirmed).unwrap(),
            "\"confirmed\""
        );
    }

    #[test]
    fn test_cancel_is_one_way_and_idempotent() {
        let mut booking = sample_booking();
        assert_eq!(booking.status, BookingStatus::Confirmed);

        assert!(booking.cancel(Utc::now()));
        assert_eq!(booking.status, BookingStatus::Cancelled);
        let stamped = booking.updated_at;
        assert!(stamped.is_some());

        assert!(booking.cancel(Utc::now()));
        assert_eq!(booking.status, BookingStatus::Cancelled);
        assert_eq!(booking.updated_at, stamped);
    }

    #[test]
    fn test_pending_booking_is_not_cancellable() {
        let mut booking = sample_booking();
        booking.status = BookingStatus::Pending;
        assert!(!booking.cancel(Utc::now()));
        assert_eq!(booking.status, BookingStatus::Pending);
    }
}
