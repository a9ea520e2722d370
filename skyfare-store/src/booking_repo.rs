use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use skyfare_core::{Booking, BookingRepository, FlightSnapshot, NewBooking, RepoError};
use sqlx::PgPool;
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "id, user_id, flight_id, flight_number, airline, source, destination, \
    departure_date, departure_time, arrival_date, arrival_time, price, aircraft, seat_number, \
    passenger_name, passenger_email, status, payment_status, booking_date, created_at, updated_at";

pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: Uuid,
    flight_id: Uuid,
    flight_number: String,
    airline: String,
    source: String,
    destination: String,
    departure_date: NaiveDate,
    departure_time: NaiveTime,
    arrival_date: NaiveDate,
    arrival_time: NaiveTime,
    price: i32,
    aircraft: String,
    seat_number: String,
    passenger_name: String,
    passenger_email: String,
    status: String,
    payment_status: String,
    booking_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = RepoError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            user_id: row.user_id,
            flight_id: row.flight_id,
            flight: FlightSnapshot {
                flight_number: row.flight_number,
                airline: row.airline,
                source: row.source,
                destination: row.destination,
                departure_date: row.departure_date,
                departure_time: row.departure_time,
                arrival_date: row.arrival_date,
                arrival_time: row.arrival_time,
                price: row.price,
                aircraft: row.aircraft,
            },
            seat_number: row.seat_number.parse()?,
            passenger_name: row.passenger_name,
            passenger_email: row.passenger_email,
            status: row.status.parse()?,
            payment_status: row.payment_status.parse()?,
            booking_date: row.booking_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn insert_booking(&self, booking: &NewBooking) -> Result<Booking, RepoError> {
        let flight = &booking.flight;
        let row: BookingRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO flight_bookings (user_id, flight_id, flight_number, airline, source, destination,
                departure_date, departure_time, arrival_date, arrival_time, price, aircraft,
                seat_number, passenger_name, passenger_email)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        ))
        .bind(booking.user_id)
        .bind(booking.flight_id)
        .bind(&flight.flight_number)
        .bind(&flight.airline)
        .bind(&flight.source)
        .bind(&flight.destination)
        .bind(flight.departure_date)
        .bind(flight.departure_time)
        .bind(flight.arrival_date)
        .bind(flight.arrival_time)
        .bind(flight.price)
        .bind(&flight.aircraft)
        .bind(booking.seat_number.to_string())
        .bind(&booking.passenger_name)
        .bind(&booking.passenger_email)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list_bookings(&self, user_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM flight_bookings WHERE user_id = $1 ORDER BY created_at DESC",
            BOOKING_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>, RepoError> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM flight_bookings WHERE id = $1",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Booking::try_from).transpose()
    }

    async fn cancel_booking(&self, id: Uuid, user_id: Uuid) -> Result<Option<Booking>, RepoError> {
        // SET expressions see the pre-update status, so a cancelled row keeps its updated_at
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            r#"
            UPDATE flight_bookings
            SET updated_at = CASE WHEN status = 'confirmed' THEN NOW() ELSE updated_at END,
                status = 'cancelled'
            WHERE id = $1 AND user_id = $2 AND status IN ('confirmed', 'cancelled')
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Booking::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyfare_catalog::seed_flights;
    use skyfare_core::{BookingStatus, PaymentStatus};

    fn new_booking(user_id: Uuid) -> NewBooking {
        let flight = seed_flights().remove(0);
        NewBooking {
            user_id,
            flight_id: flight.id,
            flight: flight.snapshot(),
            seat_number: "12C".parse().unwrap(),
            passenger_name: "John Doe".into(),
            passenger_email: "user@example.com".into(),
        }
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_insert_applies_defaults(pool: PgPool) -> Result<(), RepoError> {
        let repo = PostgresBookingRepository::new(pool);
        let user_id = Uuid::new_v4();

        let booking = repo.insert_booking(&new_booking(user_id)).await?;
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
        assert_eq!(booking.seat_number.to_string(), "12C");
        assert_eq!(booking.flight.flight_number, "SF101");
        assert!(booking.updated_at.is_none());

        let second = repo.insert_booking(&new_booking(user_id)).await?;
        let ids: Vec<_> = repo.list_bookings(user_id).await?.into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![second.id, booking.id]);
        assert!(repo.list_bookings(Uuid::new_v4()).await?.is_empty());
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_cancel_by_other_user_changes_nothing(pool: PgPool) -> Result<(), RepoError> {
        let repo = PostgresBookingRepository::new(pool);
        let booking = repo.insert_booking(&new_booking(Uuid::new_v4())).await?;

        assert!(repo.cancel_booking(booking.id, Uuid::new_v4()).await?.is_none());

        let stored = repo.get_booking(booking.id).await?.unwrap();
        assert_eq!(stored.status, BookingStatus::Confirmed);
        assert!(stored.updated_at.is_none());
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_second_cancel_keeps_timestamp(pool: PgPool) -> Result<(), RepoError> {
        let repo = PostgresBookingRepository::new(pool);
        let owner = Uuid::new_v4();
        let booking = repo.insert_booking(&new_booking(owner)).await?;

        let first = repo.cancel_booking(booking.id, owner).await?.unwrap();
        assert_eq!(first.status, BookingStatus::Cancelled);
        assert!(first.updated_at.is_some());

        let second = repo.cancel_booking(booking.id, owner).await?.unwrap();
        assert_eq!(second.status, BookingStatus::Cancelled);
        assert_eq!(second.updated_at, first.updated_at);
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_pending_booking_is_not_cancellable(pool: PgPool) -> Result<(), RepoError> {
        let repo = PostgresBookingRepository::new(pool.clone());
        let owner = Uuid::new_v4();
        let booking = repo.insert_booking(&new_booking(owner)).await?;
        sqlx::query("UPDATE flight_bookings SET status = 'pending' WHERE id = $1")
            .bind(booking.id)
            .execute(&pool)
            .await?;

        assert!(repo.cancel_booking(booking.id, owner).await?.is_none());
        assert_eq!(repo.get_booking(booking.id).await?.unwrap().status, BookingStatus::Pending);
        Ok(())
    }
}
