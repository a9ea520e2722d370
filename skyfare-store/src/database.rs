use skyfare_core::Flight;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(connection_string: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(connection_string)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&self.pool)
            .await?;
        info!("Migrations completed successfully.");
        Ok(())
    }

    /// Insert the static catalog when the flight table is empty. Returns the
    /// number of rows written.
    pub async fn seed_flights(&self, flights: &[Flight]) -> Result<usize, sqlx::Error> {
        let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM flights")
            .fetch_one(&self.pool)
            .await?;
        if existing > 0 {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        for flight in flights {
            sqlx::query(
                r#"
                INSERT INTO flights (id, flight_number, airline, source, destination,
                    departure_date, departure_time, arrival_date, arrival_time,
                    price, available_seats, total_seats, duration, aircraft, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(flight.id)
            .bind(&flight.flight_number)
            .bind(&flight.airline)
            .bind(&flight.source)
            .bind(&flight.destination)
            .bind(flight.departure_date)
            .bind(flight.departure_time)
            .bind(flight.arrival_date)
            .bind(flight.arrival_time)
            .bind(flight.price)
            .bind(flight.available_seats)
            .bind(flight.total_seats)
            .bind(&flight.duration)
            .bind(&flight.aircraft)
            .bind(flight.created_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!("Seeded {} catalog flights", flights.len());
        Ok(flights.len())
    }
}
