use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use skyfare_core::{Flight, FlightRepository, FlightSearchQuery, NewFlight, RepoError};
use sqlx::PgPool;
use uuid::Uuid;

const FLIGHT_COLUMNS: &str = "id, flight_number, airline, source, destination, \
    departure_date, departure_time, arrival_date, arrival_time, price, \
    available_seats, total_seats, duration, aircraft, created_at, updated_at";

pub struct PostgresFlightRepository {
    pool: PgPool,
}

impl PostgresFlightRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FlightRow {
    id: Uuid,
    flight_number: String,
    airline: String,
    source: String,
    destination: String,
    departure_date: NaiveDate,
    departure_time: NaiveTime,
    arrival_date: NaiveDate,
    arrival_time: NaiveTime,
    price: i32,
    available_seats: i32,
    total_seats: i32,
    duration: String,
    aircraft: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<FlightRow> for Flight {
    fn from(row: FlightRow) -> Self {
        Flight {
            id: row.id,
            flight_number: row.flight_number,
            airline: row.airline,
            source: row.source,
            destination: row.destination,
            departure_date: row.departure_date,
            departure_time: row.departure_time,
            arrival_date: row.arrival_date,
            arrival_time: row.arrival_time,
            price: row.price,
            available_seats: row.available_seats,
            total_seats: row.total_seats,
            duration: row.duration,
            aircraft: row.aircraft,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl FlightRepository for PostgresFlightRepository {
    async fn list_flights(&self) -> Result<Vec<Flight>, RepoError> {
        let rows: Vec<FlightRow> = sqlx::query_as(&format!(
            "SELECT {} FROM flights ORDER BY created_at, id",
            FLIGHT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Flight::from).collect())
    }

    async fn search_flights(&self, query: &FlightSearchQuery) -> Result<Vec<Flight>, RepoError> {
        let rows: Vec<FlightRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM flights
            WHERE ($1::TEXT IS NULL OR source = $1)
              AND ($2::TEXT IS NULL OR destination = $2)
              AND ($3::DATE IS NULL OR departure_date = $3)
            ORDER BY created_at, id
            "#,
            FLIGHT_COLUMNS
        ))
        .bind(query.source.as_deref())
        .bind(query.destination.as_deref())
        .bind(query.date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Flight::from).collect())
    }

    async fn get_flight(&self, id: Uuid) -> Result<Option<Flight>, RepoError> {
        let row: Option<FlightRow> = sqlx::query_as(&format!(
            "SELECT {} FROM flights WHERE id = $1",
            FLIGHT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Flight::from))
    }

    async fn create_flight(&self, flight: &NewFlight) -> Result<Flight, RepoError> {
        let row: FlightRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO flights (id, flight_number, airline, source, destination,
                departure_date, departure_time, arrival_date, arrival_time,
                price, available_seats, total_seats, duration, aircraft)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {}
            "#,
            FLIGHT_COLUMNS
        ))
        .bind(Uuid::new_v4())
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
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_flight(&self, id: Uuid, flight: &NewFlight) -> Result<Option<Flight>, RepoError> {
        let row: Option<FlightRow> = sqlx::query_as(&format!(
            r#"
            UPDATE flights
            SET flight_number = $1, airline = $2, source = $3, destination = $4,
                departure_date = $5, departure_time = $6, arrival_date = $7, arrival_time = $8,
                price = $9, available_seats = $10, total_seats = $11, duration = $12,
                aircraft = $13, updated_at = NOW()
            WHERE id = $14
            RETURNING {}
            "#,
            FLIGHT_COLUMNS
        ))
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
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Flight::from))
    }

    async fn delete_flight(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM flights WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DbClient;
    use skyfare_catalog::seed_flights;

    async fn seeded(pool: PgPool) -> Result<PostgresFlightRepository, RepoError> {
        let db = DbClient { pool };
        assert_eq!(db.seed_flights(&seed_flights()).await?, seed_flights().len());
        assert_eq!(db.seed_flights(&seed_flights()).await?, 0);
        Ok(PostgresFlightRepository::new(db.pool))
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_search_seeded_catalog(pool: PgPool) -> Result<(), RepoError> {
        let repo = seeded(pool).await?;

        let query = FlightSearchQuery::new(Some("JFK"), Some("LAX"), NaiveDate::from_ymd_opt(2025, 4, 15));
        let found = repo.search_flights(&query).await?;
        let numbers: Vec<_> = found.iter().map(|f| f.flight_number.as_str()).collect();
        assert_eq!(numbers, vec!["SF101"]);
        assert_eq!(found[0].id, seed_flights()[0].id);

        let all = repo.search_flights(&FlightSearchQuery::default()).await?;
        assert_eq!(all.len(), seed_flights().len());
        assert_eq!(repo.list_flights().await?.len(), all.len());

        let lower = FlightSearchQuery::new(Some("jfk"), Some("lax"), None);
        assert!(repo.search_flights(&lower).await?.is_empty());
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn test_create_update_delete(pool: PgPool) -> Result<(), RepoError> {
        let repo = seeded(pool).await?;
        let (_, mut details) = seed_flights().remove(0).into_parts();

        let created = repo.create_flight(&details).await?;
        assert!(created.updated_at.is_none());
        assert_eq!(repo.list_flights().await?.len(), seed_flights().len() + 1);

        details.price = 349;
        let updated = repo.update_flight(created.id, &details).await?.unwrap();
        assert_eq!(updated.price, 349);
        assert!(updated.updated_at.is_some());
        assert!(repo.update_flight(Uuid::new_v4(), &details).await?.is_none());

        assert!(repo.delete_flight(created.id).await?);
        assert!(!repo.delete_flight(created.id).await?);
        assert!(repo.get_flight(created.id).await?.is_none());
        Ok(())
    }
}
