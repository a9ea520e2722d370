use skyfare_core::{Flight, FlightRepository, FlightSearchQuery, Notifier};
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

/// Read side of the flight catalog. Backend failures are reported through the
/// notifier and degrade to empty results.
#[derive(Clone)]
pub struct FlightSearchService {
    flights: Arc<dyn FlightRepository>,
    notifier: Arc<dyn Notifier>,
}

impl FlightSearchService {
    pub fn new(flights: Arc<dyn FlightRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self { flights, notifier }
    }

    /// Flights matching every provided field exactly, in catalog order.
    pub async fn search(&self, query: &FlightSearchQuery) -> Vec<Flight> {
        let result = if query.is_unfiltered() {
            self.flights.list_flights().await
        } else {
            self.flights.search_flights(query).await
        };

        match result {
            Ok(flights) => {
                debug!(
                    "Search {:?} -> {:?} on {:?}: {} flights",
                    query.source,
                    query.destination,
                    query.date,
                    flights.len()
                );
                flights
            }
            Err(e) => {
                error!("Flight search failed: {}", e);
                self.notifier.error("Failed to fetch flights");
                Vec::new()
            }
        }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Option<Flight> {
        match self.flights.get_flight(id).await {
            Ok(flight) => flight,
            Err(e) => {
                error!("Failed to load flight {}: {}", id, e);
                self.notifier.error("Failed to fetch flight details");
                None
            }
        }
    }

    pub async fn get_all(&self) -> Vec<Flight> {
        self.search(&FlightSearchQuery::default()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{catalog, FailingFlights, RecordingNotifier};
    use chrono::NaiveDate;
    use skyfare_catalog::seed_flights;

    fn service() -> (FlightSearchService, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        (FlightSearchService::new(catalog(), notifier.clone()), notifier)
    }

    #[tokio::test]
    async fn test_blank_search_returns_full_catalog() {
        let (service, _) = service();
        let query = FlightSearchQuery::new(Some(""), Some(""), None);
        let all = service.search(&query).await;
        assert_eq!(all, seed_flights());
        assert_eq!(service.get_all().await, all);
    }

    #[tokio::test]
    async fn test_jfk_to_lax_on_launch_day() {
        let (service, _) = service();
        let query = FlightSearchQuery::new(Some("JFK"), Some("LAX"), NaiveDate::from_ymd_opt(2025, 4, 15));
        let found = service.search(&query).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].flight_number, "SF101");
    }

    #[tokio::test]
    async fn test_unmatched_route_is_empty_not_error() {
        let (service, notifier) = service();
        let query = FlightSearchQuery::new(Some("SYD"), Some("ORD"), None);
        assert!(service.search(&query).await.is_empty());
        assert!(notifier.last_error().is_none());
    }

    #[tokio::test]
    async fn test_partial_query_filters_on_given_fields() {
        let (service, _) = service();
        let query = FlightSearchQuery::new(Some("LHR"), None, None);
        let found = service.search(&query).await;
        assert!(!found.is_empty());
        assert!(found.iter().all(|f| f.source == "LHR"));
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let (service, _) = service();
        let first = seed_flights().remove(0);
        assert_eq!(service.get_by_id(first.id).await, Some(first));
        assert!(service.get_by_id(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_backend_failure_degrades_to_empty() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = FlightSearchService::new(Arc::new(FailingFlights), notifier.clone());

        assert!(service.get_all().await.is_empty());
        assert_eq!(notifier.last_error().as_deref(), Some("Failed to fetch flights"));
        assert!(service.get_by_id(Uuid::new_v4()).await.is_none());
    }
}
