use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use skyfare_booking::{
    AdminInventoryService, BookingService, FlightSearchService, RandomSeatAllocator, SeatAllocator,
    SessionAdapter,
};
use skyfare_core::{Notifier, TracingNotifier};
use skyfare_store::{AccountDirectory, LocalIdentityProvider, Storage};
use tokio::sync::RwLock;

/// Clock skew accepted on `exp` when validating bearer tokens.
pub const JWT_LEEWAY_SECS: u64 = 60;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub accounts: Arc<AccountDirectory>,
    pub seats: Arc<dyn SeatAllocator>,
    pub notifier: Arc<dyn Notifier>,
    pub revoked_tokens: Arc<RevokedTokens>,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(storage: Storage, accounts: Arc<AccountDirectory>, auth: AuthConfig) -> Self {
        Self {
            storage,
            accounts,
            seats: Arc::new(RandomSeatAllocator::new()),
            notifier: Arc::new(TracingNotifier),
            revoked_tokens: Arc::new(RevokedTokens::default()),
            auth,
        }
    }

    pub fn with_seat_allocator(mut self, seats: Arc<dyn SeatAllocator>) -> Self {
        self.seats = seats;
        self
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::seconds(self.auth.expiration as i64)
    }

    /// Provider for a client that has not signed in yet.
    pub fn new_identity_provider(&self) -> Arc<LocalIdentityProvider> {
        Arc::new(LocalIdentityProvider::new(self.accounts.clone(), self.session_ttl()))
    }

    pub fn session_adapter(&self, provider: Arc<LocalIdentityProvider>) -> SessionAdapter {
        SessionAdapter::new(provider, self.notifier.clone())
    }

    pub fn search_service(&self) -> FlightSearchService {
        FlightSearchService::new(self.storage.flights.clone(), self.notifier.clone())
    }

    pub fn booking_service(&self, session: SessionAdapter) -> BookingService {
        BookingService::new(
            self.storage.flights.clone(),
            self.storage.bookings.clone(),
            session,
            self.seats.clone(),
            self.notifier.clone(),
        )
    }

    pub fn admin_service(&self, session: SessionAdapter) -> AdminInventoryService {
        AdminInventoryService::new(self.storage.flights.clone(), session, self.notifier.clone())
    }
}

/// Token ids retired by logout or refresh before their expiry.
///
/// An entry is only needed while the token could still pass validation, so
/// every insert first drops ids whose `exp` plus leeway has passed.
#[derive(Default)]
pub struct RevokedTokens {
    entries: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl RevokedTokens {
    pub async fn revoke(&self, jti: String, expires_at: DateTime<Utc>) {
        self.revoke_at(jti, expires_at, Utc::now()).await
    }

    async fn revoke_at(&self, jti: String, expires_at: DateTime<Utc>, now: DateTime<Utc>) {
        let leeway = Duration::seconds(JWT_LEEWAY_SECS as i64);
        let mut entries = self.entries.write().await;
        entries.retain(|_, exp| *exp + leeway > now);
        entries.insert(jti, expires_at);
    }

    pub async fn is_revoked(&self, jti: &str) -> bool {
        self.entries.read().await.contains_key(jti)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
