use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use skyfare_core::{AuthChange, AuthError, AuthEvent, AuthSubscription, IdentityProvider, Session, SignUp, User};
use skyfare_shared::Masked;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::app_config::AccountConfig;

pub fn validate_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let valid_part = |part: &str| !part.is_empty() && !part.contains(char::is_whitespace) && !part.contains('@');
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    valid_part(local) && valid_part(host) && valid_part(tld)
}

/// At least 8 ASCII letters/digits with one lower-case, one upper-case and one digit.
pub fn validate_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().all(|c| c.is_ascii_alphanumeric())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

#[derive(Debug)]
struct Account {
    user: User,
    password: Masked<String>,
}

/// Accounts known to the identity provider, keyed by lower-cased e-mail.
#[derive(Default)]
pub struct AccountDirectory {
    accounts: RwLock<HashMap<String, Account>>,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(accounts: &[AccountConfig]) -> Self {
        let now = Utc::now();
        let entries = accounts
            .iter()
            .map(|a| {
                let key = a.email.to_lowercase();
                let user = User {
                    id: user_id_for(&key),
                    first_name: a.first_name.clone(),
                    last_name: a.last_name.clone(),
                    email: a.email.clone(),
                    is_admin: a.is_admin,
                    created_at: now,
                };
                (key, Account { user, password: Masked(a.password.clone()) })
            })
            .collect();
        Self {
            accounts: RwLock::new(entries),
        }
    }

    pub async fn register(&self, request: &SignUp, is_admin: bool) -> Result<User, AuthError> {
        if !validate_email(&request.email) {
            return Err(AuthError::InvalidEmail);
        }
        if !validate_password(&request.password) {
            return Err(AuthError::WeakPassword);
        }

        let key = request.email.to_lowercase();
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&key) {
            return Err(AuthError::EmailTaken);
        }

        let user = User {
            id: user_id_for(&key),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            email: request.email.clone(),
            is_admin,
            created_at: Utc::now(),
        };
        accounts.insert(key, Account { user: user.clone(), password: Masked(request.password.clone()) });
        info!("Registered account {}", Masked(&user.email));
        Ok(user)
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let accounts = self.accounts.read().await;
        match accounts.get(&email.to_lowercase()) {
            Some(account) if account.password.0 == password => Ok(account.user.clone()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    pub async fn find(&self, id: Uuid) -> Option<User> {
        let accounts = self.accounts.read().await;
        accounts.values().find(|a| a.user.id == id).map(|a| a.user.clone())
    }
}

// Stable across restarts so persisted bookings stay attached to their owner.
fn user_id_for(email_key: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("mailto:{}", email_key).as_bytes())
}

/// Identity provider over an [`AccountDirectory`]. Holds the one session of
/// its client and broadcasts every change.
pub struct LocalIdentityProvider {
    directory: Arc<AccountDirectory>,
    session: RwLock<Option<Session>>,
    changes: broadcast::Sender<AuthChange>,
    session_ttl: Duration,
}

impl LocalIdentityProvider {
    pub fn new(directory: Arc<AccountDirectory>, session_ttl: Duration) -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            directory,
            session: RwLock::new(None),
            changes,
            session_ttl,
        }
    }

    /// Resume a session the client already holds (e.g. from a bearer token).
    pub fn restore(directory: Arc<AccountDirectory>, session: Session, session_ttl: Duration) -> Self {
        let provider = Self::new(directory, session_ttl);
        Self {
            session: RwLock::new(Some(session)),
            ..provider
        }
    }

    fn issue(&self, user: User, now: DateTime<Utc>) -> Session {
        Session {
            access_token: Uuid::new_v4().simple().to_string(),
            user,
            expires_at: now + self.session_ttl,
        }
    }

    async fn start_session(&self, user: User) -> Session {
        let session = self.issue(user, Utc::now());
        *self.session.write().await = Some(session.clone());
        self.notify(AuthEvent::SignedIn, Some(session.clone()));
        session
    }

    fn notify(&self, event: AuthEvent, session: Option<Session>) {
        // no subscribers is fine
        let _ = self.changes.send(AuthChange { event, session });
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        let session = self.session.read().await;
        Ok(session.as_ref().filter(|s| s.expires_at > Utc::now()).cloned())
    }

    async fn get_user(&self) -> Result<Option<User>, AuthError> {
        Ok(self.get_session().await?.map(|s| s.user))
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let user = self.directory.authenticate(email, password).await?;
        info!("Signed in {}", Masked(&user.email));
        Ok(self.start_session(user).await)
    }

    async fn sign_up(&self, request: &SignUp) -> Result<Session, AuthError> {
        let user = self.directory.register(request, false).await?;
        Ok(self.start_session(user).await)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if self.session.write().await.take().is_some() {
            self.notify(AuthEvent::SignedOut, None);
        }
        Ok(())
    }

    async fn refresh_session(&self) -> Result<Session, AuthError> {
        let mut slot = self.session.write().await;
        let current = slot.take().ok_or(AuthError::NoSession)?;
        let refreshed = self.issue(current.user, Utc::now());
        *slot = Some(refreshed.clone());
        self.notify(AuthEvent::TokenRefreshed, Some(refreshed.clone()));
        Ok(refreshed)
    }

    fn on_auth_state_change(&self) -> AuthSubscription {
        AuthSubscription::new(self.changes.subscribe())
    }
}
