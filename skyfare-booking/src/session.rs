use skyfare_core::{
    AuthError, AuthSubscription, CoreError, CoreResult, IdentityProvider, Notifier, Session, SignUp,
    User,
};
use std::sync::Arc;
use tracing::{info, warn};

/// The application's view of the current session. Every call goes to the
/// identity provider; nothing is cached here.
#[derive(Clone)]
pub struct SessionAdapter {
    provider: Arc<dyn IdentityProvider>,
    notifier: Arc<dyn Notifier>,
}

impl SessionAdapter {
    pub fn new(provider: Arc<dyn IdentityProvider>, notifier: Arc<dyn Notifier>) -> Self {
        Self { provider, notifier }
    }

    /// `None` when signed out or when the provider cannot be reached.
    pub async fn current_user(&self) -> Option<User> {
        match self.provider.get_user().await {
            Ok(user) => user,
            Err(e) => {
                warn!("Failed to read session from identity provider: {}", e);
                None
            }
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current_user().await.is_some()
    }

    pub async fn is_admin(&self) -> bool {
        self.current_user().await.is_some_and(|u| u.is_admin)
    }

    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.sign_in(email, password).await.is_ok()
    }

    pub async fn signup(&self, request: &SignUp) -> bool {
        self.register(request).await.is_ok()
    }

    /// Same as [`login`](Self::login) but hands back the provider's session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        match self.provider.sign_in_with_password(email, password).await {
            Ok(session) => {
                self.notifier.success(if session.user.is_admin {
                    "Administrator logged in!"
                } else {
                    "Successfully logged in!"
                });
                Ok(session)
            }
            Err(e) => Err(self.notify_auth_error(e)),
        }
    }

    pub async fn register(&self, request: &SignUp) -> Result<Session, AuthError> {
        match self.provider.sign_up(request).await {
            Ok(session) => {
                self.notifier.success("Account created successfully!");
                Ok(session)
            }
            Err(e) => Err(self.notify_auth_error(e)),
        }
    }

    pub async fn logout(&self) {
        match self.provider.sign_out().await {
            Ok(()) => self.notifier.success("Logged out successfully"),
            Err(e) => {
                self.notify_auth_error(e);
            }
        }
    }

    /// Swap the current token for a fresh one.
    pub async fn refresh(&self) -> Result<Session, AuthError> {
        self.provider.refresh_session().await.map_err(|e| self.notify_auth_error(e))
    }

    /// Session change stream (sign-in, sign-out, token refresh).
    pub fn subscribe(&self) -> AuthSubscription {
        self.provider.on_auth_state_change()
    }

    pub async fn require_user(&self) -> CoreResult<User> {
        self.current_user().await.ok_or(CoreError::Unauthenticated)
    }

    /// Admin check for write paths; rejects before any storage access.
    pub async fn require_admin(&self) -> CoreResult<User> {
        let user = self.require_user().await?;
        if !user.is_admin {
            warn!("Non-admin user {} attempted an admin operation", user.id);
            return Err(CoreError::Forbidden);
        }
        Ok(user)
    }

    fn notify_auth_error(&self, err: AuthError) -> AuthError {
        info!("Authentication request rejected: {}", err);
        self.notifier.error(&err.to_string());
        err
    }
}
