use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use skyfare_booking::SessionAdapter;
use skyfare_core::{Session, User};
use skyfare_store::LocalIdentityProvider;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::AppError,
    state::{AppState, JWT_LEEWAY_SECS},
};

pub const ROLE_CUSTOMER: &str = "CUSTOMER";
pub const ROLE_ADMIN: &str = "ADMIN";

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    /// Access token of the provider session this JWT was minted from.
    pub jti: String,
    pub exp: usize,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.exp as i64, 0)
    }
}

/// Session restored from the bearer token, attached to the request.
#[derive(Clone)]
pub struct CurrentSession(pub SessionAdapter);

pub fn issue_token(state: &AppState, session: &Session) -> Result<String, AppError> {
    let claims = Claims {
        sub: session.user.id,
        email: session.user.email.clone(),
        role: if session.user.is_admin { ROLE_ADMIN } else { ROLE_CUSTOMER }.to_owned(),
        jti: session.access_token.clone(),
        exp: session.expires_at.timestamp() as usize,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(state.auth.secret.as_bytes()))
        .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

// ============================================================================
// Session Middleware
// ============================================================================

pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // 1. Extract token from Authorization header
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // 2. Decode and validate JWT
    let mut validation = Validation::default();
    validation.leeway = JWT_LEEWAY_SECS;
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        debug!("Rejected bearer token: {}", e);
        StatusCode::UNAUTHORIZED
    })?
    .claims;

    if state.revoked_tokens.is_revoked(&claims.jti).await {
        return Err(StatusCode::UNAUTHORIZED);
    }

    // 3. Resolve the account; deleted or unknown users lose their session
    let user = state.accounts.find(claims.sub).await.ok_or(StatusCode::UNAUTHORIZED)?;
    let expires_at = claims.expires_at().ok_or(StatusCode::UNAUTHORIZED)?;

    // 4. Hand the request its own provider holding the restored session
    let session = Session {
        access_token: claims.jti.clone(),
        user: user.clone(),
        expires_at,
    };
    let provider = LocalIdentityProvider::restore(state.accounts.clone(), session, state.session_ttl());
    let adapter = state.session_adapter(Arc::new(provider));

    req.extensions_mut().insert(user);
    req.extensions_mut().insert(claims);
    req.extensions_mut().insert(CurrentSession(adapter));

    Ok(next.run(req).await)
}

// ============================================================================
// Admin Guard (runs after the session middleware)
// ============================================================================

pub async fn admin_auth_middleware(req: Request, next: Next) -> Result<Response, StatusCode> {
    match req.extensions().get::<User>() {
        Some(user) if user.is_admin => Ok(next.run(req).await),
        Some(_) => Err(StatusCode::FORBIDDEN),
        None => Err(StatusCode::UNAUTHORIZED),
    }
}
