use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use skyfare_core::{Session, SignUp, User};
use skyfare_shared::Masked;
use tracing::info;

use crate::{
    error::AppError,
    middleware::auth::{issue_token, session_auth_middleware, Claims, CurrentSession},
    state::AppState,
};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/refresh", post(refresh))
        .route("/auth/me", get(me))
        .route_layer(middleware::from_fn_with_state(state, session_auth_middleware));

    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .merge(protected)
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let session = state
        .session_adapter(state.new_identity_provider())
        .sign_in(&req.email, &req.password)
        .await?;
    respond_with_session(&state, session)
}

async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignUp>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let session = state
        .session_adapter(state.new_identity_provider())
        .register(&req)
        .await?;
    info!("New account {}", Masked(&session.user.email));
    Ok((StatusCode::CREATED, respond_with_session(&state, session)?))
}

async fn logout(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> StatusCode {
    session.logout().await;
    retire(&state, claims).await;
    StatusCode::NO_CONTENT
}

/// Issues a new token for the same account and retires the presented one.
async fn refresh(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Result<Json<AuthResponse>, AppError> {
    let refreshed = session.refresh().await?;
    retire(&state, claims).await;
    respond_with_session(&state, refreshed)
}

async fn me(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}

async fn retire(state: &AppState, claims: Claims) {
    if let Some(expires_at) = claims.expires_at() {
        state.revoked_tokens.revoke(claims.jti, expires_at).await;
    }
}

fn respond_with_session(state: &AppState, session: Session) -> Result<Json<AuthResponse>, AppError> {
    let token = issue_token(state, &session)?;
    Ok(Json(AuthResponse {
        token,
        user: session.user,
    }))
}
