pub mod auth;

pub use auth::{admin_auth_middleware, issue_token, session_auth_middleware, Claims, CurrentSession};
