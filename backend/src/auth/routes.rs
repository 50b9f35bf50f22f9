//! Defines the HTTP routes specifically for authentication.
//!
//! Login, refresh and logout are public; `/me` requires an authenticated
//! principal. These are designed to be nested into the main Axum router.

use crate::auth::handlers::*;
use crate::auth::middleware::require_auth;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
        .route("/me", get(me).layer(middleware::from_fn(require_auth)))
}
