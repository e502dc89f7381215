//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod health;
pub mod quizzes;
pub mod sessions;

use axum::{middleware, Router};

use crate::{
    middleware::{auth::auth_middleware, logging::logging_middleware},
    state::AppState,
};

/// Create all API routes
pub fn routes(state: AppState) -> Router<AppState> {
    let authed = Router::new()
        .nest("/quizzes", quizzes::routes())
        .nest("/sessions", sessions::routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(health::routes())
        .merge(authed)
        .layer(middleware::from_fn(logging_middleware))
}
