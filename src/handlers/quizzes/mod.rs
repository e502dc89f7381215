//! Quiz authoring, lifecycle and participation handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Quiz routes
pub fn routes() -> Router<AppState> {
    Router::new()
        // Authoring
        .route("/", post(handler::import_quiz))
        .route("/{id}", get(handler::get_quiz).put(handler::update_quiz))
        // Lifecycle
        .route("/{id}/schedule", post(handler::schedule_quiz))
        .route("/{id}/start", post(handler::start_quiz))
        .route("/{id}/end", post(handler::end_quiz))
        // Participation
        .route("/{id}/access", get(handler::check_access))
        .route("/{id}/answers", post(handler::submit_answer))
        .route("/{id}/focus-loss", post(handler::report_focus_loss))
        // Results
        .route("/{id}/leaderboard", get(handler::get_leaderboard))
        .route("/{id}/summary", get(handler::get_summary))
        .route("/{id}/responses/{user_id}", get(handler::get_response))
        .route("/{id}/responses/{user_id}/report", get(handler::get_report))
}
