//! Live session entry

mod handler;
pub mod request;

pub use handler::*;
pub use request::*;

use axum::{routing::post, Router};

use crate::state::AppState;

/// Session routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/join", post(handler::join_quiz))
}
