//! Session handler implementations

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    error::AppResult, middleware::auth::AuthenticatedUser, services::JoinOutcome,
    state::AppState,
};

use super::request::JoinRequest;

/// Join a quiz by its code
pub async fn join_quiz(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<JoinRequest>,
) -> AppResult<Json<JoinOutcome>> {
    payload.validate()?;

    let outcome = state.engine().join(&payload.code, &auth_user).await?;
    Ok(Json(outcome))
}
