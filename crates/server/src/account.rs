//! Account API endpoints

use api_types::account::{BalanceResponse, TimezoneUpdate};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    ServerError,
    server::{CurrentUser, ServerState},
};

pub async fn balance(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
) -> Result<Json<BalanceResponse>, ServerError> {
    let balance = state.engine.balance(&user.0).await?;

    Ok(Json(BalanceResponse {
        balance_minor: balance.cents(),
    }))
}

pub async fn set_timezone(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Json(payload): Json<TimezoneUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .set_timezone(&user.0, &payload.timezone)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
