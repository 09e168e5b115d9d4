//! Ledger API endpoints

use api_types::transaction::{
    TransactionCreated, TransactionListResponse, TransactionNew, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;

use engine::{MoneyCents, NewLedgerEntry};

use crate::{
    ServerError, engine_category, map_category,
    server::{CurrentUser, ServerState},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<u64>,
}

pub async fn record(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<Json<TransactionCreated>, ServerError> {
    let recorded = state
        .engine
        .record_transaction(NewLedgerEntry {
            user_id: &user.0,
            title: &payload.title,
            amount: MoneyCents::new(payload.amount_minor),
            occurred_at: payload.occurred_at,
            category: engine_category(payload.category).as_str(),
            description: payload.description.as_deref(),
        })
        .await?;

    Ok(Json(TransactionCreated {
        id: recorded.id,
        balance_minor: recorded.balance.cents(),
    }))
}

pub async fn list(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let limit = params.limit.unwrap_or(50);
    let entries = state.engine.recent_transactions(&user.0, limit).await?;

    let transactions = entries
        .into_iter()
        .map(|entry| TransactionView {
            id: entry.id,
            title: entry.title,
            amount_minor: entry.amount.cents(),
            occurred_at: entry.occurred_at,
            category: map_category(entry.category),
            description: entry.description,
            scheduled_id: entry.scheduled_id,
            created_at: entry.created_at,
        })
        .collect();

    Ok(Json(TransactionListResponse { transactions }))
}
