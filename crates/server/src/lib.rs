use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{CurrentUser, ServerState, router, run, run_with_listener, spawn_with_listener};

mod account;
mod schedule;
mod server;
mod transactions;

pub mod types {
    pub mod account {
        pub use api_types::account::{BalanceResponse, TimezoneUpdate};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            TransactionCreated, TransactionListResponse, TransactionNew, TransactionView,
        };
    }

    pub mod schedule {
        pub use api_types::schedule::{
            DueTodayResponse, ObligationCreated, ObligationNew, ObligationView, SettleResponse,
            UpcomingResponse, Urgency,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

//TODO: Find a better solution
#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::AlreadyPaid(_) => StatusCode::CONFLICT,
        EngineError::Validation(_) | EngineError::InsufficientFunds(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EngineError::SettlementFailed(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

fn map_category(category: engine::Category) -> api_types::Category {
    match category {
        engine::Category::Housing => api_types::Category::Housing,
        engine::Category::Food => api_types::Category::Food,
        engine::Category::Transportation => api_types::Category::Transportation,
        engine::Category::Healthcare => api_types::Category::Healthcare,
        engine::Category::Education => api_types::Category::Education,
        engine::Category::Income => api_types::Category::Income,
        engine::Category::Bills => api_types::Category::Bills,
        engine::Category::Shopping => api_types::Category::Shopping,
        engine::Category::Investment => api_types::Category::Investment,
        engine::Category::Entertainment => api_types::Category::Entertainment,
        engine::Category::Other => api_types::Category::Other,
    }
}

fn engine_category(category: api_types::Category) -> engine::Category {
    match category {
        api_types::Category::Housing => engine::Category::Housing,
        api_types::Category::Food => engine::Category::Food,
        api_types::Category::Transportation => engine::Category::Transportation,
        api_types::Category::Healthcare => engine::Category::Healthcare,
        api_types::Category::Education => engine::Category::Education,
        api_types::Category::Income => engine::Category::Income,
        api_types::Category::Bills => engine::Category::Bills,
        api_types::Category::Shopping => engine::Category::Shopping,
        api_types::Category::Investment => engine::Category::Investment,
        api_types::Category::Entertainment => engine::Category::Entertainment,
        api_types::Category::Other => engine::Category::Other,
    }
}
