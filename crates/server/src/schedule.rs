//! Scheduled-obligation API endpoints

use api_types::schedule::{
    DueTodayResponse, ObligationCreated, ObligationNew, ObligationView, SettleResponse,
    UpcomingResponse, Urgency,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::NaiveDate;
use uuid::Uuid;

use engine::{MoneyCents, NewObligation, ScheduledObligation};

use crate::{
    ServerError, engine_category, map_category,
    server::{CurrentUser, ServerState},
};

fn view(obligation: ScheduledObligation, today: NaiveDate) -> ObligationView {
    let due_in_days = (obligation.due_at - today).num_days();
    let urgency = match due_in_days {
        0 => Urgency::DueToday,
        days if days <= 3 => Urgency::Urgent,
        days if days <= 7 => Urgency::DueSoon,
        _ => Urgency::Upcoming,
    };

    ObligationView {
        id: obligation.id,
        title: obligation.title,
        amount_minor: obligation.amount.cents(),
        due_at: obligation.due_at,
        category: map_category(obligation.category),
        description: obligation.description,
        due_in_days,
        urgency,
    }
}

pub async fn create(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Json(payload): Json<ObligationNew>,
) -> Result<Json<ObligationCreated>, ServerError> {
    let id = state
        .engine
        .schedule_obligation(NewObligation {
            user_id: &user.0,
            title: &payload.title,
            amount: MoneyCents::new(payload.amount_minor),
            due_at: payload.due_at,
            category: engine_category(payload.category).as_str(),
            description: payload.description.as_deref(),
        })
        .await?;

    Ok(Json(ObligationCreated { id }))
}

pub async fn upcoming(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
) -> Result<Json<UpcomingResponse>, ServerError> {
    let today = state.engine.local_today(&user.0).await?;
    let obligations = state
        .engine
        .upcoming(&user.0)
        .await?
        .into_iter()
        .map(|obligation| view(obligation, today))
        .collect();

    Ok(Json(UpcomingResponse { obligations }))
}

pub async fn due_today(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
) -> Result<Json<DueTodayResponse>, ServerError> {
    let today = state.engine.local_today(&user.0).await?;
    let obligations: Vec<ObligationView> = state
        .engine
        .due_today(&user.0)
        .await?
        .into_iter()
        .map(|obligation| view(obligation, today))
        .collect();
    let count = obligations.len();

    Ok(Json(DueTodayResponse { obligations, count }))
}

pub async fn settle(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SettleResponse>, ServerError> {
    let settlement = state.engine.settle(&user.0, id).await?;

    Ok(Json(SettleResponse {
        ledger_entry_id: settlement.ledger_entry_id,
        balance_minor: settlement.balance.cents(),
    }))
}
