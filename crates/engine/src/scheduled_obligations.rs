//! Scheduled obligations: future-dated, not-yet-paid expected transactions.
//!
//! The stored amount is always a positive magnitude; settlement applies the
//! sign from the category. Once `is_paid` flips to true the record is
//! terminal.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Category, EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scheduled_obligations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub amount_minor: i64,
    pub due_at: Date,
    pub category: String,
    pub description: Option<String>,
    pub is_paid: bool,
    pub paid_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A scheduled obligation as seen by callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledObligation {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub amount: MoneyCents,
    pub due_at: NaiveDate,
    pub category: Category,
    pub description: Option<String>,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ScheduledObligation {
    pub(crate) fn new(
        user_id: String,
        title: String,
        amount: MoneyCents,
        due_at: NaiveDate,
        category: Category,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::Validation(
                "amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            amount,
            due_at,
            category,
            description,
            is_paid: false,
            paid_at: None,
            created_at,
        })
    }
}

impl From<&ScheduledObligation> for ActiveModel {
    fn from(obligation: &ScheduledObligation) -> Self {
        Self {
            id: ActiveValue::Set(obligation.id.to_string()),
            user_id: ActiveValue::Set(obligation.user_id.clone()),
            title: ActiveValue::Set(obligation.title.clone()),
            amount_minor: ActiveValue::Set(obligation.amount.cents()),
            due_at: ActiveValue::Set(obligation.due_at),
            category: ActiveValue::Set(obligation.category.as_str().to_string()),
            description: ActiveValue::Set(obligation.description.clone()),
            is_paid: ActiveValue::Set(obligation.is_paid),
            paid_at: ActiveValue::Set(obligation.paid_at),
            created_at: ActiveValue::Set(obligation.created_at),
        }
    }
}

impl TryFrom<Model> for ScheduledObligation {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("obligation not exists".to_string()))?,
            user_id: model.user_id,
            title: model.title,
            amount: MoneyCents::new(model.amount_minor),
            due_at: model.due_at,
            category: Category::try_from(model.category.as_str())?,
            description: model.description,
            is_paid: model.is_paid,
            paid_at: model.paid_at,
            created_at: model.created_at,
        })
    }
}
