//! Ledger primitives.
//!
//! A `LedgerEntry` is an immutable record of a completed monetary movement.
//! The store is write-once: no update or delete surface exists, so history
//! cannot be silently altered after the fact.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Category, EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub amount_minor: i64,
    pub occurred_at: Date,
    pub category: String,
    pub description: Option<String>,
    pub scheduled_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A settled monetary movement.
///
/// `amount` is signed: negative = outflow, positive = inflow. `scheduled_id`
/// points back to the obligation a settlement paid, as a lookup aid only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub amount: MoneyCents,
    pub occurred_at: NaiveDate,
    pub category: Category,
    pub description: Option<String>,
    pub scheduled_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub(crate) fn new(
        user_id: String,
        title: String,
        amount: MoneyCents,
        occurred_at: NaiveDate,
        category: Category,
        description: Option<String>,
        scheduled_id: Option<Uuid>,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if amount.is_zero() {
            return Err(EngineError::Validation(
                "amount must not be 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            amount,
            occurred_at,
            category,
            description,
            scheduled_id,
            created_at,
        })
    }
}

impl From<&LedgerEntry> for ActiveModel {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            id: ActiveValue::Set(entry.id.to_string()),
            user_id: ActiveValue::Set(entry.user_id.clone()),
            title: ActiveValue::Set(entry.title.clone()),
            amount_minor: ActiveValue::Set(entry.amount.cents()),
            occurred_at: ActiveValue::Set(entry.occurred_at),
            category: ActiveValue::Set(entry.category.as_str().to_string()),
            description: ActiveValue::Set(entry.description.clone()),
            scheduled_id: ActiveValue::Set(entry.scheduled_id.map(|id| id.to_string())),
            created_at: ActiveValue::Set(entry.created_at),
        }
    }
}

impl TryFrom<Model> for LedgerEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("ledger entry not exists".to_string()))?,
            user_id: model.user_id,
            title: model.title,
            amount: MoneyCents::new(model.amount_minor),
            occurred_at: model.occurred_at,
            category: Category::try_from(model.category.as_str())?,
            description: model.description,
            scheduled_id: model.scheduled_id.and_then(|s| Uuid::parse_str(&s).ok()),
            created_at: model.created_at,
        })
    }
}
