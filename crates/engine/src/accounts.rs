//! Accounts table (one balance row per user).
//!
//! The row is keyed by the opaque user id handed over by the identity
//! collaborator. Accounts are created lazily with a zero balance and are
//! never deleted.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::MoneyCents;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub balance_minor: i64,
    pub timezone: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A user account.
///
/// The balance always equals the initial balance plus the sum of the user's
/// ledger-entry amounts; `timezone` (IANA name) resolves "today" for
/// due-date queries and falls back to UTC when unset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub user_id: String,
    pub balance: MoneyCents,
    pub timezone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Self {
            user_id: model.user_id,
            balance: MoneyCents::new(model.balance_minor),
            timezone: model.timezone,
            created_at: model.created_at,
        }
    }
}
