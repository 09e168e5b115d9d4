use chrono::{NaiveDate, Utc};
use sea_orm::{QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Category, EngineError, LedgerEntry, MoneyCents, ResultEngine, ledger_entries};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

/// Input for a manually recorded ledger entry.
///
/// `amount` is signed: negative = outflow, positive = inflow.
#[derive(Clone, Copy, Debug)]
pub struct NewLedgerEntry<'a> {
    pub user_id: &'a str,
    pub title: &'a str,
    pub amount: MoneyCents,
    pub occurred_at: NaiveDate,
    pub category: &'a str,
    pub description: Option<&'a str>,
}

/// Outcome of recording a ledger entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordedTransaction {
    pub id: Uuid,
    pub balance: MoneyCents,
}

impl Engine {
    /// Appends a manual ledger entry and applies its amount to the balance.
    ///
    /// The append and the balance change commit together, keeping the
    /// balance equal to the sum of the user's entries. The ledger is
    /// write-once; there is no update or delete counterpart.
    pub async fn record_transaction(
        &self,
        new: NewLedgerEntry<'_>,
    ) -> ResultEngine<RecordedTransaction> {
        let title = normalize_required_text(new.title, "title")?;
        let category = Category::try_from(new.category)?;
        let description = normalize_optional_text(new.description);
        let entry = LedgerEntry::new(
            new.user_id.to_string(),
            title,
            new.amount,
            new.occurred_at,
            category,
            description,
            None,
            Utc::now(),
        )?;

        self.ensure_account(new.user_id).await?;

        let id = entry.id;
        with_tx!(self, |db_tx| {
            ledger_entries::ActiveModel::from(&entry)
                .insert(&db_tx)
                .await?;
            self.apply_balance_delta(&db_tx, new.user_id, new.amount, None)
                .await?;
            Ok::<(), EngineError>(())
        })?;

        let balance = self.balance(new.user_id).await?;
        Ok(RecordedTransaction { id, balance })
    }

    /// Lists the most recent settled entries, newest first.
    pub async fn recent_transactions(
        &self,
        user_id: &str,
        limit: u64,
    ) -> ResultEngine<Vec<LedgerEntry>> {
        let models = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::UserId.eq(user_id))
            .order_by_desc(ledger_entries::Column::OccurredAt)
            .order_by_desc(ledger_entries::Column::CreatedAt)
            .limit(limit)
            .all(&self.database)
            .await?;

        models.into_iter().map(LedgerEntry::try_from).collect()
    }
}
