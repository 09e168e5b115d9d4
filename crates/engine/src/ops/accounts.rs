use chrono::Utc;
use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, prelude::*, sea_query::Expr};

use crate::{Account, EngineError, MoneyCents, ResultEngine, accounts};

use super::Engine;

impl Engine {
    /// Returns the account for `user_id`, creating it with a zero balance on
    /// first access.
    ///
    /// Creation is idempotent: losing a creation race is absorbed by
    /// re-reading the row, and an existing balance is never reset.
    pub async fn ensure_account(&self, user_id: &str) -> ResultEngine<Account> {
        // The id is opaque and owned by the identity collaborator; it is
        // validated but never transformed.
        if user_id.trim().is_empty() {
            return Err(EngineError::Validation(
                "user id must not be empty".to_string(),
            ));
        }

        if let Some(model) = accounts::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?
        {
            return Ok(Account::from(model));
        }

        let fresh = accounts::ActiveModel {
            user_id: ActiveValue::Set(user_id.to_string()),
            balance_minor: ActiveValue::Set(0),
            timezone: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now()),
        };
        match fresh.insert(&self.database).await {
            Ok(model) => Ok(Account::from(model)),
            Err(err) => {
                // A concurrent caller may have inserted the row first.
                match accounts::Entity::find_by_id(user_id)
                    .one(&self.database)
                    .await?
                {
                    Some(model) => Ok(Account::from(model)),
                    None => Err(err.into()),
                }
            }
        }
    }

    /// Current balance; the account is created lazily if missing.
    pub async fn balance(&self, user_id: &str) -> ResultEngine<MoneyCents> {
        Ok(self.ensure_account(user_id).await?.balance)
    }

    /// Applies a relative balance change and returns the new balance.
    ///
    /// The change is a single SQL expression, so concurrent adjustments for
    /// the same account compose instead of overwriting each other. Prefer
    /// [`Engine::record_transaction`] wherever the change should be visible
    /// in the ledger.
    pub async fn adjust_balance(
        &self,
        user_id: &str,
        delta: MoneyCents,
    ) -> ResultEngine<MoneyCents> {
        self.ensure_account(user_id).await?;
        if !self
            .apply_balance_delta(&self.database, user_id, delta, None)
            .await?
        {
            return Err(EngineError::NotFound("account not exists".to_string()));
        }
        self.balance(user_id).await
    }

    /// Sets the IANA timezone used to resolve "today" for due-date queries.
    pub async fn set_timezone(&self, user_id: &str, zone: &str) -> ResultEngine<()> {
        let zone = zone.trim();
        if zone.parse::<chrono_tz::Tz>().is_err() {
            return Err(EngineError::Validation(format!(
                "unknown timezone: {zone}"
            )));
        }
        self.ensure_account(user_id).await?;
        accounts::Entity::update_many()
            .col_expr(accounts::Column::Timezone, Expr::value(Some(zone.to_string())))
            .filter(accounts::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?;
        Ok(())
    }

    /// Relative balance update: `balance_minor = balance_minor + delta`.
    ///
    /// With `floor` set the update only applies while `balance_minor >=
    /// floor`, which is the conditional-write guard the settlement debit
    /// relies on. Returns whether a row was touched.
    pub(super) async fn apply_balance_delta<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
        delta: MoneyCents,
        floor: Option<MoneyCents>,
    ) -> ResultEngine<bool> {
        let mut update = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::BalanceMinor,
                Expr::col(accounts::Column::BalanceMinor).add(delta.cents()),
            )
            .filter(accounts::Column::UserId.eq(user_id));
        if let Some(floor) = floor {
            update = update.filter(accounts::Column::BalanceMinor.gte(floor.cents()));
        }
        Ok(update.exec(db).await?.rows_affected > 0)
    }
}
