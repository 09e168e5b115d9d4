//! The settlement orchestrator: the one multi-store write path.
//!
//! Settling an obligation flips it to paid, appends the matching ledger
//! entry, and moves the balance. Either all three writes become visible or
//! none do. Each write is a guarded conditional update with a compensating
//! rollback, so the guarantee holds even when the stores cannot share a
//! database transaction.

use chrono::Utc;
use sea_orm::prelude::*;
use uuid::Uuid;

use crate::{EngineError, LedgerEntry, MoneyCents, ResultEngine, ledger_entries};

use super::Engine;

/// Outcome of a successful settlement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub ledger_entry_id: Uuid,
    pub balance: MoneyCents,
}

impl Engine {
    /// Settles a scheduled obligation.
    ///
    /// Exactly one of N concurrent calls for the same obligation succeeds;
    /// the others observe [`EngineError::AlreadyPaid`]. A returned
    /// [`EngineError::SettlementFailed`] means the pre-call state was
    /// restored and the call may be retried.
    pub async fn settle(&self, user_id: &str, obligation_id: Uuid) -> ResultEngine<Settlement> {
        let slot = self.settle_locks.acquire_slot(user_id, obligation_id);
        let guard = slot.lock().await;
        let result = self.settle_exclusive(user_id, obligation_id).await;
        drop(guard);
        self.settle_locks.release_slot(user_id, obligation_id, &slot);
        result
    }

    async fn settle_exclusive(
        &self,
        user_id: &str,
        obligation_id: Uuid,
    ) -> ResultEngine<Settlement> {
        let obligation = self.load_obligation(user_id, obligation_id).await?;
        if obligation.is_paid {
            return Err(EngineError::AlreadyPaid(format!(
                "obligation {obligation_id} is already paid"
            )));
        }

        // Income-typed obligations settle as credits, everything else as
        // debits of the stored magnitude.
        let signed_amount = if obligation.category.is_income() {
            obligation.amount
        } else {
            -obligation.amount
        };

        let balance = self.ensure_account(user_id).await?.balance;
        if signed_amount.is_negative() && balance < obligation.amount {
            return Err(EngineError::InsufficientFunds(format!(
                "balance {balance} cannot cover {}",
                obligation.amount
            )));
        }

        let paid_at = Utc::now();
        let description = format!(
            "Payment for: {}",
            obligation.description.as_deref().unwrap_or(&obligation.title)
        );
        // Built before the first write so a validation failure mutates nothing.
        let entry = LedgerEntry::new(
            user_id.to_string(),
            obligation.title.clone(),
            signed_amount,
            paid_at.date_naive(),
            obligation.category,
            Some(description),
            Some(obligation_id),
            paid_at,
        )?;

        self.mark_paid(obligation_id, paid_at).await?;

        if let Err(err) = ledger_entries::ActiveModel::from(&entry)
            .insert(&self.database)
            .await
        {
            self.revert_mark_paid(obligation_id).await?;
            tracing::warn!("settlement of {obligation_id} rolled back: ledger append failed: {err}");
            return Err(EngineError::SettlementFailed(
                "could not append the ledger entry".to_string(),
            ));
        }

        let floor = signed_amount.is_negative().then_some(obligation.amount);
        match self
            .apply_balance_delta(&self.database, user_id, signed_amount, floor)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                // Another settlement for this account drained the funds
                // between the check and the debit.
                self.remove_ledger_entry(entry.id).await?;
                self.revert_mark_paid(obligation_id).await?;
                return Err(EngineError::InsufficientFunds(format!(
                    "balance cannot cover {}",
                    obligation.amount
                )));
            }
            Err(err) => {
                self.remove_ledger_entry(entry.id).await?;
                self.revert_mark_paid(obligation_id).await?;
                tracing::warn!(
                    "settlement of {obligation_id} rolled back: balance update failed: {err}"
                );
                return Err(EngineError::SettlementFailed(
                    "could not apply the balance change".to_string(),
                ));
            }
        }

        let balance = self.balance(user_id).await?;
        Ok(Settlement {
            ledger_entry_id: entry.id,
            balance,
        })
    }

    /// Reverts the paid flag during rollback. A failure here leaves the
    /// stores inconsistent, so it escalates as fatal instead of being
    /// retried.
    async fn revert_mark_paid(&self, obligation_id: Uuid) -> ResultEngine<()> {
        let reverted = match self.unmark_paid(obligation_id).await {
            Ok(reverted) => reverted,
            Err(err) => {
                tracing::error!("failed to revert paid flag for {obligation_id}: {err}");
                return Err(EngineError::SettlementFailed(format!(
                    "rollback failed; obligation {obligation_id} needs operator attention"
                )));
            }
        };
        if !reverted {
            tracing::error!("paid flag for {obligation_id} was not set during rollback");
            return Err(EngineError::SettlementFailed(format!(
                "rollback failed; obligation {obligation_id} needs operator attention"
            )));
        }
        Ok(())
    }

    /// Removes a just-appended ledger entry during rollback. Same escalation
    /// policy as [`Engine::revert_mark_paid`].
    async fn remove_ledger_entry(&self, id: Uuid) -> ResultEngine<()> {
        if let Err(err) = ledger_entries::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await
        {
            tracing::error!("failed to remove ledger entry {id} during rollback: {err}");
            return Err(EngineError::SettlementFailed(format!(
                "rollback failed; ledger entry {id} needs operator attention"
            )));
        }
        Ok(())
    }
}
