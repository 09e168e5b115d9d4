use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use sea_orm::DatabaseConnection;
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

mod accounts;
mod ledger;
mod schedule;
mod settlement;

pub use ledger::{NewLedgerEntry, RecordedTransaction};
pub use schedule::NewObligation;
pub use settlement::Settlement;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    settle_locks: SettleLocks,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// Lock table keyed by `(user_id, obligation_id)`.
///
/// Settlement is mutually exclusive per obligation; a slot is dropped from
/// the table once the last interested caller releases it.
#[derive(Debug, Default)]
pub(crate) struct SettleLocks {
    inner: Mutex<HashMap<(String, Uuid), Arc<AsyncMutex<()>>>>,
}

impl SettleLocks {
    pub(crate) fn acquire_slot(&self, user_id: &str, obligation_id: Uuid) -> Arc<AsyncMutex<()>> {
        let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        table
            .entry((user_id.to_string(), obligation_id))
            .or_default()
            .clone()
    }

    pub(crate) fn release_slot(
        &self,
        user_id: &str,
        obligation_id: Uuid,
        slot: &Arc<AsyncMutex<()>>,
    ) {
        let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference lives in the table and one is held by the releasing
        // caller; anything above that means another settlement is waiting.
        if Arc::strong_count(slot) <= 2 {
            table.remove(&(user_id.to_string(), obligation_id));
        }
    }
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            settle_locks: SettleLocks::default(),
        })
    }
}
