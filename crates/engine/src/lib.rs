pub use accounts::Account;
pub use category::Category;
pub use error::EngineError;
pub use ledger_entries::LedgerEntry;
pub use money::MoneyCents;
pub use ops::{
    Engine, EngineBuilder, NewLedgerEntry, NewObligation, RecordedTransaction, Settlement,
};
pub use scheduled_obligations::ScheduledObligation;

mod accounts;
mod category;
mod error;
mod ledger_entries;
mod money;
mod ops;
mod scheduled_obligations;

type ResultEngine<T> = Result<T, EngineError>;
