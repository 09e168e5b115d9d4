use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transaction category tags.
///
/// This mirrors the engine's closed set; `income` is the only inflow-typed
/// tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Housing,
    Food,
    Transportation,
    Healthcare,
    Education,
    Income,
    Bills,
    Shopping,
    Investment,
    Entertainment,
    Other,
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceResponse {
        pub balance_minor: i64,
    }

    /// Request body for setting the account timezone (IANA name).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TimezoneUpdate {
        pub timezone: String,
    }
}

pub mod transaction {
    use super::*;

    /// Request body for a manually recorded transaction.
    ///
    /// `amount_minor` is signed: negative = expense, positive = income.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub title: String,
        pub amount_minor: i64,
        pub occurred_at: NaiveDate,
        pub category: Category,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: Uuid,
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub title: String,
        pub amount_minor: i64,
        pub occurred_at: NaiveDate,
        pub category: Category,
        pub description: Option<String>,
        /// Back-reference to the obligation this entry settled, if any.
        pub scheduled_id: Option<Uuid>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }
}

pub mod schedule {
    use super::*;

    /// Request body for scheduling an obligation.
    ///
    /// `amount_minor` is a positive magnitude; the sign is applied at
    /// settlement from the category.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ObligationNew {
        pub title: String,
        pub amount_minor: i64,
        pub due_at: NaiveDate,
        pub category: Category,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ObligationCreated {
        pub id: Uuid,
    }

    /// Urgency buckets clients use for badge styling.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Urgency {
        DueToday,
        Urgent,
        DueSoon,
        Upcoming,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ObligationView {
        pub id: Uuid,
        pub title: String,
        pub amount_minor: i64,
        pub due_at: NaiveDate,
        pub category: Category,
        pub description: Option<String>,
        /// Days until the due date; negative when overdue.
        pub due_in_days: i64,
        pub urgency: Urgency,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UpcomingResponse {
        pub obligations: Vec<ObligationView>,
    }

    /// The `count` field is the notification badge input.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DueTodayResponse {
        pub obligations: Vec<ObligationView>,
        pub count: usize,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettleResponse {
        pub ledger_entry_id: Uuid,
        pub balance_minor: i64,
    }
}
