use chrono::{Duration, Utc};
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use engine::{Engine, EngineError, MoneyCents, NewLedgerEntry, NewObligation};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn record(
    engine: &Engine,
    user: &str,
    title: &str,
    cents: i64,
    category: &str,
    days_ago: i64,
) -> Uuid {
    engine
        .record_transaction(NewLedgerEntry {
            user_id: user,
            title,
            amount: MoneyCents::new(cents),
            occurred_at: (Utc::now() - Duration::days(days_ago)).date_naive(),
            category,
            description: None,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn recording_moves_the_balance_with_the_entry() {
    let (engine, _db) = engine_with_db().await;

    let recorded = engine
        .record_transaction(NewLedgerEntry {
            user_id: "alice",
            title: "Salary Deposit",
            amount: MoneyCents::new(3500_00),
            occurred_at: Utc::now().date_naive(),
            category: "income",
            description: Some("January"),
        })
        .await
        .unwrap();
    assert_eq!(recorded.balance, MoneyCents::new(3500_00));

    let recorded = engine
        .record_transaction(NewLedgerEntry {
            user_id: "alice",
            title: "Grocery Store",
            amount: MoneyCents::new(-64_75),
            occurred_at: Utc::now().date_naive(),
            category: "food",
            description: None,
        })
        .await
        .unwrap();
    assert_eq!(recorded.balance, MoneyCents::new(3435_25));
}

#[tokio::test]
async fn recording_rejects_malformed_input() {
    let (engine, _db) = engine_with_db().await;

    let zero = engine
        .record_transaction(NewLedgerEntry {
            user_id: "alice",
            title: "Nothing",
            amount: MoneyCents::ZERO,
            occurred_at: Utc::now().date_naive(),
            category: "other",
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(zero, EngineError::Validation(_)));

    let untitled = engine
        .record_transaction(NewLedgerEntry {
            user_id: "alice",
            title: "   ",
            amount: MoneyCents::new(10_00),
            occurred_at: Utc::now().date_naive(),
            category: "other",
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(untitled, EngineError::Validation(_)));

    let unknown_category = engine
        .record_transaction(NewLedgerEntry {
            user_id: "alice",
            title: "Mystery",
            amount: MoneyCents::new(10_00),
            occurred_at: Utc::now().date_naive(),
            category: "groceries",
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(unknown_category, EngineError::Validation(_)));

    // Nothing was persisted along the way.
    assert!(engine.recent_transactions("alice", 10).await.unwrap().is_empty());
    assert_eq!(engine.balance("alice").await.unwrap(), MoneyCents::ZERO);
}

#[tokio::test]
async fn recent_transactions_come_newest_first() {
    let (engine, _db) = engine_with_db().await;

    record(&engine, "alice", "Restaurant", -32_50, "food", 3).await;
    record(&engine, "alice", "Freelance Payment", 400_00, "income", 1).await;
    record(&engine, "alice", "Amazon Purchase", -49_99, "shopping", 5).await;

    let entries = engine.recent_transactions("alice", 10).await.unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].title, "Freelance Payment");
    assert_eq!(entries[1].title, "Restaurant");
    assert_eq!(entries[2].title, "Amazon Purchase");

    let limited = engine.recent_transactions("alice", 2).await.unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].title, "Freelance Payment");
}

#[tokio::test]
async fn entries_are_partitioned_per_user() {
    let (engine, _db) = engine_with_db().await;

    record(&engine, "alice", "Restaurant", -32_50, "food", 0).await;
    record(&engine, "bob", "Transfer from John", 250_00, "other", 0).await;

    let alice = engine.recent_transactions("alice", 10).await.unwrap();
    assert_eq!(alice.len(), 1);
    assert_eq!(alice[0].title, "Restaurant");
    assert_eq!(engine.balance("bob").await.unwrap(), MoneyCents::new(250_00));
}

#[tokio::test]
async fn balance_always_equals_the_sum_of_entries() {
    let (engine, _db) = engine_with_db().await;

    record(&engine, "alice", "Salary Deposit", 3500_00, "income", 10).await;
    record(&engine, "alice", "Grocery Store", -64_75, "food", 4).await;
    record(&engine, "alice", "Transfer from John", 250_00, "other", 2).await;

    let obligation_id = engine
        .schedule_obligation(NewObligation {
            user_id: "alice",
            title: "Netflix Subscription",
            amount: MoneyCents::new(12_99),
            due_at: Utc::now().date_naive(),
            category: "entertainment",
            description: None,
        })
        .await
        .unwrap();
    engine.settle("alice", obligation_id).await.unwrap();

    let entries = engine.recent_transactions("alice", 50).await.unwrap();
    let sum: i64 = entries.iter().map(|entry| entry.amount.cents()).sum();
    assert_eq!(engine.balance("alice").await.unwrap().cents(), sum);
}
