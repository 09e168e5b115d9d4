use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{Engine, EngineError, MoneyCents, NewObligation};
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

async fn engine_with_file_db() -> (Engine, DatabaseConnection, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("engine_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();

    (engine, db, path)
}

async fn schedule(engine: &Engine, user: &str, cents: i64, category: &str) -> Uuid {
    engine
        .schedule_obligation(NewObligation {
            user_id: user,
            title: "Electricity Bill",
            amount: MoneyCents::new(cents),
            due_at: Utc::now().date_naive(),
            category,
            description: None,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn settle_pays_an_obligation_exactly_once() {
    let (engine, _db) = engine_with_db().await;
    engine
        .adjust_balance("alice", MoneyCents::new(100_00))
        .await
        .unwrap();
    let obligation_id = schedule(&engine, "alice", 40_00, "bills").await;

    let settlement = engine.settle("alice", obligation_id).await.unwrap();
    assert_eq!(settlement.balance, MoneyCents::new(60_00));

    let entries = engine.recent_transactions("alice", 10).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].amount, MoneyCents::new(-40_00));
    assert_eq!(entries[0].scheduled_id, Some(obligation_id));
    assert_eq!(entries[0].id, settlement.ledger_entry_id);

    // The obligation is terminal now.
    assert!(engine.upcoming("alice").await.unwrap().is_empty());

    let err = engine.settle("alice", obligation_id).await.unwrap_err();
    assert!(matches!(err, EngineError::AlreadyPaid(_)));
    assert_eq!(
        engine.balance("alice").await.unwrap(),
        MoneyCents::new(60_00)
    );
}

#[tokio::test]
async fn settle_without_funds_mutates_nothing() {
    let (engine, _db) = engine_with_db().await;
    engine
        .adjust_balance("alice", MoneyCents::new(10_00))
        .await
        .unwrap();
    let obligation_id = schedule(&engine, "alice", 40_00, "bills").await;

    let err = engine.settle("alice", obligation_id).await.unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));

    assert_eq!(
        engine.balance("alice").await.unwrap(),
        MoneyCents::new(10_00)
    );
    assert!(engine.recent_transactions("alice", 10).await.unwrap().is_empty());
    let upcoming = engine.upcoming("alice").await.unwrap();
    assert_eq!(upcoming.len(), 1);
    assert!(!upcoming[0].is_paid);
}

#[tokio::test]
async fn income_obligation_settles_as_a_credit() {
    let (engine, _db) = engine_with_db().await;
    let obligation_id = schedule(&engine, "alice", 3500_00, "income").await;

    // No funds required for an inflow.
    let settlement = engine.settle("alice", obligation_id).await.unwrap();
    assert_eq!(settlement.balance, MoneyCents::new(3500_00));

    let entries = engine.recent_transactions("alice", 10).await.unwrap();
    assert_eq!(entries[0].amount, MoneyCents::new(3500_00));
}

#[tokio::test]
async fn settle_rejects_unknown_and_foreign_obligations() {
    let (engine, _db) = engine_with_db().await;
    engine
        .adjust_balance("alice", MoneyCents::new(100_00))
        .await
        .unwrap();

    let err = engine.settle("alice", Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    // Obligations are partitioned per user.
    let obligation_id = schedule(&engine, "bob", 5_00, "bills").await;
    let err = engine.settle("alice", obligation_id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn failed_ledger_append_rolls_the_obligation_back() {
    let (engine, db) = engine_with_db().await;
    engine
        .adjust_balance("alice", MoneyCents::new(100_00))
        .await
        .unwrap();
    let obligation_id = schedule(&engine, "alice", 40_00, "bills").await;

    // Make the append step fail after the mark-paid step succeeded.
    let backend = db.get_database_backend();
    db.execute(Statement::from_string(backend, "DROP TABLE ledger_entries"))
        .await
        .unwrap();

    let err = engine.settle("alice", obligation_id).await.unwrap_err();
    assert!(matches!(err, EngineError::SettlementFailed(_)));

    // No stuck in-flight state: the obligation is schedulable again and the
    // balance never moved.
    let upcoming = engine.upcoming("alice").await.unwrap();
    assert_eq!(upcoming.len(), 1);
    assert!(!upcoming[0].is_paid);
    assert!(upcoming[0].paid_at.is_none());
    assert_eq!(
        engine.balance("alice").await.unwrap(),
        MoneyCents::new(100_00)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_settles_pay_at_most_once() {
    let (engine, _db, path) = engine_with_file_db().await;
    let engine = Arc::new(engine);
    engine
        .adjust_balance("alice", MoneyCents::new(100_00))
        .await
        .unwrap();
    let obligation_id = schedule(&engine, "alice", 40_00, "bills").await;

    let mut handles = Vec::new();
    for _ in 0..4 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine.settle("alice", obligation_id).await
        }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(EngineError::AlreadyPaid(_)) => conflicts += 1,
            Err(err) => panic!("unexpected settlement error: {err}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 3);
    assert_eq!(
        engine.balance("alice").await.unwrap(),
        MoneyCents::new(60_00)
    );
    assert_eq!(
        engine.recent_transactions("alice", 10).await.unwrap().len(),
        1
    );

    let _ = std::fs::remove_file(path);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_settles_of_different_obligations_lose_no_debit() {
    let (engine, _db, path) = engine_with_file_db().await;
    let engine = Arc::new(engine);
    engine
        .adjust_balance("alice", MoneyCents::new(100_00))
        .await
        .unwrap();
    let first = schedule(&engine, "alice", 10_00, "bills").await;
    let second = schedule(&engine, "alice", 20_00, "food").await;

    let a = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.settle("alice", first).await })
    };
    let b = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.settle("alice", second).await })
    };
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    assert_eq!(
        engine.balance("alice").await.unwrap(),
        MoneyCents::new(70_00)
    );
    assert_eq!(
        engine.recent_transactions("alice", 10).await.unwrap().len(),
        2
    );

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn ensure_account_never_resets_a_balance() {
    let (engine, _db) = engine_with_db().await;

    let account = engine.ensure_account("alice").await.unwrap();
    assert_eq!(account.balance, MoneyCents::ZERO);

    engine
        .adjust_balance("alice", MoneyCents::new(42_00))
        .await
        .unwrap();

    let account = engine.ensure_account("alice").await.unwrap();
    assert_eq!(account.balance, MoneyCents::new(42_00));
}
