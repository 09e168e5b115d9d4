pub use sea_orm_migration::prelude::*;

mod m20260605_120000_accounts;
mod m20260605_121000_ledger_entries;
mod m20260605_122000_scheduled_obligations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260605_120000_accounts::Migration),
            Box::new(m20260605_121000_ledger_entries::Migration),
            Box::new(m20260605_122000_scheduled_obligations::Migration),
        ]
    }
}
