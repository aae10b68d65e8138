pub use sea_orm_migration::prelude::*;

mod m20260301_000001_expense_accounts;
mod m20260301_000002_expense_histories;
mod m20260301_000003_inv_transactions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_expense_accounts::Migration),
            Box::new(m20260301_000002_expense_histories::Migration),
            Box::new(m20260301_000003_inv_transactions::Migration),
        ]
    }
}
