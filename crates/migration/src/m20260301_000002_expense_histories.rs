use sea_orm_migration::prelude::*;

use super::m20260301_000001_expense_accounts::WareExpenseAccounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WareExpenseHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WareExpenseHistories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WareExpenseHistories::WarehouseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WareExpenseHistories::AccountId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WareExpenseHistories::CreatedById)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WareExpenseHistories::ExpenseType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WareExpenseHistories::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WareExpenseHistories::Note)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(WareExpenseHistories::At)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WareExpenseHistories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ware_expense_histories-account_id")
                            .from(WareExpenseHistories::Table, WareExpenseHistories::AccountId)
                            .to(WareExpenseAccounts::Table, WareExpenseAccounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ware_expense_histories-warehouse_id-at")
                    .table(WareExpenseHistories::Table)
                    .col(WareExpenseHistories::WarehouseId)
                    .col(WareExpenseHistories::At)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WareBalanceAccountHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WareBalanceAccountHistories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WareBalanceAccountHistories::WarehouseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WareBalanceAccountHistories::AccountId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WareBalanceAccountHistories::CreatedById)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WareBalanceAccountHistories::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WareBalanceAccountHistories::At)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WareBalanceAccountHistories::BalanceDay)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WareBalanceAccountHistories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ware_balance_account_histories-account_id")
                            .from(
                                WareBalanceAccountHistories::Table,
                                WareBalanceAccountHistories::AccountId,
                            )
                            .to(WareExpenseAccounts::Table, WareExpenseAccounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ware_balance_account_histories-account_id-balance_day")
                    .table(WareBalanceAccountHistories::Table)
                    .col(WareBalanceAccountHistories::AccountId)
                    .col(WareBalanceAccountHistories::BalanceDay)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(WareBalanceAccountHistories::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(WareExpenseHistories::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum WareExpenseHistories {
    Table,
    Id,
    WarehouseId,
    AccountId,
    CreatedById,
    ExpenseType,
    Amount,
    Note,
    At,
    CreatedAt,
}

#[derive(Iden)]
enum WareBalanceAccountHistories {
    Table,
    Id,
    WarehouseId,
    AccountId,
    CreatedById,
    Amount,
    At,
    BalanceDay,
    CreatedAt,
}
