use sea_orm::ConnectionTrait;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Partial index: at most one ops account per warehouse.
const OPS_ACCOUNT_INDEX: &str = "idx-ware_expense_account_warehouses-ops_account";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WareExpenseAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WareExpenseAccounts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WareExpenseAccounts::AccountTypeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WareExpenseAccounts::Name).string().not_null())
                    .col(
                        ColumnDef::new(WareExpenseAccounts::NumberId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WareExpenseAccounts::Disabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(WareExpenseAccounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WareExpenseAccountWarehouses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WareExpenseAccountWarehouses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WareExpenseAccountWarehouses::AccountId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WareExpenseAccountWarehouses::WarehouseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WareExpenseAccountWarehouses::NumberId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WareExpenseAccountWarehouses::IsOpsAccount)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ware_expense_account_warehouses-account_id")
                            .from(
                                WareExpenseAccountWarehouses::Table,
                                WareExpenseAccountWarehouses::AccountId,
                            )
                            .to(WareExpenseAccounts::Table, WareExpenseAccounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ware_expense_account_warehouses-warehouse_id-number_id")
                    .table(WareExpenseAccountWarehouses::Table)
                    .col(WareExpenseAccountWarehouses::WarehouseId)
                    .col(WareExpenseAccountWarehouses::NumberId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ware_expense_account_warehouses-account_id")
                    .table(WareExpenseAccountWarehouses::Table)
                    .col(WareExpenseAccountWarehouses::AccountId)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS \"{OPS_ACCOUNT_INDEX}\" \
                 ON ware_expense_account_warehouses (warehouse_id) \
                 WHERE is_ops_account = TRUE"
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(&format!("DROP INDEX IF EXISTS \"{OPS_ACCOUNT_INDEX}\""))
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(WareExpenseAccountWarehouses::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(WareExpenseAccounts::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
pub enum WareExpenseAccounts {
    Table,
    Id,
    AccountTypeId,
    Name,
    NumberId,
    Disabled,
    CreatedAt,
}

#[derive(Iden)]
enum WareExpenseAccountWarehouses {
    Table,
    Id,
    AccountId,
    WarehouseId,
    NumberId,
    IsOpsAccount,
}
