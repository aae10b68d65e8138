use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InvTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvTransactions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InvTransactions::TeamId).big_integer().not_null())
                    .col(
                        ColumnDef::new(InvTransactions::WarehouseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InvTransactions::Status).string().not_null())
                    .col(
                        ColumnDef::new(InvTransactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InvNotes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvNotes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InvNotes::InvTransactionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InvNotes::OrderId).big_integer())
                    .col(ColumnDef::new(InvNotes::NoteType).string().not_null())
                    .col(ColumnDef::new(InvNotes::NoteText).text().not_null())
                    .col(
                        ColumnDef::new(InvNotes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-inv_notes-inv_transaction_id")
                            .from(InvNotes::Table, InvNotes::InvTransactionId)
                            .to(InvTransactions::Table, InvTransactions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-inv_notes-inv_transaction_id")
                    .table(InvNotes::Table)
                    .col(InvNotes::InvTransactionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InvTimestamps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvTimestamps::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InvTimestamps::TxId).big_integer().not_null())
                    .col(ColumnDef::new(InvTimestamps::UserId).big_integer().not_null())
                    .col(ColumnDef::new(InvTimestamps::FromTeam).string().not_null())
                    .col(ColumnDef::new(InvTimestamps::ActionType).string().not_null())
                    .col(ColumnDef::new(InvTimestamps::Status).string())
                    .col(ColumnDef::new(InvTimestamps::BeforeUpdated).json().not_null())
                    .col(
                        ColumnDef::new(InvTimestamps::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-inv_timestamps-tx_id")
                    .table(InvTimestamps::Table)
                    .col(InvTimestamps::TxId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InvTimestamps::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InvNotes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InvTransactions::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum InvTransactions {
    Table,
    Id,
    TeamId,
    WarehouseId,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum InvNotes {
    Table,
    Id,
    InvTransactionId,
    OrderId,
    NoteType,
    NoteText,
    CreatedAt,
}

#[derive(Iden)]
enum InvTimestamps {
    Table,
    Id,
    TxId,
    UserId,
    FromTeam,
    ActionType,
    Status,
    BeforeUpdated,
    Timestamp,
}
