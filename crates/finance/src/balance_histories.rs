//! Per-day account balance snapshots.
//!
//! `balance_day` is the calendar day of `at` in the business time zone and is
//! unique per account.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub id: i64,
    pub warehouse_id: i64,
    pub account_id: i64,
    pub created_by_id: i64,
    pub amount: i64,
    pub at: DateTime<Utc>,
    pub balance_day: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ware_balance_account_histories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub warehouse_id: i64,
    pub account_id: i64,
    pub created_by_id: i64,
    pub amount: i64,
    pub at: DateTimeUtc,
    pub balance_day: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expense_accounts::Entity",
        from = "Column::AccountId",
        to = "super::expense_accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Account,
}

impl Related<super::expense_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for BalanceSnapshot {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            warehouse_id: model.warehouse_id,
            account_id: model.account_id,
            created_by_id: model.created_by_id,
            amount: model.amount,
            at: model.at,
            balance_day: model.balance_day,
            created_at: model.created_at,
        }
    }
}
