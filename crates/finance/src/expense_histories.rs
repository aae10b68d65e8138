//! Expense ledger entries.

use chrono::{DateTime, Utc};
use sea_orm::{
    entity::prelude::*,
    sea_query::{Expr, IntoCondition},
};
use serde::{Deserialize, Serialize};

use crate::{ExpenseCategory, FinanceError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub id: i64,
    pub warehouse_id: i64,
    pub account_id: i64,
    pub created_by_id: i64,
    pub category: ExpenseCategory,
    pub amount: i64,
    pub note: String,
    pub at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ware_expense_histories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub warehouse_id: i64,
    pub account_id: i64,
    pub created_by_id: i64,
    pub expense_type: String,
    pub amount: i64,
    pub note: String,
    pub at: DateTimeUtc,
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
    #[sea_orm(
        belongs_to = "super::account_links::Entity",
        from = "Column::AccountId",
        to = "super::account_links::Column::AccountId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    AccountLink,
}

impl Relation {
    /// Joins the link of the entry's own warehouse, not just any link of the
    /// account.
    pub(crate) fn warehouse_link() -> RelationDef {
        Self::AccountLink.def().on_condition(|left, right| {
            Expr::col((left, Column::WarehouseId))
                .equals((right, super::account_links::Column::WarehouseId))
                .into_condition()
        })
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for ExpenseEntry {
    type Error = FinanceError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            warehouse_id: model.warehouse_id,
            account_id: model.account_id,
            created_by_id: model.created_by_id,
            category: ExpenseCategory::try_from(model.expense_type.as_str())?,
            amount: model.amount,
            note: model.note,
            at: model.at,
            created_at: model.created_at,
        })
    }
}
