//! Association between an expense account and the warehouse that owns it.
//!
//! `number_id` mirrors the account's number so storage can enforce
//! `(warehouse_id, number_id)` uniqueness without a join.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::expense_accounts::ExpenseAccount;

/// A link with its account loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLink {
    pub id: i64,
    pub account_id: i64,
    pub warehouse_id: i64,
    pub is_ops_account: bool,
    pub account: ExpenseAccount,
}

impl AccountLink {
    pub(crate) fn from_models(link: Model, account: super::expense_accounts::Model) -> Self {
        Self {
            id: link.id,
            account_id: link.account_id,
            warehouse_id: link.warehouse_id,
            is_ops_account: link.is_ops_account,
            account: account.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ware_expense_account_warehouses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub account_id: i64,
    pub warehouse_id: i64,
    pub number_id: String,
    pub is_ops_account: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expense_accounts::Entity",
        from = "Column::AccountId",
        to = "super::expense_accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Account,
}

impl Related<super::expense_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
