//! Expense accounts.
//!
//! An account is identified externally by its `number_id` and is never
//! deleted, only disabled.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseAccount {
    pub id: i64,
    pub account_type_id: i64,
    pub name: String,
    pub number_id: String,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ware_expense_accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub account_type_id: i64,
    pub name: String,
    pub number_id: String,
    pub disabled: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::account_links::Entity")]
    Links,
}

impl Related<super::account_links::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Links.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ExpenseAccount {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            account_type_id: model.account_type_id,
            name: model.name,
            number_id: model.number_id,
            disabled: model.disabled,
            created_at: model.created_at,
        }
    }
}
