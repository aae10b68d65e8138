//! Free-text notes attached to a warehouse transaction.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::FinanceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteType {
    Problem,
    Common,
    Broken,
    Return,
    Cancel,
}

impl NoteType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Problem => "problem",
            Self::Common => "common",
            Self::Broken => "broken",
            Self::Return => "return",
            Self::Cancel => "cancel",
        }
    }
}

impl TryFrom<&str> for NoteType {
    type Error = FinanceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "problem" => Ok(Self::Problem),
            "common" => Ok(Self::Common),
            "broken" => Ok(Self::Broken),
            "return" => Ok(Self::Return),
            "cancel" => Ok(Self::Cancel),
            other => Err(FinanceError::Validation(format!(
                "note type not supported: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub tx_id: i64,
    pub order_id: Option<i64>,
    pub note_type: NoteType,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "inv_notes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub inv_transaction_id: i64,
    pub order_id: Option<i64>,
    pub note_type: String,
    pub note_text: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inv_transactions::Entity",
        from = "Column::InvTransactionId",
        to = "super::inv_transactions::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Transaction,
}

impl Related<super::inv_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Note {
    type Error = FinanceError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            tx_id: model.inv_transaction_id,
            order_id: model.order_id,
            note_type: NoteType::try_from(model.note_type.as_str())?,
            text: model.note_text,
            created_at: model.created_at,
        })
    }
}
