//! Append-only audit trail of state-changing actions on warehouse
//! transactions.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{FinanceError, TeamType};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Create,
    Accept,
    EditPrice,
    EditProduct,
    Cancel,
}

impl ActionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Accept => "accept",
            Self::EditPrice => "edit_price",
            Self::EditProduct => "edit_product",
            Self::Cancel => "cancel",
        }
    }

    /// Actions whose log entry is meaningless without the prior value.
    pub fn requires_before_snapshot(self) -> bool {
        matches!(self, Self::EditPrice)
    }
}

impl TryFrom<&str> for ActionType {
    type Error = FinanceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "create" => Ok(Self::Create),
            "accept" => Ok(Self::Accept),
            "edit_price" => Ok(Self::EditPrice),
            "edit_product" => Ok(Self::EditProduct),
            "cancel" => Ok(Self::Cancel),
            other => Err(FinanceError::Validation(format!(
                "invalid action type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    Pending,
    Ongoing,
    Completed,
    Cancelled,
}

impl TxStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for TxStatus {
    type Error = FinanceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "ongoing" => Ok(Self::Ongoing),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(FinanceError::Validation(format!(
                "invalid transaction status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub tx_id: i64,
    pub user_id: i64,
    pub from_team: TeamType,
    pub action_type: ActionType,
    pub status: Option<TxStatus>,
    pub before_updated: serde_json::Map<String, serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "inv_timestamps")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tx_id: i64,
    pub user_id: i64,
    pub from_team: String,
    pub action_type: String,
    pub status: Option<String>,
    pub before_updated: Json,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for LogEntry {
    type Error = FinanceError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let before_updated = match model.before_updated {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => serde_json::Map::new(),
            other => {
                return Err(FinanceError::Validation(format!(
                    "before_updated must be an object, got {other}"
                )));
            }
        };
        Ok(Self {
            id: model.id,
            tx_id: model.tx_id,
            user_id: model.user_id,
            from_team: TeamType::try_from(model.from_team.as_str())?,
            action_type: ActionType::try_from(model.action_type.as_str())?,
            status: model.status.as_deref().map(TxStatus::try_from).transpose()?,
            before_updated,
            timestamp: model.timestamp,
        })
    }
}
