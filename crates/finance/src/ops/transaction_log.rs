//! Builder for audit log entries on warehouse transactions.
//!
//! ```ignore
//! let entry = TransactionLog::new(&tx, actor)
//!     .action_type(ActionType::EditPrice)
//!     .before_updated(ActionType::EditPrice, 12000)
//!     .tx_id(1)
//!     .commit()
//!     .await?;
//! ```

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryOrder, prelude::*};
use serde_json::{Map, Value};

use crate::{
    ActionType, Actor, FinanceError, LogEntry, ResultFinance, TxStatus, inv_timestamps,
};

pub struct TransactionLog<'a> {
    db: &'a DatabaseTransaction,
    actor: Actor,
    tx_id: i64,
    action_type: Option<ActionType>,
    status: Option<TxStatus>,
    before_updated: Map<String, Value>,
}

impl<'a> TransactionLog<'a> {
    pub fn new(db: &'a DatabaseTransaction, actor: Actor) -> Self {
        Self {
            db,
            actor,
            tx_id: 0,
            action_type: None,
            status: None,
            before_updated: Map::new(),
        }
    }

    pub fn status(mut self, status: TxStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn action_type(mut self, action_type: ActionType) -> Self {
        self.action_type = Some(action_type);
        self
    }

    pub fn tx_id(mut self, tx_id: i64) -> Self {
        self.tx_id = tx_id;
        self
    }

    /// Records the value a field had before the action, keyed by action.
    pub fn before_updated(mut self, key: ActionType, data: impl Into<Value>) -> Self {
        self.before_updated.insert(key.as_str().to_string(), data.into());
        self
    }

    /// Validates and appends the entry.
    pub async fn commit(self) -> ResultFinance<LogEntry> {
        let action_type = self.action_type.ok_or_else(|| {
            FinanceError::Validation("action_type empty not allowed".to_string())
        })?;
        if self.tx_id == 0 {
            return Err(FinanceError::Validation(
                "tx_id empty not allowed".to_string(),
            ));
        }
        if action_type.requires_before_snapshot() {
            let key = action_type.as_str();
            if matches!(self.before_updated.get(key), None | Some(Value::Null)) {
                return Err(FinanceError::Validation(format!(
                    "before_updated of key {key} is empty"
                )));
            }
        }

        let model = inv_timestamps::ActiveModel {
            id: ActiveValue::NotSet,
            tx_id: ActiveValue::Set(self.tx_id),
            user_id: ActiveValue::Set(self.actor.user_id),
            from_team: ActiveValue::Set(self.actor.team_type.as_str().to_string()),
            action_type: ActiveValue::Set(action_type.as_str().to_string()),
            status: ActiveValue::Set(self.status.map(|status| status.as_str().to_string())),
            before_updated: ActiveValue::Set(Value::Object(self.before_updated)),
            timestamp: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        tracing::info!(
            tx_id = model.tx_id,
            action_type = %model.action_type,
            user_id = model.user_id,
            "transaction log appended"
        );
        LogEntry::try_from(model)
    }
}

/// All log entries of a transaction, oldest first.
pub async fn transaction_logs<C: ConnectionTrait>(db: &C, tx_id: i64) -> ResultFinance<Vec<LogEntry>> {
    inv_timestamps::Entity::find()
        .filter(inv_timestamps::Column::TxId.eq(tx_id))
        .order_by_asc(inv_timestamps::Column::Timestamp)
        .order_by_asc(inv_timestamps::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(LogEntry::try_from)
        .collect()
}
