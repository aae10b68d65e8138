//! Notes attached to warehouse transactions.
//!
//! Only COMMON notes are editable here; other note types are written by the
//! inbound/outbound flows and are listed alongside.

use chrono::Utc;
use sea_orm::{ActiveValue, ConnectionTrait, DatabaseTransaction, QueryOrder, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{FinanceError, Note, NoteType, ResultFinance, inv_notes, inv_transactions};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteInput {
    pub note_type: NoteType,
    pub text: String,
}

async fn owned_transaction<C: ConnectionTrait>(
    db: &C,
    tx_id: i64,
    team_id: i64,
) -> ResultFinance<inv_transactions::Model> {
    inv_transactions::Entity::find_by_id(tx_id)
        .filter(inv_transactions::Column::TeamId.eq(team_id))
        .one(db)
        .await?
        .ok_or_else(|| FinanceError::NotFound(format!("transaction {tx_id}")))
}

/// Replaces the COMMON notes of a team's transaction and returns the ids of
/// the inserted notes.
///
/// With `order_id` only the notes of that order are replaced. Notes of any
/// other type in `notes` are skipped.
pub async fn replace_common_notes(
    db: &DatabaseTransaction,
    tx_id: i64,
    team_id: i64,
    order_id: Option<i64>,
    notes: Vec<NoteInput>,
) -> ResultFinance<Vec<i64>> {
    let transaction = owned_transaction(db, tx_id, team_id).await?;

    let mut delete = inv_notes::Entity::delete_many()
        .filter(inv_notes::Column::InvTransactionId.eq(transaction.id))
        .filter(inv_notes::Column::NoteType.eq(NoteType::Common.as_str()));
    if let Some(order_id) = order_id {
        delete = delete.filter(inv_notes::Column::OrderId.eq(order_id));
    }
    let removed = delete.exec(db).await?.rows_affected;

    let now = Utc::now();
    let mut ids = Vec::new();
    for note in notes
        .into_iter()
        .filter(|note| note.note_type == NoteType::Common)
    {
        let model = inv_notes::ActiveModel {
            id: ActiveValue::NotSet,
            inv_transaction_id: ActiveValue::Set(transaction.id),
            order_id: ActiveValue::Set(order_id),
            note_type: ActiveValue::Set(note.note_type.as_str().to_string()),
            note_text: ActiveValue::Set(note.text),
            created_at: ActiveValue::Set(now),
        }
        .insert(db)
        .await?;
        ids.push(model.id);
    }

    tracing::info!(tx_id, removed, inserted = ids.len(), "transaction notes replaced");
    Ok(ids)
}

/// Notes of a team's transaction, optionally narrowed to one order.
pub async fn list_notes<C: ConnectionTrait>(
    db: &C,
    tx_id: i64,
    team_id: i64,
    order_id: Option<i64>,
) -> ResultFinance<Vec<Note>> {
    let transaction = owned_transaction(db, tx_id, team_id).await?;

    let mut select = inv_notes::Entity::find()
        .filter(inv_notes::Column::InvTransactionId.eq(transaction.id));
    if let Some(order_id) = order_id {
        select = select.filter(inv_notes::Column::OrderId.eq(order_id));
    }
    select
        .order_by_asc(inv_notes::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(Note::try_from)
        .collect()
}
