//! Warehouse transaction notes and audit log endpoints

use api_types::{
    note::{NotesCreated, NotesQuery, NotesReplace, NotesResponse},
    transaction_log::{TransactionLogNew, TransactionLogView},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use finance::{
    TransactionLog,
    notes::{self, NoteInput},
    transaction_logs,
};

use crate::{
    ServerError, convert, require_id,
    server::{Identity, Permission, ServerState, with_tx},
};

/// Admin callers may act on another team's transaction; everyone else is
/// bound to the team the gateway resolved.
fn owning_team(identity: &Identity, requested: i64) -> Result<i64, ServerError> {
    let team_id = if identity.actor.team_type.is_elevated() && requested != 0 {
        requested
    } else {
        identity.team_id
    };
    if team_id <= 0 {
        return Err(ServerError::Generic("team id is required".to_string()));
    }
    Ok(team_id)
}

pub async fn replace_notes(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(tx_id): Path<i64>,
    Json(payload): Json<NotesReplace>,
) -> Result<(StatusCode, Json<NotesCreated>), ServerError> {
    state.require(&identity, Permission::NoteEdit)?;
    let tx_id = require_id(tx_id, "transaction id")?;
    let team_id = owning_team(&identity, payload.team_id)?;

    let inputs = payload
        .notes
        .into_iter()
        .map(|note| NoteInput {
            note_type: convert::note_type(note.note_type),
            text: note.text,
        })
        .collect();
    let ids = with_tx!(state, |tx| {
        notes::replace_common_notes(&tx, tx_id, team_id, payload.order_id, inputs).await
    })?;

    Ok((StatusCode::CREATED, Json(NotesCreated { ids })))
}

pub async fn list_notes(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(tx_id): Path<i64>,
    Query(query): Query<NotesQuery>,
) -> Result<Json<NotesResponse>, ServerError> {
    state.require(&identity, Permission::NoteView)?;
    let tx_id = require_id(tx_id, "transaction id")?;
    let team_id = owning_team(&identity, query.team_id)?;

    let notes = notes::list_notes(&state.db, tx_id, team_id, query.order_id).await?;

    Ok(Json(NotesResponse {
        notes: notes.into_iter().map(convert::note_item).collect(),
    }))
}

pub async fn append_log(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(tx_id): Path<i64>,
    Json(payload): Json<TransactionLogNew>,
) -> Result<(StatusCode, Json<TransactionLogView>), ServerError> {
    state.require(&identity, Permission::TransactionLogAppend)?;

    let entry = with_tx!(state, |tx| {
        let mut log = TransactionLog::new(&tx, identity.actor).tx_id(tx_id);
        if let Some(action_type) = payload.action_type {
            log = log.action_type(convert::action_type(action_type));
        }
        if let Some(status) = payload.status {
            log = log.status(convert::tx_status(status));
        }
        for before in payload.before_updated {
            log = log.before_updated(convert::action_type(before.key), before.data);
        }
        log.commit().await
    })?;

    Ok((
        StatusCode::CREATED,
        Json(convert::log_view(entry, state.timezone)),
    ))
}

pub async fn list_logs(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(tx_id): Path<i64>,
) -> Result<Json<Vec<TransactionLogView>>, ServerError> {
    state.require(&identity, Permission::TransactionLogView)?;
    let tx_id = require_id(tx_id, "transaction id")?;

    let entries = transaction_logs(&state.db, tx_id).await?;

    Ok(Json(
        entries
            .into_iter()
            .map(|entry| convert::log_view(entry, state.timezone))
            .collect(),
    ))
}
