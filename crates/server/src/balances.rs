//! Balance snapshot API endpoints

use api_types::{
    ListResponse,
    balance::{BalanceList, BalanceUpsert, BalanceView},
};
use axum::{Extension, Json, extract::State};
use chrono::Utc;
use finance::{
    BalanceHistoryService,
    reports::{self, BalanceHistoryFilter},
};

use crate::{
    ServerError, convert,
    expense_accounts::page_of,
    server::{Identity, Permission, ServerState, with_tx},
};

pub async fn upsert(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Json(payload): Json<BalanceUpsert>,
) -> Result<Json<BalanceView>, ServerError> {
    state.require(&identity, Permission::BalanceUpsert)?;

    let snapshot = with_tx!(state, |tx| {
        BalanceHistoryService::new(&tx, identity.actor)
            .with_timezone(state.timezone)
            .upsert(payload.account_id, payload.amount, payload.at.with_timezone(&Utc))
            .await
    })?;

    Ok(Json(convert::balance_view(snapshot, state.timezone)))
}

pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Json(payload): Json<BalanceList>,
) -> Result<Json<ListResponse<BalanceView>>, ServerError> {
    state.require(&identity, Permission::BalanceView)?;

    let filter = BalanceHistoryFilter {
        warehouse_id: payload.warehouse_id,
        account_id: payload.account_id,
        start_date: payload.start_date,
        end_date: payload.end_date,
    };
    let page = page_of(payload.page, payload.limit);
    let paged =
        reports::list_balance_histories(&state.db, &filter, page, state.timezone).await?;

    Ok(Json(ListResponse {
        items: paged
            .items
            .into_iter()
            .map(|snapshot| convert::balance_view(snapshot, state.timezone))
            .collect(),
        total: paged.total,
    }))
}
