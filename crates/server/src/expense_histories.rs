//! Expense ledger API endpoints

use api_types::{
    ListResponse,
    expense_history::{ExpenseHistoryEdit, ExpenseHistoryList, ExpenseHistoryNew, ExpenseHistoryView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use finance::{
    ExpenseHistoryService, ExpenseUpdate, NewExpense,
    reports::{self, ExpenseHistoryFilter},
};

use crate::{
    ServerError, convert,
    expense_accounts::page_of,
    require_id,
    server::{Identity, Permission, ServerState, with_tx},
};

pub async fn create(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseHistoryNew>,
) -> Result<(StatusCode, Json<ExpenseHistoryView>), ServerError> {
    state.require(&identity, Permission::ExpenseHistoryCreate)?;

    let entry = with_tx!(state, |tx| {
        async {
            let service = ExpenseHistoryService::new(&tx, identity.actor);
            let account = service
                .get_account(payload.account_id, payload.warehouse_id)
                .await?;
            service
                .create(
                    &account,
                    NewExpense {
                        category: convert::category(payload.category),
                        at: payload.at.with_timezone(&Utc),
                        amount: payload.amount,
                        note: payload.note,
                    },
                )
                .await
        }
        .await
    })?;

    Ok((
        StatusCode::CREATED,
        Json(convert::expense_view(entry, state.timezone)),
    ))
}

pub async fn update(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(hist_id): Path<i64>,
    Json(payload): Json<ExpenseHistoryEdit>,
) -> Result<Json<ExpenseHistoryView>, ServerError> {
    state.require(&identity, Permission::ExpenseHistoryEdit)?;
    let hist_id = require_id(hist_id, "history id")?;

    let entry = with_tx!(state, |tx| {
        async {
            let service = ExpenseHistoryService::new(&tx, identity.actor);
            let entry = service.get_expense(hist_id).await?;
            service
                .update(
                    entry,
                    ExpenseUpdate {
                        warehouse_id: payload.warehouse_id,
                        account_id: payload.account_id,
                        category: convert::category(payload.category),
                        amount: payload.amount,
                        at: payload.at.with_timezone(&Utc),
                        note: payload.note,
                    },
                )
                .await
        }
        .await
    })?;

    Ok(Json(convert::expense_view(entry, state.timezone)))
}

pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseHistoryList>,
) -> Result<Json<ListResponse<ExpenseHistoryView>>, ServerError> {
    state.require(&identity, Permission::ExpenseHistoryView)?;

    let filter = ExpenseHistoryFilter {
        warehouse_id: payload.warehouse_id,
        account_id: payload.account_id,
        created_by: payload.created_by,
        categories: payload
            .categories
            .into_iter()
            .map(convert::category)
            .collect(),
        start_date: payload.start_date,
        end_date: payload.end_date,
        flow_type: payload.flow_type.map(convert::flow_type),
        ops: payload.ops.map(convert::ops_type),
    };
    let page = page_of(payload.page, payload.limit);
    let paged =
        reports::list_expense_histories(&state.db, &filter, page, state.timezone).await?;

    Ok(Json(ListResponse {
        items: paged
            .items
            .into_iter()
            .map(|entry| convert::expense_view(entry, state.timezone))
            .collect(),
        total: paged.total,
    }))
}
