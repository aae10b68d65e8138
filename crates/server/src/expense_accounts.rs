//! Expense account API endpoints

use api_types::{
    ListResponse,
    expense_account::{
        ExpenseAccountDisable, ExpenseAccountEdit, ExpenseAccountList, ExpenseAccountNew,
        ExpenseAccountView, WarehouseScope,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use finance::{
    ExpenseAccountService, ExpenseAccountUpdate, LockMode, NewExpenseAccount,
    reports::{self, ExpenseAccountFilter, Page},
};

use crate::{
    ServerError, convert, require_id,
    server::{Identity, Permission, ServerState, with_tx},
};

pub async fn create(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseAccountNew>,
) -> Result<(StatusCode, Json<ExpenseAccountView>), ServerError> {
    state.require(&identity, Permission::ExpenseAccountCreate)?;

    let loaded = with_tx!(state, |tx| {
        ExpenseAccountService::new(&tx, payload.warehouse_id)
            .create(NewExpenseAccount {
                account_type_id: payload.account_type_id,
                name: payload.name,
                number_id: payload.number_id,
                is_ops_account: payload.is_ops_account,
            })
            .await
    })?;

    Ok((
        StatusCode::CREATED,
        Json(convert::account_view(loaded.into_link(), state.timezone)),
    ))
}

pub async fn get(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(account_id): Path<i64>,
    Query(scope): Query<WarehouseScope>,
) -> Result<Json<ExpenseAccountView>, ServerError> {
    state.require(&identity, Permission::ExpenseAccountView)?;
    let account_id = require_id(account_id, "account id")?;

    let link = with_tx!(state, |tx| {
        ExpenseAccountService::new(&tx, scope.warehouse_id)
            .get(account_id)
            .await
    })?;

    Ok(Json(convert::account_view(link, state.timezone)))
}

pub async fn update(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(account_id): Path<i64>,
    Json(payload): Json<ExpenseAccountEdit>,
) -> Result<Json<ExpenseAccountView>, ServerError> {
    state.require(&identity, Permission::ExpenseAccountEdit)?;
    let account_id = require_id(account_id, "account id")?;

    let loaded = with_tx!(state, |tx| {
        async {
            let service = ExpenseAccountService::new(&tx, payload.warehouse_id);
            let loaded = service
                .load(LockMode::ExclusiveNoWait, |query| query.from_account(account_id))
                .await?;
            service
                .update(
                    loaded,
                    ExpenseAccountUpdate {
                        account_type_id: payload.account_type_id,
                        name: payload.name,
                        number_id: payload.number_id,
                        is_ops_account: payload.is_ops_account,
                    },
                )
                .await
        }
        .await
    })?;

    Ok(Json(convert::account_view(loaded.into_link(), state.timezone)))
}

pub async fn set_disabled(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Path(account_id): Path<i64>,
    Json(payload): Json<ExpenseAccountDisable>,
) -> Result<Json<ExpenseAccountView>, ServerError> {
    state.require(&identity, Permission::ExpenseAccountDisable)?;
    let account_id = require_id(account_id, "account id")?;

    let loaded = with_tx!(state, |tx| {
        async {
            let service = ExpenseAccountService::new(&tx, payload.warehouse_id);
            let loaded = service
                .load(LockMode::ExclusiveNoWait, |query| query.from_account(account_id))
                .await?;
            service.set_disabled(loaded, payload.disabled).await
        }
        .await
    })?;

    Ok(Json(convert::account_view(loaded.into_link(), state.timezone)))
}

pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseAccountList>,
) -> Result<Json<ListResponse<ExpenseAccountView>>, ServerError> {
    state.require(&identity, Permission::ExpenseAccountView)?;

    let filter = ExpenseAccountFilter {
        warehouse_id: payload.warehouse_id,
        account_type_id: payload.account_type_id,
        name: payload.name,
        number_id: payload.number_id,
        ops: payload.ops.map(convert::ops_type),
        status: payload.status.map(convert::account_status),
    };
    let page = page_of(payload.page, payload.limit);
    let paged = reports::list_expense_accounts(&state.db, &filter, page).await?;

    Ok(Json(ListResponse {
        items: paged
            .items
            .into_iter()
            .map(|link| convert::account_view(link, state.timezone))
            .collect(),
        total: paged.total,
    }))
}

pub(crate) fn page_of(page: Option<u64>, limit: Option<u64>) -> Page {
    let default = Page::default();
    Page {
        page: page.unwrap_or(default.page),
        limit: limit.unwrap_or(default.limit),
    }
}
