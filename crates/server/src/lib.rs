use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::IntoResponse,
};
use finance::FinanceError;
use sea_orm::DbErr;

use serde::Serialize;
pub use server::{
    AllowAll, Identity, Permission, PermissionCheck, ServerState, router, run_with_listener,
};

mod balances;
mod convert;
mod expense_accounts;
mod expense_histories;
mod server;
mod transactions;

pub mod types {
    pub mod expense_account {
        pub use api_types::expense_account::{
            AccountStatus, ExpenseAccountDisable, ExpenseAccountEdit, ExpenseAccountList,
            ExpenseAccountNew, ExpenseAccountView, OpsType, WarehouseScope,
        };
    }

    pub mod expense_history {
        pub use api_types::expense_history::{
            ExpenseCategory, ExpenseHistoryEdit, ExpenseHistoryList, ExpenseHistoryNew,
            ExpenseHistoryView, FlowType,
        };
    }

    pub mod balance {
        pub use api_types::balance::{BalanceList, BalanceUpsert, BalanceView};
    }

    pub mod note {
        pub use api_types::note::{NoteItem, NoteType, NotesCreated, NotesQuery, NotesReplace, NotesResponse};
    }

    pub mod transaction_log {
        pub use api_types::transaction_log::{
            ActionType, BeforeUpdated, TransactionLogNew, TransactionLogView, TxStatus,
        };
    }

    pub use api_types::ListResponse;
}

pub enum ServerError {
    Finance(FinanceError),
    Forbidden(String),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_finance_error(err: &FinanceError) -> StatusCode {
    match err {
        FinanceError::NotFound(_) => StatusCode::NOT_FOUND,
        FinanceError::AlreadyExists(_) | FinanceError::Conflict(_) => StatusCode::CONFLICT,
        FinanceError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        FinanceError::InvalidState(_) => StatusCode::PRECONDITION_FAILED,
        FinanceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        FinanceError::Locked(_) => StatusCode::LOCKED,
        FinanceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_finance_error(err: FinanceError) -> String {
    match err {
        FinanceError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let retryable = matches!(&self, ServerError::Finance(err) if err.is_retryable());
        let (status, error) = match self {
            ServerError::Finance(err) => (
                status_for_finance_error(&err),
                message_for_finance_error(err),
            ),
            ServerError::Forbidden(err) => (StatusCode::FORBIDDEN, err),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        let mut response = (status, Json(Error { error })).into_response();
        if retryable {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from_static("1"));
        }
        response
    }
}

impl From<FinanceError> for ServerError {
    fn from(value: FinanceError) -> Self {
        Self::Finance(value)
    }
}

impl From<DbErr> for ServerError {
    fn from(value: DbErr) -> Self {
        Self::Finance(FinanceError::from(value))
    }
}

/// Path ids are never the "any" sentinel.
fn require_id(id: i64, label: &str) -> Result<i64, ServerError> {
    if id <= 0 {
        return Err(ServerError::Generic(format!("{label} must be positive")));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: FinanceError) -> StatusCode {
        ServerError::from(err).into_response().status()
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            status_of(FinanceError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn duplicates_map_to_409() {
        assert_eq!(
            status_of(FinanceError::AlreadyExists("x".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(FinanceError::Conflict("x".to_string())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn permission_denied_maps_to_403() {
        assert_eq!(
            status_of(FinanceError::PermissionDenied("x".to_string())),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn invalid_state_maps_to_412() {
        assert_eq!(
            status_of(FinanceError::InvalidState("x".to_string())),
            StatusCode::PRECONDITION_FAILED
        );
    }

    #[test]
    fn validation_maps_to_422() {
        assert_eq!(
            status_of(FinanceError::Validation("x".to_string())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn locked_maps_to_423() {
        assert_eq!(
            status_of(FinanceError::Locked("x".to_string())),
            StatusCode::LOCKED
        );
    }

    #[test]
    fn locked_response_asks_client_to_retry() {
        let res = ServerError::from(FinanceError::Locked("x".to_string())).into_response();
        assert_eq!(
            res.headers().get(RETRY_AFTER),
            Some(&HeaderValue::from_static("1"))
        );

        let res = ServerError::from(FinanceError::Conflict("x".to_string())).into_response();
        assert!(res.headers().get(RETRY_AFTER).is_none());
    }

    #[test]
    fn database_maps_to_500() {
        let res = ServerError::from(DbErr::Custom("boom".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn zero_path_id_is_rejected() {
        assert!(require_id(0, "account id").is_err());
        assert_eq!(require_id(7, "account id").ok(), Some(7));
    }
}
