use axum::{
    Router,
    extract::Request,
    http::{HeaderName, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
};
use chrono_tz::Tz;
use finance::{Actor, TeamType};
use sea_orm::DatabaseConnection;

use std::sync::Arc;

use crate::{ServerError, balances, expense_accounts, expense_histories, transactions};

static USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");
static TEAM_TYPE_HEADER: HeaderName = HeaderName::from_static("x-team-type");
static TEAM_ID_HEADER: HeaderName = HeaderName::from_static("x-team-id");

/// Caller identity resolved by the upstream gateway.
#[derive(Clone, Copy, Debug)]
pub struct Identity {
    pub actor: Actor,
    /// Team owning the caller's warehouse transactions. `0` when the gateway
    /// sent none.
    pub team_id: i64,
}

/// Operations gated by [`PermissionCheck`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Permission {
    ExpenseAccountCreate,
    ExpenseAccountEdit,
    ExpenseAccountView,
    ExpenseAccountDisable,
    ExpenseHistoryCreate,
    ExpenseHistoryEdit,
    ExpenseHistoryView,
    BalanceUpsert,
    BalanceView,
    NoteEdit,
    NoteView,
    TransactionLogAppend,
    TransactionLogView,
}

/// Route-level authorization. Category and warehouse rules stay in the
/// finance core; this only decides whether the caller may reach a route.
pub trait PermissionCheck: Send + Sync {
    fn allowed(&self, identity: &Identity, permission: Permission) -> bool;
}

/// Lets every identified caller through.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl PermissionCheck for AllowAll {
    fn allowed(&self, _identity: &Identity, _permission: Permission) -> bool {
        true
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub permissions: Arc<dyn PermissionCheck>,
    /// Zone used for calendar-day truncation and response offsets.
    pub timezone: Tz,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, timezone: Tz) -> Self {
        Self {
            db,
            permissions: Arc::new(AllowAll),
            timezone,
        }
    }

    pub fn with_permissions(mut self, permissions: Arc<dyn PermissionCheck>) -> Self {
        self.permissions = permissions;
        self
    }

    pub(crate) fn require(
        &self,
        identity: &Identity,
        permission: Permission,
    ) -> Result<(), ServerError> {
        if self.permissions.allowed(identity, permission) {
            return Ok(());
        }
        tracing::debug!(
            user_id = identity.actor.user_id,
            ?permission,
            "route permission refused"
        );
        Err(ServerError::Forbidden(format!(
            "permission denied: {permission:?}"
        )))
    }
}

/// Runs `$body` inside a fresh database transaction, committing only when it
/// returns `Ok`.
macro_rules! with_tx {
    ($state:expr, |$tx:ident| $body:expr) => {{
        let $tx = sea_orm::TransactionTrait::begin(&$state.db).await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

macro_rules! impl_id_header {
    ($name:ident, $header:ident) => {
        #[derive(Debug)]
        struct $name(i64);

        impl Header for $name {
            fn name() -> &'static HeaderName {
                &$header
            }

            fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
            where
                Self: Sized,
                I: Iterator<Item = &'i HeaderValue>,
            {
                let value = values.next().ok_or_else(AxumError::invalid)?;
                let Ok(value) = value.to_str() else {
                    return Err(AxumError::invalid());
                };
                let Ok(value) = value.trim().parse() else {
                    return Err(AxumError::invalid());
                };

                Ok($name(value))
            }

            fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
                values.extend(std::iter::once(HeaderValue::from(self.0)));
            }
        }
    };
}

impl_id_header!(UserIdHeader, USER_ID_HEADER);
impl_id_header!(TeamIdHeader, TEAM_ID_HEADER);

/// `TypedHeader` for the caller's team type, e.g. `x-team-type: warehouse`.
#[derive(Debug)]
struct TeamTypeHeader(TeamType);

impl Header for TeamTypeHeader {
    fn name() -> &'static HeaderName {
        &TEAM_TYPE_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };
        let Ok(team_type) = TeamType::try_from(value.trim()) else {
            return Err(AxumError::invalid());
        };

        Ok(TeamTypeHeader(team_type))
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        values.extend(std::iter::once(HeaderValue::from_static(
            self.0.as_str(),
        )));
    }
}

async fn identify(
    user_id: Option<TypedHeader<UserIdHeader>>,
    team_type: Option<TypedHeader<TeamTypeHeader>>,
    team_id: Option<TypedHeader<TeamIdHeader>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let (Some(TypedHeader(user_id)), Some(TypedHeader(team_type))) = (user_id, team_type) else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if user_id.0 <= 0 {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let identity = Identity {
        actor: Actor::new(user_id.0, team_type.0),
        team_id: team_id.map(|TypedHeader(header)| header.0).unwrap_or(0),
    };
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/expense-accounts", post(expense_accounts::create))
        .route("/expense-accounts/list", post(expense_accounts::list))
        .route(
            "/expense-accounts/{account_id}",
            get(expense_accounts::get).put(expense_accounts::update),
        )
        .route(
            "/expense-accounts/{account_id}/disabled",
            post(expense_accounts::set_disabled),
        )
        .route("/expense-histories", post(expense_histories::create))
        .route("/expense-histories/list", post(expense_histories::list))
        .route(
            "/expense-histories/{hist_id}",
            axum::routing::put(expense_histories::update),
        )
        .route("/balances", post(balances::upsert))
        .route("/balances/list", post(balances::list))
        .route(
            "/transactions/{tx_id}/notes",
            get(transactions::list_notes).post(transactions::replace_notes),
        )
        .route(
            "/transactions/{tx_id}/logs",
            get(transactions::list_logs).post(transactions::append_log),
        )
        .route_layer(middleware::from_fn(identify))
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}
