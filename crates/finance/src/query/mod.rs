//! Composable read queries over accounts, expense history and balance
//! snapshots.
//!
//! Every builder is a value: each filter consumes `self` and returns the
//! narrowed query. A filter whose argument is the empty sentinel for its type
//! (`0`, `""`, `None`, an empty slice) returns the builder unchanged, so
//! callers can chain request fields unconditionally.

use sea_orm::{
    QuerySelect,
    sea_query::{LockBehavior, LockType},
};
use serde::{Deserialize, Serialize};

mod balance_history;
mod expense_account;
mod expense_history;

pub use balance_history::BalanceHistoryQuery;
pub use expense_account::ExpenseAccountQuery;
pub use expense_history::ExpenseHistoryQuery;

pub(crate) use expense_account::into_link;

/// Row locking requested for a read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LockMode {
    #[default]
    None,
    /// `FOR UPDATE NOWAIT`: fail with [`FinanceError::Locked`] instead of
    /// queueing behind another transaction.
    ///
    /// [`FinanceError::Locked`]: crate::FinanceError::Locked
    ExclusiveNoWait,
}

impl LockMode {
    pub(crate) fn apply<Q: QuerySelect>(self, query: Q) -> Q {
        match self {
            Self::None => query,
            Self::ExclusiveNoWait => query.lock_with_behavior(LockType::Update, LockBehavior::Nowait),
        }
    }
}

/// Operational / non-operational partition of account links.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountOperationalType {
    Ops,
    NonOps,
}

impl AccountOperationalType {
    pub fn is_ops(self) -> bool {
        matches!(self, Self::Ops)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Disabled,
}

impl AccountStatus {
    pub fn is_disabled(self) -> bool {
        matches!(self, Self::Disabled)
    }
}

/// Sign partition of ledger amounts: income is `>= 0`, outcome is `< 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowType {
    Income,
    Outcome,
}
