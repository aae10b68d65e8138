//! Warehouse finance core: expense accounts, the expense ledger, per-day
//! balance snapshots and the audit trail of warehouse transactions.

pub use account_links::AccountLink;
pub use actor::{Actor, TeamType};
pub use balance_histories::BalanceSnapshot;
pub use category::{ExpenseCategory, can_create_expense};
pub use error::FinanceError;
pub use expense_accounts::ExpenseAccount;
pub use expense_histories::ExpenseEntry;
pub use inv_notes::{Note, NoteType};
pub use inv_timestamps::{ActionType, LogEntry, TxStatus};
pub use ops::{
    BalanceHistoryService, ExpenseAccountService, ExpenseAccountUpdate, ExpenseHistoryService,
    ExpenseUpdate, LoadedAccount, NewExpense, NewExpenseAccount, TransactionLog,
    transaction_logs,
};
pub use query::{
    AccountOperationalType, AccountStatus, BalanceHistoryQuery, ExpenseAccountQuery,
    ExpenseHistoryQuery, FlowType, LockMode,
};
pub use util::{DEFAULT_TIMEZONE, day_bounds, local_day, parse_timezone};

pub mod account_links;
pub mod balance_histories;
pub mod expense_accounts;
pub mod expense_histories;
pub mod inv_notes;
pub mod inv_timestamps;
pub mod inv_transactions;
pub mod notes;
pub mod query;
pub mod reports;

mod actor;
mod category;
mod error;
mod ops;
mod util;

pub type ResultFinance<T> = Result<T, FinanceError>;
