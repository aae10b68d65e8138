//! Transactional mutation services.
//!
//! Every service borrows a caller-owned [`sea_orm::DatabaseTransaction`];
//! the caller commits on success and drops (rolls back) on any error.

mod balance_history;
mod expense_account;
mod expense_history;
mod transaction_log;

pub use balance_history::BalanceHistoryService;
pub use expense_account::{
    ExpenseAccountService, ExpenseAccountUpdate, LoadedAccount, NewExpenseAccount,
};
pub use expense_history::{ExpenseHistoryService, ExpenseUpdate, NewExpense};
pub use transaction_log::{TransactionLog, transaction_logs};
