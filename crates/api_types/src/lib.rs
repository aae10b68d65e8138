use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// A page of results with the number of rows matching the filter.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
}

pub mod expense_account {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum OpsType {
        Ops,
        NonOps,
    }

    /// `active` lists enabled accounts, `disabled` the soft-deleted ones.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AccountStatus {
        Active,
        Disabled,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseAccountNew {
        pub warehouse_id: i64,
        pub account_type_id: i64,
        pub name: String,
        pub number_id: String,
        #[serde(default)]
        pub is_ops_account: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseAccountEdit {
        pub warehouse_id: i64,
        pub account_type_id: i64,
        pub name: String,
        pub number_id: String,
        pub is_ops_account: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseAccountDisable {
        pub warehouse_id: i64,
        pub disabled: bool,
    }

    /// Query string of single-account reads. `0` reads across warehouses.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct WarehouseScope {
        #[serde(default)]
        pub warehouse_id: i64,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct ExpenseAccountList {
        pub warehouse_id: i64,
        pub account_type_id: i64,
        pub name: String,
        pub number_id: String,
        pub ops: Option<OpsType>,
        pub status: Option<AccountStatus>,
        pub page: Option<u64>,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseAccountView {
        pub link_id: i64,
        pub account_id: i64,
        pub warehouse_id: i64,
        pub account_type_id: i64,
        pub name: String,
        pub number_id: String,
        pub is_ops_account: bool,
        pub disabled: bool,
        pub created_at: DateTime<FixedOffset>,
    }
}

pub mod expense_history {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ExpenseCategory {
        Equity,
        Bank,
        BasicSalary,
        BonusSalary,
        Server,
        PettyCash,
        Kitchen,
        Other,
    }

    /// `income` is a non-negative amount, `outcome` a negative one.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum FlowType {
        Income,
        Outcome,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseHistoryNew {
        pub warehouse_id: i64,
        pub account_id: i64,
        pub category: ExpenseCategory,
        pub amount: i64,
        #[serde(default)]
        pub note: String,
        /// RFC3339 timestamp, including timezone offset.
        pub at: DateTime<FixedOffset>,
    }

    /// `warehouse_id` and `account_id` keep the stored value when `0`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseHistoryEdit {
        #[serde(default)]
        pub warehouse_id: i64,
        #[serde(default)]
        pub account_id: i64,
        pub category: ExpenseCategory,
        pub amount: i64,
        #[serde(default)]
        pub note: String,
        pub at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct ExpenseHistoryList {
        pub warehouse_id: i64,
        pub account_id: i64,
        pub created_by: i64,
        pub categories: Vec<ExpenseCategory>,
        /// Inclusive local calendar days on the creation time.
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub flow_type: Option<FlowType>,
        pub ops: Option<super::expense_account::OpsType>,
        pub page: Option<u64>,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseHistoryView {
        pub id: i64,
        pub warehouse_id: i64,
        pub account_id: i64,
        pub created_by_id: i64,
        pub category: ExpenseCategory,
        pub amount: i64,
        pub note: String,
        pub at: DateTime<FixedOffset>,
        pub created_at: DateTime<FixedOffset>,
    }
}

pub mod balance {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceUpsert {
        pub account_id: i64,
        pub amount: i64,
        pub at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct BalanceList {
        pub warehouse_id: i64,
        pub account_id: i64,
        /// Inclusive local calendar days on the balance time.
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
        pub page: Option<u64>,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub id: i64,
        pub warehouse_id: i64,
        pub account_id: i64,
        pub created_by_id: i64,
        pub amount: i64,
        pub at: DateTime<FixedOffset>,
        pub balance_day: NaiveDate,
    }
}

pub mod note {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum NoteType {
        Problem,
        Common,
        Broken,
        Return,
        Cancel,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NoteItem {
        #[serde(rename = "type")]
        pub note_type: NoteType,
        pub text: String,
    }

    /// Admin callers pick the owning team with `team_id`; everyone else is
    /// bound to their own team.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct NotesReplace {
        #[serde(default)]
        pub team_id: i64,
        pub order_id: Option<i64>,
        pub notes: Vec<NoteItem>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NotesCreated {
        pub ids: Vec<i64>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct NotesQuery {
        pub team_id: i64,
        pub order_id: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NotesResponse {
        pub notes: Vec<NoteItem>,
    }
}

pub mod transaction_log {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ActionType {
        Create,
        Accept,
        EditPrice,
        EditProduct,
        Cancel,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TxStatus {
        Pending,
        Ongoing,
        Completed,
        Cancelled,
    }

    /// One prior value, keyed by the action that replaced it.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BeforeUpdated {
        pub key: ActionType,
        pub data: serde_json::Value,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionLogNew {
        pub action_type: Option<ActionType>,
        pub status: Option<TxStatus>,
        #[serde(default)]
        pub before_updated: Vec<BeforeUpdated>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionLogView {
        pub id: i64,
        pub tx_id: i64,
        pub user_id: i64,
        pub action_type: ActionType,
        pub status: Option<TxStatus>,
        pub before_updated: serde_json::Map<String, serde_json::Value>,
        pub timestamp: DateTime<FixedOffset>,
    }
}
