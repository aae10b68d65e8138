//! Mapping between wire enums and finance core types.

use api_types::{
    expense_account::{AccountStatus as ApiStatus, ExpenseAccountView, OpsType},
    expense_history::{ExpenseCategory as ApiCategory, ExpenseHistoryView, FlowType as ApiFlow},
    balance::BalanceView,
    note::{NoteItem, NoteType as ApiNoteType},
    transaction_log::{ActionType as ApiAction, TransactionLogView, TxStatus as ApiTxStatus},
};
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use finance::{
    AccountLink, AccountOperationalType, AccountStatus, ActionType, BalanceSnapshot,
    ExpenseCategory, ExpenseEntry, FlowType, LogEntry, Note, NoteType, TxStatus,
};

pub(crate) fn local(at: DateTime<Utc>, tz: Tz) -> DateTime<FixedOffset> {
    at.with_timezone(&tz).fixed_offset()
}

pub(crate) fn ops_type(ops: OpsType) -> AccountOperationalType {
    match ops {
        OpsType::Ops => AccountOperationalType::Ops,
        OpsType::NonOps => AccountOperationalType::NonOps,
    }
}

pub(crate) fn account_status(status: ApiStatus) -> AccountStatus {
    match status {
        ApiStatus::Active => AccountStatus::Active,
        ApiStatus::Disabled => AccountStatus::Disabled,
    }
}

pub(crate) fn category(category: ApiCategory) -> ExpenseCategory {
    match category {
        ApiCategory::Equity => ExpenseCategory::Equity,
        ApiCategory::Bank => ExpenseCategory::Bank,
        ApiCategory::BasicSalary => ExpenseCategory::BasicSalary,
        ApiCategory::BonusSalary => ExpenseCategory::BonusSalary,
        ApiCategory::Server => ExpenseCategory::Server,
        ApiCategory::PettyCash => ExpenseCategory::PettyCash,
        ApiCategory::Kitchen => ExpenseCategory::Kitchen,
        ApiCategory::Other => ExpenseCategory::Other,
    }
}

fn map_category(category: ExpenseCategory) -> ApiCategory {
    match category {
        ExpenseCategory::Equity => ApiCategory::Equity,
        ExpenseCategory::Bank => ApiCategory::Bank,
        ExpenseCategory::BasicSalary => ApiCategory::BasicSalary,
        ExpenseCategory::BonusSalary => ApiCategory::BonusSalary,
        ExpenseCategory::Server => ApiCategory::Server,
        ExpenseCategory::PettyCash => ApiCategory::PettyCash,
        ExpenseCategory::Kitchen => ApiCategory::Kitchen,
        ExpenseCategory::Other => ApiCategory::Other,
    }
}

pub(crate) fn flow_type(flow: ApiFlow) -> FlowType {
    match flow {
        ApiFlow::Income => FlowType::Income,
        ApiFlow::Outcome => FlowType::Outcome,
    }
}

pub(crate) fn note_type(note_type: ApiNoteType) -> NoteType {
    match note_type {
        ApiNoteType::Problem => NoteType::Problem,
        ApiNoteType::Common => NoteType::Common,
        ApiNoteType::Broken => NoteType::Broken,
        ApiNoteType::Return => NoteType::Return,
        ApiNoteType::Cancel => NoteType::Cancel,
    }
}

fn map_note_type(note_type: NoteType) -> ApiNoteType {
    match note_type {
        NoteType::Problem => ApiNoteType::Problem,
        NoteType::Common => ApiNoteType::Common,
        NoteType::Broken => ApiNoteType::Broken,
        NoteType::Return => ApiNoteType::Return,
        NoteType::Cancel => ApiNoteType::Cancel,
    }
}

pub(crate) fn action_type(action: ApiAction) -> ActionType {
    match action {
        ApiAction::Create => ActionType::Create,
        ApiAction::Accept => ActionType::Accept,
        ApiAction::EditPrice => ActionType::EditPrice,
        ApiAction::EditProduct => ActionType::EditProduct,
        ApiAction::Cancel => ActionType::Cancel,
    }
}

fn map_action_type(action: ActionType) -> ApiAction {
    match action {
        ActionType::Create => ApiAction::Create,
        ActionType::Accept => ApiAction::Accept,
        ActionType::EditPrice => ApiAction::EditPrice,
        ActionType::EditProduct => ApiAction::EditProduct,
        ActionType::Cancel => ApiAction::Cancel,
    }
}

pub(crate) fn tx_status(status: ApiTxStatus) -> TxStatus {
    match status {
        ApiTxStatus::Pending => TxStatus::Pending,
        ApiTxStatus::Ongoing => TxStatus::Ongoing,
        ApiTxStatus::Completed => TxStatus::Completed,
        ApiTxStatus::Cancelled => TxStatus::Cancelled,
    }
}

fn map_tx_status(status: TxStatus) -> ApiTxStatus {
    match status {
        TxStatus::Pending => ApiTxStatus::Pending,
        TxStatus::Ongoing => ApiTxStatus::Ongoing,
        TxStatus::Completed => ApiTxStatus::Completed,
        TxStatus::Cancelled => ApiTxStatus::Cancelled,
    }
}

pub(crate) fn account_view(link: AccountLink, tz: Tz) -> ExpenseAccountView {
    ExpenseAccountView {
        link_id: link.id,
        account_id: link.account_id,
        warehouse_id: link.warehouse_id,
        account_type_id: link.account.account_type_id,
        name: link.account.name,
        number_id: link.account.number_id,
        is_ops_account: link.is_ops_account,
        disabled: link.account.disabled,
        created_at: local(link.account.created_at, tz),
    }
}

pub(crate) fn expense_view(entry: ExpenseEntry, tz: Tz) -> ExpenseHistoryView {
    ExpenseHistoryView {
        id: entry.id,
        warehouse_id: entry.warehouse_id,
        account_id: entry.account_id,
        created_by_id: entry.created_by_id,
        category: map_category(entry.category),
        amount: entry.amount,
        note: entry.note,
        at: local(entry.at, tz),
        created_at: local(entry.created_at, tz),
    }
}

pub(crate) fn balance_view(snapshot: BalanceSnapshot, tz: Tz) -> BalanceView {
    BalanceView {
        id: snapshot.id,
        warehouse_id: snapshot.warehouse_id,
        account_id: snapshot.account_id,
        created_by_id: snapshot.created_by_id,
        amount: snapshot.amount,
        at: local(snapshot.at, tz),
        balance_day: snapshot.balance_day,
    }
}

pub(crate) fn note_item(note: Note) -> NoteItem {
    NoteItem {
        note_type: map_note_type(note.note_type),
        text: note.text,
    }
}

pub(crate) fn log_view(entry: LogEntry, tz: Tz) -> TransactionLogView {
    TransactionLogView {
        id: entry.id,
        tx_id: entry.tx_id,
        user_id: entry.user_id,
        action_type: map_action_type(entry.action_type),
        status: entry.status.map(map_tx_status),
        before_updated: entry.before_updated,
        timestamp: local(entry.timestamp, tz),
    }
}
