use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DatabaseTransaction, prelude::*};

use crate::{
    AccountLink, Actor, ExpenseCategory, ExpenseEntry, FinanceError, ResultFinance,
    actor::require_elevated,
    can_create_expense, expense_histories,
    query::{ExpenseAccountQuery, ExpenseHistoryQuery, LockMode},
};

/// A new ledger entry. Positive amounts are income, negative are outcome.
#[derive(Clone, Debug)]
pub struct NewExpense {
    pub category: ExpenseCategory,
    pub at: DateTime<Utc>,
    pub amount: i64,
    pub note: String,
}

/// Replacement values for an existing entry.
///
/// `warehouse_id` and `account_id` keep the current value when `0`.
#[derive(Clone, Debug)]
pub struct ExpenseUpdate {
    pub warehouse_id: i64,
    pub account_id: i64,
    pub category: ExpenseCategory,
    pub amount: i64,
    pub at: DateTime<Utc>,
    pub note: String,
}

/// Records and edits expense ledger entries on behalf of one actor.
pub struct ExpenseHistoryService<'a> {
    db: &'a DatabaseTransaction,
    actor: Actor,
}

impl<'a> ExpenseHistoryService<'a> {
    pub fn new(db: &'a DatabaseTransaction, actor: Actor) -> Self {
        Self { db, actor }
    }

    /// Resolves the link an entry will be booked on.
    pub async fn get_account(&self, account_id: i64, warehouse_id: i64) -> ResultFinance<AccountLink> {
        if account_id == 0 {
            return Err(FinanceError::Validation(
                "account id must not be empty".to_string(),
            ));
        }
        ExpenseAccountQuery::new(LockMode::None)
            .from_account(account_id)
            .from_warehouse(warehouse_id)
            .one(self.db)
            .await?
            .ok_or_else(|| FinanceError::NotFound("account".to_string()))
    }

    pub async fn create(&self, account: &AccountLink, expense: NewExpense) -> ResultFinance<ExpenseEntry> {
        if !can_create_expense(self.actor.team_type, expense.category) {
            tracing::debug!(
                team_type = self.actor.team_type.as_str(),
                category = expense.category.as_str(),
                "expense category rejected"
            );
            return Err(FinanceError::PermissionDenied(
                "not allowed create expense".to_string(),
            ));
        }

        let model = expense_histories::ActiveModel {
            id: ActiveValue::NotSet,
            warehouse_id: ActiveValue::Set(account.warehouse_id),
            account_id: ActiveValue::Set(account.account_id),
            created_by_id: ActiveValue::Set(self.actor.user_id),
            expense_type: ActiveValue::Set(expense.category.as_str().to_string()),
            amount: ActiveValue::Set(expense.amount),
            note: ActiveValue::Set(expense.note),
            at: ActiveValue::Set(expense.at),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        tracing::info!(
            hist_id = model.id,
            warehouse_id = model.warehouse_id,
            account_id = model.account_id,
            amount = model.amount,
            "expense recorded"
        );
        ExpenseEntry::try_from(model)
    }

    /// Loads an entry for editing, holding its row lock.
    pub async fn get_expense(&self, hist_id: i64) -> ResultFinance<ExpenseEntry> {
        if hist_id == 0 {
            return Err(FinanceError::Validation(
                "history id must not be empty".to_string(),
            ));
        }
        ExpenseHistoryQuery::new(LockMode::ExclusiveNoWait)
            .with_hist_id(hist_id)
            .require(self.db)
            .await
    }

    /// Rewrites the entry. Moving it to another warehouse, or into or out of
    /// an admin-gated category, needs the elevated team type. Both the stored
    /// and the new category must be in the actor's allowed set, and a moved
    /// entry must land on an account linked to its warehouse. `created_by_id`
    /// and `created_at` are never touched.
    pub async fn update(&self, entry: ExpenseEntry, update: ExpenseUpdate) -> ResultFinance<ExpenseEntry> {
        let warehouse_id = if update.warehouse_id == 0 {
            entry.warehouse_id
        } else {
            update.warehouse_id
        };
        let account_id = if update.account_id == 0 {
            entry.account_id
        } else {
            update.account_id
        };

        if warehouse_id != entry.warehouse_id {
            require_elevated(&self.actor, "can't change warehouse expense")?;
        }
        if update.category != entry.category
            && (entry.category.needs_admin_permission() || update.category.needs_admin_permission())
        {
            require_elevated(&self.actor, "need admin permission for update")?;
        }
        // Checked on the stored category as well.
        for category in [entry.category, update.category] {
            if !can_create_expense(self.actor.team_type, category) {
                tracing::debug!(
                    hist_id = entry.id,
                    team_type = self.actor.team_type.as_str(),
                    category = category.as_str(),
                    "expense edit rejected"
                );
                return Err(FinanceError::PermissionDenied(
                    "not allowed create expense".to_string(),
                ));
            }
        }
        if warehouse_id != entry.warehouse_id || account_id != entry.account_id {
            self.get_account(account_id, warehouse_id).await?;
        }

        let model = expense_histories::ActiveModel {
            id: ActiveValue::Unchanged(entry.id),
            warehouse_id: ActiveValue::Set(warehouse_id),
            account_id: ActiveValue::Set(account_id),
            expense_type: ActiveValue::Set(update.category.as_str().to_string()),
            amount: ActiveValue::Set(update.amount),
            note: ActiveValue::Set(update.note),
            at: ActiveValue::Set(update.at),
            ..Default::default()
        }
        .update(self.db)
        .await?;

        tracing::info!(
            hist_id = model.id,
            warehouse_id = model.warehouse_id,
            account_id = model.account_id,
            "expense updated"
        );
        ExpenseEntry::try_from(model)
    }
}
