use sea_orm::{
    ConnectionTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, Select, SelectTwo,
    prelude::*,
    sea_query::{Expr, Func, IntoCondition, LikeExpr},
};

use crate::{AccountLink, FinanceError, ResultFinance, account_links, expense_accounts};

use super::{AccountOperationalType, AccountStatus, LockMode};

/// Query over account links, optionally joined with their accounts.
///
/// Filters on account columns join `ware_expense_accounts` on first use;
/// joining again is a no-op.
#[derive(Clone, Debug)]
pub struct ExpenseAccountQuery {
    select: Select<account_links::Entity>,
    account_joined: bool,
}

impl ExpenseAccountQuery {
    pub fn new(lock: LockMode) -> Self {
        Self {
            select: lock.apply(account_links::Entity::find()),
            account_joined: false,
        }
    }

    /// Adds an arbitrary predicate. Account columns require
    /// [`join_account`](Self::join_account) first.
    pub fn filter<F: IntoCondition>(mut self, condition: F) -> Self {
        self.select = self.select.filter(condition);
        self
    }

    pub fn join_account(mut self, join: JoinType) -> Self {
        if self.account_joined {
            return self;
        }
        self.select = self
            .select
            .join(join, account_links::Relation::Account.def());
        self.account_joined = true;
        self
    }

    fn joined(self) -> Self {
        self.join_account(JoinType::InnerJoin)
    }

    pub fn from_account(self, account_id: i64) -> Self {
        if account_id == 0 {
            return self;
        }
        self.filter(account_links::Column::AccountId.eq(account_id))
    }

    pub fn from_warehouse(self, warehouse_id: i64) -> Self {
        if warehouse_id == 0 {
            return self;
        }
        self.filter(account_links::Column::WarehouseId.eq(warehouse_id))
    }

    /// Excludes one account, used when checking the ops flag of other links.
    pub fn other_than_account(self, account_id: i64) -> Self {
        if account_id == 0 {
            return self;
        }
        self.filter(account_links::Column::AccountId.ne(account_id))
    }

    pub fn is_ops_account(self, is_ops_account: bool) -> Self {
        self.filter(account_links::Column::IsOpsAccount.eq(is_ops_account))
    }

    pub fn ops_account(self, ops_type: Option<AccountOperationalType>) -> Self {
        match ops_type {
            Some(ops_type) => self.is_ops_account(ops_type.is_ops()),
            None => self,
        }
    }

    pub fn with_account_type(self, account_type_id: i64) -> Self {
        if account_type_id == 0 {
            return self;
        }
        self.joined()
            .filter(expense_accounts::Column::AccountTypeId.eq(account_type_id))
    }

    /// Exact number id match, as used by the uniqueness check.
    pub fn with_number_id(self, number_id: &str) -> Self {
        if number_id.is_empty() {
            return self;
        }
        self.joined()
            .filter(expense_accounts::Column::NumberId.eq(number_id))
    }

    pub fn search_name(self, name: &str) -> Self {
        if name.is_empty() {
            return self;
        }
        let condition = contains_ignore_case(expense_accounts::Column::Name, name);
        self.joined().filter(condition)
    }

    pub fn search_number_id(self, number_id: &str) -> Self {
        if number_id.is_empty() {
            return self;
        }
        let condition = contains_ignore_case(expense_accounts::Column::NumberId, number_id);
        self.joined().filter(condition)
    }

    pub fn is_disabled(self, disabled: bool) -> Self {
        self.joined()
            .filter(expense_accounts::Column::Disabled.eq(disabled))
    }

    pub fn status(self, status: Option<AccountStatus>) -> Self {
        match status {
            Some(status) => self.is_disabled(status.is_disabled()),
            None => self,
        }
    }

    /// The composed query, with the account selected alongside each link.
    pub fn into_select(self) -> SelectTwo<account_links::Entity, expense_accounts::Entity> {
        self.joined()
            .select
            .order_by_asc(account_links::Column::Id)
            .select_also(expense_accounts::Entity)
    }

    /// First matching link, or `None` when nothing matched.
    pub async fn one<C: ConnectionTrait>(self, db: &C) -> ResultFinance<Option<AccountLink>> {
        let row = self.into_select().one(db).await?;
        Ok(row.and_then(into_link))
    }

    /// First matching link, failing with [`FinanceError::NotFound`].
    pub async fn require<C: ConnectionTrait>(self, db: &C) -> ResultFinance<AccountLink> {
        self.one(db)
            .await?
            .ok_or_else(|| FinanceError::NotFound("expense account".to_string()))
    }

    pub async fn all<C: ConnectionTrait>(self, db: &C) -> ResultFinance<Vec<AccountLink>> {
        let rows = self.into_select().all(db).await?;
        Ok(rows.into_iter().filter_map(into_link).collect())
    }
}

pub(crate) fn into_link(
    (link, account): (account_links::Model, Option<expense_accounts::Model>),
) -> Option<AccountLink> {
    account.map(|account| AccountLink::from_models(link, account))
}

/// Case-insensitive substring match. `%`, `_` and `\` in `needle` match
/// themselves.
fn contains_ignore_case(column: expense_accounts::Column, needle: &str) -> sea_orm::sea_query::SimpleExpr {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');

    Expr::expr(Func::lower(Expr::col((expense_accounts::Entity, column))))
        .like(LikeExpr::new(pattern).escape('\\'))
}
