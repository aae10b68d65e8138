use chrono::{DateTime, Utc};
use sea_orm::{
    ConnectionTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, Select, prelude::*,
    sea_query::IntoCondition,
};

use crate::{
    ExpenseCategory, ExpenseEntry, FinanceError, ResultFinance, account_links, expense_histories,
};

use super::{AccountOperationalType, FlowType, LockMode};

/// Query over expense ledger entries.
#[derive(Clone, Debug)]
pub struct ExpenseHistoryQuery {
    select: Select<expense_histories::Entity>,
    link_joined: bool,
}

impl ExpenseHistoryQuery {
    pub fn new(lock: LockMode) -> Self {
        Self {
            select: lock.apply(expense_histories::Entity::find()),
            link_joined: false,
        }
    }

    pub fn filter<F: IntoCondition>(mut self, condition: F) -> Self {
        self.select = self.select.filter(condition);
        self
    }

    /// Joins the entry's own warehouse link; a second call is a no-op.
    pub fn join_account_link(mut self) -> Self {
        if self.link_joined {
            return self;
        }
        self.select = self
            .select
            .join(JoinType::InnerJoin, expense_histories::Relation::warehouse_link());
        self.link_joined = true;
        self
    }

    pub fn with_hist_id(self, hist_id: i64) -> Self {
        if hist_id == 0 {
            return self;
        }
        self.filter(expense_histories::Column::Id.eq(hist_id))
    }

    pub fn from_warehouse(self, warehouse_id: i64) -> Self {
        if warehouse_id == 0 {
            return self;
        }
        self.filter(expense_histories::Column::WarehouseId.eq(warehouse_id))
    }

    pub fn from_account(self, account_id: i64) -> Self {
        if account_id == 0 {
            return self;
        }
        self.filter(expense_histories::Column::AccountId.eq(account_id))
    }

    pub fn created_by(self, user_id: i64) -> Self {
        if user_id == 0 {
            return self;
        }
        self.filter(expense_histories::Column::CreatedById.eq(user_id))
    }

    pub fn with_category(self, category: Option<ExpenseCategory>) -> Self {
        match category {
            Some(category) => {
                self.filter(expense_histories::Column::ExpenseType.eq(category.as_str()))
            }
            None => self,
        }
    }

    pub fn with_categories(self, categories: &[ExpenseCategory]) -> Self {
        if categories.is_empty() {
            return self;
        }
        let names: Vec<&str> = categories.iter().map(|c| c.as_str()).collect();
        self.filter(expense_histories::Column::ExpenseType.is_in(names))
    }

    /// Inclusive bounds on `created_at`; either side may be omitted.
    pub fn created_time(
        mut self,
        min: Option<DateTime<Utc>>,
        max: Option<DateTime<Utc>>,
    ) -> Self {
        if let Some(min) = min {
            self = self.filter(expense_histories::Column::CreatedAt.gte(min));
        }
        if let Some(max) = max {
            self = self.filter(expense_histories::Column::CreatedAt.lte(max));
        }
        self
    }

    /// Inclusive bounds on the effective date `at`; either side may be
    /// omitted.
    pub fn expense_at(mut self, min: Option<DateTime<Utc>>, max: Option<DateTime<Utc>>) -> Self {
        if let Some(min) = min {
            self = self.filter(expense_histories::Column::At.gte(min));
        }
        if let Some(max) = max {
            self = self.filter(expense_histories::Column::At.lte(max));
        }
        self
    }

    pub fn flow_type(self, flow_type: Option<FlowType>) -> Self {
        match flow_type {
            Some(FlowType::Income) => self.filter(expense_histories::Column::Amount.gte(0)),
            Some(FlowType::Outcome) => self.filter(expense_histories::Column::Amount.lt(0)),
            None => self,
        }
    }

    /// Entries booked on an ops (or non-ops) account of their warehouse.
    pub fn ops_account(self, ops_type: Option<AccountOperationalType>) -> Self {
        match ops_type {
            Some(ops_type) => self
                .join_account_link()
                .filter(account_links::Column::IsOpsAccount.eq(ops_type.is_ops())),
            None => self,
        }
    }

    pub fn into_select(self) -> Select<expense_histories::Entity> {
        self.select
            .order_by_desc(expense_histories::Column::At)
            .order_by_desc(expense_histories::Column::Id)
    }

    pub async fn one<C: ConnectionTrait>(self, db: &C) -> ResultFinance<Option<ExpenseEntry>> {
        self.into_select()
            .one(db)
            .await?
            .map(ExpenseEntry::try_from)
            .transpose()
    }

    pub async fn require<C: ConnectionTrait>(self, db: &C) -> ResultFinance<ExpenseEntry> {
        self.one(db)
            .await?
            .ok_or_else(|| FinanceError::NotFound("expense history".to_string()))
    }

    pub async fn all<C: ConnectionTrait>(self, db: &C) -> ResultFinance<Vec<ExpenseEntry>> {
        self.into_select()
            .all(db)
            .await?
            .into_iter()
            .map(ExpenseEntry::try_from)
            .collect()
    }
}
