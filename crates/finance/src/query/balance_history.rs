use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use sea_orm::{
    ConnectionTrait, QueryFilter, QueryOrder, Select, prelude::*, sea_query::IntoCondition,
};

use crate::{BalanceSnapshot, FinanceError, ResultFinance, balance_histories, util::local_day};

use super::LockMode;

/// Query over per-day balance snapshots.
#[derive(Clone, Debug)]
pub struct BalanceHistoryQuery {
    select: Select<balance_histories::Entity>,
}

impl BalanceHistoryQuery {
    pub fn new(lock: LockMode) -> Self {
        Self {
            select: lock.apply(balance_histories::Entity::find()),
        }
    }

    pub fn filter<F: IntoCondition>(mut self, condition: F) -> Self {
        self.select = self.select.filter(condition);
        self
    }

    pub fn with_hist_id(self, hist_id: i64) -> Self {
        if hist_id == 0 {
            return self;
        }
        self.filter(balance_histories::Column::Id.eq(hist_id))
    }

    pub fn from_warehouse(self, warehouse_id: i64) -> Self {
        if warehouse_id == 0 {
            return self;
        }
        self.filter(balance_histories::Column::WarehouseId.eq(warehouse_id))
    }

    pub fn from_account(self, account_id: i64) -> Self {
        if account_id == 0 {
            return self;
        }
        self.filter(balance_histories::Column::AccountId.eq(account_id))
    }

    pub fn created_by(self, user_id: i64) -> Self {
        if user_id == 0 {
            return self;
        }
        self.filter(balance_histories::Column::CreatedById.eq(user_id))
    }

    /// Snapshots on the calendar day of `at` in `tz`.
    ///
    /// Matches the stored `balance_day`, the same key the per-day unique
    /// index uses.
    pub fn balance_at(self, at: Option<DateTime<Utc>>, tz: Tz) -> Self {
        match at {
            Some(at) => self.filter(balance_histories::Column::BalanceDay.eq(local_day(at, tz))),
            None => self,
        }
    }

    pub fn created_time(
        mut self,
        min: Option<DateTime<Utc>>,
        max: Option<DateTime<Utc>>,
    ) -> Self {
        if let Some(min) = min {
            self = self.filter(balance_histories::Column::CreatedAt.gte(min));
        }
        if let Some(max) = max {
            self = self.filter(balance_histories::Column::CreatedAt.lte(max));
        }
        self
    }

    pub fn balance_time(
        mut self,
        min: Option<DateTime<Utc>>,
        max: Option<DateTime<Utc>>,
    ) -> Self {
        if let Some(min) = min {
            self = self.filter(balance_histories::Column::At.gte(min));
        }
        if let Some(max) = max {
            self = self.filter(balance_histories::Column::At.lte(max));
        }
        self
    }

    pub fn into_select(self) -> Select<balance_histories::Entity> {
        self.select
            .order_by_desc(balance_histories::Column::At)
            .order_by_desc(balance_histories::Column::Id)
    }

    pub async fn one<C: ConnectionTrait>(self, db: &C) -> ResultFinance<Option<BalanceSnapshot>> {
        Ok(self.into_select().one(db).await?.map(Into::into))
    }

    pub async fn require<C: ConnectionTrait>(self, db: &C) -> ResultFinance<BalanceSnapshot> {
        self.one(db)
            .await?
            .ok_or_else(|| FinanceError::NotFound("balance history".to_string()))
    }

    pub async fn all<C: ConnectionTrait>(self, db: &C) -> ResultFinance<Vec<BalanceSnapshot>> {
        let rows = self.into_select().all(db).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
