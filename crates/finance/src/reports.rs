//! Paginated reporting reads over accounts, expense history and balance
//! snapshots.
//!
//! Every list is built from the same query builders the mutation services
//! use, so a filter means the same thing on both paths.

use chrono::NaiveDate;
use chrono_tz::Tz;
use sea_orm::{ConnectionTrait, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    AccountLink, BalanceSnapshot, ExpenseCategory, ExpenseEntry, FinanceError, ResultFinance,
    query::{
        AccountOperationalType, AccountStatus, BalanceHistoryQuery, ExpenseAccountQuery,
        ExpenseHistoryQuery, FlowType, LockMode, into_link,
    },
    util::day_bounds,
};

const MAX_PAGE_LIMIT: u64 = 200;

/// One-based page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page: u64,
    pub limit: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 1, limit: 20 }
    }
}

impl Page {
    fn validate(self) -> ResultFinance<Self> {
        if self.page == 0 {
            return Err(FinanceError::Validation("page starts at 1".to_string()));
        }
        if self.limit == 0 || self.limit > MAX_PAGE_LIMIT {
            return Err(FinanceError::Validation(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}"
            )));
        }
        Ok(self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[derive(Clone, Debug, Default)]
pub struct ExpenseAccountFilter {
    pub warehouse_id: i64,
    pub account_type_id: i64,
    pub name: String,
    pub number_id: String,
    pub ops: Option<AccountOperationalType>,
    pub status: Option<AccountStatus>,
}

/// `start_date` and `end_date` are inclusive calendar days on `created_at`.
#[derive(Clone, Debug, Default)]
pub struct ExpenseHistoryFilter {
    pub warehouse_id: i64,
    pub account_id: i64,
    pub created_by: i64,
    pub categories: Vec<ExpenseCategory>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub flow_type: Option<FlowType>,
    pub ops: Option<AccountOperationalType>,
}

/// `start_date` and `end_date` are inclusive calendar days on `at`.
#[derive(Clone, Debug, Default)]
pub struct BalanceHistoryFilter {
    pub warehouse_id: i64,
    pub account_id: i64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Inclusive UTC bounds covering every instant of the local days
/// `start..=end`.
fn date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    tz: Tz,
) -> ResultFinance<(Option<DateTimeUtc>, Option<DateTimeUtc>)> {
    if let (Some(start), Some(end)) = (start, end)
        && start > end
    {
        return Err(FinanceError::Validation(
            "invalid range: start date must not be after end date".to_string(),
        ));
    }
    let min = start.map(|day| day_bounds(day, tz)).transpose()?.map(|(from, _)| from);
    let max = end
        .map(|day| day_bounds(day, tz))
        .transpose()?
        .map(|(_, until)| until - chrono::Duration::microseconds(1));
    Ok((min, max))
}

pub async fn list_expense_accounts<C: ConnectionTrait>(
    db: &C,
    filter: &ExpenseAccountFilter,
    page: Page,
) -> ResultFinance<Paged<AccountLink>> {
    let page = page.validate()?;
    let select = ExpenseAccountQuery::new(LockMode::None)
        .from_warehouse(filter.warehouse_id)
        .with_account_type(filter.account_type_id)
        .search_name(&filter.name)
        .search_number_id(&filter.number_id)
        .ops_account(filter.ops)
        .status(filter.status)
        .into_select();

    let paginator = select.paginate(db, page.limit);
    let total = paginator.num_items().await?;
    let items = paginator
        .fetch_page(page.page - 1)
        .await?
        .into_iter()
        .filter_map(into_link)
        .collect();
    Ok(Paged { items, total })
}

pub async fn list_expense_histories<C: ConnectionTrait>(
    db: &C,
    filter: &ExpenseHistoryFilter,
    page: Page,
    tz: Tz,
) -> ResultFinance<Paged<ExpenseEntry>> {
    let page = page.validate()?;
    let (created_min, created_max) = date_range(filter.start_date, filter.end_date, tz)?;
    let select = ExpenseHistoryQuery::new(LockMode::None)
        .from_warehouse(filter.warehouse_id)
        .from_account(filter.account_id)
        .created_by(filter.created_by)
        .with_categories(&filter.categories)
        .created_time(created_min, created_max)
        .flow_type(filter.flow_type)
        .ops_account(filter.ops)
        .into_select();

    let paginator = select.paginate(db, page.limit);
    let total = paginator.num_items().await?;
    let items = paginator
        .fetch_page(page.page - 1)
        .await?
        .into_iter()
        .map(ExpenseEntry::try_from)
        .collect::<ResultFinance<Vec<_>>>()?;
    Ok(Paged { items, total })
}

pub async fn list_balance_histories<C: ConnectionTrait>(
    db: &C,
    filter: &BalanceHistoryFilter,
    page: Page,
    tz: Tz,
) -> ResultFinance<Paged<BalanceSnapshot>> {
    let page = page.validate()?;
    let (at_min, at_max) = date_range(filter.start_date, filter.end_date, tz)?;
    let select = BalanceHistoryQuery::new(LockMode::None)
        .from_warehouse(filter.warehouse_id)
        .from_account(filter.account_id)
        .balance_time(at_min, at_max)
        .into_select();

    let paginator = select.paginate(db, page.limit);
    let total = paginator.num_items().await?;
    let items = paginator
        .fetch_page(page.page - 1)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Paged { items, total })
}
