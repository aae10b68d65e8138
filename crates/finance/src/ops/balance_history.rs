use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use sea_orm::{ActiveValue, DatabaseTransaction, prelude::*};

use crate::{
    Actor, BalanceSnapshot, FinanceError, ResultFinance, balance_histories,
    error::unique_violation,
    query::{BalanceHistoryQuery, ExpenseAccountQuery, LockMode},
    util::{DEFAULT_TIMEZONE, local_day},
};

/// Keeps one balance snapshot per account and calendar day.
pub struct BalanceHistoryService<'a> {
    db: &'a DatabaseTransaction,
    actor: Actor,
    timezone: Tz,
}

impl<'a> BalanceHistoryService<'a> {
    pub fn new(db: &'a DatabaseTransaction, actor: Actor) -> Self {
        Self {
            db,
            actor,
            timezone: DEFAULT_TIMEZONE,
        }
    }

    /// Day boundaries follow `timezone` instead of the default.
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Inserts the snapshot for the day of `at`, or overwrites `amount` and
    /// `at` of the existing one. The creator of an existing row is kept.
    pub async fn upsert(
        &self,
        account_id: i64,
        amount: i64,
        at: DateTime<Utc>,
    ) -> ResultFinance<BalanceSnapshot> {
        if account_id == 0 {
            return Err(FinanceError::Validation(
                "account id must not be empty".to_string(),
            ));
        }
        let link = ExpenseAccountQuery::new(LockMode::None)
            .from_account(account_id)
            .require(self.db)
            .await?;

        let existing = BalanceHistoryQuery::new(LockMode::ExclusiveNoWait)
            .from_warehouse(link.warehouse_id)
            .from_account(link.account_id)
            .balance_at(Some(at), self.timezone)
            .one(self.db)
            .await?;

        let model = match existing {
            Some(snapshot) => {
                tracing::debug!(hist_id = snapshot.id, "overwriting balance snapshot");
                balance_histories::ActiveModel {
                    id: ActiveValue::Unchanged(snapshot.id),
                    amount: ActiveValue::Set(amount),
                    at: ActiveValue::Set(at),
                    ..Default::default()
                }
                .update(self.db)
                .await?
            }
            None => {
                let balance_day = local_day(at, self.timezone);
                balance_histories::ActiveModel {
                    id: ActiveValue::NotSet,
                    warehouse_id: ActiveValue::Set(link.warehouse_id),
                    account_id: ActiveValue::Set(link.account_id),
                    created_by_id: ActiveValue::Set(self.actor.user_id),
                    amount: ActiveValue::Set(amount),
                    at: ActiveValue::Set(at),
                    balance_day: ActiveValue::Set(balance_day),
                    created_at: ActiveValue::Set(Utc::now()),
                }
                .insert(self.db)
                .await
                .map_err(|err| match unique_violation(&err) {
                    Some(_) => FinanceError::AlreadyExists(format!(
                        "balance of account {account_id} on {balance_day}"
                    )),
                    None => err.into(),
                })?
            }
        };

        tracing::info!(
            account_id = model.account_id,
            balance_day = %model.balance_day,
            amount = model.amount,
            "balance snapshot saved"
        );
        Ok(model.into())
    }
}
