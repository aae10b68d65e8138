use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, DbErr, prelude::*};

use crate::{
    AccountLink, FinanceError, ResultFinance, account_links,
    error::unique_violation,
    expense_accounts,
    query::{ExpenseAccountQuery, LockMode},
    util::normalize_required_text,
};

/// Fields for a new expense account.
#[derive(Clone, Debug)]
pub struct NewExpenseAccount {
    pub account_type_id: i64,
    pub name: String,
    pub number_id: String,
    pub is_ops_account: bool,
}

/// Full replacement of the editable account fields.
#[derive(Clone, Debug)]
pub struct ExpenseAccountUpdate {
    pub account_type_id: i64,
    pub name: String,
    pub number_id: String,
    pub is_ops_account: bool,
}

/// An account link loaded through [`ExpenseAccountService::load`].
///
/// Only a load or a create hands one out, so updates can never run against
/// a record that was not read first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedAccount {
    link: AccountLink,
}

impl LoadedAccount {
    pub fn link(&self) -> &AccountLink {
        &self.link
    }

    pub fn into_link(self) -> AccountLink {
        self.link
    }
}

/// Creates and edits expense accounts of one warehouse.
///
/// A `warehouse_id` of `0` leaves loads unscoped (cross-warehouse admin
/// reads); creating still requires a warehouse.
pub struct ExpenseAccountService<'a> {
    db: &'a DatabaseTransaction,
    warehouse_id: i64,
}

impl<'a> ExpenseAccountService<'a> {
    pub fn new(db: &'a DatabaseTransaction, warehouse_id: i64) -> Self {
        Self { db, warehouse_id }
    }

    /// Registers a new account and links it to the warehouse.
    ///
    /// Both checks read with a no-wait lock; the unique indexes on the link
    /// table stay the authority when two transactions pass them at once.
    pub async fn create(&self, input: NewExpenseAccount) -> ResultFinance<LoadedAccount> {
        if self.warehouse_id == 0 {
            return Err(FinanceError::Validation(
                "warehouse id must not be empty".to_string(),
            ));
        }
        let name = normalize_required_text(&input.name, "account name")?;
        let number_id = normalize_required_text(&input.number_id, "number id")?;

        self.ensure_number_id_free(&number_id, 0).await?;
        if input.is_ops_account {
            self.ensure_no_ops_account(0).await?;
        }

        let link = insert_account_link(
            self.db,
            self.warehouse_id,
            input.account_type_id,
            name,
            number_id,
            input.is_ops_account,
        )
        .await?;

        tracing::info!(
            warehouse_id = link.warehouse_id,
            account_id = link.account_id,
            is_ops_account = link.is_ops_account,
            "expense account created"
        );
        Ok(LoadedAccount { link })
    }

    /// Loads one link of this warehouse, narrowed by `query`.
    pub async fn load<F>(&self, lock: LockMode, query: F) -> ResultFinance<LoadedAccount>
    where
        F: FnOnce(ExpenseAccountQuery) -> ExpenseAccountQuery,
    {
        let base = ExpenseAccountQuery::new(lock).from_warehouse(self.warehouse_id);
        let link = query(base).require(self.db).await?;
        Ok(LoadedAccount { link })
    }

    /// Unlocked read of a single account of this warehouse.
    pub async fn get(&self, account_id: i64) -> ResultFinance<AccountLink> {
        if account_id == 0 {
            return Err(FinanceError::Validation(
                "account id must not be empty".to_string(),
            ));
        }
        self.load(LockMode::None, |query| query.from_account(account_id))
            .await
            .map(LoadedAccount::into_link)
    }

    /// Replaces name, number id, account type and ops flag.
    pub async fn update(
        &self,
        loaded: LoadedAccount,
        input: ExpenseAccountUpdate,
    ) -> ResultFinance<LoadedAccount> {
        self.ensure_in_scope(&loaded)?;
        let mut link = loaded.link;
        let name = normalize_required_text(&input.name, "account name")?;
        let number_id = normalize_required_text(&input.number_id, "number id")?;

        if input.is_ops_account {
            self.ensure_no_ops_account_in(link.warehouse_id, link.account_id)
                .await?;
        }
        if number_id != link.account.number_id {
            self.ensure_number_id_free_in(link.warehouse_id, &number_id, link.account_id)
                .await?;
        }

        expense_accounts::ActiveModel {
            id: ActiveValue::Unchanged(link.account_id),
            account_type_id: ActiveValue::Set(input.account_type_id),
            name: ActiveValue::Set(name.clone()),
            number_id: ActiveValue::Set(number_id.clone()),
            ..Default::default()
        }
        .update(self.db)
        .await?;

        account_links::ActiveModel {
            id: ActiveValue::Unchanged(link.id),
            number_id: ActiveValue::Set(number_id.clone()),
            is_ops_account: ActiveValue::Set(input.is_ops_account),
            ..Default::default()
        }
        .update(self.db)
        .await
        .map_err(|err| link_write_error(err, &number_id))?;

        link.is_ops_account = input.is_ops_account;
        link.account.account_type_id = input.account_type_id;
        link.account.name = name;
        link.account.number_id = number_id;

        tracing::info!(
            warehouse_id = link.warehouse_id,
            account_id = link.account_id,
            is_ops_account = link.is_ops_account,
            "expense account updated"
        );
        Ok(LoadedAccount { link })
    }

    /// Soft-disables (or re-enables) the account.
    pub async fn set_disabled(
        &self,
        loaded: LoadedAccount,
        disabled: bool,
    ) -> ResultFinance<LoadedAccount> {
        self.ensure_in_scope(&loaded)?;
        let mut link = loaded.link;

        expense_accounts::ActiveModel {
            id: ActiveValue::Unchanged(link.account_id),
            disabled: ActiveValue::Set(disabled),
            ..Default::default()
        }
        .update(self.db)
        .await?;
        link.account.disabled = disabled;

        tracing::info!(account_id = link.account_id, disabled, "expense account status changed");
        Ok(LoadedAccount { link })
    }

    fn ensure_in_scope(&self, loaded: &LoadedAccount) -> ResultFinance<()> {
        if self.warehouse_id != 0 && loaded.link.warehouse_id != self.warehouse_id {
            return Err(FinanceError::InvalidState(format!(
                "account {} was loaded for warehouse {}, not {}",
                loaded.link.account_id, loaded.link.warehouse_id, self.warehouse_id
            )));
        }
        Ok(())
    }

    async fn ensure_number_id_free(&self, number_id: &str, except_account: i64) -> ResultFinance<()> {
        self.ensure_number_id_free_in(self.warehouse_id, number_id, except_account)
            .await
    }

    async fn ensure_number_id_free_in(
        &self,
        warehouse_id: i64,
        number_id: &str,
        except_account: i64,
    ) -> ResultFinance<()> {
        let existing = ExpenseAccountQuery::new(LockMode::ExclusiveNoWait)
            .from_warehouse(warehouse_id)
            .with_number_id(number_id)
            .other_than_account(except_account)
            .one(self.db)
            .await?;
        if existing.is_some() {
            tracing::debug!(warehouse_id, number_id, "number id already registered");
            return Err(FinanceError::AlreadyExists(format!(
                "warehouse expense number id {number_id}"
            )));
        }
        Ok(())
    }

    async fn ensure_no_ops_account(&self, except_account: i64) -> ResultFinance<()> {
        self.ensure_no_ops_account_in(self.warehouse_id, except_account)
            .await
    }

    async fn ensure_no_ops_account_in(
        &self,
        warehouse_id: i64,
        except_account: i64,
    ) -> ResultFinance<()> {
        let existing = ExpenseAccountQuery::new(LockMode::ExclusiveNoWait)
            .from_warehouse(warehouse_id)
            .is_ops_account(true)
            .other_than_account(except_account)
            .one(self.db)
            .await?;
        if existing.is_some() {
            tracing::debug!(warehouse_id, "ops account already present");
            return Err(ops_account_conflict());
        }
        Ok(())
    }
}

/// Inserts the account and its link without any pre-check.
pub(crate) async fn insert_account_link(
    db: &DatabaseTransaction,
    warehouse_id: i64,
    account_type_id: i64,
    name: String,
    number_id: String,
    is_ops_account: bool,
) -> ResultFinance<AccountLink> {
    let account = expense_accounts::ActiveModel {
        id: ActiveValue::NotSet,
        account_type_id: ActiveValue::Set(account_type_id),
        name: ActiveValue::Set(name),
        number_id: ActiveValue::Set(number_id.clone()),
        disabled: ActiveValue::Set(false),
        created_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await?;

    let link = account_links::ActiveModel {
        id: ActiveValue::NotSet,
        account_id: ActiveValue::Set(account.id),
        warehouse_id: ActiveValue::Set(warehouse_id),
        number_id: ActiveValue::Set(number_id.clone()),
        is_ops_account: ActiveValue::Set(is_ops_account),
    }
    .insert(db)
    .await
    .map_err(|err| link_write_error(err, &number_id))?;

    Ok(AccountLink::from_models(link, account))
}

fn ops_account_conflict() -> FinanceError {
    FinanceError::Conflict("warehouse already has an operational expense account".to_string())
}

/// Maps a unique violation on the link table to the invariant it protects.
fn link_write_error(err: DbErr, number_id: &str) -> FinanceError {
    match unique_violation(&err) {
        Some(message) if message.contains("number_id") => {
            FinanceError::AlreadyExists(format!("warehouse expense number id {number_id}"))
        }
        Some(_) => ops_account_conflict(),
        None => err.into(),
    }
}
