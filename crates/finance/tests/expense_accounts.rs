use sea_orm::{Database, DatabaseConnection, DatabaseTransaction, JoinType, TransactionTrait};

use finance::{
    AccountStatus, ExpenseAccountQuery, ExpenseAccountService, ExpenseAccountUpdate,
    FinanceError, LoadedAccount, LockMode, NewExpenseAccount,
};
use migration::MigratorTrait;

async fn db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    db
}

fn new_account(name: &str, number_id: &str, is_ops_account: bool) -> NewExpenseAccount {
    NewExpenseAccount {
        account_type_id: 1,
        name: name.to_string(),
        number_id: number_id.to_string(),
        is_ops_account,
    }
}

async fn create(
    tx: &DatabaseTransaction,
    warehouse_id: i64,
    number_id: &str,
    is_ops_account: bool,
) -> Result<LoadedAccount, FinanceError> {
    ExpenseAccountService::new(tx, warehouse_id)
        .create(new_account(&format!("Kas {number_id}"), number_id, is_ops_account))
        .await
}

fn edit_of(loaded: &LoadedAccount) -> ExpenseAccountUpdate {
    let link = loaded.link();
    ExpenseAccountUpdate {
        account_type_id: link.account.account_type_id,
        name: link.account.name.clone(),
        number_id: link.account.number_id.clone(),
        is_ops_account: link.is_ops_account,
    }
}

#[tokio::test]
async fn duplicate_number_and_second_ops_account_are_rejected() {
    let db = db().await;
    let tx = db.begin().await.unwrap();

    let first = create(&tx, 1, "N1", true).await.unwrap();
    assert_eq!(first.link().warehouse_id, 1);
    assert!(first.link().is_ops_account);
    assert_eq!(first.link().account.number_id, "N1");
    assert!(!first.link().account.disabled);

    let err = create(&tx, 1, "N1", false).await.unwrap_err();
    assert_eq!(
        err,
        FinanceError::AlreadyExists("warehouse expense number id N1".to_string())
    );

    let err = create(&tx, 1, "N2", true).await.unwrap_err();
    assert!(matches!(err, FinanceError::Conflict(_)));

    let links = ExpenseAccountQuery::new(LockMode::None)
        .from_warehouse(1)
        .all(&tx)
        .await
        .unwrap();
    assert_eq!(links.len(), 1);
}

#[tokio::test]
async fn number_id_is_scoped_per_warehouse() {
    let db = db().await;
    let tx = db.begin().await.unwrap();

    create(&tx, 1, "N1", true).await.unwrap();
    let other = create(&tx, 2, "N1", true).await.unwrap();

    assert_eq!(other.link().warehouse_id, 2);
    tx.commit().await.unwrap();
}

#[tokio::test]
async fn create_requires_warehouse_and_trimmed_fields() {
    let db = db().await;
    let tx = db.begin().await.unwrap();

    let err = ExpenseAccountService::new(&tx, 0)
        .create(new_account("Kas", "N1", false))
        .await
        .unwrap_err();
    assert!(matches!(err, FinanceError::Validation(_)));

    let err = ExpenseAccountService::new(&tx, 1)
        .create(new_account("   ", "N1", false))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        FinanceError::Validation("account name must not be empty".to_string())
    );

    let created = ExpenseAccountService::new(&tx, 1)
        .create(new_account("  Kas Besar ", " N9 ", false))
        .await
        .unwrap();
    assert_eq!(created.link().account.name, "Kas Besar");
    assert_eq!(created.link().account.number_id, "N9");
}

#[tokio::test]
async fn load_applies_extra_predicate_and_reports_not_found() {
    let db = db().await;
    let tx = db.begin().await.unwrap();
    create(&tx, 1, "N1", true).await.unwrap();
    let second = create(&tx, 1, "N2", false).await.unwrap();

    let service = ExpenseAccountService::new(&tx, 1);
    let loaded = service
        .load(LockMode::ExclusiveNoWait, |query| query.with_number_id("N2"))
        .await
        .unwrap();
    assert_eq!(loaded, second);

    let err = service
        .load(LockMode::None, |query| query.with_number_id("N404"))
        .await
        .unwrap_err();
    assert_eq!(err, FinanceError::NotFound("expense account".to_string()));

    let err = ExpenseAccountService::new(&tx, 2)
        .get(second.link().account_id)
        .await
        .unwrap_err();
    assert_eq!(err, FinanceError::NotFound("expense account".to_string()));
}

#[tokio::test]
async fn update_refuses_second_ops_flag_but_keeps_own() {
    let db = db().await;
    let tx = db.begin().await.unwrap();
    let ops = create(&tx, 1, "N1", true).await.unwrap();
    let other = create(&tx, 1, "N2", false).await.unwrap();
    let service = ExpenseAccountService::new(&tx, 1);

    let mut edit = edit_of(&other);
    edit.is_ops_account = true;
    let err = service.update(other, edit).await.unwrap_err();
    assert!(matches!(err, FinanceError::Conflict(_)));

    let mut edit = edit_of(&ops);
    edit.name = "Kas Operasional".to_string();
    let ops = service.update(ops, edit).await.unwrap();
    assert!(ops.link().is_ops_account);
    assert_eq!(ops.link().account.name, "Kas Operasional");

    let opses = ExpenseAccountQuery::new(LockMode::None)
        .from_warehouse(1)
        .is_ops_account(true)
        .all(&tx)
        .await
        .unwrap();
    assert_eq!(opses.len(), 1);
}

#[tokio::test]
async fn ops_flag_moves_after_release() {
    let db = db().await;
    let tx = db.begin().await.unwrap();
    let ops = create(&tx, 1, "N1", true).await.unwrap();
    let other = create(&tx, 1, "N2", false).await.unwrap();
    let service = ExpenseAccountService::new(&tx, 1);

    let mut edit = edit_of(&ops);
    edit.is_ops_account = false;
    service.update(ops, edit).await.unwrap();

    let mut edit = edit_of(&other);
    edit.is_ops_account = true;
    let other = service.update(other, edit).await.unwrap();
    assert!(other.link().is_ops_account);
}

#[tokio::test]
async fn update_rewrites_number_and_cached_fields() {
    let db = db().await;
    let tx = db.begin().await.unwrap();
    let first = create(&tx, 1, "N1", false).await.unwrap();
    let second = create(&tx, 1, "N2", false).await.unwrap();
    let service = ExpenseAccountService::new(&tx, 1);

    let mut edit = edit_of(&second);
    edit.number_id = "N1".to_string();
    let err = service.update(second.clone(), edit).await.unwrap_err();
    assert_eq!(
        err,
        FinanceError::AlreadyExists("warehouse expense number id N1".to_string())
    );

    let edit = ExpenseAccountUpdate {
        account_type_id: 7,
        name: "Bank Mandiri".to_string(),
        number_id: "N3".to_string(),
        is_ops_account: false,
    };
    let updated = service.update(second, edit).await.unwrap();
    assert_eq!(updated.link().account.number_id, "N3");
    assert_eq!(updated.link().account.account_type_id, 7);

    let stored = service.get(updated.link().account_id).await.unwrap();
    assert_eq!(&stored, updated.link());

    // The old number is free again.
    create(&tx, 1, "N2", false).await.unwrap();
    assert_eq!(first.link().account.number_id, "N1");
}

#[tokio::test]
async fn handle_from_another_warehouse_is_rejected() {
    let db = db().await;
    let tx = db.begin().await.unwrap();
    let foreign = create(&tx, 2, "N1", false).await.unwrap();

    let err = ExpenseAccountService::new(&tx, 1)
        .set_disabled(foreign, true)
        .await
        .unwrap_err();
    assert!(matches!(err, FinanceError::InvalidState(_)));
}

#[tokio::test]
async fn disabling_is_reflected_by_status_filter() {
    let db = db().await;
    let tx = db.begin().await.unwrap();
    let kept = create(&tx, 1, "N1", false).await.unwrap();
    let retired = create(&tx, 1, "N2", false).await.unwrap();
    let service = ExpenseAccountService::new(&tx, 1);

    let retired = service.set_disabled(retired, true).await.unwrap();
    assert!(retired.link().account.disabled);

    let active = ExpenseAccountQuery::new(LockMode::None)
        .from_warehouse(1)
        .status(Some(AccountStatus::Active))
        .all(&tx)
        .await
        .unwrap();
    assert_eq!(active, vec![kept.into_link()]);

    let disabled = ExpenseAccountQuery::new(LockMode::None)
        .from_warehouse(1)
        .status(Some(AccountStatus::Disabled))
        .all(&tx)
        .await
        .unwrap();
    assert_eq!(disabled, vec![retired.clone().into_link()]);

    let restored = service.set_disabled(retired, false).await.unwrap();
    assert!(!restored.link().account.disabled);
}

#[tokio::test]
async fn repeated_joins_and_empty_filters_compose() {
    let db = db().await;
    let tx = db.begin().await.unwrap();
    create(&tx, 1, "BCA-01", true).await.unwrap();
    ExpenseAccountService::new(&tx, 1)
        .create(new_account("Kas Dapur", "KD-7", false))
        .await
        .unwrap();

    let found = ExpenseAccountQuery::new(LockMode::None)
        .join_account(JoinType::InnerJoin)
        .join_account(JoinType::InnerJoin)
        .from_warehouse(1)
        .from_account(0)
        .with_account_type(0)
        .search_name("DAPUR")
        .search_number_id("")
        .status(None)
        .ops_account(None)
        .all(&tx)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].account.number_id, "KD-7");

    let by_number = ExpenseAccountQuery::new(LockMode::None)
        .search_number_id("bca")
        .search_name("kas")
        .one(&tx)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_number.account.number_id, "BCA-01");
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let db = db().await;
    let tx = db.begin().await.unwrap();
    let service = ExpenseAccountService::new(&tx, 1);
    service
        .create(new_account("Kas Dapur", "KD-7", false))
        .await
        .unwrap();
    service
        .create(new_account("Bank 100% BCA", "BCA_01", false))
        .await
        .unwrap();

    let underscored = ExpenseAccountQuery::new(LockMode::None)
        .search_number_id("_")
        .all(&tx)
        .await
        .unwrap();
    assert_eq!(underscored.len(), 1);
    assert_eq!(underscored[0].account.number_id, "BCA_01");

    let percent = ExpenseAccountQuery::new(LockMode::None)
        .search_name("0%")
        .all(&tx)
        .await
        .unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].account.name, "Bank 100% BCA");

    let none = ExpenseAccountQuery::new(LockMode::None)
        .search_name("%")
        .search_number_id("KD")
        .all(&tx)
        .await
        .unwrap();
    assert!(none.is_empty());
}
