use chrono::{Days, TimeZone, Utc};
use sea_orm::{Database, DatabaseConnection, DatabaseTransaction, TransactionTrait};

use finance::{
    AccountLink, AccountOperationalType, AccountStatus, Actor, BalanceHistoryService,
    DEFAULT_TIMEZONE, ExpenseAccountService, ExpenseCategory, ExpenseHistoryService,
    FinanceError, NewExpense, NewExpenseAccount, TeamType, local_day,
    reports::{
        BalanceHistoryFilter, ExpenseAccountFilter, ExpenseHistoryFilter, Page,
        list_balance_histories, list_expense_accounts, list_expense_histories,
    },
};
use migration::MigratorTrait;

const ADMIN: Actor = Actor {
    user_id: 1,
    team_type: TeamType::Admin,
};

async fn db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    db
}

async fn account(
    tx: &DatabaseTransaction,
    warehouse_id: i64,
    name: &str,
    number_id: &str,
    is_ops_account: bool,
) -> AccountLink {
    ExpenseAccountService::new(tx, warehouse_id)
        .create(NewExpenseAccount {
            account_type_id: 1,
            name: name.to_string(),
            number_id: number_id.to_string(),
            is_ops_account,
        })
        .await
        .unwrap()
        .into_link()
}

#[tokio::test]
async fn account_list_pages_and_counts() {
    let db = db().await;
    let tx = db.begin().await.unwrap();
    account(&tx, 1, "Kas Ops", "N1", true).await;
    for number in 2..=5 {
        account(&tx, 1, &format!("Kas {number}"), &format!("N{number}"), false).await;
    }
    account(&tx, 2, "Kas Lain", "N1", false).await;

    let filter = ExpenseAccountFilter {
        warehouse_id: 1,
        ..Default::default()
    };
    let page = list_expense_accounts(&tx, &filter, Page { page: 2, limit: 2 })
        .await
        .unwrap();
    assert_eq!(page.total, 5);
    let numbers: Vec<&str> = page
        .items
        .iter()
        .map(|link| link.account.number_id.as_str())
        .collect();
    assert_eq!(numbers, vec!["N3", "N4"]);

    let non_ops = list_expense_accounts(
        &tx,
        &ExpenseAccountFilter {
            warehouse_id: 1,
            ops: Some(AccountOperationalType::NonOps),
            status: Some(AccountStatus::Active),
            name: "kas".to_string(),
            ..Default::default()
        },
        Page::default(),
    )
    .await
    .unwrap();
    assert_eq!(non_ops.total, 4);

    let err = list_expense_accounts(&tx, &filter, Page { page: 0, limit: 2 })
        .await
        .unwrap_err();
    assert!(matches!(err, FinanceError::Validation(_)));
}

#[tokio::test]
async fn history_list_filters_by_local_created_day_and_ops() {
    let db = db().await;
    let tx = db.begin().await.unwrap();
    let ops = account(&tx, 1, "Kas Ops", "N1", true).await;
    let bank = account(&tx, 1, "Bank", "N2", false).await;
    let service = ExpenseHistoryService::new(&tx, ADMIN);
    let at = Utc.with_ymd_and_hms(2024, 1, 10, 3, 0, 0).unwrap();

    for (link, category, amount) in [
        (&ops, ExpenseCategory::Kitchen, -10),
        (&ops, ExpenseCategory::PettyCash, -20),
        (&bank, ExpenseCategory::Bank, 1000),
    ] {
        service
            .create(
                link,
                NewExpense {
                    category,
                    at,
                    amount,
                    note: String::new(),
                },
            )
            .await
            .unwrap();
    }

    let today = local_day(Utc::now(), DEFAULT_TIMEZONE);
    let on_ops = list_expense_histories(
        &tx,
        &ExpenseHistoryFilter {
            warehouse_id: 1,
            ops: Some(AccountOperationalType::Ops),
            start_date: Some(today),
            end_date: Some(today),
            ..Default::default()
        },
        Page::default(),
        DEFAULT_TIMEZONE,
    )
    .await
    .unwrap();
    assert_eq!(on_ops.total, 2);
    assert!(on_ops.items.iter().all(|entry| entry.account_id == ops.account_id));

    let yesterday = today.checked_sub_days(Days::new(1)).unwrap();
    let none = list_expense_histories(
        &tx,
        &ExpenseHistoryFilter {
            end_date: Some(yesterday),
            ..Default::default()
        },
        Page::default(),
        DEFAULT_TIMEZONE,
    )
    .await
    .unwrap();
    assert_eq!(none.total, 0);
    assert!(none.items.is_empty());

    let err = list_expense_histories(
        &tx,
        &ExpenseHistoryFilter {
            start_date: Some(today),
            end_date: Some(yesterday),
            ..Default::default()
        },
        Page::default(),
        DEFAULT_TIMEZONE,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, FinanceError::Validation(_)));
}

#[tokio::test]
async fn balance_list_uses_local_day_bounds() {
    let db = db().await;
    let tx = db.begin().await.unwrap();
    let link = account(&tx, 1, "Kas", "N1", false).await;
    let service = BalanceHistoryService::new(&tx, ADMIN);

    // Jakarta days 10, 11 and 12 January.
    for (hour_utc, day, amount) in [(20, 9, 1), (20, 10, 2), (20, 11, 3)] {
        let at = Utc.with_ymd_and_hms(2024, 1, day, hour_utc, 0, 0).unwrap();
        service.upsert(link.account_id, amount, at).await.unwrap();
    }

    let day = Utc
        .with_ymd_and_hms(2024, 1, 10, 20, 0, 0)
        .unwrap()
        .with_timezone(&DEFAULT_TIMEZONE)
        .date_naive();
    let listed = list_balance_histories(
        &tx,
        &BalanceHistoryFilter {
            account_id: link.account_id,
            start_date: Some(day),
            end_date: Some(day),
            ..Default::default()
        },
        Page::default(),
        DEFAULT_TIMEZONE,
    )
    .await
    .unwrap();
    assert_eq!(listed.total, 1);
    assert_eq!(listed.items[0].amount, 2);
    assert_eq!(listed.items[0].balance_day, day);

    let all = list_balance_histories(
        &tx,
        &BalanceHistoryFilter::default(),
        Page { page: 1, limit: 2 },
        DEFAULT_TIMEZONE,
    )
    .await
    .unwrap();
    assert_eq!(all.total, 3);
    assert_eq!(all.items.len(), 2);
}
