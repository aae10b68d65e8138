use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, ActiveValue, Database, DatabaseConnection};
use serde_json::{Value, json};
use tower::ServiceExt;

use finance::inv_transactions;
use migration::MigratorTrait;
use server::{Identity, Permission, PermissionCheck, ServerState, router};

struct ReadOnly;

impl PermissionCheck for ReadOnly {
    fn allowed(&self, _identity: &Identity, permission: Permission) -> bool {
        matches!(
            permission,
            Permission::ExpenseAccountView | Permission::ExpenseHistoryView
        )
    }
}

async fn db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    db
}

async fn app() -> (Router, DatabaseConnection) {
    let db = db().await;
    let state = ServerState::new(db.clone(), chrono_tz::Asia::Jakarta);
    (router(state), db)
}

fn request(method: &str, uri: &str, team_type: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-user-id", "7")
        .header("x-team-type", team_type)
        .header("x-team-id", "3");
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn new_account(warehouse_id: i64, number_id: &str, is_ops_account: bool) -> Value {
    json!({
        "warehouse_id": warehouse_id,
        "account_type_id": 1,
        "name": format!("Kas {number_id}"),
        "number_id": number_id,
        "is_ops_account": is_ops_account,
    })
}

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let (app, _db) = app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/expense-accounts/list")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn account_lifecycle_maps_errors_to_statuses() {
    let (app, _db) = app().await;

    let (status, created) = send(
        &app,
        request("POST", "/expense-accounts", "admin", Some(new_account(1, "N1", true))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["number_id"], "N1");
    assert_eq!(created["is_ops_account"], true);
    let account_id = created["account_id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        request("POST", "/expense-accounts", "admin", Some(new_account(1, "N1", false))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "warehouse expense number id N1 already exists");

    let (status, _) = send(
        &app,
        request("POST", "/expense-accounts", "admin", Some(new_account(1, "N2", true))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        request("POST", "/expense-accounts", "admin", Some(new_account(0, "N3", false))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        request("GET", "/expense-accounts/999?warehouse_id=1", "admin", None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, fetched) = send(
        &app,
        request(
            "GET",
            &format!("/expense-accounts/{account_id}?warehouse_id=1"),
            "admin",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Kas N1");

    let (status, edited) = send(
        &app,
        request(
            "PUT",
            &format!("/expense-accounts/{account_id}"),
            "admin",
            Some(json!({
                "warehouse_id": 1,
                "account_type_id": 2,
                "name": "Kas Operasional",
                "number_id": "N1",
                "is_ops_account": true,
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["name"], "Kas Operasional");
    assert_eq!(edited["account_type_id"], 2);

    let (status, disabled) = send(
        &app,
        request(
            "POST",
            &format!("/expense-accounts/{account_id}/disabled"),
            "admin",
            Some(json!({ "warehouse_id": 1, "disabled": true })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(disabled["disabled"], true);

    let (status, listed) = send(
        &app,
        request(
            "POST",
            "/expense-accounts/list",
            "admin",
            Some(json!({ "warehouse_id": 1, "status": "disabled" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["total"], 1);
    assert_eq!(listed["items"][0]["account_id"], account_id);

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/expense-accounts/list",
            "admin",
            Some(json!({ "page": 0 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn account_routes_are_scoped_by_warehouse() {
    let (app, _db) = app().await;
    let (_, created) = send(
        &app,
        request("POST", "/expense-accounts", "admin", Some(new_account(2, "N1", false))),
    )
    .await;
    let account_id = created["account_id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/expense-accounts/{account_id}/disabled"),
            "admin",
            Some(json!({ "warehouse_id": 1, "disabled": true })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/expense-accounts/0/disabled",
            "admin",
            Some(json!({ "warehouse_id": 2, "disabled": true })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn warehouse_team_is_refused_admin_categories() {
    let (app, _db) = app().await;
    let (_, created) = send(
        &app,
        request("POST", "/expense-accounts", "admin", Some(new_account(1, "N1", true))),
    )
    .await;
    let account_id = created["account_id"].as_i64().unwrap();

    let expense = |category: &str| {
        json!({
            "warehouse_id": 1,
            "account_id": account_id,
            "category": category,
            "amount": -25000,
            "note": "gas",
            "at": "2024-01-10T08:00:00+07:00",
        })
    };

    let (status, body) = send(
        &app,
        request("POST", "/expense-histories", "warehouse", Some(expense("equity"))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "permission denied: not allowed create expense");

    let (status, recorded) = send(
        &app,
        request("POST", "/expense-histories", "warehouse", Some(expense("kitchen"))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(recorded["created_by_id"], 7);
    assert_eq!(recorded["at"], "2024-01-10T08:00:00+07:00");
    let hist_id = recorded["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        request(
            "PUT",
            &format!("/expense-histories/{hist_id}"),
            "warehouse",
            Some(json!({
                "warehouse_id": 2,
                "category": "kitchen",
                "amount": -25000,
                "at": "2024-01-10T08:00:00+07:00",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, edited) = send(
        &app,
        request(
            "PUT",
            &format!("/expense-histories/{hist_id}"),
            "warehouse",
            Some(json!({
                "category": "petty_cash",
                "amount": -30000,
                "note": "gas refill",
                "at": "2024-01-10T09:00:00+07:00",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["category"], "petty_cash");
    assert_eq!(edited["warehouse_id"], 1);

    let (status, listed) = send(
        &app,
        request(
            "POST",
            "/expense-histories/list",
            "warehouse",
            Some(json!({ "flow_type": "outcome", "ops": "ops" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["total"], 1);
}

#[tokio::test]
async fn balance_upsert_keeps_one_row_per_local_day() {
    let (app, _db) = app().await;
    let (_, created) = send(
        &app,
        request("POST", "/expense-accounts", "admin", Some(new_account(1, "N1", false))),
    )
    .await;
    let account_id = created["account_id"].as_i64().unwrap();

    let snapshot = |amount: i64, at: &str| json!({ "account_id": account_id, "amount": amount, "at": at });
    let (status, first) = send(
        &app,
        request("POST", "/balances", "warehouse", Some(snapshot(100, "2024-01-10T08:00:00+07:00"))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["balance_day"], "2024-01-10");

    let (_, second) = send(
        &app,
        request("POST", "/balances", "warehouse", Some(snapshot(150, "2024-01-10T23:00:00+07:00"))),
    )
    .await;
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["amount"], 150);

    let unknown = json!({ "account_id": 404, "amount": 1, "at": "2024-01-10T08:00:00+07:00" });
    let (status, _) = send(&app, request("POST", "/balances", "warehouse", Some(unknown))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, listed) = send(
        &app,
        request(
            "POST",
            "/balances/list",
            "warehouse",
            Some(json!({ "start_date": "2024-01-10", "end_date": "2024-01-10" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["total"], 1);
}

#[tokio::test]
async fn notes_and_logs_follow_the_transaction() {
    let (app, db) = app().await;
    let tx_id = inv_transactions::ActiveModel {
        id: ActiveValue::NotSet,
        team_id: ActiveValue::Set(3),
        warehouse_id: ActiveValue::Set(1),
        status: ActiveValue::Set("pending".to_string()),
        created_at: ActiveValue::Set(Utc::now()),
    }
    .insert(&db)
    .await
    .unwrap()
    .id;

    let (status, created) = send(
        &app,
        request(
            "POST",
            &format!("/transactions/{tx_id}/notes"),
            "warehouse",
            Some(json!({
                "notes": [
                    { "type": "common", "text": "deliver before noon" },
                    { "type": "problem", "text": "ignored" },
                ],
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["ids"].as_array().unwrap().len(), 1);

    let (status, listed) = send(
        &app,
        request("GET", &format!("/transactions/{tx_id}/notes"), "warehouse", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["notes"][0]["text"], "deliver before noon");

    let (status, _) = send(
        &app,
        request(
            "GET",
            &format!("/transactions/{tx_id}/notes?team_id=9"),
            "admin",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Only the elevated team may pick another team.
    let (status, _) = send(
        &app,
        request(
            "GET",
            &format!("/transactions/{tx_id}/notes?team_id=9"),
            "warehouse",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/transactions/{tx_id}/logs"),
            "warehouse",
            Some(json!({ "action_type": "edit_price" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"],
        "validation failed: before_updated of key edit_price is empty"
    );

    let (status, logged) = send(
        &app,
        request(
            "POST",
            &format!("/transactions/{tx_id}/logs"),
            "warehouse",
            Some(json!({
                "action_type": "edit_price",
                "status": "ongoing",
                "before_updated": [{ "key": "edit_price", "data": 12000 }],
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(logged["before_updated"]["edit_price"], 12000);

    let (status, logs) = send(
        &app,
        request("GET", &format!("/transactions/{tx_id}/logs"), "warehouse", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logs.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn permission_check_gates_routes() {
    let db = db().await;
    let state =
        ServerState::new(db, chrono_tz::Asia::Jakarta).with_permissions(Arc::new(ReadOnly));
    let app = router(state);

    let (status, body) = send(
        &app,
        request("POST", "/expense-accounts", "admin", Some(new_account(1, "N1", false))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "permission denied: ExpenseAccountCreate");

    let (status, listed) = send(
        &app,
        request("POST", "/expense-accounts/list", "admin", Some(json!({}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["total"], 0);
}
