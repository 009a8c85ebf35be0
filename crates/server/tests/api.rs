use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::{Engine, KvStore, MoneyCents, SqlStore, StoreError};
use migration::MigratorTrait;
use server::{
    IdentityError, IdentityProvider, IdentityUser, ServerState,
    types::{budget::BudgetStatus, data::Export, stats::Summary},
};

/// Accepts tokens of the form `token-<user id>`.
struct FakeIdentity;

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn verify_token(&self, token: &str) -> Result<String, IdentityError> {
        if token == "outage" {
            return Err(IdentityError::Config("provider unreachable".to_string()));
        }
        token
            .strip_prefix("token-")
            .map(ToString::to_string)
            .ok_or(IdentityError::InvalidToken)
    }

    async fn create_user(
        &self,
        email: &str,
        _password: &str,
        name: &str,
    ) -> Result<IdentityUser, IdentityError> {
        if email.starts_with("taken") {
            return Err(IdentityError::Rejected(
                "User already registered".to_string(),
            ));
        }
        Ok(IdentityUser {
            id: "new-user".to_string(),
            email: Some(email.to_string()),
            name: Some(name.to_string()),
        })
    }
}

/// Store whose every operation fails.
#[derive(Debug)]
struct DownStore;

#[async_trait]
impl KvStore for DownStore {
    async fn get(&self, _key: &str) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: Value) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn scan_by_prefix(&self, _prefix: &str) -> Result<Vec<Value>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

fn app_with_store(store: Arc<dyn KvStore>) -> Router {
    let engine = Engine::builder().store(store).build().unwrap();
    server::router(ServerState::new(engine, Arc::new(FakeIdentity)), "/fintrack")
}

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    app_with_store(Arc::new(SqlStore::new(db)))
}

async fn send(
    app: &Router,
    method: Method,
    path: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(format!("/fintrack{path}"));
    if let Some(user) = user {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer token-{user}"));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };

    let res = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn food_expense(amount: i64) -> Value {
    json!({
        "amount": amount,
        "type": "expense",
        "category": "Food",
        "description": "groceries",
        "date": "2024-06-01"
    })
}

#[tokio::test]
async fn health_needs_no_credentials() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn protected_routes_reject_missing_or_bad_credentials() {
    let app = app().await;
    let routes = [
        (Method::GET, "/transactions"),
        (Method::POST, "/transactions"),
        (Method::PUT, "/transactions/abc"),
        (Method::DELETE, "/transactions/abc"),
        (Method::GET, "/budgets"),
        (Method::GET, "/export"),
        (Method::POST, "/import"),
        (Method::DELETE, "/delete-account"),
        (Method::GET, "/summary"),
    ];

    for (method, path) in routes {
        let (status, body) = send(&app, method, path, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{path}");
        assert_eq!(body, json!({ "error": "Unauthorized" }));
    }

    let req = Request::builder()
        .uri("/fintrack/transactions")
        .header(header::AUTHORIZATION, "Bearer forged")
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/fintrack/transactions")
        .header(header::AUTHORIZATION, "Basic YWxpY2U6cGFzcw==")
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn budget_spending_is_derived_from_expenses() {
    let app = app().await;

    let (status, budget) = send(
        &app,
        Method::POST,
        "/budgets",
        Some("alice"),
        Some(json!({ "category": "Food", "amount": 200, "period": "monthly" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(budget["userId"], "alice");

    let (status, first) = send(
        &app,
        Method::POST,
        "/transactions",
        Some("alice"),
        Some(food_expense(50)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, budgets) = send(&app, Method::GET, "/budgets", Some("alice"), None).await;
    assert_eq!(budgets[0]["spent"], 50);
    assert_eq!(budgets[0]["remaining"], 150);

    send(
        &app,
        Method::POST,
        "/transactions",
        Some("alice"),
        Some(food_expense(80)),
    )
    .await;
    let (_, budgets) = send(&app, Method::GET, "/budgets", Some("alice"), None).await;
    assert_eq!(budgets[0]["spent"], 130);
    assert_eq!(budgets[0]["remaining"], 70);

    let id = first["id"].as_str().unwrap();
    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/transactions/{id}"),
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (_, budgets) = send(&app, Method::GET, "/budgets", Some("alice"), None).await;
    assert_eq!(budgets[0]["spent"], 80);
    assert_eq!(budgets[0]["remaining"], 120);
    assert_eq!(budgets[0]["amount"], 200);
    assert_eq!(budgets[0]["period"], "monthly");

    let typed: Vec<BudgetStatus> = serde_json::from_value(budgets).unwrap();
    assert_eq!(typed[0].budget.category, "Food");
    assert_eq!(typed[0].remaining, MoneyCents::new(12_000));
}

#[tokio::test]
async fn updating_unknown_transaction_is_not_found() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::PUT,
        "/transactions/never-created",
        Some("alice"),
        Some(food_expense(10)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Transaction not found" }));

    let (status, body) = send(
        &app,
        Method::DELETE,
        "/budgets/never-created",
        Some("alice"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Budget not found" }));
}

#[tokio::test]
async fn ids_that_cannot_exist_are_not_found() {
    let app = app().await;

    let (status, body) = send(&app, Method::DELETE, "/transactions/a:b", Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Transaction not found" }));

    let (status, body) = send(
        &app,
        Method::PUT,
        "/transactions/x:y",
        Some("alice"),
        Some(food_expense(10)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Transaction not found" }));

    let (status, body) = send(&app, Method::DELETE, "/budgets/x:y", Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Budget not found" }));
}

#[tokio::test]
async fn storage_failures_hide_their_detail() {
    let app = app_with_store(Arc::new(DownStore));

    for (method, path, body) in [
        (Method::GET, "/transactions", None),
        (Method::POST, "/transactions", Some(food_expense(10))),
        (Method::GET, "/budgets", None),
        (Method::GET, "/summary", None),
        (Method::DELETE, "/delete-account", None),
    ] {
        let (status, body) = send(&app, method, path, Some("alice"), body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{path}");
        assert_eq!(body, json!({ "error": "internal server error" }));
    }
}

#[tokio::test]
async fn identity_outage_is_a_server_error() {
    let app = app().await;
    let req = Request::builder()
        .uri("/fintrack/transactions")
        .header(header::AUTHORIZATION, "Bearer outage")
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "error": "internal server error" }));
}

#[tokio::test]
async fn oversized_amounts_are_rejected() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/transactions",
        Some("alice"),
        Some(json!({
            "amount": "90000000000000000",
            "type": "expense",
            "category": "Food",
            "date": "2024-06-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid amount"));
}

#[tokio::test]
async fn other_users_entities_are_invisible() {
    let app = app().await;
    let (_, tx) = send(
        &app,
        Method::POST,
        "/transactions",
        Some("alice"),
        Some(food_expense(25)),
    )
    .await;
    let id = tx["id"].as_str().unwrap();

    let (_, listed) = send(&app, Method::GET, "/transactions", Some("bob"), None).await;
    assert_eq!(listed, json!([]));

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/transactions/{id}"),
        Some("bob"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/transactions/{id}"),
        Some("bob"),
        Some(food_expense(1)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = send(&app, Method::GET, "/transactions", Some("alice"), None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["amount"], 25);
}

#[tokio::test]
async fn update_replaces_the_transaction() {
    let app = app().await;
    let (_, created) = send(
        &app,
        Method::POST,
        "/transactions",
        Some("alice"),
        Some(food_expense(25)),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/transactions/{id}"),
        Some("alice"),
        Some(json!({
            "amount": "1200,50",
            "type": "income",
            "category": "Salary",
            "date": "2024-06-30"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_eq!(updated["amount"], 1200.5);
    assert_eq!(updated["type"], "income");
    assert_eq!(updated["description"], "");
}

#[tokio::test]
async fn malformed_bodies_are_rejected_with_error_json() {
    let app = app().await;

    let bad_bodies = [
        json!({ "amount": "abc", "type": "expense", "category": "Food", "date": "2024-06-01" }),
        json!({ "amount": 5, "type": "transfer", "category": "Food", "date": "2024-06-01" }),
        json!({ "amount": 5, "type": "expense", "category": "Food", "date": "June 1st" }),
        json!({ "amount": 5, "type": "expense", "date": "2024-06-01" }),
        json!({ "amount": -5, "type": "expense", "category": "Food", "date": "2024-06-01" }),
    ];
    for body in bad_bodies {
        let (status, res) = send(
            &app,
            Method::POST,
            "/transactions",
            Some("alice"),
            Some(body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert!(res["error"].is_string(), "{body}");
    }

    let req = Request::builder()
        .method(Method::POST)
        .uri("/fintrack/budgets")
        .header(header::AUTHORIZATION, "Bearer token-alice")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let (_, listed) = send(&app, Method::GET, "/transactions", Some("alice"), None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn export_imports_into_an_empty_account() {
    let app = app().await;
    send(
        &app,
        Method::POST,
        "/transactions",
        Some("alice"),
        Some(food_expense(42)),
    )
    .await;
    send(
        &app,
        Method::POST,
        "/transactions",
        Some("alice"),
        Some(json!({
            "amount": 3000,
            "type": "income",
            "category": "Salary",
            "description": "June",
            "date": "2024-06-28"
        })),
    )
    .await;
    send(
        &app,
        Method::POST,
        "/budgets",
        Some("alice"),
        Some(json!({ "category": "Food", "amount": 300, "period": "weekly" })),
    )
    .await;

    let (status, export) = send(&app, Method::GET, "/export", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(export["version"], "1.0");
    assert!(export["exportDate"].is_string());

    let (status, imported) = send(
        &app,
        Method::POST,
        "/import",
        Some("carol"),
        Some(export.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        imported,
        json!({ "success": true, "imported": { "transactions": 2, "budgets": 1 } })
    );

    let (_, copy) = send(&app, Method::GET, "/export", Some("carol"), None).await;
    let strip = |items: &Value| {
        let mut rows: Vec<Value> = items
            .as_array()
            .unwrap()
            .iter()
            .map(|item| {
                json!({
                    "amount": item["amount"],
                    "type": item["type"],
                    "category": item["category"],
                    "description": item["description"],
                    "date": item["date"],
                })
            })
            .collect();
        rows.sort_by_key(|row| row["date"].as_str().unwrap_or_default().to_string());
        rows
    };
    assert_eq!(strip(&copy["transactions"]), strip(&export["transactions"]));
    assert_eq!(copy["budgets"][0]["userId"], "carol");
    assert_eq!(copy["budgets"][0]["period"], "weekly");
    assert_ne!(copy["transactions"][0]["id"], export["transactions"][0]["id"]);

    let typed: Export = serde_json::from_value(copy).unwrap();
    assert_eq!(typed.transactions.len(), 2);
    assert!(typed.transactions.iter().all(|tx| tx.user_id == "carol"));
}

#[tokio::test]
async fn delete_account_clears_owned_entities() {
    let app = app().await;
    for amount in [1, 2] {
        send(
            &app,
            Method::POST,
            "/transactions",
            Some("alice"),
            Some(food_expense(amount)),
        )
        .await;
    }
    send(
        &app,
        Method::POST,
        "/budgets",
        Some("alice"),
        Some(json!({ "category": "Food", "amount": 10, "period": "monthly" })),
    )
    .await;

    let (status, body) = send(&app, Method::DELETE, "/delete-account", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "deleted": { "transactions": 2, "budgets": 1 } })
    );

    let (_, export) = send(&app, Method::GET, "/export", Some("alice"), None).await;
    assert_eq!(export["transactions"], json!([]));
    assert_eq!(export["budgets"], json!([]));
}

#[tokio::test]
async fn summary_reports_totals() {
    let app = app().await;
    send(
        &app,
        Method::POST,
        "/transactions",
        Some("alice"),
        Some(food_expense(40)),
    )
    .await;
    send(
        &app,
        Method::POST,
        "/transactions",
        Some("alice"),
        Some(json!({ "amount": 100, "type": "income", "category": "Gift", "date": "2024-06-03" })),
    )
    .await;

    let (status, summary) = send(&app, Method::GET, "/summary", Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totalIncome"], 100);
    assert_eq!(summary["totalExpenses"], 40);
    assert_eq!(summary["balance"], 60);
    assert_eq!(summary["transactionCount"], 2);
    assert_eq!(summary["expensesByCategory"]["Food"], 40);

    let typed: Summary = serde_json::from_value(summary).unwrap();
    assert_eq!(typed.balance, MoneyCents::new(6_000));
}

#[tokio::test]
async fn signup_relays_the_identity_provider() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/signup",
        None,
        Some(json!({ "email": "dana@example.com", "password": "hunter22", "name": "Dana" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["id"], "new-user");
    assert_eq!(body["user"]["name"], "Dana");

    let (status, body) = send(
        &app,
        Method::POST,
        "/signup",
        None,
        Some(json!({ "email": "taken@example.com", "password": "hunter22", "name": "T" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "User already registered" }));

    let (status, _) = send(
        &app,
        Method::POST,
        "/signup",
        None,
        Some(json!({ "email": "", "password": "", "name": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn routes_live_under_the_prefix() {
    let app = app().await;
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
