use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use migration::MigratorTrait;

const PASSWORD: &str = "hunter2hunter2";

async fn test_app() -> (Router, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (server::app(engine, db.clone()), db)
}

/// Insert a user directly with a cheap hash to keep the tests fast.
async fn seed_user(db: &DatabaseConnection, email: &str) {
    let hashed = bcrypt::hash(PASSWORD, 4).unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (id, email, password, is_active, is_superuser, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
        vec![
            Uuid::new_v4().as_bytes().to_vec().into(),
            email.into(),
            hashed.into(),
            true.into(),
            false.into(),
            Utc::now().into(),
        ],
    ))
    .await
    .unwrap();
}

fn basic_auth(email: &str, password: &str) -> String {
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(format!("{email}:{password}"))
    )
}

fn request(method: &str, uri: &str, email: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(email) = email {
        builder = builder.header(header::AUTHORIZATION, basic_auth(email, PASSWORD));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn signup_and_authenticate() {
    let (app, _db) = test_app().await;

    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/users/signup",
            None,
            Some(json!({"email": "Alice@Example.com", "password": PASSWORD})),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = json_body(res).await;
    assert_eq!(body["email"], "alice@example.com");

    // Same email again conflicts.
    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/users/signup",
            None,
            Some(json!({"email": "alice@example.com", "password": PASSWORD})),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app
        .clone()
        .oneshot(request("GET", "/users/me", Some("alice@example.com"), None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["is_superuser"], false);

    // Wrong password is rejected.
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/users/me")
                .header(
                    header::AUTHORIZATION,
                    basic_auth("alice@example.com", "wrong-password"),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Missing credentials never reach the handlers.
    let res = app
        .clone()
        .oneshot(request("GET", "/users/me", None, None))
        .await
        .unwrap();
    assert_ne!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn transaction_crud_with_ownership() {
    let (app, db) = test_app().await;
    seed_user(&db, "alice@example.com").await;
    seed_user(&db, "bob@example.com").await;

    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/categories",
            Some("alice@example.com"),
            Some(json!({"name": "Groceries", "description": "Food and household"})),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let category = json_body(res).await;
    let category_id = category["id"].as_i64().unwrap();

    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/transactions",
            Some("alice@example.com"),
            Some(json!({
                "amount": 1500,
                "transaction_type": "expense",
                "category_id": category_id,
                "payment_method": "card",
                "description": "weekly shop",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let tx = json_body(res).await;
    let tx_id = tx["id"].as_i64().unwrap();
    assert_eq!(tx["category"]["name"], "Groceries");

    // Bob sees an empty list; the row exists but is not his.
    let res = app
        .clone()
        .oneshot(request(
            "GET",
            "/transactions",
            Some("bob@example.com"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["total"], 0);
    assert_eq!(body["items"].as_array().unwrap().len(), 0);

    // Direct lookup by id is forbidden for Bob.
    let res = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/transactions/{tx_id}"),
            Some("bob@example.com"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Alice patches the amount; other fields stay.
    let res = app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/transactions/{tx_id}"),
            Some("alice@example.com"),
            Some(json!({"amount": 1750})),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["amount"], 1750);
    assert_eq!(body["description"], "weekly shop");

    // Zero amounts are rejected upstream of storage.
    let res = app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/transactions/{tx_id}"),
            Some("alice@example.com"),
            Some(json!({"amount": 0})),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let res = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/transactions/{tx_id}"),
            Some("alice@example.com"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/transactions/{tx_id}"),
            Some("alice@example.com"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_criteria_pass_through_the_query_string() {
    let (app, db) = test_app().await;
    seed_user(&db, "alice@example.com").await;

    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/categories",
            Some("alice@example.com"),
            Some(json!({"name": "General", "description": "Catch-all"})),
        ))
        .await
        .unwrap();
    let category_id = json_body(res).await["id"].as_i64().unwrap();

    for (amount, date) in [(500, "2024-01-10"), (100, "2024-01-15"), (300, "2024-02-01")] {
        let res = app
            .clone()
            .oneshot(request(
                "POST",
                "/transactions",
                Some("alice@example.com"),
                Some(json!({
                    "amount": amount,
                    "transaction_type": "expense",
                    "category_id": category_id,
                    "transaction_date": format!("{date}T09:30:00Z"),
                })),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    // Amount ascending with a zero (ignored) lower bound.
    let res = app
        .clone()
        .oneshot(request(
            "GET",
            "/transactions?sort_by=amount&sort_order=asc&min_amount=0",
            Some("alice@example.com"),
            None,
        ))
        .await
        .unwrap();
    let body = json_body(res).await;
    assert_eq!(body["total"], 3);
    let amounts: Vec<i64> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["amount"].as_i64().unwrap())
        .collect();
    assert_eq!(amounts, vec![100, 300, 500]);

    // Day-inclusive end date keeps the 2024-01-15 row.
    let res = app
        .clone()
        .oneshot(request(
            "GET",
            "/transactions?start_date=2024-01-15&end_date=2024-01-15",
            Some("alice@example.com"),
            None,
        ))
        .await
        .unwrap();
    let body = json_body(res).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["amount"], 100);

    // Window smaller than the match set still reports the full total.
    let res = app
        .clone()
        .oneshot(request(
            "GET",
            "/transactions?skip=2&limit=2",
            Some("alice@example.com"),
            None,
        ))
        .await
        .unwrap();
    let body = json_body(res).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn statistics_endpoints_report_per_user() {
    let (app, db) = test_app().await;
    seed_user(&db, "alice@example.com").await;

    let mut category_ids = Vec::new();
    for name in ["Groceries", "Rent"] {
        let res = app
            .clone()
            .oneshot(request(
                "POST",
                "/categories",
                Some("alice@example.com"),
                Some(json!({"name": name, "description": "test"})),
            ))
            .await
            .unwrap();
        category_ids.push(json_body(res).await["id"].as_i64().unwrap());
    }

    for (category_id, amount, kind, date) in [
        (category_ids[0], 100, "expense", "2024-01-05"),
        (category_ids[0], 200, "expense", "2024-01-20"),
        (category_ids[1], 500, "expense", "2024-03-01"),
        (category_ids[0], 1000, "income", "2024-01-02"),
    ] {
        let res = app
            .clone()
            .oneshot(request(
                "POST",
                "/transactions",
                Some("alice@example.com"),
                Some(json!({
                    "amount": amount,
                    "transaction_type": kind,
                    "category_id": category_id,
                    "transaction_date": format!("{date}T12:00:00Z"),
                })),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = app
        .clone()
        .oneshot(request(
            "GET",
            "/transactions/statistics/category-spending?limit=1",
            Some("alice@example.com"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["category_name"], "Rent");
    assert_eq!(rows[0]["total_amount"], 500);
    assert_eq!(rows[0]["transaction_count"], 1);

    let res = app
        .clone()
        .oneshot(request(
            "GET",
            "/transactions/statistics/monthly-trends?months=6",
            Some("alice@example.com"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    let rows = body.as_array().unwrap();
    // January and March only, ascending; February does not appear.
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["month"], 1);
    assert_eq!(rows[0]["income"], 1000);
    assert_eq!(rows[0]["expense"], 300);
    assert_eq!(rows[0]["net"], 700);
    assert_eq!(rows[1]["month"], 3);
    assert_eq!(rows[1]["net"], -500);
}
