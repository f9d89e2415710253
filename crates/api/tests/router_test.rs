//! Router tests: auth rejection, request validation and error mapping.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use fleetbook_api::{AppState, create_router};
use fleetbook_db::entities::{branches, purchase_sales, sea_orm_active_enums::LedgerStatus, users};
use fleetbook_shared::{JwtConfig, JwtService};

const SECRET: &str = "router-test-secret";

fn jwt() -> JwtService {
    JwtService::new(JwtConfig {
        secret: SECRET.to_string(),
        access_token_expires_secs: 600,
    })
}

fn app(db: DatabaseConnection) -> Router {
    create_router(AppState::new(db, jwt()))
}

fn token() -> String {
    jwt().generate_access_token(Uuid::new_v4(), "admin").unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post(uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn branch(name: &str) -> branches::Model {
    let now = chrono::Utc::now().into();
    branches::Model {
        id: Uuid::new_v4(),
        name: name.to_string(),
        location: None,
        phone: None,
        created_at: now,
        updated_at: now,
    }
}

fn empty_ledger() -> purchase_sales::Model {
    let now = chrono::Utc::now().into();
    purchase_sales::Model {
        id: Uuid::new_v4(),
        vehicle_id: Uuid::new_v4(),
        title: "April run".to_string(),
        start_date: chrono::NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
        opening_balance: Decimal::ZERO,
        current_balance: Decimal::ZERO,
        current_tins: 0,
        status: LedgerStatus::Active,
        completed_at: None,
        completion_expense_id: None,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_health_reports_database_down() {
    let response = app(DatabaseConnection::Disconnected)
        .oneshot(get("/api/v1/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["database"], json!(false));
    assert_eq!(body["status"], json!("degraded"));
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let response = app(DatabaseConnection::Disconnected)
        .oneshot(get("/api/v1/branches", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], json!("missing_token"));
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let response = app(DatabaseConnection::Disconnected)
        .oneshot(get("/api/v1/dashboard/summary", Some("not-a-jwt")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], json!("invalid_token"));
}

#[tokio::test]
async fn test_token_from_other_secret_is_rejected() {
    let foreign = JwtService::new(JwtConfig {
        secret: "someone-else".to_string(),
        access_token_expires_secs: 600,
    })
    .generate_access_token(Uuid::new_v4(), "mallory")
    .unwrap();

    let response = app(DatabaseConnection::Disconnected)
        .oneshot(get("/api/v1/branches", Some(&foreign)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_branches_with_token() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![branch("North"), branch("South")]])
        .into_connection();

    let response = app(db)
        .oneshot(get("/api/v1/branches", Some(&token())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[0]["name"], json!("North"));
}

#[tokio::test]
async fn test_blank_branch_name_is_a_validation_error() {
    let response = app(DatabaseConnection::Disconnected)
        .oneshot(post("/api/v1/branches", Some(&token()), &json!({ "name": "" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], json!("validation_error"));
}

#[tokio::test]
async fn test_purchase_beyond_balance_is_unprocessable() {
    let ledger = empty_ledger();
    let uri = format!("/api/v1/purchase-sales/{}/transactions", ledger.id);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![ledger]])
        .into_connection();

    let response = app(db)
        .oneshot(post(
            &uri,
            Some(&token()),
            &json!({ "kind": "purchase", "amount": "100.00", "tins": 5 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(response).await["error"], json!("insufficient_balance"));
}

#[tokio::test]
async fn test_expense_row_with_tins_is_a_validation_error() {
    let uri = format!("/api/v1/purchase-sales/{}/transactions", Uuid::new_v4());

    let response = app(DatabaseConnection::Disconnected)
        .oneshot(post(
            &uri,
            Some(&token()),
            &json!({ "kind": "expense", "amount": "10", "tins": 1 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_unknown_user() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<users::Model>::new()])
        .into_connection();

    let response = app(db)
        .oneshot(post(
            "/api/v1/auth/login",
            None,
            &json!({ "username": "ghost", "password": "secret" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], json!("invalid_credentials"));
}

#[tokio::test]
async fn test_reports_reject_inverted_range() {
    let response = app(DatabaseConnection::Disconnected)
        .oneshot(get(
            "/api/v1/reports/expenses/by-category?from=2026-05-01&to=2026-04-01",
            Some(&token()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_purchase_line_is_unprocessable() {
    let uri = format!("/api/v1/trips/{}/purchases", Uuid::new_v4());

    let response = app(DatabaseConnection::Disconnected)
        .oneshot(post(
            &uri,
            Some(&token()),
            &json!({ "quantity": "9999999999999999", "rate": "9999999999999999" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(response).await["error"], json!("amount_overflow"));
}

#[tokio::test]
async fn test_sub_cent_ledger_amount_is_a_validation_error() {
    let uri = format!("/api/v1/purchase-sales/{}/transactions", Uuid::new_v4());

    let response = app(DatabaseConnection::Disconnected)
        .oneshot(post(
            &uri,
            Some(&token()),
            &json!({ "kind": "purchase", "amount": "0.00001", "tins": 1 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], json!("validation_error"));
}
