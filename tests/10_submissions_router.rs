use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use matbook_api::app::{router, AppState};
use matbook_api::config::AppConfig;
use matbook_api::database::{
    DatabaseError, DatabaseManager, ListQuery, Page, SqliteSubmissionStore, Submission, SubmissionStore,
};
use matbook_api::schema;
use matbook_api::value::Record;

async fn app_with(config: AppConfig) -> Router {
    let pool = DatabaseManager::memory().await.unwrap();
    let state = AppState::new(config, schema::builtin().unwrap(), SqliteSubmissionStore::new(pool));
    router(state)
}

async fn app() -> Router {
    app_with(AppConfig::development()).await
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<String>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(b) => {
            builder = builder.header("content-type", "application/json");
            Body::from(b)
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn valid_record() -> Value {
    json!({
        "fullName": "Grace Hopper",
        "email": "grace@example.com",
        "age": 45,
        "department": "eng",
        "skills": ["python", "sql", "react"],
        "startDate": "2024-06-01",
        "bio": "Compilers",
        "remote": true
    })
}

async fn post(app: &Router, record: &Value) -> (StatusCode, Value) {
    send(app, "POST", "/api/submissions", Some(record.to_string())).await
}

#[tokio::test]
async fn serves_form_schema() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/api/form-schema", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], json!("Employee Onboarding"));
    assert_eq!(body["fields"].as_array().unwrap().len(), 8);
    assert_eq!(body["fields"][4]["type"], json!("multi-select"));
    assert_eq!(body["fields"][0]["validation"]["regex"], json!("^[a-zA-Z\\s]*$"));
    assert_eq!(body["fields"][2]["validation"], json!({ "min": 18, "max": 65 }));
}

#[tokio::test]
async fn whole_number_bounds_have_no_fraction_on_the_wire() {
    let app = app().await;
    let request = Request::builder().uri("/api/form-schema").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains(r#""min":18,"max":65"#), "{}", text);
}

#[tokio::test]
async fn create_then_get_round_trips_payload() {
    let app = app().await;
    let record = valid_record();

    let (status, created) = post(&app, &record).await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["success"], json!(true));
    let id = created["id"].as_str().unwrap().to_string();
    assert!(created["createdAt"].as_str().unwrap().ends_with('Z'));

    let (status, fetched) = send(&app, "GET", &format!("/api/submissions/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["id"], json!(id));
    assert_eq!(fetched["data"]["data"], record);
    assert_eq!(fetched["data"]["data"]["skills"], json!(["python", "sql", "react"]));
    assert_eq!(fetched["data"]["createdAt"], created["createdAt"]);
}

#[tokio::test]
async fn invalid_submission_is_rejected_with_field_errors() {
    let app = app().await;
    let mut record = valid_record();
    record["age"] = json!(70);
    record.as_object_mut().unwrap().remove("email");

    let (status, body) = post(&app, &record).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Validation failed"));
    assert_eq!(body["errors"]["age"], json!("Max value is 65"));
    assert_eq!(body["errors"]["email"], json!("Email Address is required"));
    assert_eq!(body["errors"].as_object().unwrap().len(), 2);

    let (_, listing) = send(&app, "GET", "/api/submissions", None).await;
    assert_eq!(listing["meta"]["total"], json!(0));
}

#[tokio::test]
async fn second_page_of_fifteen() {
    let app = app().await;
    for _ in 0..15 {
        let (status, _) = post(&app, &valid_record()).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/api/submissions?page=2&limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["meta"], json!({ "total": 15, "page": 2, "limit": 10, "totalPages": 2 }));
}

#[tokio::test]
async fn list_defaults_and_search() {
    let app = app().await;
    post(&app, &valid_record()).await;
    let mut other = valid_record();
    other["fullName"] = json!("Alan Turing");
    post(&app, &other).await;

    let (_, body) = send(&app, "GET", "/api/submissions?page=abc&sortOrder=sideways", None).await;
    assert_eq!(body["meta"]["page"], json!(1));
    assert_eq!(body["meta"]["limit"], json!(10));
    // newest first by default
    assert_eq!(body["data"][0]["data"]["fullName"], json!("Alan Turing"));

    let (_, body) = send(&app, "GET", "/api/submissions?search=Turing", None).await;
    assert_eq!(body["meta"]["total"], json!(1));

    let (_, body) = send(&app, "GET", "/api/submissions?sortOrder=asc", None).await;
    assert_eq!(body["data"][0]["data"]["fullName"], json!("Grace Hopper"));
}

#[tokio::test]
async fn update_replaces_record() {
    let app = app().await;
    let (_, created) = post(&app, &valid_record()).await;
    let id = created["id"].as_str().unwrap();

    let mut changed = valid_record();
    changed["department"] = json!("sales");
    changed.as_object_mut().unwrap().remove("bio");
    let (status, body) = send(&app, "PUT", &format!("/api/submissions/{}", id), Some(changed.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "Updated successfully" }));

    let (_, fetched) = send(&app, "GET", &format!("/api/submissions/{}", id), None).await;
    assert_eq!(fetched["data"]["data"], changed);
}

#[tokio::test]
async fn update_validates_before_lookup() {
    let app = app().await;
    let (status, body) = send(&app, "PUT", "/api/submissions/missing", Some(json!({}).to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Validation failed"));

    let (status, body) =
        send(&app, "PUT", "/api/submissions/missing", Some(valid_record().to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("No submission found with that ID"));
}

#[tokio::test]
async fn delete_existing_and_missing() {
    let app = app().await;
    let (_, created) = post(&app, &valid_record()).await;
    let uri = format!("/api/submissions/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "Deleted successfully" }));

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("No submission found with that ID"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/api/nope?x=1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Can't find /api/nope?x=1 on this server!"));
}

#[tokio::test]
async fn repeated_query_keys_use_first_value() {
    let app = app().await;
    for _ in 0..3 {
        post(&app, &valid_record()).await;
    }

    let (status, body) = send(&app, "GET", "/api/submissions?page=1&page=2&limit=2&limit=9", None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["meta"], json!({ "total": 3, "page": 1, "limit": 2, "totalPages": 2 }));
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unsupported_method_on_known_path_is_404() {
    let app = app().await;
    for (method, uri) in [
        ("PATCH", "/api/submissions/abc"),
        ("POST", "/api/form-schema"),
        ("DELETE", "/api/submissions"),
        ("POST", "/health"),
    ] {
        let (status, body) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!(format!("Can't find {} on this server!", uri)));
    }
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let app = app().await;
    let (status, body) = send(&app, "POST", "/api/submissions", Some("{ not json".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));

    let (status, body) = send(&app, "POST", "/api/submissions", Some("[1, 2]".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Request body must be a JSON object"));
}

#[tokio::test]
async fn health_reports_database() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], json!("ok"));
}

/// Store whose database is always unreachable
struct BrokenStore;

#[async_trait]
impl SubmissionStore for BrokenStore {
    async fn create(&self, _: &Record) -> Result<Submission, DatabaseError> {
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }
    async fn get(&self, _: &str) -> Result<Submission, DatabaseError> {
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }
    async fn list(&self, _: &ListQuery) -> Result<Page<Submission>, DatabaseError> {
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }
    async fn update(&self, _: &str, _: &Record) -> Result<(), DatabaseError> {
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }
    async fn delete(&self, _: &str) -> Result<(), DatabaseError> {
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }
}

fn broken_app(config: AppConfig) -> Router {
    router(AppState::new(config, schema::builtin().unwrap(), BrokenStore))
}

#[tokio::test]
async fn production_hides_server_error_detail() {
    let app = broken_app(AppConfig::production());
    let (status, body) = send(&app, "GET", "/api/submissions", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], json!("Something went wrong on the server"));
    assert!(body.get("detail").is_none());

    // operational errors keep their message in production
    let (status, body) = post(&app, &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Validation failed"));
}

#[tokio::test]
async fn development_shows_server_error_detail() {
    let app = broken_app(AppConfig::development());
    let (status, body) = send(&app, "GET", "/api/submissions", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], json!("error"));
    assert_ne!(body["message"], json!("Something went wrong on the server"));
    assert!(body["detail"].as_str().unwrap().contains("PoolTimedOut"));

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], json!(false));
}
