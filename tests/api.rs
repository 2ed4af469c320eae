use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use todo_scaffold::{app, AppConfig, AppState, Database, FixedIdentityProvider, Identity};
use tower::util::ServiceExt;

fn config(devtools: bool) -> AppConfig {
    let mut config = AppConfig::from_lookup(|_| None).unwrap();
    config.devtools = devtools;
    config
}

fn test_app(db: Database) -> Router {
    app(AppState::new(db, config(true)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_and_version() {
    let app = test_app(Database::in_memory());
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");

    let (_, body) = send(&app, Method::GET, "/version", None).await;
    assert_eq!(body["name"], "todo-scaffold");
}

#[tokio::test]
async fn list_defaults_to_first_page() {
    let db = Database::in_memory();
    todo_scaffold::seed(&db).await.unwrap();
    let app = test_app(db);

    let (status, body) = send(&app, Method::GET, "/todos", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["skip"], 0);
    assert_eq!(body["meta"]["take"], 20);
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["data"][0]["title"], "Buy groceries");
}

#[tokio::test]
async fn list_coerces_query_paging() {
    let db = Database::in_memory();
    todo_scaffold::seed(&db).await.unwrap();
    let app = test_app(db);

    let (status, body) = send(&app, Method::GET, "/todos?skip=1&take=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 1);
    assert_eq!(body["data"][0]["title"], "Read a book");

    let (status, body) = send(&app, Method::GET, "/todos?take=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["skip"], 0);
    assert_eq!(body["meta"]["take"], 5);
}

#[tokio::test]
async fn paging_out_of_range_is_422() {
    let app = test_app(Database::in_memory());

    let (status, body) = send(&app, Method::GET, "/todos?skip=-1", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["details"][0]["path"], "page.skip");
    assert_eq!(body["error"]["details"][0]["code"], "too_small");

    let (status, body) = send(&app, Method::GET, "/todos?take=101", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"][0]["path"], "page.take");
    assert_eq!(body["error"]["details"][0]["code"], "too_big");
}

#[tokio::test]
async fn todo_crud() {
    let app = test_app(Database::in_memory());

    let (status, body) = send(&app, Method::POST, "/todos", Some(json!({ "title": "Workout" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    let uri = format!("/todos/{}", id);
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Workout");

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "title": "Run" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Run");

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn create_rejects_bad_bodies() {
    let app = test_app(Database::in_memory());

    let (status, body) = send(&app, Method::POST, "/todos", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"][0]["path"], "body");
    assert_eq!(body["error"]["details"][0]["code"], "required");

    let (status, body) = send(
        &app,
        Method::POST,
        "/todos",
        Some(json!({ "title": "x", "done": true })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"][0]["code"], "unrecognized_key");
    assert_eq!(body["error"]["details"][0]["key"], "done");
}

#[tokio::test]
async fn non_numeric_todo_id_is_422() {
    let app = test_app(Database::in_memory());
    let (status, body) = send(&app, Method::GET, "/todos/abc", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"][0]["path"], "params.id");
}

#[tokio::test]
async fn undecodable_path_param_is_400() {
    let app = test_app(Database::in_memory());
    let (status, body) = send(&app, Method::GET, "/todos/%FF", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn huge_offset_returns_an_empty_page() {
    let db = Database::in_memory();
    todo_scaffold::seed(&db).await.unwrap();
    let app = test_app(db);

    let (status, body) = send(&app, Method::GET, "/todos?skip=5000000000", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["skip"], 5_000_000_000_u64);
    assert_eq!(body["meta"]["count"], 0);
    assert_eq!(body["meta"]["total"], 3);
}

#[tokio::test]
async fn whitespace_title_is_422() {
    let app = test_app(Database::in_memory());
    let (status, body) = send(&app, Method::POST, "/todos", Some(json!({ "title": "   " }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["details"][0]["path"], "body.title");
    assert_eq!(body["error"]["details"][0]["code"], "pattern_mismatch");

    let (_, body) = send(&app, Method::GET, "/todos", None).await;
    assert_eq!(body["meta"]["total"], 0);
}

#[tokio::test]
async fn duplicate_user_is_409() {
    let state = AppState::new(Database::in_memory(), config(false));
    let users = todo_scaffold::service::UserService::new(state.db.clone());
    let jane = todo_scaffold::db::NewUser {
        id: "abc".into(),
        first_name: "Jane".into(),
        full_name: "Jane Smith".into(),
        email: "jane@example.com".into(),
    };
    users.create(&jane).await.unwrap();
    let err = users.create(&jane).await.unwrap_err();
    assert_eq!(err.status_and_code().0, StatusCode::CONFLICT);
}

#[tokio::test]
async fn sign_in_then_fetch_user() {
    let app = test_app(Database::in_memory());
    let profile = json!({
        "authSchId": "abc",
        "firstName": "Jane",
        "fullName": "Jane Smith",
        "email": "jane@example.com"
    });
    let (status, body) = send(&app, Method::POST, "/auth/callback", Some(profile.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["userId"], "abc");

    let (_, body) = send(&app, Method::POST, "/auth/callback", Some(profile)).await;
    assert_eq!(body["data"]["userId"], "abc");

    let (status, body) = send(&app, Method::GET, "/users/abc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["fullName"], "Jane Smith");

    let (status, body) = send(&app, Method::PATCH, "/users/abc", Some(json!({ "email": "j@kir.dev" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "j@kir.dev");

    let (_, body) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(body["meta"]["count"], 1);

    let (status, _) = send(&app, Method::DELETE, "/users/abc", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn current_identity_comes_from_guard() {
    let app = test_app(Database::in_memory());
    let (status, body) = send(&app, Method::GET, "/auth/me", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "mock-user-id");
}

#[tokio::test]
async fn missing_scope_is_forbidden() {
    let reader = FixedIdentityProvider(Identity {
        id: "reader".into(),
        scopes: vec!["todo:read".into()],
    });
    let state = AppState::new(Database::in_memory(), config(false)).with_identity(reader);
    let app = app(state);

    let (status, _) = send(&app, Method::GET, "/todos", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::POST, "/todos", Some(json!({ "title": "x" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "forbidden");

    let (status, _) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn devtools_panels() {
    let app = test_app(Database::in_memory());

    let (_, body) = send(&app, Method::GET, "/devtools", None).await;
    assert_eq!(body["data"]["position"], "bottom-right");

    let (status, body) = send(&app, Method::GET, "/devtools/package", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "todo-scaffold");
    assert!(body["data"]["dependencies"]["axum"].is_string());

    let (_, body) = send(&app, Method::GET, "/devtools/store", None).await;
    assert_eq!(body["data"]["fullName"], "Jane Smith");

    let (status, body) = send(&app, Method::PATCH, "/devtools/store", Some(json!({ "lastName": "Doe" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["fullName"], "Jane Doe");

    let report = json!({
        "outdated": { "tokio": { "current": "1.0.0", "wanted": "1.0.1", "latest": "2.0.0" } }
    });
    let (_, body) = send(&app, Method::POST, "/devtools/package/outdated", Some(report)).await;
    assert_eq!(body["data"][0]["bump"], "major");
}

#[tokio::test]
async fn malformed_outdated_report_uses_error_envelope() {
    let app = test_app(Database::in_memory());

    let report = json!({ "outdated": { "tokio": { "current": 1 } } });
    let (status, body) = send(&app, Method::POST, "/devtools/package/outdated", Some(report)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/devtools/package/outdated")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn devtools_absent_when_disabled() {
    let app = app(AppState::new(Database::in_memory(), config(false)));
    let (status, _) = send(&app, Method::GET, "/devtools/store", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
