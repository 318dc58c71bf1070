//! HTTP-level tests: the router is exercised in-process with `oneshot`
//! requests, so every test covers extractors, handlers and the error
//! mapping together without binding a socket.

use std::fs;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use tempestive_dashboard::api::{build_router, AppState};
use tempestive_dashboard::auth::SessionStore;
use tempestive_dashboard::report::TEMPLATE_FILE_NAME;
use tempestive_dashboard::users::{NewUser, UserStore};
use tempestive_dashboard::Config;

fn test_app(dir: &TempDir) -> Router {
    let config = Config {
        users_file: dir.path().join("users.json"),
        templates_dir: dir.path().join("Templates"),
        ..Config::default()
    };

    let users = UserStore::open(&config.users_file).unwrap();
    users
        .create(NewUser {
            first_name: "Anna".to_string(),
            last_name: "Rossi".to_string(),
            username: "arossi".to_string(),
            email: "anna@example.com".to_string(),
            password: "segreta".to_string(),
            is_admin: true,
        })
        .unwrap();

    let state = Arc::new(AppState {
        config,
        users,
        sessions: SessionStore::new(),
    });
    build_router(state, CorsLayer::new())
}

/// Log in and return the session cookie pair (`session=<token>`).
async fn login(app: &Router, email: &str, password: &str) -> String {
    let body = format!(r#"{{"email": "{email}", "password": "{password}"}}"#);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login must set a session cookie")
        .to_str()
        .unwrap();
    set_cookie
        .split(';')
        .next()
        .unwrap()
        .trim()
        .to_string()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_reports_healthy() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_protected_routes_reject_missing_session() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    for (method, uri) in [
        ("GET", "/api/auth/me"),
        ("GET", "/api/user"),
        ("GET", "/api/user/1"),
        ("DELETE", "/api/user/1"),
    ] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"email": "anna@example.com", "password": "sbagliata"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_cookie_grants_profile_access() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let cookie = login(&app, "anna@example.com", "segreta").await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["email"], "anna@example.com");
    assert_eq!(body["first_name"], "Anna");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_logout_revokes_the_session() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let cookie = login(&app, "anna@example.com", "segreta").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The old token must be dead even if the client keeps sending it
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_crud_flow() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let cookie = login(&app, "anna@example.com", "segreta").await;

    // Create
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/user")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"first_name": "Mario", "last_name": "Bianchi",
                        "email": "mario@example.com", "password": "altrettanto"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    let id = created["id"].as_u64().unwrap();
    assert_eq!(created["is_admin"], false);

    // List now holds both users
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/user")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let listed = json_body(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 2);

    // Update mutable fields
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/user/{id}"))
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"first_name": "Maria", "last_name": "Bianchi",
                        "email": "maria@example.com"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/user/{id}"))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let fetched = json_body(response).await;
    assert_eq!(fetched["first_name"], "Maria");
    assert_eq!(fetched["last_name"], "Bianchi");

    // Delete, then the id is gone
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/user/{id}"))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/user/{id}"))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ==================== Report endpoint ====================

const BOUNDARY: &str = "dashboard-test-boundary";

fn multipart_body(month: Option<&str>, year: Option<&str>, file: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();
    let mut text_part = |name: &str, value: &str| {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    };
    if let Some(month) = month {
        text_part("month", month);
    }
    if let Some(year) = year {
        text_part("year", year);
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"timesheet.xlsx\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(file);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn report_request(cookie: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/tempestive/alfasReports")
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn write_template(dir: &TempDir) {
    let templates_dir = dir.path().join("Templates");
    fs::create_dir_all(&templates_dir).unwrap();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "RAPPORTINO MENSILE").unwrap();
    workbook.save(templates_dir.join(TEMPLATE_FILE_NAME)).unwrap();
}

fn timesheet_upload() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "15/02/2024").unwrap();
    worksheet.write_string(0, 1, "Alfa").unwrap();
    worksheet.write_string(0, 2, "8").unwrap();
    workbook.save_to_buffer().unwrap()
}

#[tokio::test]
async fn test_report_endpoint_requires_session() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let response = app
        .oneshot(report_request(
            "session=invalid",
            multipart_body(Some("2"), Some("2024"), Some(&timesheet_upload())),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_report_endpoint_returns_xlsx_attachment() {
    let dir = TempDir::new().unwrap();
    write_template(&dir);
    let app = test_app(&dir);
    let cookie = login(&app, "anna@example.com", "segreta").await;

    let response = app
        .oneshot(report_request(
            &cookie,
            multipart_body(Some("2"), Some("2024"), Some(&timesheet_upload())),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"rapportino_2_2024.xlsx\""
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..2], b"PK"); // xlsx is a zip container
}

#[tokio::test]
async fn test_report_endpoint_without_file_is_400() {
    let dir = TempDir::new().unwrap();
    write_template(&dir);
    let app = test_app(&dir);
    let cookie = login(&app, "anna@example.com", "segreta").await;

    let response = app
        .oneshot(report_request(
            &cookie,
            multipart_body(Some("2"), Some("2024"), None),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_report_endpoint_without_month_is_400() {
    let dir = TempDir::new().unwrap();
    write_template(&dir);
    let app = test_app(&dir);
    let cookie = login(&app, "anna@example.com", "segreta").await;

    let response = app
        .oneshot(report_request(
            &cookie,
            multipart_body(None, Some("2024"), Some(&timesheet_upload())),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["message"].as_str().unwrap().contains("month"));
}

#[tokio::test]
async fn test_report_endpoint_no_rows_in_period_is_400() {
    let dir = TempDir::new().unwrap();
    write_template(&dir);
    let app = test_app(&dir);
    let cookie = login(&app, "anna@example.com", "segreta").await;

    // Upload only holds February rows; July has nothing
    let response = app
        .oneshot(report_request(
            &cookie,
            multipart_body(Some("7"), Some("2024"), Some(&timesheet_upload())),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
