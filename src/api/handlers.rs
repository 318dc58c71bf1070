//! API request handlers
//!
//! Handlers for the auth, user and report endpoints, plus the
//! [`DashboardError`] → HTTP status mapping. The report endpoint never trusts
//! a client-supplied employee name: the name on the generated report always
//! comes from the authenticated session.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::COOKIE_TTL_HOURS;
use crate::error::{DashboardError, DashboardResult};
use crate::report::{self, XLSX_MIME_TYPE};
use crate::users::{NewUser, User, UserUpdate};

use super::server::AppState;

/// Error wrapper giving every handler a uniform JSON error body.
pub struct ApiError(pub DashboardError);

impl From<DashboardError> for ApiError {
    fn from(error: DashboardError) -> Self {
        Self(error)
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = error_status(&self.0);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (
            status,
            Json(ErrorResponse {
                message: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// Map pipeline and store errors onto response codes. Caller mistakes are
/// 4xx; a missing template asset is a deployment fault and stays 5xx.
pub(crate) fn error_status(error: &DashboardError) -> StatusCode {
    match error {
        DashboardError::NoFileProvided
        | DashboardError::NoMatchingData
        | DashboardError::InvalidMonth(_)
        | DashboardError::MissingField(_)
        | DashboardError::Upload(_)
        | DashboardError::Spreadsheet(_)
        | DashboardError::Store(_) => StatusCode::BAD_REQUEST,
        DashboardError::InvalidCredentials | DashboardError::Unauthorized => {
            StatusCode::UNAUTHORIZED
        }
        DashboardError::UserNotFound => StatusCode::NOT_FOUND,
        DashboardError::TemplateMissing(_)
        | DashboardError::Io(_)
        | DashboardError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Resolve the authenticated user from the session cookie.
fn authenticate(state: &AppState, jar: &CookieJar) -> DashboardResult<User> {
    let cookie = jar
        .get(&state.config.cookie_name)
        .ok_or(DashboardError::Unauthorized)?;
    let user_id = state
        .sessions
        .resolve(cookie.value())
        .ok_or(DashboardError::Unauthorized)?;
    state.users.get(user_id).ok_or(DashboardError::Unauthorized)
}

// ==================== DTOs ====================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Public view of a user: everything except the password hash.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            username: user.username,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ==================== Health ====================

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ==================== Auth ====================

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    let user = state
        .users
        .verify_credentials(&req.email, &req.password)
        .map_err(|e| {
            warn!(email = %req.email, "failed login attempt");
            ApiError(e)
        })?;

    let token = state.sessions.issue(user.id);
    let cookie = Cookie::build((state.config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::hours(COOKIE_TTL_HOURS))
        .build();

    info!(user_id = user.id, "user logged in");
    Ok((
        jar.add(cookie),
        Json(MessageResponse {
            message: "Login successful.".to_string(),
        }),
    ))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    if let Some(token) = jar
        .get(&state.config.cookie_name)
        .map(|cookie| cookie.value().to_string())
    {
        state.sessions.revoke(&token);
    }

    let removal = Cookie::build((state.config.cookie_name.clone(), ""))
        .path("/")
        .build();
    (
        jar.remove(removal),
        Json(MessageResponse {
            message: "Logged out successfully.".to_string(),
        }),
    )
}

/// GET /api/auth/me
pub async fn current_user_profile(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<UserResponse>, ApiError> {
    let user = authenticate(&state, &jar)?;
    Ok(Json(user.into()))
}

// ==================== Users ====================

/// GET /api/user
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    authenticate(&state, &jar)?;
    let users = state.users.list().into_iter().map(UserResponse::from).collect();
    Ok(Json(users))
}

/// GET /api/user/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<u32>,
) -> Result<Json<UserResponse>, ApiError> {
    authenticate(&state, &jar)?;
    let user = state.users.get(id).ok_or(DashboardError::UserNotFound)?;
    Ok(Json(user.into()))
}

/// POST /api/user
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<NewUser>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    authenticate(&state, &jar)?;
    let user = state.users.create(req)?;
    info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PUT /api/user/{id}
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<u32>,
    Json(req): Json<UserUpdate>,
) -> Result<StatusCode, ApiError> {
    authenticate(&state, &jar)?;
    state.users.update(id, req)?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/user/{id}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<u32>,
) -> Result<StatusCode, ApiError> {
    authenticate(&state, &jar)?;
    state.users.delete(id)?;
    info!(user_id = id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ==================== Reports ====================

/// POST /api/tempestive/alfasReports
///
/// Multipart form: `month` (1-12), `year`, `file` (the uploaded timesheet).
/// Responds with the generated xlsx as an attachment.
pub async fn generate_alfa_report(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, &jar)?;

    let mut month: Option<u32> = None;
    let mut year: Option<i32> = None;
    let mut file_data: Vec<u8> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DashboardError::Upload(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "month" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| DashboardError::Upload(e.to_string()))?;
                month = text.trim().parse().ok();
            }
            "year" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| DashboardError::Upload(e.to_string()))?;
                year = text.trim().parse().ok();
            }
            "file" => {
                file_data = field
                    .bytes()
                    .await
                    .map_err(|e| DashboardError::Upload(e.to_string()))?
                    .to_vec();
            }
            _ => {}
        }
    }

    if file_data.is_empty() {
        return Err(DashboardError::NoFileProvided.into());
    }
    let month = month.ok_or(DashboardError::MissingField("month"))?;
    let year = year.ok_or(DashboardError::MissingField("year"))?;

    info!(user_id = user.id, month, year, "generating Alfa report");
    let generated = report::generate_report(
        &state.config.template_path(),
        &file_data,
        month,
        year,
        &user.full_name(),
    )?;

    let disposition = format!("attachment; filename=\"{}\"", generated.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_MIME_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        generated.bytes,
    )
        .into_response())
}
