//! API server wiring
//!
//! Axum router, CORS for the SPA dev origins, request tracing and graceful
//! shutdown. All shared state lives in [`AppState`] behind an `Arc`; nothing
//! global, nothing cached across requests.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::SessionStore;
use crate::config::Config;
use crate::users::UserStore;

use super::handlers;

/// Upper bound for multipart uploads. Timesheet exports are small; anything
/// bigger than this is not a timesheet.
const UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub users: UserStore,
    pub sessions: SessionStore,
}

/// Build the application router for the given state.
pub fn build_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Auth
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/me", get(handlers::current_user_profile))
        // User CRUD
        .route(
            "/api/user",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/api/user/:id",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        // Report generation
        .route(
            "/api/tempestive/alfasReports",
            post(handlers::generate_alfa_report),
        )
        .with_state(state)
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server until shutdown.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tempestive_dashboard=info,tower_http=info".into()),
        )
        .init();

    let users = UserStore::open(&config.users_file)?;
    if let Some(seed) = &config.default_user {
        users.seed_default(seed)?;
    }

    // Credentialed CORS needs explicit origins, no wildcards
    let mut origins: Vec<HeaderValue> = Vec::new();
    for origin in &config.allowed_origins {
        origins.push(origin.parse()?);
    }
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let state = Arc::new(AppState {
        config,
        users,
        sessions: SessionStore::new(),
    });

    let app = build_router(state, cors);

    info!("dashboard API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("dashboard API shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
