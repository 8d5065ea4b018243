//! Users demo backend.
//!
//! A JSON file backed users API, a realtime echo channel and the HTML shell
//! for the client bundle.
//!
//!
//!
//! # API
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/api/v1/users` | all stored users, seeded from the remote source when the store is missing |
//! | POST | `/api/v1/users` | append a user, id is the last user's id + 1 |
//! | PATCH | `/api/v1/users/{userId}` | merge the body into the matching user |
//! | DELETE | `/api/v1/users/{userId}` | drop the matching user |
//! | DELETE | `/api/v1/users` | drop the store file |
//! | GET | `/api/v1/users/take/{number}` | first `number` users of the remote source |
//! | GET | `/api/v1/users/{userId}` | the matching user or `null` |
//!
//! Every API response is a 200 with a JSON body. Failures come back as
//! `{"status": "error", "error": "..."}`.
//!
//!
//!
//! # Environment
//!
//! | Variable | Default |
//! |---|---|
//! | `PORT` | `3000` |
//! | `USER_FILE_PATH` | `user.json` |
//! | `ASSETS_DIR` | `dist/assets` |
//! | `SEED_URL` | `http://jsonplaceholder.typicode.com/users` |
//! | `RUST_LOG` | `info` |
//!
//!
//!
//! # Run
//!
//! ```sh
//! RUST_LOG=server=debug,tower_http=debug cargo run -p server
//! ```
use std::{future::pending, sync::Arc};

use anyhow::Context;
use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    handler::HandlerWithoutStateExt,
    http::{
        HeaderName, HeaderValue, Method,
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
    },
    middleware::{Next, from_fn},
    response::Response,
    routing::get,
};
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod echo;
pub mod error;
pub mod routes;
pub mod shell;
pub mod state;
pub mod user;
pub mod utils;

use config::Config;
use echo::echo_handler;
use routes::{
    create_user, delete_user, delete_users, get_user, list_users, take_users, update_user,
};
use shell::render_shell;
use state::AppState;

pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

pub const SKILLCRUCIAL_USER: &str = "d8a9d949-d1f3-4999-9c60-fb9eeb53af33";

pub fn app(state: Arc<AppState>) -> Router {
    let assets = ServeDir::new(&state.config.assets_dir).fallback(render_shell.into_service());

    Router::new()
        .route(
            "/api/v1/users",
            get(list_users).post(create_user).delete(delete_users),
        )
        .route("/api/v1/users/take/{number}", get(take_users))
        .route(
            "/api/v1/users/{user_id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/ws", get(echo_handler))
        .route("/ws/{*path}", get(echo_handler))
        .fallback_service(assets)
        .layer(from_fn(identity_headers))
        .layer(cors())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn identity_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static("x-skillcrucial-user"),
        HeaderValue::from_static(SKILLCRUCIAL_USER),
    );
    headers.insert(
        ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("X-SKILLCRUCIAL-USER"),
    );

    response
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(Any)
}

pub async fn start_server() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    info!("Loading config...");
    let config = Config::load().context("Environment misconfigured")?;

    info!("Initializing state...");
    let state = AppState::new(config);

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Serving at http://localhost:{}", state.config.port);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server stopped unexpectedly")?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
