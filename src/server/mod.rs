//! HTTP/WebSocket server for the collaborative board
//!
//! Exposes the task store over a JSON REST API plus a WebSocket event stream
//! that keeps every connected client's view converged in real time.

pub mod routes;
pub mod state;
mod ws;

pub use state::AppState;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue,
    },
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Build the application router. Split out from [`run_server`] so tests can
/// drive handlers without binding a socket.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/tasks",
            post(routes::task_routes::create_task).get(routes::task_routes::list_tasks),
        )
        .route(
            "/api/tasks/:id",
            put(routes::task_routes::update_task)
                .get(routes::task_routes::get_task)
                .delete(routes::task_routes::delete_task),
        )
        .route(
            "/api/tasks/smart-assign/:id",
            post(routes::task_routes::smart_assign),
        )
        .route("/api/actions", get(routes::action_routes::recent_actions))
        .route(
            "/api/users",
            post(routes::user_routes::create_user).get(routes::user_routes::list_users),
        )
        .route("/ws/events", get(ws::ws_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Run the HTTP/WebSocket server
pub async fn run_server(
    port: u16,
    bind: &str,
    state: AppState,
    cors_origins: Option<Vec<String>>,
) -> Result<(), String> {
    // Build CORS layer
    // Must be the outermost layer so preflight OPTIONS requests succeed
    let cors = match &cors_origins {
        Some(origins) if !origins.is_empty() => {
            // Restricted CORS: only allow specified origins
            let allowed_origins: Vec<HeaderValue> =
                origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods(Any)
                .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
        }
        _ => {
            // Permissive CORS: allow any origin (default for development)
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
        }
    };

    let app = build_router(state.clone()).layer(cors);

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let cors_display = match &cors_origins {
        Some(origins) if !origins.is_empty() => origins.join(", "),
        _ => "*".to_string(),
    };

    println!("Boardsync server");
    println!("  URL:          http://{}:{}", bind, port);
    println!("  CORS origins: {}", cors_display);
    println!("  Endpoints:");
    println!("    POST /api/tasks                      - Create task");
    println!("    GET  /api/tasks                      - List tasks");
    println!("    PUT  /api/tasks/:id                  - Update task (version-checked)");
    println!("    POST /api/tasks/smart-assign/:id     - Auto-assign least-loaded user");
    println!("    GET  /api/actions                    - Recent activity");
    println!("    GET  /ws/events                      - WebSocket event stream");
    println!("    GET  /health                         - Health check");

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    log::info!("Server listening on http://{}", addr);

    // Create shutdown signal that waits for the shutdown state flag
    let shutdown_state = state.shutdown_state.clone();
    let shutdown_signal = async move {
        loop {
            if shutdown_state.is_shutdown_requested() {
                log::info!("Shutdown signal received, stopping server...");
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| format!("Server error: {}", e))
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}
