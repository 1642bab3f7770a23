use crate::error::ApiError;
use crate::service::ServiceError;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{header, Method},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub const CREATED_MESSAGE: &str = "Post successfully created";

/// Create bodies are buffered whole with no size cap.
pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/posts/index", get(index))
        .route("/posts/create", any(create))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

/// Binds `addr` and serves in the background until ctrl-c.
/// Returns the bound address, useful when `addr` asks for port 0.
pub async fn start_server(
    addr: SocketAddr,
    app_state: AppState,
) -> io::Result<(SocketAddr, JoinHandle<io::Result<()>>)> {
    let app = router(app_state);
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    info!(%local_addr, "post server listening");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    });

    Ok((local_addr, handle))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn index(State(state): State<AppState>) -> Result<Response, ApiError> {
    let service = state.posts.clone();
    let posts = run_blocking(move || service.enumerate()).await?;

    let body = serde_json::to_string_pretty(&posts).map_err(|e| {
        error!(error = %e, "failed to encode posts");
        ApiError::Internal("Error encoding posts")
    })?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

async fn create(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Result<&'static str, ApiError> {
    if method != Method::POST {
        return Err(ApiError::MethodNotAllowed);
    }

    let body = body.map_err(|e| {
        error!(error = %e, "failed to read request body");
        ApiError::BadRequest("Error reading request body")
    })?;

    let service = state.posts.clone();
    run_blocking(move || service.create(&body)).await?;

    Ok(CREATED_MESSAGE)
}

/// File I/O runs under the store lock, so keep it off the async workers.
async fn run_blocking<T, F>(op: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(op).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            error!(error = %e, "blocking task failed");
            Err(ApiError::Internal("Internal server error"))
        }
    }
}
