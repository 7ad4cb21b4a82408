use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::{
    BoardError, BoardId, BoardRepository, BoardScheduler, GanttView, RepositoryError,
    ScheduleSummary, WorkloadView,
};

pub type SharedRepository = Box<dyn BoardRepository + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    scheduler: Arc<BoardScheduler<SharedRepository>>,
}

impl AppState {
    pub fn new(scheduler: BoardScheduler<SharedRepository>) -> Self {
        Self {
            scheduler: Arc::new(scheduler),
        }
    }

    fn scheduler(&self) -> Arc<BoardScheduler<SharedRepository>> {
        self.scheduler.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Cyclic(String),
    InvalidBoard(String),
    Internal(String),
}

impl From<BoardError> for ApiError {
    fn from(value: BoardError) -> Self {
        match value {
            BoardError::Schedule(err) if err.is_cycle() => ApiError::Cyclic(err.user_message()),
            BoardError::Schedule(err) => ApiError::InvalidBoard(err.user_message()),
            BoardError::Repository(RepositoryError::BoardNotFound(id)) => {
                ApiError::NotFound(format!("board {id} not found"))
            }
            BoardError::Repository(err) => {
                error!(error = %err, "repository failure");
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Cyclic(message) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "cyclic_dependency", message)
            }
            ApiError::InvalidBoard(message) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "invalid_board", message)
            }
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/boards/:board_id/gantt", get(gantt))
        .route("/boards/:board_id/critical-path", get(critical_path))
        .route("/boards/:board_id/workload", get(workload))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, scheduler: BoardScheduler<SharedRepository>) -> std::io::Result<()> {
    let state = AppState::new(scheduler);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

// Schedules are cheap to compute but synchronous; keep them off the reactor.
async fn run_blocking<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&BoardScheduler<SharedRepository>) -> Result<T, BoardError> + Send + 'static,
{
    let scheduler = state.scheduler();
    tokio::task::spawn_blocking(move || f(&scheduler))
        .await
        .map_err(|err| ApiError::Internal(format!("scheduler task failed: {err}")))?
        .map_err(ApiError::from)
}

async fn gantt(
    State(state): State<AppState>,
    Path(board_id): Path<BoardId>,
) -> Result<Json<GanttView>, ApiError> {
    let view = run_blocking(&state, move |s| s.gantt(board_id)).await?;
    Ok(Json(view))
}

async fn critical_path(
    State(state): State<AppState>,
    Path(board_id): Path<BoardId>,
) -> Result<Json<ScheduleSummary>, ApiError> {
    let summary = run_blocking(&state, move |s| s.schedule(board_id).map(|p| p.summary())).await?;
    Ok(Json(summary))
}

async fn workload(
    State(state): State<AppState>,
    Path(board_id): Path<BoardId>,
) -> Result<Json<WorkloadView>, ApiError> {
    let view = run_blocking(&state, move |s| s.workload(board_id)).await?;
    Ok(Json(view))
}
