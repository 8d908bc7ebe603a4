//! Task API server: routing, handlers, and the serve loop shared by the
//! binary and the tests.
//!
//! Handlers return `Result<_, ApiError>`; the envelope translation for the
//! failure side lives entirely in [`error`], so there is exactly one place
//! where errors become HTTP.

pub mod error;
pub mod store;

use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use shared::{validate_task_fields, ApiResponse, CreateTaskRequest, Task, UpdateTaskRequest};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::error::ApiError;
use crate::store::DynTaskStore;

/// Request bodies larger than this are rejected before deserialization.
const BODY_LIMIT_BYTES: usize = 20 * 1024;

/// Build the full router: the task API plus the static frontend bundle.
pub fn app(store: DynTaskStore) -> Router {
    Router::new()
        .route("/api/v1/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/v1/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .nest_service("/", ServeDir::new("frontend/dist"))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(store)
}

/// Serve the app until the listener closes.
pub async fn run(listener: TcpListener, store: DynTaskStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}

/// `CORS_ORIGIN` pins cross-origin access to a single origin. Unset or
/// unparseable falls back to permissive, which suits same-origin serving.
fn cors_layer() -> CorsLayer {
    let origin = std::env::var("CORS_ORIGIN")
        .ok()
        .and_then(|origin| origin.parse::<HeaderValue>().ok());
    match origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers([CONTENT_TYPE]),
        None => CorsLayer::permissive(),
    }
}

async fn create_task(
    State(store): State<DynTaskStore>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Task>>), ApiError> {
    let fields = validate_task_fields(&payload.title, &payload.description)
        .map_err(ApiError::Validation)?;
    let task = Task::new(fields.title, fields.description);
    store.put(&task).await?;
    tracing::info!(id = %task.id, "task created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(201, task, "Task created")),
    ))
}

async fn list_tasks(
    State(store): State<DynTaskStore>,
) -> Result<Json<ApiResponse<Vec<Task>>>, ApiError> {
    let tasks = store.list().await?;
    Ok(Json(ApiResponse::new(200, tasks, "Tasks retrieved")))
}

async fn get_task(
    State(store): State<DynTaskStore>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Task>>, ApiError> {
    let task = store.get(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(ApiResponse::new(200, task, "Task retrieved")))
}

async fn update_task(
    State(store): State<DynTaskStore>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<ApiResponse<Task>>, ApiError> {
    let mut task = store.get(id).await?.ok_or(ApiError::NotFound)?;
    let fields = validate_task_fields(&payload.title, &payload.description)
        .map_err(ApiError::Validation)?;
    task.apply_update(fields.title, fields.description, payload.completed);
    store.put(&task).await?;
    tracing::info!(id = %task.id, completed = task.completed, "task updated");
    Ok(Json(ApiResponse::new(200, task, "Task updated")))
}

async fn delete_task(
    State(store): State<DynTaskStore>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Task>>, ApiError> {
    let task = store.remove(id).await?.ok_or(ApiError::NotFound)?;
    tracing::info!(id = %task.id, "task deleted");
    Ok(Json(ApiResponse::new(200, task, "Task deleted")))
}
