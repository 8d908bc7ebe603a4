use std::sync::Arc;

use axum::http::{self, Request, StatusCode};
use axum::Router;
use backend::app;
use backend::store::{DynTaskStore, MemoryTaskStore};
use http_body_util::BodyExt;
use shared::{ApiResponse, Task};
use tower::ServiceExt;

fn test_app() -> Router {
    let store: DynTaskStore = Arc::new(MemoryTaskStore::new());
    app(store)
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- list ---

#[tokio::test]
async fn list_tasks_empty() {
    let app = test_app();
    let resp = app.oneshot(get_request("/api/v1/tasks")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: ApiResponse<Vec<Task>> = body_json(resp).await;
    assert!(envelope.success);
    assert_eq!(envelope.status_code, 200);
    assert_eq!(envelope.message, "Tasks retrieved");
    assert_eq!(envelope.data, Some(vec![]));
}

// --- create ---

#[tokio::test]
async fn create_task_returns_201_envelope() {
    let app = test_app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/v1/tasks",
            r#"{"title":"Buy milk","description":"2% gallon"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let envelope: ApiResponse<Task> = body_json(resp).await;
    assert!(envelope.success);
    assert_eq!(envelope.status_code, 201);
    assert_eq!(envelope.message, "Task created");
    let task = envelope.data.unwrap();
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.description, "2% gallon");
    assert!(!task.completed);
    assert_eq!(task.created_at, task.updated_at);
}

#[tokio::test]
async fn create_task_trims_fields() {
    let app = test_app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/v1/tasks",
            r#"{"title":"  Buy milk  ","description":"  2% gallon  "}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let envelope: ApiResponse<Task> = body_json(resp).await;
    let task = envelope.data.unwrap();
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.description, "2% gallon");
}

#[tokio::test]
async fn create_task_ignores_client_sent_fields() {
    let app = test_app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/v1/tasks",
            r#"{"title":"t","description":"d","id":"00000000-0000-0000-0000-000000000000","completed":true,"createdAt":"1999-01-01T00:00:00Z"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let envelope: ApiResponse<Task> = body_json(resp).await;
    let task = envelope.data.unwrap();
    assert!(!task.id.is_nil());
    assert!(!task.completed);
    assert!(!task.created_at.to_string().starts_with("1999"));
}

#[tokio::test]
async fn create_task_with_empty_title_returns_400() {
    let app = test_app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/v1/tasks",
            r#"{"title":"","description":"fine"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let envelope: ApiResponse<Task> = body_json(resp).await;
    assert!(!envelope.success);
    assert_eq!(envelope.status_code, 400);
    assert_eq!(envelope.message, "Title is required");
    assert!(envelope.data.is_none());
}

#[tokio::test]
async fn create_task_with_whitespace_title_returns_400() {
    let app = test_app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/v1/tasks",
            r#"{"title":"   ","description":"fine"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let envelope: ApiResponse<Task> = body_json(resp).await;
    assert_eq!(envelope.message, "Title is required");
}

#[tokio::test]
async fn create_task_with_oversized_title_returns_400() {
    let app = test_app();
    let long_title = "t".repeat(101);
    let body = format!(r#"{{"title":"{long_title}","description":"fine"}}"#);
    let resp = app
        .oneshot(json_request("POST", "/api/v1/tasks", &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let envelope: ApiResponse<Task> = body_json(resp).await;
    assert_eq!(envelope.message, "Title cannot exceed 100 characters");
}

#[tokio::test]
async fn create_task_reports_every_violation() {
    let app = test_app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/v1/tasks",
            r#"{"title":"","description":""}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let envelope: ApiResponse<Task> = body_json(resp).await;
    assert_eq!(
        envelope.message,
        "Title is required, Description is required"
    );
}

#[tokio::test]
async fn create_task_malformed_json_returns_422() {
    let app = test_app();
    let resp = app
        .oneshot(json_request("POST", "/api/v1/tasks", r#"{"chore":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn failed_create_does_not_persist() {
    use tower::Service;

    let mut app = test_app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/v1/tasks",
            r#"{"title":"","description":""}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/v1/tasks"))
        .await
        .unwrap();
    let envelope: ApiResponse<Vec<Task>> = body_json(resp).await;
    assert_eq!(envelope.data, Some(vec![]));
}

// --- get ---

#[tokio::test]
async fn get_task_not_found() {
    let app = test_app();
    let resp = app
        .oneshot(get_request(
            "/api/v1/tasks/00000000-0000-0000-0000-000000000000",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let envelope: ApiResponse<Task> = body_json(resp).await;
    assert!(!envelope.success);
    assert_eq!(envelope.status_code, 404);
    assert_eq!(envelope.message, "Task not found");
    assert!(envelope.data.is_none());
}

#[tokio::test]
async fn get_task_bad_uuid_returns_400() {
    let app = test_app();
    let resp = app
        .oneshot(get_request("/api/v1/tasks/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update ---

#[tokio::test]
async fn update_task_not_found() {
    let app = test_app();
    let resp = app
        .oneshot(json_request(
            "PUT",
            "/api/v1/tasks/00000000-0000-0000-0000-000000000000",
            r#"{"title":"Nope","description":"Nope","completed":false}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let envelope: ApiResponse<Task> = body_json(resp).await;
    assert_eq!(envelope.message, "Task not found");
}

#[tokio::test]
async fn update_task_requires_full_object() {
    use tower::Service;

    let mut app = test_app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/v1/tasks",
            r#"{"title":"Walk dog","description":"Around the block"}"#,
        ))
        .await
        .unwrap();
    let envelope: ApiResponse<Task> = body_json(resp).await;
    let id = envelope.data.unwrap().id;

    // completed missing: the payload must carry the whole object
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/v1/tasks/{id}"),
            r#"{"title":"Walk dog","description":"Around the block"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn update_task_validation_failure_keeps_record() {
    use tower::Service;

    let mut app = test_app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/v1/tasks",
            r#"{"title":"Walk dog","description":"Around the block"}"#,
        ))
        .await
        .unwrap();
    let envelope: ApiResponse<Task> = body_json(resp).await;
    let created = envelope.data.unwrap();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/v1/tasks/{}", created.id),
            r#"{"title":"","description":"Around the block","completed":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let envelope: ApiResponse<Task> = body_json(resp).await;
    assert_eq!(envelope.message, "Title is required");

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request(&format!("/api/v1/tasks/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: ApiResponse<Task> = body_json(resp).await;
    let stored = envelope.data.unwrap();
    assert_eq!(stored.title, "Walk dog");
    assert!(!stored.completed);
    assert_eq!(stored.updated_at, created.updated_at);
}

// --- delete ---

#[tokio::test]
async fn delete_task_not_found() {
    let app = test_app();
    let resp = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/tasks/00000000-0000-0000-0000-000000000000")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let envelope: ApiResponse<Task> = body_json(resp).await;
    assert_eq!(envelope.message, "Task not found");
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = test_app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/v1/tasks",
            r#"{"title":"Buy milk","description":"2% gallon"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let envelope: ApiResponse<Task> = body_json(resp).await;
    let created = envelope.data.unwrap();
    assert!(!created.completed);
    let id = created.id;

    // list contains the one task
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/v1/tasks"))
        .await
        .unwrap();
    let envelope: ApiResponse<Vec<Task>> = body_json(resp).await;
    let tasks = envelope.data.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, id);

    // toggle by echoing the record back with completed flipped
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/v1/tasks/{id}"),
            r#"{"title":"Buy milk","description":"2% gallon","completed":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: ApiResponse<Task> = body_json(resp).await;
    assert_eq!(envelope.message, "Task updated");
    let toggled = envelope.data.unwrap();
    assert!(toggled.completed);
    assert_eq!(toggled.created_at, created.created_at);
    assert!(toggled.updated_at > toggled.created_at);

    // edit the text, echoing completed back unchanged
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/v1/tasks/{id}"),
            r#"{"title":"Buy oat milk","description":"2% gallon","completed":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: ApiResponse<Task> = body_json(resp).await;
    let edited = envelope.data.unwrap();
    assert_eq!(edited.title, "Buy oat milk");
    assert!(edited.completed);

    // delete returns the last state
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/api/v1/tasks/{id}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: ApiResponse<Task> = body_json(resp).await;
    assert_eq!(envelope.message, "Task deleted");
    let deleted = envelope.data.unwrap();
    assert_eq!(deleted.id, id);
    assert_eq!(deleted.title, "Buy oat milk");
    assert!(deleted.completed);

    // get after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request(&format!("/api/v1/tasks/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // delete again
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/api/v1/tasks/{id}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // list after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/v1/tasks"))
        .await
        .unwrap();
    let envelope: ApiResponse<Vec<Task>> = body_json(resp).await;
    assert_eq!(envelope.data, Some(vec![]));
}
