use crate::config::CorsConfig;
use crate::error::ApiError;
use crate::metrics::{MetricsSnapshot, TimedOperation};
use crate::state::AppState;
use axum::{
    Json, Router,
    extract::{Path, Request, State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use extract::{ParsedAssignment, Priority};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use store::{NewTask, Task, TaskUpdate};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

const PARSE_SUCCESS_MESSAGE: &str = "과제 정보를 성공적으로 추출했습니다.";

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    tasks: usize,
}

#[derive(Deserialize)]
struct ParseRequest {
    text: Option<String>,
}

#[derive(Serialize)]
struct ParseResponse {
    success: bool,
    parsed_data: ParsedAssignment,
    message: String,
}

/// Body of a create request. Everything is optional here so that a missing
/// title or date surfaces as our own error instead of a JSON rejection.
#[derive(Deserialize)]
struct CreateTaskRequest {
    title: Option<String>,
    date: Option<String>,
    description: Option<String>,
    time: Option<String>,
    priority: Option<Priority>,
    points: Option<String>,
    submission_location: Option<String>,
    notifications_enabled: Option<bool>,
}

impl CreateTaskRequest {
    fn into_new_task(self) -> Result<NewTask, ApiError> {
        let title = self.title.filter(|t| !t.is_empty());
        let date = self.date.filter(|d| !d.is_empty());
        let (Some(title), Some(date)) = (title, date) else {
            return Err(ApiError::MissingRequiredField);
        };

        let mut task = NewTask::new(title, date);
        task.description = self.description.unwrap_or_default();
        task.time = self.time.unwrap_or_default();
        task.priority = self.priority.unwrap_or_default();
        task.points = self.points.unwrap_or_default();
        task.submission_location = self.submission_location.unwrap_or_default();
        task.notifications_enabled = self.notifications_enabled.unwrap_or(true);
        Ok(task)
    }
}

pub fn build_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/:id", put(update_task).delete(delete_task))
        .route("/api/tasks/:id/toggle", put(toggle_task))
        .route("/api/tasks/date/:date", get(tasks_by_date))
        .route("/api/chatbot/parse", post(parse_assignment_text))
        .route("/api/stats", get(get_stats))
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Permissive when no origins are configured.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn track_requests(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();
    state
        .metrics
        .record_request(!(status.is_client_error() || status.is_server_error()));
    response
}

async fn health_check(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    let tasks = state.store.list().await?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        tasks: tasks.len(),
    }))
}

async fn list_tasks(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

async fn create_task(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(req) = body?;
    let new_task = req.into_new_task()?;
    let task = state.store.create(new_task).await?;
    state.metrics.record_task_created();
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    body: Result<Json<TaskUpdate>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(update) = body?;
    state
        .store
        .update(id, update)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Task>, ApiError> {
    state
        .store
        .toggle(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn tasks_by_date(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.store.by_date(&date).await?))
}

async fn parse_assignment_text(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ParseRequest>, JsonRejection>,
) -> Result<Json<ParseResponse>, ApiError> {
    let Json(req) = body?;
    let text = req
        .text
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::MissingInput)?;

    let timer = TimedOperation::start();
    let parsed = state.extractor.extract(&text);
    let matched = parsed.matched_fields();
    state.metrics.record_parse(timer.elapsed(), matched);

    tracing::info!(
        matched_fields = matched,
        title_found = !parsed.title.is_empty(),
        date_found = !parsed.date.is_empty(),
        "Parsed assignment text"
    );

    let today = state.extractor.clock().today();
    Ok(Json(ParseResponse {
        success: true,
        parsed_data: parsed.with_defaults(&state.title_placeholder, today),
        message: PARSE_SUCCESS_MESSAGE.to_string(),
    }))
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use extract::FixedClock;
    use tower::ServiceExt;

    fn test_app() -> (Router, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.storage.data_file = tmp.path().join("tasks.json");

        let state = Arc::new(AppState::new(&config, Arc::new(FixedClock::on(2026, 10, 18))));
        (build_router(state, cors_layer(&config.cors)), tmp)
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn parse_returns_extracted_fields() {
        let (app, _tmp) = test_app();
        let text = "과제: 자료구조 보고서\n마감일: 2024.03.15\n배점: 20점";

        let (status, json) = send(
            &app,
            "POST",
            "/api/chatbot/parse",
            Some(serde_json::json!({ "text": text })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], PARSE_SUCCESS_MESSAGE);
        let data = &json["parsed_data"];
        assert_eq!(data["title"], "자료구조 보고서");
        assert_eq!(data["date"], "2024-03-15");
        assert_eq!(data["points"], "20점");
        assert_eq!(data["priority"], "medium");
        assert_eq!(data["description"], text);
    }

    #[tokio::test]
    async fn parse_fills_placeholder_title_and_today() {
        let (app, _tmp) = test_app();

        let (status, json) = send(
            &app,
            "POST",
            "/api/chatbot/parse",
            Some(serde_json::json!({ "text": "안녕하세요" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["parsed_data"]["title"], "제목을 입력해주세요");
        assert_eq!(json["parsed_data"]["date"], "2026-10-18");
        assert_eq!(json["parsed_data"]["time"], "");
    }

    #[tokio::test]
    async fn parse_uses_clock_year_for_month_day() {
        let (app, _tmp) = test_app();

        let (_, json) = send(
            &app,
            "POST",
            "/api/chatbot/parse",
            Some(serde_json::json!({ "text": "중요 발표 3월 5일까지 제출" })),
        )
        .await;

        assert_eq!(json["parsed_data"]["date"], "2026-03-05");
        assert_eq!(json["parsed_data"]["priority"], "high");
    }

    #[tokio::test]
    async fn parse_rejects_missing_text() {
        let (app, _tmp) = test_app();

        let (status, json) = send(&app, "POST", "/api/chatbot/parse", Some(serde_json::json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "MISSING_INPUT");

        let (status, _) = send(
            &app,
            "POST",
            "/api/chatbot/parse",
            Some(serde_json::json!({ "text": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_requires_title_and_date() {
        let (app, _tmp) = test_app();

        let (status, json) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(serde_json::json!({ "title": "no date" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "MISSING_REQUIRED_FIELD");

        let (status, _) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(serde_json::json!({ "title": "", "date": "2024-03-15" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn task_crud_flow() {
        let (app, _tmp) = test_app();

        let (status, created) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(serde_json::json!({
                "title": "자료구조 보고서",
                "date": "2024-03-15",
                "priority": "high",
                "points": "20점"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], 1);
        assert_eq!(created["completed"], false);
        assert_eq!(created["notifications_enabled"], true);
        assert_eq!(created["created_at"], "2026-10-18 00:00:00");

        let (status, updated) = send(
            &app,
            "PUT",
            "/api/tasks/1",
            Some(serde_json::json!({ "time": "23:59" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["time"], "23:59");
        assert_eq!(updated["title"], "자료구조 보고서");
        assert_eq!(updated["priority"], "high");

        let (status, toggled) = send(&app, "PUT", "/api/tasks/1/toggle", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(toggled["completed"], true);

        let (_, on_date) = send(&app, "GET", "/api/tasks/date/2024-03-15", None).await;
        assert_eq!(on_date.as_array().unwrap().len(), 1);
        let (_, other_date) = send(&app, "GET", "/api/tasks/date/2024-03-16", None).await;
        assert!(other_date.as_array().unwrap().is_empty());

        let (status, _) = send(&app, "DELETE", "/api/tasks/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, all) = send(&app, "GET", "/api/tasks", None).await;
        assert!(all.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_ids() {
        let (app, _tmp) = test_app();

        let (status, json) = send(&app, "PUT", "/api/tasks/9", Some(serde_json::json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "과제를 찾을 수 없습니다.");

        let (status, _) = send(&app, "PUT", "/api/tasks/9/toggle", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", "/api/tasks/9", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn stats_count_requests_and_parses() {
        let (app, _tmp) = test_app();

        send(
            &app,
            "POST",
            "/api/chatbot/parse",
            Some(serde_json::json!({ "text": "오후 2시까지 제출" })),
        )
        .await;
        send(&app, "POST", "/api/chatbot/parse", Some(serde_json::json!({}))).await;

        let (status, stats) = send(&app, "GET", "/api/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_parses"], 1);
        assert_eq!(stats["successful_requests"], 1);
        assert_eq!(stats["failed_requests"], 1);
    }

    #[tokio::test]
    async fn health_reports_task_count() {
        let (app, _tmp) = test_app();

        let (status, json) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["tasks"], 0);
    }

    #[tokio::test]
    async fn unknown_priority_is_a_json_client_error() {
        let (app, _tmp) = test_app();

        let (status, json) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(serde_json::json!({ "title": "t", "date": "2024-03-15", "priority": "urgent" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_BODY");
        assert!(json["error"].as_str().unwrap().contains("urgent"));

        send(
            &app,
            "POST",
            "/api/tasks",
            Some(serde_json::json!({ "title": "t", "date": "2024-03-15" })),
        )
        .await;
        let (status, json) = send(
            &app,
            "PUT",
            "/api/tasks/1",
            Some(serde_json::json!({ "priority": "someday" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_BODY");
    }

    #[tokio::test]
    async fn malformed_json_body_is_a_json_client_error() {
        let (app, _tmp) = test_app();

        for uri in ["/api/chatbot/parse", "/api/tasks"] {
            let request = Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from("{\"text\": "))
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);

            let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
            let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(json["code"], "INVALID_BODY");
        }
    }
}
