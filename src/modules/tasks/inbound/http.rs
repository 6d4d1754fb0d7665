// HTTP inbound for tasks: create, timer start/stop, labor summary.
//
// Responsibilities
// - Decode and validate requests before anything reaches the store.
// - Map typed service outcomes to status codes: idempotent no-ops are 200,
//   store failures are 500.
// - Presentation only here: the "hours/minutes" string is formatted at this
//   boundary, the core hands over durations.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::modules::tasks::core::model::LaborWindow;
use crate::modules::tasks::service::TaskError;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct NewTaskBody {
    pub user_id: Uuid,
    pub text: String,
}

#[derive(Deserialize)]
pub struct TimerBody {
    pub task_id: Uuid,
}

#[derive(Deserialize)]
pub struct LaborParams {
    pub user_id: Uuid,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct LaborTaskView {
    pub id: Uuid,
    pub task: String,
    pub seconds: i64,
    pub time: String,
}

#[derive(Serialize)]
pub struct LaborSummaryResponse {
    pub user_id: Uuid,
    pub tasks: Vec<LaborTaskView>,
    pub total: i64,
}

fn format_labor(total: TimeDelta) -> String {
    let hours = total.num_seconds() / 3600;
    let minutes = (total.num_seconds() % 3600) / 60;
    format!("hours: {hours} minutes: {minutes}")
}

fn internal(err: TaskError) -> axum::response::Response {
    error!(%err, "task request failed");
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewTaskBody>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    if body.text.trim().is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }
    match state.tasks.create_task(body.user_id, &body.text).await {
        Ok(task) => Json(task).into_response(),
        Err(err) => internal(err),
    }
}

pub async fn start(
    State(state): State<AppState>,
    body: Result<Json<TimerBody>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    match state.tasks.start_timer(body.task_id).await {
        Ok(_) => StatusCode::OK.into_response(),
        Err(err) => internal(err),
    }
}

pub async fn stop(
    State(state): State<AppState>,
    body: Result<Json<TimerBody>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    match state.tasks.stop_timer(body.task_id).await {
        Ok(_) => StatusCode::OK.into_response(),
        Err(err) => internal(err),
    }
}

pub async fn get(
    State(state): State<AppState>,
    Query(params): Query<LaborParams>,
) -> impl IntoResponse {
    let window = LaborWindow {
        from: params.from,
        to: params.to,
    };
    match state.tasks.labor_summary(params.user_id, window).await {
        Ok(summary) => {
            let tasks: Vec<LaborTaskView> = summary
                .into_iter()
                .map(|labor| LaborTaskView {
                    id: labor.task_id,
                    task: labor.task,
                    seconds: labor.total.num_seconds(),
                    time: format_labor(labor.total),
                })
                .collect();
            let total = tasks.len() as i64;
            Json(LaborSummaryResponse {
                user_id: params.user_id,
                tasks,
                total,
            })
            .into_response()
        }
        Err(err) => internal(err),
    }
}

#[cfg(test)]
mod task_http_inbound_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::{get, patch, post},
    };
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::modules::tasks::adapters::in_memory::InMemoryTaskStore;
    use crate::modules::tasks::service::TaskService;
    use crate::modules::users::adapters::in_memory::{InMemoryUserStore, StubPeopleLookup};
    use crate::modules::users::service::UserService;
    use crate::shell::state::AppState;

    use super::*;

    fn make_state(store: Arc<InMemoryTaskStore>) -> AppState {
        let users = UserService::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(StubPeopleLookup::failing()),
        );
        AppState {
            tasks: Arc::new(TaskService::new(store.clone(), store)),
            users: Arc::new(users),
        }
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/task/new", post(create))
            .route("/task/get", get(super::get))
            .route("/task/start", patch(start))
            .route("/task/stop", patch(stop))
            .with_state(state)
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn it_should_create_a_task() {
        let store = Arc::new(InMemoryTaskStore::new());
        let user_id = Uuid::now_v7();
        let body = format!(r#"{{"user_id":"{user_id}","text":"write the report"}}"#);
        let response = app(make_state(store))
            .oneshot(json_request("POST", "/task/new", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["task"], "write the report");
        assert!(json.get("id").is_some());
    }

    #[tokio::test]
    async fn it_should_return_422_on_malformed_json() {
        let store = Arc::new(InMemoryTaskStore::new());
        let response = app(make_state(store))
            .oneshot(json_request("POST", "/task/new", "not-json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn it_should_return_400_on_an_empty_task_text() {
        let store = Arc::new(InMemoryTaskStore::new());
        let user_id = Uuid::now_v7();
        let body = format!(r#"{{"user_id":"{user_id}","text":"  "}}"#);
        let response = app(make_state(store))
            .oneshot(json_request("POST", "/task/new", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn it_should_answer_200_for_start_and_repeated_start() {
        let store = Arc::new(InMemoryTaskStore::new());
        let state = make_state(store.clone());
        let task_id = Uuid::now_v7();
        let body = format!(r#"{{"task_id":"{task_id}"}}"#);
        for _ in 0..2 {
            let response = app(state.clone())
                .oneshot(json_request("PATCH", "/task/start", &body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(store.open_interval_count(task_id).await, 1);
    }

    #[tokio::test]
    async fn it_should_answer_200_for_stop_without_a_running_timer() {
        let store = Arc::new(InMemoryTaskStore::new());
        let body = format!(r#"{{"task_id":"{}"}}"#, Uuid::now_v7());
        let response = app(make_state(store))
            .oneshot(json_request("PATCH", "/task/stop", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn it_should_return_an_empty_summary_for_an_unknown_user() {
        let store = Arc::new(InMemoryTaskStore::new());
        let uri = format!("/task/get?user_id={}", Uuid::now_v7());
        let response = app(make_state(store))
            .oneshot(Request::get(uri.as_str()).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["tasks"], serde_json::json!([]));
        assert_eq!(json["total"], 0);
    }

    #[tokio::test]
    async fn it_should_return_400_when_user_id_is_missing() {
        let store = Arc::new(InMemoryTaskStore::new());
        let response = app(make_state(store))
            .oneshot(Request::get("/task/get").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn it_should_return_500_when_the_store_is_offline() {
        let mut raw = InMemoryTaskStore::new();
        raw.toggle_offline();
        let body = format!(r#"{{"task_id":"{}"}}"#, Uuid::now_v7());
        let response = app(make_state(Arc::new(raw)))
            .oneshot(json_request("PATCH", "/task/start", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn it_should_format_the_labor_time_for_presentation() {
        assert_eq!(
            format_labor(TimeDelta::seconds(2 * 3600 + 15 * 60 + 59)),
            "hours: 2 minutes: 15"
        );
        assert_eq!(format_labor(TimeDelta::seconds(59)), "hours: 0 minutes: 0");
    }
}
