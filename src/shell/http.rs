use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::modules::tasks::inbound::http as task_http;
use crate::modules::users::inbound::http as user_http;
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/user/new", post(user_http::new))
        .route("/user/get", get(user_http::get))
        .route("/user/change", patch(user_http::change))
        .route("/user/delete", delete(user_http::delete))
        .route("/task/new", post(task_http::create))
        .route("/task/get", get(task_http::get))
        .route("/task/start", patch(task_http::start))
        .route("/task/stop", patch(task_http::stop))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
