// HTTP inbound for users: passport-keyed registration, filtered listing,
// sparse change, delete.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::modules::users::core::model::{User, UserFilter, UserPatch};
use crate::modules::users::ports::LookupError;
use crate::modules::users::service::UserError;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct NewUserBody {
    #[serde(rename = "passportNumber")]
    pub passport_number: String,
}

#[derive(Deserialize, Default)]
pub struct FilterBody {
    #[serde(default)]
    pub fields: UserFilter,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

#[derive(Serialize)]
pub struct FilterResponse {
    pub users: Vec<User>,
    pub total: i64,
}

#[derive(Deserialize)]
pub struct ChangeUserBody {
    pub id: Uuid,
    #[serde(flatten)]
    pub patch: UserPatch,
}

#[derive(Deserialize)]
pub struct DeleteUserBody {
    pub id: Uuid,
}

fn status_for(err: &UserError) -> StatusCode {
    match err {
        UserError::InvalidPassport(_) | UserError::EmptyPatch => StatusCode::BAD_REQUEST,
        UserError::AlreadyExists => StatusCode::CONFLICT,
        UserError::Lookup(LookupError::NotFound) => StatusCode::NOT_FOUND,
        UserError::Lookup(_) | UserError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(err: UserError) -> axum::response::Response {
    error!(%err, "user request failed");
    status_for(&err).into_response()
}

pub async fn new(
    State(state): State<AppState>,
    body: Result<Json<NewUserBody>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    match state.users.create_user(&body.passport_number).await {
        Ok(user) => Json(user).into_response(),
        Err(err) => reject(err),
    }
}

pub async fn get(
    State(state): State<AppState>,
    body: Result<Json<FilterBody>, JsonRejection>,
) -> impl IntoResponse {
    // The filter arrives as a JSON body even on GET; an absent body means
    // an unfiltered listing.
    let filter = match body {
        Ok(Json(body)) => body,
        Err(JsonRejection::MissingJsonContentType(_)) => FilterBody::default(),
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };
    match state
        .users
        .get_users(&filter.fields, filter.limit, filter.offset)
        .await
    {
        Ok(page) => Json(FilterResponse {
            users: page.users,
            total: page.total,
        })
        .into_response(),
        Err(err) => reject(err),
    }
}

pub async fn change(
    State(state): State<AppState>,
    body: Result<Json<ChangeUserBody>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    match state.users.change_user(body.id, &body.patch).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => reject(err),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    body: Result<Json<DeleteUserBody>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(body)) = body else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    match state.users.delete_user(body.id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => reject(err),
    }
}
