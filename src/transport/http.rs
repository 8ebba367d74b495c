use axum::body::Bytes;
use axum::{Json, Router};
use axum::extract::{RawQuery, Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::params::Params;
use crate::app::AppState;
use crate::persistence::User;
use crate::relay::Delivery;
use crate::utils::error::RelayError;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/fetch_messages", get(fetch_messages))
        .route("/send_message", post(send_message))
        .route("/receive_message", post(receive_message))
        .route("/users", get(get_user).post(create_user))
        .route("/users/", get(list_users))
        .layer(middleware::from_fn(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Allow any origin on every response and answer preflight requests directly.
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        let mut preflight = StatusCode::OK.into_response();
        let headers = preflight.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, GET, PUT, DELETE"),
        );
        preflight
    } else {
        next.run(request).await
    };

    response
        .headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, RelayError> {
    state
        .provisioner
        .provision()
        .await
        .map_err(RelayError::Provisioning)?;
    Ok(Html(state.status_page.render()))
}

async fn fetch_messages(State(state): State<AppState>) -> Result<Response, RelayError> {
    let texts = state.recent.fetch_recent()?;
    let body = serde_json::to_string(&texts)?;
    Ok(([(CONTENT_TYPE, "application/json; charset=UTF-8")], body).into_response())
}

async fn send_message(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<StatusCode, RelayError> {
    let params = Params::parse(query.as_deref(), &body);
    let message = params.get("message").unwrap_or_default();

    state.publisher.publish(message, params.get("user_id")).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn receive_message(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<StatusCode, RelayError> {
    let params = Params::parse(query.as_deref(), &[]);

    match state.receiver.receive(&body, params.get("token"))? {
        Delivery::Delivered => Ok(StatusCode::OK),
        // 404 rather than 401 so probes cannot tell the endpoint exists.
        Delivery::Rejected => Ok(StatusCode::NOT_FOUND),
    }
}

async fn get_user(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, RelayError> {
    let params = Params::parse(query.as_deref(), &[]);
    let user = match params.get("user_id") {
        Some(user_id) => state.users.get_user(user_id)?,
        None => None,
    };

    Ok(match user {
        Some(user) => Json(user).into_response(),
        None => Json(json!({})).into_response(),
    })
}

async fn create_user(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Json<User>, RelayError> {
    let mut params = Params::parse(query.as_deref(), &body);
    let user = state
        .users
        .create_user(params.take("name"), params.take("avatar"))?;

    info!(user_id = %user.user_id, "registered user");
    Ok(Json(user))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, RelayError> {
    Ok(Json(state.users.list_users()?))
}
