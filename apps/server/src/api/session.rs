use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header::SET_COOKIE,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::{
    auth::{expired_session_cookie, session_cookie, CurrentIdentity},
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use issuer_console_core::identity::{Identity, LoginInput, RegisterInput};

async fn get_session(CurrentIdentity(identity): CurrentIdentity) -> Json<serde_json::Value> {
    Json(json!({ "user": identity }))
}

/// Responds with the identity and starts its session.
fn signed_in(identity: Identity) -> ApiResult<Response> {
    let cookie = session_cookie(&identity.user_id)?;
    Ok(([(SET_COOKIE, cookie)], Json(json!({ "user": identity }))).into_response())
}

async fn register(
    State(state): State<Arc<AppState>>,
    input: Result<Json<RegisterInput>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(input) = input.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let identity = state.account_service.register(input).await?;
    signed_in(identity)
}

async fn login(
    State(state): State<Arc<AppState>>,
    input: Result<Json<LoginInput>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(input) = input.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let identity = state.account_service.login(input)?;
    signed_in(identity)
}

async fn logout() -> Response {
    (
        [(SET_COOKIE, expired_session_cookie())],
        Json(json!({ "ok": true })),
    )
        .into_response()
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/session", get(get_session))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}
