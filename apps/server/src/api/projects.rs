use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};

use crate::{auth::CurrentIdentity, error::ApiResult, main_lib::AppState};
use issuer_console_core::projects::{
    AssetDetails, BlockchainSettings, NewProjectMember, ProjectDraft, RevenueModel,
    TokenSettings,
};

async fn list_projects(
    State(state): State<Arc<AppState>>,
    CurrentIdentity(identity): CurrentIdentity,
) -> ApiResult<Json<Value>> {
    let projects = state.project_service.list_rail(&identity.enterprise_id)?;
    Ok(Json(json!({ "projects": projects })))
}

async fn create_project(
    State(state): State<Arc<AppState>>,
    CurrentIdentity(identity): CurrentIdentity,
    Json(draft): Json<ProjectDraft>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let project = state
        .project_service
        .create_project(&identity.enterprise_id, &identity.user_id, draft)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "project": project }))))
}

async fn get_project(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    CurrentIdentity(identity): CurrentIdentity,
) -> ApiResult<Json<Value>> {
    let project = state
        .project_service
        .get_project(&id, &identity.enterprise_id)?;
    Ok(Json(json!({ "project": project })))
}

async fn save_blockchain_settings(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    CurrentIdentity(identity): CurrentIdentity,
    Json(settings): Json<BlockchainSettings>,
) -> ApiResult<Json<Value>> {
    let project = state
        .project_service
        .save_blockchain_settings(&id, &identity.enterprise_id, &identity.user_id, settings)
        .await?;
    Ok(Json(json!({ "project": project })))
}

async fn save_asset_details(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    CurrentIdentity(identity): CurrentIdentity,
    Json(details): Json<AssetDetails>,
) -> ApiResult<Json<Value>> {
    let project = state
        .project_service
        .save_asset_details(&id, &identity.enterprise_id, &identity.user_id, details)
        .await?;
    Ok(Json(json!({ "project": project })))
}

async fn save_token_settings(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    CurrentIdentity(identity): CurrentIdentity,
    Json(settings): Json<TokenSettings>,
) -> ApiResult<Json<Value>> {
    let project = state
        .project_service
        .save_token_settings(&id, &identity.enterprise_id, &identity.user_id, settings)
        .await?;
    Ok(Json(json!({ "project": project })))
}

async fn save_revenue_model(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    CurrentIdentity(identity): CurrentIdentity,
    Json(model): Json<RevenueModel>,
) -> ApiResult<Json<Value>> {
    let project = state
        .project_service
        .save_revenue_model(&id, &identity.enterprise_id, &identity.user_id, model)
        .await?;
    Ok(Json(json!({ "project": project })))
}

async fn list_members(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    CurrentIdentity(identity): CurrentIdentity,
) -> ApiResult<Json<Value>> {
    let members = state
        .project_service
        .list_members(&id, &identity.enterprise_id)?;
    Ok(Json(json!({ "members": members })))
}

async fn add_member(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    CurrentIdentity(identity): CurrentIdentity,
    Json(member): Json<NewProjectMember>,
) -> ApiResult<Json<Value>> {
    let membership = state
        .project_service
        .add_member(&id, &identity.enterprise_id, member)
        .await?;
    Ok(Json(json!({ "membership": membership })))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/{id}", get(get_project))
        .route("/projects/{id}/step2", put(save_blockchain_settings))
        .route("/projects/{id}/step3", put(save_asset_details))
        .route("/projects/{id}/step4", put(save_token_settings))
        .route("/projects/{id}/step5", put(save_revenue_model))
        .route(
            "/accounts/projects/{id}/members",
            get(list_members).post(add_member),
        )
}
