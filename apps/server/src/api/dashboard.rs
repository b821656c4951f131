use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use tracing::error;

use crate::{
    auth::CurrentIdentity,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use issuer_console_core::dashboard::{DashboardOverview, OverviewQuery};
use issuer_console_core::identity::AuthError;

fn overview_failure(reason: impl std::fmt::Display) -> ApiError {
    error!("Overview metrics error: {}", reason);
    ApiError::Internal("Failed to fetch overview metrics".to_string())
}

async fn get_overview(
    State(state): State<Arc<AppState>>,
    identity: Result<CurrentIdentity, ApiError>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Json<DashboardOverview>> {
    let CurrentIdentity(identity) = match identity {
        Ok(identity) => identity,
        Err(ApiError::Auth(AuthError::Store(reason))) => return Err(overview_failure(reason)),
        Err(e) => return Err(e),
    };
    let Query(pairs) = pairs.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let query = OverviewQuery::from_pairs(pairs);

    match state
        .dashboard_service
        .get_overview(&identity.enterprise_id, &query)
    {
        Ok(overview) => Ok(Json(overview)),
        Err(e) if e.is_client_error() => Err(e.into()),
        Err(e) => Err(overview_failure(e)),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/dashboard/overview", get(get_overview))
}
