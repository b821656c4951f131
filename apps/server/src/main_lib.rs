use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, LogFormat};
use issuer_console_core::{
    dashboard::{DashboardService, DashboardServiceTrait},
    identity::{AccountServiceTrait, IdentityProviderTrait, IdentityService, IdentityStoreTrait},
    offerings::OfferingRepositoryTrait,
    projects::{ProjectRepositoryTrait, ProjectService, ProjectServiceTrait},
};
use issuer_console_storage_sqlite::{
    db::{self, write_actor},
    identity::IdentityRepository,
    offerings::OfferingRepository,
    projects::ProjectRepository,
};

pub struct AppState {
    pub project_service: Arc<dyn ProjectServiceTrait>,
    pub dashboard_service: Arc<dyn DashboardServiceTrait>,
    pub identity_provider: Arc<dyn IdentityProviderTrait>,
    pub account_service: Arc<dyn AccountServiceTrait>,
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // `try_init` also installs the `log` bridge for the domain and storage crates.
    let result = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .try_init(),
    };
    if let Err(e) = result {
        eprintln!("Tracing already initialised: {}", e);
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let project_repository: Arc<dyn ProjectRepositoryTrait> =
        Arc::new(ProjectRepository::new(pool.clone(), writer.clone()));
    let offering_repository: Arc<dyn OfferingRepositoryTrait> =
        Arc::new(OfferingRepository::new(pool.clone(), writer.clone()));
    let identity_repository: Arc<dyn IdentityStoreTrait> =
        Arc::new(IdentityRepository::new(pool.clone(), writer.clone()));

    let project_service = Arc::new(ProjectService::new(
        project_repository.clone(),
        identity_repository.clone(),
    ));
    let dashboard_service = Arc::new(DashboardService::new(
        project_repository,
        offering_repository,
    ));
    let identity_service = Arc::new(IdentityService::new(
        identity_repository,
        config.demo_fallback,
    ));

    Ok(Arc::new(AppState {
        project_service,
        dashboard_service,
        identity_provider: identity_service.clone(),
        account_service: identity_service,
    }))
}
