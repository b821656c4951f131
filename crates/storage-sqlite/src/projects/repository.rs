use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::model::{
    AssetDetailsChangesetDB, BlockchainChangesetDB, NewProjectDB, ProjectDB,
    RevenueModelChangesetDB, StepProgressDB, TokenSettingsChangesetDB, UserProjectDB,
};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{projects, user_projects, users};
use crate::utils::parse_stored_decimal;
use issuer_console_core::errors::{Error, Result};
use issuer_console_core::projects::{
    NewProject, Project, ProjectAssetPoint, ProjectMember, ProjectMembership,
    ProjectRepositoryTrait, ProjectStepUpdate, WizardStep,
};
use issuer_console_core::utils::{checked_sum, DateTimeRange};

pub struct ProjectRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ProjectRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ProjectRepository { pool, writer }
    }

    /// Loads `(id, created_at, asset_value)` rows of the enterprise,
    /// optionally restricted to a creation window, oldest first.
    fn load_asset_rows(
        &self,
        enterprise_id: &str,
        created_within: Option<&DateTimeRange>,
    ) -> Result<Vec<(String, NaiveDateTime, Option<String>)>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = projects::table
            .filter(projects::enterprise_id.eq(enterprise_id))
            .select((projects::id, projects::created_at, projects::asset_value))
            .order(projects::created_at.asc())
            .into_boxed();
        if let Some(range) = created_within {
            query = query
                .filter(projects::created_at.ge(range.start))
                .filter(projects::created_at.le(range.end));
        }
        Ok(query
            .load::<(String, NaiveDateTime, Option<String>)>(&mut conn)
            .map_err(StorageError::from)?)
    }
}

#[async_trait]
impl ProjectRepositoryTrait for ProjectRepository {
    fn get_for_enterprise(&self, project_id: &str, enterprise_id: &str) -> Result<Option<Project>> {
        let mut conn = get_connection(&self.pool)?;
        let project = projects::table
            .filter(projects::id.eq(project_id))
            .filter(projects::enterprise_id.eq(enterprise_id))
            .select(ProjectDB::as_select())
            .first::<ProjectDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(project.map(Project::from))
    }

    fn list_for_enterprise(&self, enterprise_id: &str) -> Result<Vec<Project>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = projects::table
            .filter(projects::enterprise_id.eq(enterprise_id))
            .order((projects::created_at.desc(), projects::id.desc()))
            .select(ProjectDB::as_select())
            .load::<ProjectDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    fn sum_asset_value(
        &self,
        enterprise_id: &str,
        created_within: Option<&DateTimeRange>,
    ) -> Result<Decimal> {
        let rows = self.load_asset_rows(enterprise_id, created_within)?;
        checked_sum(
            rows.iter().filter_map(|(id, _, value)| {
                parse_stored_decimal(value.as_deref(), "asset_value", id)
            }),
            "asset value total",
        )
    }

    fn list_created_within(
        &self,
        enterprise_id: &str,
        range: &DateTimeRange,
    ) -> Result<Vec<ProjectAssetPoint>> {
        let rows = self.load_asset_rows(enterprise_id, Some(range))?;
        Ok(rows
            .into_iter()
            .map(|(id, created_at, value)| ProjectAssetPoint {
                created_at,
                asset_value: parse_stored_decimal(value.as_deref(), "asset_value", &id),
            })
            .collect())
    }

    async fn create(&self, new_project: NewProject) -> Result<Project> {
        let now = Utc::now().naive_utc();
        let id = new_project
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let row = NewProjectDB::from_domain(new_project, id, now);

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Project> {
                let inserted = diesel::insert_into(projects::table)
                    .values(&row)
                    .returning(ProjectDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Project::from(inserted))
            })
            .await
    }

    async fn update_step(&self, project_id: &str, update: ProjectStepUpdate) -> Result<Project> {
        let project_id = project_id.to_string();
        let progress = StepProgressDB {
            current_step: update.current_step,
            updated_by: update.updated_by,
            updated_at: Utc::now().naive_utc(),
        };
        let step = update.step;

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Project> {
                let target = || projects::table.find(&project_id);
                let written = match step {
                    WizardStep::Blockchain(settings) => diesel::update(target())
                        .set(&BlockchainChangesetDB::from(settings))
                        .execute(conn),
                    WizardStep::AssetDetails(details) => diesel::update(target())
                        .set(&AssetDetailsChangesetDB::from(details))
                        .execute(conn),
                    WizardStep::TokenSettings(settings) => diesel::update(target())
                        .set(&TokenSettingsChangesetDB::from(settings))
                        .execute(conn),
                    WizardStep::RevenueModel(model) => diesel::update(target())
                        .set(&RevenueModelChangesetDB::from(model))
                        .execute(conn),
                }
                .map_err(StorageError::from)?;
                if written == 0 {
                    return Err(Error::NotFound("Project not found".to_string()));
                }

                let updated = diesel::update(target())
                    .set(&progress)
                    .returning(ProjectDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Project::from(updated))
            })
            .await
    }

    fn list_members(&self, project_id: &str) -> Result<Vec<ProjectMember>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = user_projects::table
            .inner_join(users::table)
            .filter(user_projects::project_id.eq(project_id))
            .order((user_projects::created_at.asc(), user_projects::user_id.asc()))
            .select((
                UserProjectDB::as_select(),
                users::email,
                users::name,
                users::is_creator,
            ))
            .load::<(UserProjectDB, String, Option<String>, bool)>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows
            .into_iter()
            .map(|(membership, email, name, is_creator)| {
                membership.into_member(email, name, is_creator)
            })
            .collect())
    }

    async fn add_member(
        &self,
        project_id: &str,
        user_id: &str,
        role: &str,
    ) -> Result<ProjectMembership> {
        let row = UserProjectDB {
            user_id: user_id.to_string(),
            project_id: project_id.to_string(),
            role: role.to_string(),
            created_at: Utc::now().naive_utc(),
        };

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<ProjectMembership> {
                diesel::insert_into(user_projects::table)
                    .values(&row)
                    .on_conflict((
                        user_projects::user_id,
                        user_projects::project_id,
                        user_projects::role,
                    ))
                    .do_nothing()
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let stored = user_projects::table
                    .find((&row.user_id, &row.project_id, &row.role))
                    .select(UserProjectDB::as_select())
                    .first::<UserProjectDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(ProjectMembership::from(stored))
            })
            .await
    }
}
