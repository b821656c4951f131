use crate::errors::Result;
use crate::projects::projects_model::{
    AssetDetails, BlockchainSettings, NewProject, NewProjectMember, Project, ProjectAssetPoint,
    ProjectDraft, ProjectMember, ProjectMembership, ProjectStepUpdate, RailProject, RevenueModel,
    TokenSettings,
};
use crate::utils::time_utils::DateTimeRange;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for project repository operations
#[async_trait]
pub trait ProjectRepositoryTrait: Send + Sync {
    fn get_for_enterprise(&self, project_id: &str, enterprise_id: &str) -> Result<Option<Project>>;

    /// Projects of the enterprise, newest first.
    fn list_for_enterprise(&self, enterprise_id: &str) -> Result<Vec<Project>>;

    /// Sum of `asset_value` across the enterprise's projects, optionally only
    /// those created within `created_within`. Missing values count as zero.
    fn sum_asset_value(
        &self,
        enterprise_id: &str,
        created_within: Option<&DateTimeRange>,
    ) -> Result<Decimal>;

    fn list_created_within(
        &self,
        enterprise_id: &str,
        range: &DateTimeRange,
    ) -> Result<Vec<ProjectAssetPoint>>;

    async fn create(&self, new_project: NewProject) -> Result<Project>;

    /// Writes the columns of one wizard step.
    async fn update_step(&self, project_id: &str, update: ProjectStepUpdate) -> Result<Project>;

    fn list_members(&self, project_id: &str) -> Result<Vec<ProjectMember>>;

    /// Idempotent on `(user_id, project_id, role)`.
    async fn add_member(
        &self,
        project_id: &str,
        user_id: &str,
        role: &str,
    ) -> Result<ProjectMembership>;
}

/// Trait for project service operations
#[async_trait]
pub trait ProjectServiceTrait: Send + Sync {
    fn list_rail(&self, enterprise_id: &str) -> Result<Vec<RailProject>>;
    fn get_project(&self, project_id: &str, enterprise_id: &str) -> Result<Project>;
    async fn create_project(
        &self,
        enterprise_id: &str,
        user_id: &str,
        draft: ProjectDraft,
    ) -> Result<Project>;
    async fn save_blockchain_settings(
        &self,
        project_id: &str,
        enterprise_id: &str,
        user_id: &str,
        settings: BlockchainSettings,
    ) -> Result<Project>;
    async fn save_asset_details(
        &self,
        project_id: &str,
        enterprise_id: &str,
        user_id: &str,
        details: AssetDetails,
    ) -> Result<Project>;
    async fn save_token_settings(
        &self,
        project_id: &str,
        enterprise_id: &str,
        user_id: &str,
        settings: TokenSettings,
    ) -> Result<Project>;
    async fn save_revenue_model(
        &self,
        project_id: &str,
        enterprise_id: &str,
        user_id: &str,
        model: RevenueModel,
    ) -> Result<Project>;
    fn list_members(&self, project_id: &str, enterprise_id: &str) -> Result<Vec<ProjectMember>>;
    async fn add_member(
        &self,
        project_id: &str,
        enterprise_id: &str,
        member: NewProjectMember,
    ) -> Result<ProjectMembership>;
}
