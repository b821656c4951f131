//! Projects module - wizard-persisted tokenization projects and their members.

mod projects_model;
mod projects_service;
mod projects_traits;

pub use projects_model::{
    AssetDetails, BlockchainSettings, NewProject, NewProjectMember, Project, ProjectAssetPoint,
    ProjectDraft, ProjectMember, ProjectMembership, ProjectStepUpdate, RailProject, RevenueModel,
    TokenSettings, TokenSettingsUpdate, WizardStep,
};
pub use projects_service::{rail_badge, ProjectService};
pub use projects_traits::{ProjectRepositoryTrait, ProjectServiceTrait};
