use async_trait::async_trait;
use log::debug;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::constants::{TOKEN_DECIMALS, WIZARD_FINAL_STEP};
use crate::errors::{Error, Result, ValidationError};
use crate::identity::{AuthError, IdentityStoreTrait};
use crate::projects::projects_model::{
    AssetDetails, BlockchainSettings, NewProject, NewProjectMember, Project, ProjectDraft,
    ProjectMember, ProjectMembership, ProjectStepUpdate, RailProject, RevenueModel, TokenSettings,
    TokenSettingsUpdate, WizardStep,
};
use crate::projects::projects_traits::{ProjectRepositoryTrait, ProjectServiceTrait};

const MAX_PROJECT_NAME_CHARS: usize = 100;
const MAX_TOKEN_NAME_CHARS: usize = 50;
const MAX_TEXT_CHARS: usize = 4000;
const MAX_BADGE_CHARS: usize = 4;
const FALLBACK_BADGE: &str = "PRJ";

// Step the wizard resumes at after each save.
const AFTER_BLOCKCHAIN_STEP: i32 = 3;
const TOKEN_SETTINGS_STEP: i32 = 4;
const AFTER_TOKEN_SETTINGS_STEP: i32 = 5;

/// Short uppercase badge shown for a project in the console rail.
///
/// Prefers the token symbol, then the initials of the project name.
pub fn rail_badge(name: &str, token_symbol: Option<&str>) -> String {
    if let Some(symbol) = token_symbol.map(str::trim).filter(|s| !s.is_empty()) {
        return symbol.chars().take(MAX_BADGE_CHARS).collect::<String>().to_uppercase();
    }

    let initials: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(MAX_BADGE_CHARS)
        .collect();
    if initials.is_empty() {
        return FALLBACK_BADGE.to_string();
    }
    initials.to_uppercase()
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field.to_string()).into());
    }
    Ok(trimmed.to_string())
}

fn invalid(message: &str) -> Error {
    ValidationError::InvalidInput(message.to_string()).into()
}

fn optional_text(field: &str, value: Option<String>) -> Result<Option<String>> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    if let Some(text) = &value {
        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(invalid(&format!("{} is too long", field)));
        }
    }
    Ok(value)
}

fn positive(field: &str, value: Decimal) -> Result<Decimal> {
    if value <= Decimal::ZERO {
        return Err(invalid(&format!("{} must be greater than 0", field)));
    }
    Ok(value)
}

/// `0x` followed by 40 hex digits.
fn is_evm_address(value: &str) -> bool {
    value.len() == 42
        && value.starts_with("0x")
        && value[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// 2 to 8 uppercase ASCII letters or digits.
fn is_token_symbol(value: &str) -> bool {
    (2..=8).contains(&value.len())
        && value
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Service for the project wizard, project listings and project members
pub struct ProjectService {
    project_repository: Arc<dyn ProjectRepositoryTrait>,
    identity_store: Arc<dyn IdentityStoreTrait>,
}

impl ProjectService {
    pub fn new(
        project_repository: Arc<dyn ProjectRepositoryTrait>,
        identity_store: Arc<dyn IdentityStoreTrait>,
    ) -> Self {
        Self {
            project_repository,
            identity_store,
        }
    }

    fn validate_draft(enterprise_id: &str, user_id: &str, draft: ProjectDraft) -> Result<NewProject> {
        let name = required("name", &draft.name)?;
        if name.chars().count() > MAX_PROJECT_NAME_CHARS {
            return Err(invalid(&format!(
                "name must be {} characters or fewer",
                MAX_PROJECT_NAME_CHARS
            )));
        }
        let asset_type = required("assetType", &draft.asset_type)?;
        let description = optional_text("description", draft.description)?;
        let asset_value = draft
            .asset_value
            .map(|v| positive("assetValue", v))
            .transpose()?;

        let current_step = if asset_value.is_some() {
            TOKEN_SETTINGS_STEP
        } else {
            1
        };

        Ok(NewProject {
            id: None,
            enterprise_id: enterprise_id.to_string(),
            name,
            asset_type,
            description,
            asset_value,
            current_step,
            created_by: Some(user_id.to_string()),
            created_at: None,
        })
    }

    fn validate_blockchain(settings: BlockchainSettings) -> Result<BlockchainSettings> {
        let wallet_address = settings.wallet_address.trim().to_string();
        if !is_evm_address(&wallet_address) {
            return Err(invalid("walletAddress must be a valid EVM address"));
        }
        Ok(BlockchainSettings {
            wallet_address,
            network: required("network", &settings.network)?,
        })
    }

    fn validate_asset_details(details: AssetDetails) -> Result<AssetDetails> {
        let asset_description = required("assetDescription", &details.asset_description)?;
        if asset_description.chars().count() > MAX_TEXT_CHARS {
            return Err(invalid("assetDescription is too long"));
        }
        Ok(AssetDetails {
            asset_location: required("assetLocation", &details.asset_location)?,
            asset_description,
            asset_value: positive("assetValue", details.asset_value)?,
        })
    }

    /// Validates token settings and derives the total supply from the
    /// project's asset value and the initial price.
    fn validate_token_settings(
        settings: TokenSettings,
        asset_value: Option<Decimal>,
    ) -> Result<TokenSettingsUpdate> {
        let token_name = required("tokenName", &settings.token_name)?;
        if token_name.chars().count() > MAX_TOKEN_NAME_CHARS {
            return Err(invalid("tokenName is too long"));
        }
        let token_symbol = settings.token_symbol.trim().to_string();
        if !is_token_symbol(&token_symbol) {
            return Err(invalid(
                "tokenSymbol must be 2-8 uppercase letters or numbers",
            ));
        }
        let initial_price = positive("initialPrice", settings.initial_price)?;

        let total_supply = match asset_value {
            Some(value) => value
                .checked_div(initial_price)
                .and_then(|supply| supply.floor().to_i64())
                .ok_or_else(|| invalid("assetValue and initialPrice give no valid totalSupply"))?,
            None => settings
                .total_supply
                .ok_or_else(|| invalid("totalSupply is required without an asset value"))?,
        };
        if total_supply <= 0 {
            return Err(invalid("totalSupply must be greater than 0"));
        }

        Ok(TokenSettingsUpdate {
            token_name,
            token_symbol,
            initial_price,
            total_supply,
            token_decimals: TOKEN_DECIMALS,
        })
    }

    fn validate_revenue_model(model: RevenueModel) -> Result<RevenueModel> {
        if model.annual_return < Decimal::from(-100) || model.annual_return > Decimal::from(1000) {
            return Err(invalid("annualReturn must be between -100 and 1000"));
        }
        Ok(RevenueModel {
            revenue_mode: required("revenueMode", &model.revenue_mode)?,
            capital_profile: required("capitalProfile", &model.capital_profile)?,
            distribution_policy: required("distributionPolicy", &model.distribution_policy)?,
            payout_frequency: required("payoutFrequency", &model.payout_frequency)?,
            annual_return: model.annual_return,
            distribution_notes: optional_text("distributionNotes", model.distribution_notes)?,
        })
    }

    /// Writes a validated step, advancing `current_step` to at least `next_step`.
    async fn save_step(
        &self,
        project: &Project,
        user_id: &str,
        step: WizardStep,
        next_step: i32,
    ) -> Result<Project> {
        let update = ProjectStepUpdate {
            step,
            current_step: project.current_step.max(next_step),
            updated_by: user_id.to_string(),
        };
        let saved = self.project_repository.update_step(&project.id, update).await?;
        debug!("Saved wizard step for project {}, now at step {}", saved.id, saved.current_step);
        Ok(saved)
    }
}

#[async_trait]
impl ProjectServiceTrait for ProjectService {
    fn list_rail(&self, enterprise_id: &str) -> Result<Vec<RailProject>> {
        let projects = self.project_repository.list_for_enterprise(enterprise_id)?;
        Ok(projects
            .into_iter()
            .map(|p| RailProject {
                badge: rail_badge(&p.name, p.token_symbol.as_deref()),
                id: p.id,
                name: p.name,
                token_symbol: p.token_symbol,
            })
            .collect())
    }

    fn get_project(&self, project_id: &str, enterprise_id: &str) -> Result<Project> {
        self.project_repository
            .get_for_enterprise(project_id, enterprise_id)?
            .ok_or_else(|| Error::NotFound("Project not found".to_string()))
    }

    async fn create_project(
        &self,
        enterprise_id: &str,
        user_id: &str,
        draft: ProjectDraft,
    ) -> Result<Project> {
        let new_project = Self::validate_draft(enterprise_id, user_id, draft)?;
        let project = self.project_repository.create(new_project).await?;
        debug!("Created project {} for enterprise {}", project.id, enterprise_id);
        Ok(project)
    }

    async fn save_blockchain_settings(
        &self,
        project_id: &str,
        enterprise_id: &str,
        user_id: &str,
        settings: BlockchainSettings,
    ) -> Result<Project> {
        let settings = Self::validate_blockchain(settings)?;
        let project = self.get_project(project_id, enterprise_id)?;
        self.save_step(
            &project,
            user_id,
            WizardStep::Blockchain(settings),
            AFTER_BLOCKCHAIN_STEP,
        )
        .await
    }

    async fn save_asset_details(
        &self,
        project_id: &str,
        enterprise_id: &str,
        user_id: &str,
        details: AssetDetails,
    ) -> Result<Project> {
        let details = Self::validate_asset_details(details)?;
        let project = self.get_project(project_id, enterprise_id)?;
        self.save_step(
            &project,
            user_id,
            WizardStep::AssetDetails(details),
            TOKEN_SETTINGS_STEP,
        )
        .await
    }

    async fn save_token_settings(
        &self,
        project_id: &str,
        enterprise_id: &str,
        user_id: &str,
        settings: TokenSettings,
    ) -> Result<Project> {
        let project = self.get_project(project_id, enterprise_id)?;
        let settings = Self::validate_token_settings(settings, project.asset_value)?;
        self.save_step(
            &project,
            user_id,
            WizardStep::TokenSettings(settings),
            AFTER_TOKEN_SETTINGS_STEP,
        )
        .await
    }

    async fn save_revenue_model(
        &self,
        project_id: &str,
        enterprise_id: &str,
        user_id: &str,
        model: RevenueModel,
    ) -> Result<Project> {
        let model = Self::validate_revenue_model(model)?;
        let project = self.get_project(project_id, enterprise_id)?;
        self.save_step(
            &project,
            user_id,
            WizardStep::RevenueModel(model),
            WIZARD_FINAL_STEP,
        )
        .await
    }

    fn list_members(&self, project_id: &str, enterprise_id: &str) -> Result<Vec<ProjectMember>> {
        let project = self.get_project(project_id, enterprise_id)?;
        self.project_repository.list_members(&project.id)
    }

    async fn add_member(
        &self,
        project_id: &str,
        enterprise_id: &str,
        member: NewProjectMember,
    ) -> Result<ProjectMembership> {
        let user_id = required("userId", &member.user_id)?;
        let role = required("role", &member.role)?;
        let project = self.get_project(project_id, enterprise_id)?;

        let target = self
            .identity_store
            .find_user(&user_id)?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        if target
            .enterprise_id
            .as_deref()
            .is_some_and(|id| id != enterprise_id)
        {
            return Err(AuthError::Forbidden(
                "User does not belong to this enterprise".to_string(),
            )
            .into());
        }

        self.project_repository
            .add_member(&project.id, &target.id, &role)
            .await
    }
}
