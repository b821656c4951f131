//! Project domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Domain model representing a tokenization project as persisted by the wizard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub enterprise_id: String,
    pub name: String,
    pub asset_type: String,
    pub description: Option<String>,
    pub asset_value: Option<Decimal>,
    pub wallet_address: Option<String>,
    pub network: Option<String>,
    pub asset_location: Option<String>,
    pub asset_description: Option<String>,
    pub token_name: Option<String>,
    pub token_symbol: Option<String>,
    pub total_supply: Option<i64>,
    pub token_decimals: Option<i32>,
    pub initial_price: Option<Decimal>,
    pub revenue_mode: Option<String>,
    pub annual_return: Option<Decimal>,
    pub payout_frequency: Option<String>,
    pub capital_profile: Option<String>,
    pub distribution_policy: Option<String>,
    pub distribution_notes: Option<String>,
    pub current_step: i32,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Creation time and value of a project, as needed by the time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAssetPoint {
    pub created_at: NaiveDateTime,
    pub asset_value: Option<Decimal>,
}

/// Compact project entry for the console's project rail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RailProject {
    pub id: String,
    pub name: String,
    pub token_symbol: Option<String>,
    pub badge: String,
}

/// Wizard input for the project basics step, optionally with asset details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub name: String,
    pub asset_type: String,
    pub description: Option<String>,
    pub asset_value: Option<Decimal>,
}

/// Input model for inserting a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub id: Option<String>,
    pub enterprise_id: String,
    pub name: String,
    pub asset_type: String,
    pub description: Option<String>,
    pub asset_value: Option<Decimal>,
    pub current_step: i32,
    pub created_by: Option<String>,
    /// Defaults to the insertion time when absent.
    pub created_at: Option<NaiveDateTime>,
}

/// Wizard input for the blockchain settings step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainSettings {
    pub wallet_address: String,
    pub network: String,
}

/// Wizard input for the asset details step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDetails {
    pub asset_location: String,
    pub asset_description: String,
    pub asset_value: Decimal,
}

/// Wizard input for the token settings step.
///
/// `total_supply` is only used when the project has no asset value to derive
/// it from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSettings {
    pub token_name: String,
    pub token_symbol: String,
    pub initial_price: Decimal,
    pub total_supply: Option<i64>,
}

/// Validated token settings with the derived supply
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSettingsUpdate {
    pub token_name: String,
    pub token_symbol: String,
    pub initial_price: Decimal,
    pub total_supply: i64,
    pub token_decimals: i32,
}

/// Wizard input for the revenue model step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueModel {
    pub revenue_mode: String,
    pub capital_profile: String,
    pub distribution_policy: String,
    pub payout_frequency: String,
    pub annual_return: Decimal,
    pub distribution_notes: Option<String>,
}

/// Validated columns of one wizard step
#[derive(Debug, Clone, PartialEq)]
pub enum WizardStep {
    Blockchain(BlockchainSettings),
    AssetDetails(AssetDetails),
    TokenSettings(TokenSettingsUpdate),
    RevenueModel(RevenueModel),
}

/// A wizard step plus wizard bookkeeping, as written by the repository
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectStepUpdate {
    pub step: WizardStep,
    pub current_step: i32,
    pub updated_by: String,
}

/// A user's role on a project, with the user's public profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
    pub user_id: String,
    pub project_id: String,
    pub role: String,
    pub email: String,
    pub name: Option<String>,
    pub is_creator: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMembership {
    pub user_id: String,
    pub project_id: String,
    pub role: String,
    pub created_at: NaiveDateTime,
}

/// Request to give a user a role on a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProjectMember {
    pub user_id: String,
    pub role: String,
}
