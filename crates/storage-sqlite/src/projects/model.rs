//! Database models for projects and project members.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::utils::parse_stored_decimal;
use issuer_console_core::projects::{
    AssetDetails, BlockchainSettings, NewProject, Project, ProjectMember, ProjectMembership,
    RevenueModel, TokenSettingsUpdate,
};

/// Database model for projects
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::projects)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProjectDB {
    pub id: String,
    pub enterprise_id: String,
    pub name: String,
    pub asset_type: String,
    pub description: Option<String>,
    pub asset_value: Option<String>,
    pub wallet_address: Option<String>,
    pub network: Option<String>,
    pub asset_location: Option<String>,
    pub asset_description: Option<String>,
    pub token_name: Option<String>,
    pub token_symbol: Option<String>,
    pub total_supply: Option<i64>,
    pub token_decimals: Option<i32>,
    pub initial_price: Option<String>,
    pub revenue_mode: Option<String>,
    pub annual_return: Option<String>,
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

/// Database model for inserting a project from the wizard's first steps
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::projects)]
pub struct NewProjectDB {
    pub id: String,
    pub enterprise_id: String,
    pub name: String,
    pub asset_type: String,
    pub description: Option<String>,
    pub asset_value: Option<String>,
    pub current_step: i32,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Wizard bookkeeping written with every step
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::projects)]
pub struct StepProgressDB {
    pub current_step: i32,
    pub updated_by: String,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::projects)]
pub struct BlockchainChangesetDB {
    pub wallet_address: String,
    pub network: String,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::projects)]
pub struct AssetDetailsChangesetDB {
    pub asset_location: String,
    pub asset_description: String,
    pub asset_value: String,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::projects)]
pub struct TokenSettingsChangesetDB {
    pub token_name: String,
    pub token_symbol: String,
    pub total_supply: i64,
    pub token_decimals: i32,
    pub initial_price: String,
}

/// Columns written by the revenue model step
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::projects)]
#[diesel(treat_none_as_null = true)]
pub struct RevenueModelChangesetDB {
    pub revenue_mode: String,
    pub capital_profile: String,
    pub distribution_policy: String,
    pub payout_frequency: String,
    pub annual_return: String,
    // None clears previously saved notes.
    pub distribution_notes: Option<String>,
}

#[derive(Queryable, Selectable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::user_projects)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserProjectDB {
    pub user_id: String,
    pub project_id: String,
    pub role: String,
    pub created_at: NaiveDateTime,
}

impl From<ProjectDB> for Project {
    fn from(db: ProjectDB) -> Self {
        let asset_value = parse_stored_decimal(db.asset_value.as_deref(), "asset_value", &db.id);
        let initial_price =
            parse_stored_decimal(db.initial_price.as_deref(), "initial_price", &db.id);
        let annual_return =
            parse_stored_decimal(db.annual_return.as_deref(), "annual_return", &db.id);
        Self {
            id: db.id,
            enterprise_id: db.enterprise_id,
            name: db.name,
            asset_type: db.asset_type,
            description: db.description,
            asset_value,
            wallet_address: db.wallet_address,
            network: db.network,
            asset_location: db.asset_location,
            asset_description: db.asset_description,
            token_name: db.token_name,
            token_symbol: db.token_symbol,
            total_supply: db.total_supply,
            token_decimals: db.token_decimals,
            initial_price,
            revenue_mode: db.revenue_mode,
            annual_return,
            payout_frequency: db.payout_frequency,
            capital_profile: db.capital_profile,
            distribution_policy: db.distribution_policy,
            distribution_notes: db.distribution_notes,
            current_step: db.current_step,
            created_by: db.created_by,
            updated_by: db.updated_by,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl NewProjectDB {
    pub fn from_domain(domain: NewProject, id: String, now: NaiveDateTime) -> Self {
        Self {
            id,
            enterprise_id: domain.enterprise_id,
            name: domain.name,
            asset_type: domain.asset_type,
            description: domain.description,
            asset_value: domain.asset_value.map(|v| v.to_string()),
            current_step: domain.current_step,
            updated_by: domain.created_by.clone(),
            created_by: domain.created_by,
            created_at: domain.created_at.unwrap_or(now),
            updated_at: now,
        }
    }
}

impl From<BlockchainSettings> for BlockchainChangesetDB {
    fn from(settings: BlockchainSettings) -> Self {
        Self {
            wallet_address: settings.wallet_address,
            network: settings.network,
        }
    }
}

impl From<AssetDetails> for AssetDetailsChangesetDB {
    fn from(details: AssetDetails) -> Self {
        Self {
            asset_location: details.asset_location,
            asset_description: details.asset_description,
            asset_value: details.asset_value.to_string(),
        }
    }
}

impl From<TokenSettingsUpdate> for TokenSettingsChangesetDB {
    fn from(settings: TokenSettingsUpdate) -> Self {
        Self {
            token_name: settings.token_name,
            token_symbol: settings.token_symbol,
            total_supply: settings.total_supply,
            token_decimals: settings.token_decimals,
            initial_price: settings.initial_price.to_string(),
        }
    }
}

impl From<RevenueModel> for RevenueModelChangesetDB {
    fn from(model: RevenueModel) -> Self {
        Self {
            revenue_mode: model.revenue_mode,
            capital_profile: model.capital_profile,
            distribution_policy: model.distribution_policy,
            payout_frequency: model.payout_frequency,
            annual_return: model.annual_return.to_string(),
            distribution_notes: model.distribution_notes,
        }
    }
}

impl From<UserProjectDB> for ProjectMembership {
    fn from(db: UserProjectDB) -> Self {
        Self {
            user_id: db.user_id,
            project_id: db.project_id,
            role: db.role,
            created_at: db.created_at,
        }
    }
}

impl UserProjectDB {
    /// Joins the membership with the member's public profile.
    pub fn into_member(self, email: String, name: Option<String>, is_creator: bool) -> ProjectMember {
        ProjectMember {
            user_id: self.user_id,
            project_id: self.project_id,
            role: self.role,
            email,
            name,
            is_creator,
            created_at: self.created_at,
        }
    }
}
