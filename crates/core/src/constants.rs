/// Name of the cookie carrying the raw session user id.
pub const USER_COOKIE_NAME: &str = "ferion_user_id";

/// Lifetime of the session cookie set on login and registration (7 days).
pub const SESSION_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 7;

/// Demo identity provisioned by the identity collaborator when fallback is enabled.
pub const DEMO_ENTERPRISE_ID: &str = "demo-enterprise";
pub const DEMO_ENTERPRISE_NAME: &str = "Demo Enterprise";
pub const DEMO_USER_ID: &str = "demo-user";
pub const DEMO_USER_EMAIL: &str = "demo@ferion.local";
pub const DEMO_USER_NAME: &str = "Demo User";
pub const DEMO_PASSWORD: &str = "demo-password";

/// Role of the demo user and of users added to an enterprise.
pub const ISSUER_MEMBER_ROLE: &str = "ISSUER_MEMBER";

/// Role of the user who registered an enterprise.
pub const OWNER_ROLE: &str = "OWNER";

/// KYB status of an enterprise cleared to issue.
pub const KYB_APPROVED: &str = "APPROVED";

/// KYB status of a newly registered enterprise.
pub const KYB_PENDING: &str = "PENDING";

/// Last step of the project creation wizard (review).
pub const WIZARD_FINAL_STEP: i32 = 6;

/// Decimals of every token issued through the wizard.
pub const TOKEN_DECIMALS: i32 = 18;
