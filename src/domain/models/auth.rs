use serde::{Deserialize, Serialize};

/// Role token held by a verified caller, consumed by the authorization stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// Base claim carried by every verified identity.
    Authenticated,
    /// Workspace-scoped member role (resolved via the x-workspace-id header).
    User,
    /// Workspace-scoped admin role.
    Admin,
    /// Global superadmin flag on the account.
    Super,
}

/// Immutable request-scoped identity, built once by the authentication
/// stage and threaded through authorization, the status guard and handlers
/// via request extensions.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub account_id: String,
    pub workspace_id: String,
    pub claims: Vec<Claim>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// JWT claim set issued and verified by the bundled identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
}

/// Identity resolved by a successful token verification.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub account_id: String,
}
