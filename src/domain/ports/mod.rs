use crate::domain::models::{
    account::{Account, AccountStatus},
    audit::{AuditActionCount, AuditLog},
    auth::VerifiedIdentity,
    membership::{MemberRecord, Membership, Role},
    profile::Profile,
    workspace::Workspace,
};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create(&self, account: &Account) -> Result<Account, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Account>, AppError>;
    async fn update_role(&self, id: &str, is_super_admin: bool) -> Result<Account, AppError>;
    async fn update_status(&self, id: &str, status: AccountStatus) -> Result<Account, AppError>;
}

#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    /// Inserts the workspace, the owner's admin membership and the owner's
    /// profile in a single transaction.
    async fn create_with_owner(
        &self,
        workspace: &Workspace,
        membership: &Membership,
        profile: &Profile,
    ) -> Result<Workspace, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Workspace>, AppError>;
    async fn list_by_account(&self, account_id: &str) -> Result<Vec<Workspace>, AppError>;
    async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Workspace>, AppError>;
    async fn update(&self, workspace: &Workspace) -> Result<Workspace, AppError>;
    /// Deletes the workspace's profiles, memberships and the workspace row
    /// itself in a single transaction.
    async fn delete_cascade(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find(&self, workspace_id: &str, account_id: &str) -> Result<Option<Profile>, AppError>;
    async fn update_name(
        &self,
        workspace_id: &str,
        account_id: &str,
        name: &str,
    ) -> Result<Profile, AppError>;
}

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Inserts the membership and its profile in a single transaction;
    /// either both rows commit or neither does.
    async fn create_with_profile(
        &self,
        membership: &Membership,
        profile: &Profile,
    ) -> Result<Membership, AppError>;
    async fn find(&self, workspace_id: &str, account_id: &str) -> Result<Option<Membership>, AppError>;
    async fn list_by_account(&self, account_id: &str) -> Result<Vec<Membership>, AppError>;
    async fn list_members(&self, workspace_id: &str) -> Result<Vec<MemberRecord>, AppError>;
    async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Membership>, AppError>;
    /// Updates the member's role. Demoting the last admin of a workspace
    /// fails inside the transaction with no mutation.
    async fn update_role(
        &self,
        workspace_id: &str,
        account_id: &str,
        role: Role,
    ) -> Result<Membership, AppError>;
    /// Removes the membership and its profile in a single transaction.
    /// Removing the last admin of a workspace fails with no mutation.
    async fn delete_with_profile(&self, workspace_id: &str, account_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn insert(&self, log: &AuditLog) -> Result<(), AppError>;
    async fn list(
        &self,
        limit: i64,
        offset: i64,
        action: Option<&str>,
        workspace_id: Option<&str>,
    ) -> Result<Vec<AuditLog>, AppError>;
    async fn stats(&self) -> Result<Vec<AuditActionCount>, AppError>;
}

/// External identity provider collaborator. The bundled implementation
/// verifies locally (EdDSA); a remote verifier is a drop-in behind the
/// same single-attempt `verify`.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verifies a bearer token. Returns `None` for any token that does not
    /// verify; no retry is attempted.
    async fn verify(&self, token: &str) -> Result<Option<VerifiedIdentity>, AppError>;
    fn issue(&self, account: &Account) -> Result<String, AppError>;
}
