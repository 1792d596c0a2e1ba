use crate::api::permissions::PermissionRegistry;
use crate::config::Config;
use crate::domain::ports::{
    AccountRepository, AuditLogRepository, IdentityProvider, MembershipRepository,
    ProfileRepository, WorkspaceRepository,
};
use crate::domain::services::audit_recorder::AuditRecorder;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub account_repo: Arc<dyn AccountRepository>,
    pub workspace_repo: Arc<dyn WorkspaceRepository>,
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub membership_repo: Arc<dyn MembershipRepository>,
    pub audit_repo: Arc<dyn AuditLogRepository>,
    pub identity: Arc<dyn IdentityProvider>,
    pub permissions: Arc<PermissionRegistry>,
    pub audit: Arc<AuditRecorder>,
}
