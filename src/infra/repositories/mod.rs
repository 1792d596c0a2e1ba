pub mod postgres_account_repo;
pub mod postgres_audit_repo;
pub mod postgres_membership_repo;
pub mod postgres_profile_repo;
pub mod postgres_workspace_repo;
pub mod sqlite_account_repo;
pub mod sqlite_audit_repo;
pub mod sqlite_membership_repo;
pub mod sqlite_profile_repo;
pub mod sqlite_workspace_repo;
