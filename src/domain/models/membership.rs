use crate::domain::models::auth::Claim;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn claim(&self) -> Claim {
        match self {
            Role::Admin => Claim::Admin,
            Role::User => Claim::User,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Membership {
    pub id: String,
    pub workspace_id: String,
    pub account_id: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(workspace_id: String, account_id: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            workspace_id,
            account_id,
            role,
            created_at: Utc::now(),
        }
    }
}

/// Membership joined with account and profile data for member listings.
#[derive(Debug, Serialize, FromRow)]
pub struct MemberRecord {
    pub account_id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub profile_name: Option<String>,
    pub joined_at: DateTime<Utc>,
}
