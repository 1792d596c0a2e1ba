use crate::domain::models::auth::Claim;
use crate::domain::models::membership::Role;
use axum::http::Method;
use std::collections::HashMap;

/// Role requirement attached to one (route pattern, method) pair.
#[derive(Debug, Clone)]
pub enum RoleRequirement {
    /// Any authenticated caller.
    Any,
    /// Caller must hold one of the workspace-scoped roles. With
    /// `allow_owner`, a user-class caller who owns the addressed resource
    /// also passes.
    Roles { roles: &'static [Role], allow_owner: bool },
    /// Caller's id must equal the `id`/`account_id` path parameter.
    Owner,
    /// Global superadmin only.
    Super,
}

#[derive(Debug)]
pub struct PermissionDescriptor {
    pub authenticated: bool,
    pub method_roles: HashMap<Method, RoleRequirement>,
}

/// Route-pattern-keyed permission table. Built once at bootstrap and
/// validated against the concrete route table; an unmapped route is a
/// fatal boot error, never a runtime path.
pub struct PermissionRegistry {
    entries: HashMap<&'static str, PermissionDescriptor>,
}

const MEMBER_ROLES: &[Role] = &[Role::Admin, Role::User];
const ADMIN_ROLES: &[Role] = &[Role::Admin];

impl PermissionRegistry {
    pub fn build() -> Self {
        let mut entries = HashMap::new();

        public(&mut entries, "/health");
        public(&mut entries, "/api/v1/auth/signup");
        public(&mut entries, "/api/v1/auth/login");

        entry(&mut entries, "/api/v1/me", [(Method::GET, RoleRequirement::Any)]);
        entry(&mut entries, "/api/v1/accounts/{id}", [(Method::GET, RoleRequirement::Owner)]);

        entry(&mut entries, "/api/v1/workspaces", [
            (Method::GET, RoleRequirement::Any),
            (Method::POST, RoleRequirement::Any),
        ]);
        entry(&mut entries, "/api/v1/workspaces/{id}", [
            (Method::GET, RoleRequirement::Roles { roles: MEMBER_ROLES, allow_owner: false }),
            (Method::PATCH, RoleRequirement::Roles { roles: ADMIN_ROLES, allow_owner: false }),
            (Method::DELETE, RoleRequirement::Roles { roles: ADMIN_ROLES, allow_owner: false }),
        ]);
        entry(&mut entries, "/api/v1/workspaces/{id}/profile", [
            (Method::PATCH, RoleRequirement::Roles { roles: MEMBER_ROLES, allow_owner: false }),
        ]);
        entry(&mut entries, "/api/v1/workspaces/{id}/members", [
            (Method::GET, RoleRequirement::Roles { roles: MEMBER_ROLES, allow_owner: false }),
            (Method::POST, RoleRequirement::Roles { roles: ADMIN_ROLES, allow_owner: false }),
        ]);
        entry(&mut entries, "/api/v1/workspaces/{id}/members/{member_id}", [
            (Method::PUT, RoleRequirement::Roles { roles: ADMIN_ROLES, allow_owner: false }),
            (Method::DELETE, RoleRequirement::Roles { roles: ADMIN_ROLES, allow_owner: false }),
        ]);

        entry(&mut entries, "/api/v1/admin/accounts", [
            (Method::GET, RoleRequirement::Super),
            (Method::POST, RoleRequirement::Super),
        ]);
        entry(&mut entries, "/api/v1/admin/accounts/{id}/role", [(Method::PUT, RoleRequirement::Super)]);
        entry(&mut entries, "/api/v1/admin/accounts/{id}/status", [(Method::PUT, RoleRequirement::Super)]);
        entry(&mut entries, "/api/v1/admin/workspaces", [(Method::GET, RoleRequirement::Super)]);
        entry(&mut entries, "/api/v1/admin/memberships", [(Method::GET, RoleRequirement::Super)]);
        entry(&mut entries, "/api/v1/admin/audit-logs", [(Method::GET, RoleRequirement::Super)]);
        entry(&mut entries, "/api/v1/admin/audit-logs/stats", [(Method::GET, RoleRequirement::Super)]);

        Self { entries }
    }

    pub fn lookup(&self, pattern: &str) -> Option<&PermissionDescriptor> {
        self.entries.get(pattern)
    }

    pub fn requirement(&self, method: &Method, pattern: &str) -> Option<&RoleRequirement> {
        self.entries.get(pattern).and_then(|d| d.method_roles.get(method))
    }

    /// Checks that every route in the concrete route table has a matching
    /// registry entry for its method. Returns the unmapped routes.
    pub fn validate(&self, routes: &[(Method, &'static str)]) -> Result<(), Vec<String>> {
        let missing: Vec<String> = routes
            .iter()
            .filter(|(method, pattern)| {
                match self.entries.get(pattern) {
                    Some(d) => d.authenticated && !d.method_roles.contains_key(method),
                    None => true,
                }
            })
            .map(|(method, pattern)| format!("{} {}", method, pattern))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }
}

fn public(entries: &mut HashMap<&'static str, PermissionDescriptor>, pattern: &'static str) {
    entries.insert(pattern, PermissionDescriptor {
        authenticated: false,
        method_roles: HashMap::new(),
    });
}

fn entry<const N: usize>(
    entries: &mut HashMap<&'static str, PermissionDescriptor>,
    pattern: &'static str,
    methods: [(Method, RoleRequirement); N],
) {
    entries.insert(pattern, PermissionDescriptor {
        authenticated: true,
        method_roles: methods.into_iter().collect(),
    });
}

/// Pure authorization decision. First match wins:
/// 1. no requirement registered -> allow
/// 2. no resolved identity or empty claim set -> deny
/// 3. superadmin claim -> allow
/// 4. Owner -> caller id must equal the id/account_id path parameter
/// 5. Roles -> claim intersection, with an optional owner fallback for
///    user-class callers
/// 6. otherwise deny
pub fn is_authorized(
    requirement: Option<&RoleRequirement>,
    claims: &[Claim],
    caller_id: &str,
    params: &[(&str, &str)],
) -> bool {
    let Some(requirement) = requirement else {
        return true;
    };

    if caller_id.is_empty() || claims.is_empty() {
        return false;
    }

    if claims.contains(&Claim::Super) {
        return true;
    }

    match requirement {
        RoleRequirement::Any => true,
        RoleRequirement::Super => false,
        RoleRequirement::Owner => owner_param(params) == Some(caller_id),
        RoleRequirement::Roles { roles, allow_owner } => {
            if roles.iter().any(|role| claims.contains(&role.claim())) {
                return true;
            }
            *allow_owner
                && claims.iter().any(|c| matches!(c, Claim::User | Claim::Admin))
                && owner_param(params) == Some(caller_id)
        }
    }
}

fn owner_param<'a>(params: &[(&'a str, &'a str)]) -> Option<&'a str> {
    params
        .iter()
        .find(|(name, _)| *name == "id" || *name == "account_id")
        .map(|(_, value)| *value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::router::route_table;

    const CALLER: &str = "407ec421-5a71-4d0b-9f5c-88aa30871b30";

    #[test]
    fn registry_covers_every_registered_route() {
        let registry = PermissionRegistry::build();
        assert!(registry.validate(&route_table()).is_ok());
    }

    #[test]
    fn registry_rejects_unmapped_route() {
        let registry = PermissionRegistry::build();
        let mut routes = route_table();
        routes.push((Method::GET, "/api/v1/unmapped"));

        let missing = registry.validate(&routes).unwrap_err();
        assert_eq!(missing, vec!["GET /api/v1/unmapped".to_string()]);
    }

    #[test]
    fn registry_rejects_unmapped_method_on_known_route() {
        let registry = PermissionRegistry::build();
        let mut routes = route_table();
        routes.push((Method::DELETE, "/api/v1/me"));

        assert!(registry.validate(&routes).is_err());
    }

    #[test]
    fn empty_claims_always_deny() {
        let registry = PermissionRegistry::build();
        for (method, pattern) in route_table() {
            let requirement = registry.requirement(&method, pattern);
            if requirement.is_some() {
                assert!(
                    !is_authorized(requirement, &[], "", &[]),
                    "{} {} allowed an anonymous caller",
                    method,
                    pattern
                );
            }
        }
    }

    #[test]
    fn super_claim_always_allows() {
        let registry = PermissionRegistry::build();
        let claims = [Claim::Authenticated, Claim::Super];
        for (method, pattern) in route_table() {
            assert!(
                is_authorized(registry.requirement(&method, pattern), &claims, CALLER, &[]),
                "{} {} denied a superadmin",
                method,
                pattern
            );
        }
    }

    #[test]
    fn owner_route_requires_matching_id_param() {
        let requirement = RoleRequirement::Owner;
        let claims = [Claim::Authenticated];

        assert!(is_authorized(Some(&requirement), &claims, CALLER, &[("id", CALLER)]));
        assert!(!is_authorized(
            Some(&requirement),
            &claims,
            CALLER,
            &[("id", "1f0a6a3c-62a8-4f10-93d7-6f41a25f0000")]
        ));
        assert!(!is_authorized(Some(&requirement), &claims, CALLER, &[]));
    }

    #[test]
    fn role_requirement_intersects_claims() {
        let requirement = RoleRequirement::Roles { roles: ADMIN_ROLES, allow_owner: false };

        assert!(is_authorized(
            Some(&requirement),
            &[Claim::Authenticated, Claim::Admin],
            CALLER,
            &[]
        ));
        assert!(!is_authorized(
            Some(&requirement),
            &[Claim::Authenticated, Claim::User],
            CALLER,
            &[]
        ));
        assert!(!is_authorized(Some(&requirement), &[Claim::Authenticated], CALLER, &[]));
    }

    #[test]
    fn owner_fallback_inside_role_requirement() {
        let requirement = RoleRequirement::Roles { roles: ADMIN_ROLES, allow_owner: true };
        let claims = [Claim::Authenticated, Claim::User];

        assert!(is_authorized(Some(&requirement), &claims, CALLER, &[("id", CALLER)]));
        assert!(!is_authorized(
            Some(&requirement),
            &claims,
            CALLER,
            &[("id", "1f0a6a3c-62a8-4f10-93d7-6f41a25f0000")]
        ));
    }

    #[test]
    fn unregistered_requirement_allows() {
        assert!(is_authorized(None, &[], "", &[]));
    }
}
