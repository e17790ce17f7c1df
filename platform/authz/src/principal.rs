use serde::{Deserialize, Serialize};

use crate::catalog::GrantedPrivilege;

/// The authenticated actor of one request together with the privileges it holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedPrincipal {
    name: String,
    privileges: Vec<GrantedPrivilege>,
}

impl AuthenticatedPrincipal {
    /// Builds the authority set from stored privileges. An identical privilege
    /// listed twice is kept once, at its first position; grants that only
    /// share an id are all kept.
    pub fn new(name: impl Into<String>, privileges: impl IntoIterator<Item = GrantedPrivilege>) -> Self {
        let mut kept: Vec<GrantedPrivilege> = Vec::new();
        for privilege in privileges {
            if !kept.contains(&privilege) {
                kept.push(privilege);
            }
        }
        Self {
            name: name.into(),
            privileges: kept,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn privileges(&self) -> &[GrantedPrivilege] {
        &self.privileges
    }

    pub fn has_privileges(&self) -> bool {
        !self.privileges.is_empty()
    }
}

/// Request-boundary access to whoever is currently authenticated.
pub trait PrincipalSource {
    fn current_principal(&self) -> Option<&AuthenticatedPrincipal>;

    /// Name of the authenticated principal, or `default` when nobody is.
    fn authenticated_name<'a>(&'a self, default: Option<&'a str>) -> Option<&'a str> {
        self.current_principal()
            .map(AuthenticatedPrincipal::name)
            .or(default)
    }
}

impl PrincipalSource for Option<AuthenticatedPrincipal> {
    fn current_principal(&self) -> Option<&AuthenticatedPrincipal> {
        self.as_ref()
    }
}

impl PrincipalSource for AuthenticatedPrincipal {
    fn current_principal(&self) -> Option<&AuthenticatedPrincipal> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Permission, PrincipalRecord, ResourceRecord};

    fn privilege(id: i64) -> GrantedPrivilege {
        GrantedPrivilege::new(
            id,
            PrincipalRecord::new(1, "USER"),
            ResourceRecord::new(2, "CLUSTER"),
            Permission::new(3, "CLUSTER.USER"),
        )
    }

    #[test]
    fn duplicate_privileges_collapse_in_first_seen_order() {
        let principal =
            AuthenticatedPrincipal::new("admin", [privilege(7), privilege(4), privilege(7)]);
        let ids: Vec<i64> = principal.privileges().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![7, 4]);
    }

    #[test]
    fn grants_sharing_an_id_are_all_kept() {
        let view_grant = GrantedPrivilege::new(
            7,
            PrincipalRecord::new(1, "USER"),
            ResourceRecord::new(20, "VIEW"),
            Permission::new(4, "VIEW.USER"),
        );
        let principal = AuthenticatedPrincipal::new("alice", [privilege(7), view_grant.clone()]);
        assert_eq!(principal.privileges().len(), 2);
        assert_eq!(principal.privileges()[1], view_grant);
    }

    #[test]
    fn authenticated_name_falls_back_to_default() {
        let nobody: Option<AuthenticatedPrincipal> = None;
        assert_eq!(nobody.authenticated_name(Some("anonymous")), Some("anonymous"));
        assert_eq!(nobody.authenticated_name(None), None);

        let someone = Some(AuthenticatedPrincipal::new("alice", Vec::new()));
        assert_eq!(someone.authenticated_name(Some("anonymous")), Some("alice"));
    }
}
