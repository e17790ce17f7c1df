use anyhow::{Context, Result};
use platform_authz::{
    AuthenticatedPrincipal, AuthorizationSet, PrincipalSource, ResourceId, ResourceType,
    RoleAuthorization, UnknownName,
};
use platform_db::DbPool;
use serde::Deserialize;
use tracing::debug;

use crate::session::LoginAliases;

/// Set by the upstream authenticator to the login name of the caller.
pub const AUTHENTICATED_USER_HEADER: &str = "x-authenticated-user";

/// Whoever the current request is made on behalf of, if anyone.
#[derive(Clone, Debug, Default)]
pub struct RequestPrincipal(pub Option<AuthenticatedPrincipal>);

impl PrincipalSource for RequestPrincipal {
    fn current_principal(&self) -> Option<&AuthenticatedPrincipal> {
        self.0.as_ref()
    }
}

/// Maps a login name through the aliases and loads that user's privileges.
pub async fn resolve_principal(
    pool: &DbPool,
    aliases: &LoginAliases,
    login: Option<&str>,
) -> Result<RequestPrincipal> {
    let Some(login) = login else {
        return Ok(RequestPrincipal::default());
    };
    let user_name = aliases.resolve_login_alias(login);
    let principal = platform_db::load_principal(pool, &user_name)
        .await
        .with_context(|| format!("failed to load privileges for '{user_name}'"))?;
    if principal.is_none() {
        debug!(login, user_name, "no active user for login");
    }
    Ok(RequestPrincipal(principal))
}

/// An authorization question as callers phrase it: raw names, optional scope.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AuthorizeRequest {
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub resource_id: Option<ResourceId>,
    #[serde(default)]
    pub authorizations: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Requirement {
    pub resource_type: Option<ResourceType>,
    pub resource_id: Option<ResourceId>,
    pub authorizations: AuthorizationSet,
}

impl TryFrom<&AuthorizeRequest> for Requirement {
    type Error = UnknownName;

    fn try_from(request: &AuthorizeRequest) -> Result<Self, Self::Error> {
        let resource_type = request
            .resource_type
            .as_deref()
            .map(ResourceType::translate)
            .transpose()?;
        let authorizations = request
            .authorizations
            .iter()
            .map(|id| RoleAuthorization::translate(id))
            .collect::<Result<AuthorizationSet, _>>()?;
        Ok(Self {
            resource_type,
            resource_id: request.resource_id,
            authorizations,
        })
    }
}
