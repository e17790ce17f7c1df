use async_graphql::SimpleObject;
use platform_authz::{AuthenticatedPrincipal, authorization_names};

#[derive(Clone, Debug, SimpleObject)]
pub struct MePayload {
    pub name: String,
    /// Display names of every authorization held, in grant order.
    pub authorizations: Vec<String>,
}

impl MePayload {
    pub fn from_principal(principal: &AuthenticatedPrincipal) -> Self {
        Self {
            name: principal.name().to_string(),
            authorizations: authorization_names(principal),
        }
    }
}
