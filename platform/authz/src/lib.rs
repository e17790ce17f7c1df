//! Authorization decisions over granted privileges.
//!
//! A principal is authorized when one of its privileges covers the target
//! resource and its permission carries any of the required authorizations.
//! Privileges on the administrative resource cover everything. View instances
//! bound to a cluster additionally accept cluster permissions they record as
//! cluster-inherited; see [`Authorizer`].

pub mod catalog;
pub mod engine;
pub mod lookup;
pub mod principal;

use thiserror::Error;

pub use catalog::{
    AuthorizationRecord, GrantedPrivilege, Permission, PrincipalRecord, ResourceId,
    ResourceIdentity, ResourceRecord, ResourceType, RoleAuthorization, UnknownName,
};
pub use engine::{AuthorizationSet, Authorizer, authorization_names};
pub use lookup::{InMemoryLookup, LookupError, PrivilegeLookup};
pub use principal::{AuthenticatedPrincipal, PrincipalSource};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// Deliberately carries no detail about what was missing.
    #[error("access denied")]
    Denied,
}
