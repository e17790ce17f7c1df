//! Tables backing the privilege store.

pub mod admin_permission;
pub mod admin_principal;
pub mod admin_principal_type;
pub mod admin_privilege;
pub mod admin_resource;
pub mod admin_resource_type;
pub mod clusters;
pub mod permission_role_authorization;
pub mod role_authorization;
pub mod users;
pub mod view_instance;
