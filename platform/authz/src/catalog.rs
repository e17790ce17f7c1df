//! Resource types, role authorizations and the stored records that carry them.

use std::{collections::HashMap, fmt, str::FromStr};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a stored resource (cluster, view instance, the admin root).
pub type ResourceId = i64;

/// A stored name that has no counterpart in the catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} name '{name}'")]
pub struct UnknownName {
    pub kind: &'static str,
    pub name: String,
}

impl UnknownName {
    fn new(kind: &'static str, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    /// Administrative scope. Privileges on it reach every resource.
    Admin,
    Cluster,
    View,
}

impl ResourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Admin => "AMBARI",
            ResourceType::Cluster => "CLUSTER",
            ResourceType::View => "VIEW",
        }
    }

    /// Maps a stored resource type name onto the catalog.
    ///
    /// View definitions register their own resource type named
    /// `NAME{version}`; those all translate to [`ResourceType::View`].
    pub fn translate(name: &str) -> Result<Self, UnknownName> {
        let trimmed = name.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "AMBARI" | "ADMIN" => Ok(ResourceType::Admin),
            "CLUSTER" => Ok(ResourceType::Cluster),
            "VIEW" => Ok(ResourceType::View),
            _ if is_view_definition_name(trimmed) => Ok(ResourceType::View),
            _ => Err(UnknownName::new("resource type", name)),
        }
    }
}

fn is_view_definition_name(name: &str) -> bool {
    match (name.find('{'), name.strip_suffix('}')) {
        (Some(open), Some(_)) => open > 0 && open + 2 < name.len(),
        _ => false,
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::translate(s)
    }
}

/// A fine-grained capability that a permission may grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum RoleAuthorization {
    AdminAddDeleteClusters,
    AdminAssignRoles,
    AdminEditStackRepos,
    AdminManageGroups,
    AdminManageSettings,
    AdminManageUsers,
    AdminManageViews,
    AdminRenameCluster,
    AdminRunCustomCommand,
    AdminViewStatusInfo,
    ClusterManageAlerts,
    ClusterManageConfigGroups,
    ClusterManageCredentials,
    ClusterManageUserPersistedData,
    ClusterModifyConfigs,
    ClusterRunCustomCommand,
    ClusterToggleAlerts,
    ClusterToggleKerberos,
    ClusterUpgradeDowngradeStack,
    ClusterViewAlerts,
    ClusterViewConfigs,
    ClusterViewMetrics,
    ClusterViewStackDetails,
    ClusterViewStatusInfo,
    HostAddDeleteComponents,
    HostAddDeleteHosts,
    HostToggleMaintenance,
    HostViewConfigs,
    HostViewMetrics,
    HostViewStatusInfo,
    ServiceAddDeleteServices,
    ServiceCompareConfigs,
    ServiceDecommissionRecommission,
    ServiceManageAlerts,
    ServiceManageConfigGroups,
    ServiceModifyConfigs,
    ServiceMove,
    ServiceRunCustomCommand,
    ServiceRunServiceCheck,
    ServiceStartStop,
    ServiceToggleAlerts,
    ServiceToggleMaintenance,
    ServiceViewAlerts,
    ServiceViewConfigs,
    ServiceViewMetrics,
    ServiceViewOperationalLogs,
    ServiceViewStatusInfo,
    ViewUse,
}

impl RoleAuthorization {
    pub const ALL: &'static [RoleAuthorization] = &[
        RoleAuthorization::AdminAddDeleteClusters,
        RoleAuthorization::AdminAssignRoles,
        RoleAuthorization::AdminEditStackRepos,
        RoleAuthorization::AdminManageGroups,
        RoleAuthorization::AdminManageSettings,
        RoleAuthorization::AdminManageUsers,
        RoleAuthorization::AdminManageViews,
        RoleAuthorization::AdminRenameCluster,
        RoleAuthorization::AdminRunCustomCommand,
        RoleAuthorization::AdminViewStatusInfo,
        RoleAuthorization::ClusterManageAlerts,
        RoleAuthorization::ClusterManageConfigGroups,
        RoleAuthorization::ClusterManageCredentials,
        RoleAuthorization::ClusterManageUserPersistedData,
        RoleAuthorization::ClusterModifyConfigs,
        RoleAuthorization::ClusterRunCustomCommand,
        RoleAuthorization::ClusterToggleAlerts,
        RoleAuthorization::ClusterToggleKerberos,
        RoleAuthorization::ClusterUpgradeDowngradeStack,
        RoleAuthorization::ClusterViewAlerts,
        RoleAuthorization::ClusterViewConfigs,
        RoleAuthorization::ClusterViewMetrics,
        RoleAuthorization::ClusterViewStackDetails,
        RoleAuthorization::ClusterViewStatusInfo,
        RoleAuthorization::HostAddDeleteComponents,
        RoleAuthorization::HostAddDeleteHosts,
        RoleAuthorization::HostToggleMaintenance,
        RoleAuthorization::HostViewConfigs,
        RoleAuthorization::HostViewMetrics,
        RoleAuthorization::HostViewStatusInfo,
        RoleAuthorization::ServiceAddDeleteServices,
        RoleAuthorization::ServiceCompareConfigs,
        RoleAuthorization::ServiceDecommissionRecommission,
        RoleAuthorization::ServiceManageAlerts,
        RoleAuthorization::ServiceManageConfigGroups,
        RoleAuthorization::ServiceModifyConfigs,
        RoleAuthorization::ServiceMove,
        RoleAuthorization::ServiceRunCustomCommand,
        RoleAuthorization::ServiceRunServiceCheck,
        RoleAuthorization::ServiceStartStop,
        RoleAuthorization::ServiceToggleAlerts,
        RoleAuthorization::ServiceToggleMaintenance,
        RoleAuthorization::ServiceViewAlerts,
        RoleAuthorization::ServiceViewConfigs,
        RoleAuthorization::ServiceViewMetrics,
        RoleAuthorization::ServiceViewOperationalLogs,
        RoleAuthorization::ServiceViewStatusInfo,
        RoleAuthorization::ViewUse,
    ];

    /// Stable identifier as stored in the `roleauthorization` table.
    pub fn id(self) -> &'static str {
        match self {
            RoleAuthorization::AdminAddDeleteClusters => "AMBARI.ADD_DELETE_CLUSTERS",
            RoleAuthorization::AdminAssignRoles => "AMBARI.ASSIGN_ROLES",
            RoleAuthorization::AdminEditStackRepos => "AMBARI.EDIT_STACK_REPOS",
            RoleAuthorization::AdminManageGroups => "AMBARI.MANAGE_GROUPS",
            RoleAuthorization::AdminManageSettings => "AMBARI.MANAGE_SETTINGS",
            RoleAuthorization::AdminManageUsers => "AMBARI.MANAGE_USERS",
            RoleAuthorization::AdminManageViews => "AMBARI.MANAGE_VIEWS",
            RoleAuthorization::AdminRenameCluster => "AMBARI.RENAME_CLUSTER",
            RoleAuthorization::AdminRunCustomCommand => "AMBARI.RUN_CUSTOM_COMMAND",
            RoleAuthorization::AdminViewStatusInfo => "AMBARI.VIEW_STATUS_INFO",
            RoleAuthorization::ClusterManageAlerts => "CLUSTER.MANAGE_ALERTS",
            RoleAuthorization::ClusterManageConfigGroups => "CLUSTER.MANAGE_CONFIG_GROUPS",
            RoleAuthorization::ClusterManageCredentials => "CLUSTER.MANAGE_CREDENTIALS",
            RoleAuthorization::ClusterManageUserPersistedData => {
                "CLUSTER.MANAGE_USER_PERSISTED_DATA"
            }
            RoleAuthorization::ClusterModifyConfigs => "CLUSTER.MODIFY_CONFIGS",
            RoleAuthorization::ClusterRunCustomCommand => "CLUSTER.RUN_CUSTOM_COMMAND",
            RoleAuthorization::ClusterToggleAlerts => "CLUSTER.TOGGLE_ALERTS",
            RoleAuthorization::ClusterToggleKerberos => "CLUSTER.TOGGLE_KERBEROS",
            RoleAuthorization::ClusterUpgradeDowngradeStack => "CLUSTER.UPGRADE_DOWNGRADE_STACK",
            RoleAuthorization::ClusterViewAlerts => "CLUSTER.VIEW_ALERTS",
            RoleAuthorization::ClusterViewConfigs => "CLUSTER.VIEW_CONFIGS",
            RoleAuthorization::ClusterViewMetrics => "CLUSTER.VIEW_METRICS",
            RoleAuthorization::ClusterViewStackDetails => "CLUSTER.VIEW_STACK_DETAILS",
            RoleAuthorization::ClusterViewStatusInfo => "CLUSTER.VIEW_STATUS_INFO",
            RoleAuthorization::HostAddDeleteComponents => "HOST.ADD_DELETE_COMPONENTS",
            RoleAuthorization::HostAddDeleteHosts => "HOST.ADD_DELETE_HOSTS",
            RoleAuthorization::HostToggleMaintenance => "HOST.TOGGLE_MAINTENANCE",
            RoleAuthorization::HostViewConfigs => "HOST.VIEW_CONFIGS",
            RoleAuthorization::HostViewMetrics => "HOST.VIEW_METRICS",
            RoleAuthorization::HostViewStatusInfo => "HOST.VIEW_STATUS_INFO",
            RoleAuthorization::ServiceAddDeleteServices => "SERVICE.ADD_DELETE_SERVICES",
            RoleAuthorization::ServiceCompareConfigs => "SERVICE.COMPARE_CONFIGS",
            RoleAuthorization::ServiceDecommissionRecommission => {
                "SERVICE.DECOMMISSION_RECOMMISSION"
            }
            RoleAuthorization::ServiceManageAlerts => "SERVICE.MANAGE_ALERTS",
            RoleAuthorization::ServiceManageConfigGroups => "SERVICE.MANAGE_CONFIG_GROUPS",
            RoleAuthorization::ServiceModifyConfigs => "SERVICE.MODIFY_CONFIGS",
            RoleAuthorization::ServiceMove => "SERVICE.MOVE",
            RoleAuthorization::ServiceRunCustomCommand => "SERVICE.RUN_CUSTOM_COMMAND",
            RoleAuthorization::ServiceRunServiceCheck => "SERVICE.RUN_SERVICE_CHECK",
            RoleAuthorization::ServiceStartStop => "SERVICE.START_STOP",
            RoleAuthorization::ServiceToggleAlerts => "SERVICE.TOGGLE_ALERTS",
            RoleAuthorization::ServiceToggleMaintenance => "SERVICE.TOGGLE_MAINTENANCE",
            RoleAuthorization::ServiceViewAlerts => "SERVICE.VIEW_ALERTS",
            RoleAuthorization::ServiceViewConfigs => "SERVICE.VIEW_CONFIGS",
            RoleAuthorization::ServiceViewMetrics => "SERVICE.VIEW_METRICS",
            RoleAuthorization::ServiceViewOperationalLogs => "SERVICE.VIEW_OPERATIONAL_LOGS",
            RoleAuthorization::ServiceViewStatusInfo => "SERVICE.VIEW_STATUS_INFO",
            RoleAuthorization::ViewUse => "VIEW.USE",
        }
    }

    /// Resolves a stored authorization id, ignoring case and surrounding whitespace.
    pub fn translate(id: &str) -> Result<Self, UnknownName> {
        AUTHORIZATIONS_BY_ID
            .get(id.trim().to_ascii_uppercase().as_str())
            .copied()
            .ok_or_else(|| UnknownName::new("authorization", id))
    }
}

static AUTHORIZATIONS_BY_ID: Lazy<HashMap<&'static str, RoleAuthorization>> = Lazy::new(|| {
    RoleAuthorization::ALL
        .iter()
        .map(|authorization| (authorization.id(), *authorization))
        .collect()
});

impl fmt::Display for RoleAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for RoleAuthorization {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::translate(s)
    }
}

impl Serialize for RoleAuthorization {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for RoleAuthorization {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::translate(&raw).map_err(serde::de::Error::custom)
    }
}

/// A typed `(type, id)` pair naming one concrete resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentity {
    pub resource_type: ResourceType,
    pub id: ResourceId,
}

impl ResourceIdentity {
    pub fn new(resource_type: ResourceType, id: ResourceId) -> Self {
        Self { resource_type, id }
    }
}

/// An authorization as recorded on a permission. `id` is matched, `name` is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRecord {
    pub id: String,
    pub name: String,
}

impl AuthorizationRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl From<RoleAuthorization> for AuthorizationRecord {
    fn from(value: RoleAuthorization) -> Self {
        Self::new(value.id(), value.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub authorizations: Vec<AuthorizationRecord>,
}

impl Permission {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            authorizations: Vec::new(),
        }
    }

    pub fn with_authorization(mut self, record: impl Into<AuthorizationRecord>) -> Self {
        self.authorizations.push(record.into());
        self
    }
}

/// A stored resource; the type stays a raw name until the engine translates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub id: ResourceId,
    pub type_name: String,
}

impl ResourceRecord {
    pub fn new(id: ResourceId, type_name: impl Into<String>) -> Self {
        Self {
            id,
            type_name: type_name.into(),
        }
    }

    pub fn resource_type(&self) -> Result<ResourceType, UnknownName> {
        ResourceType::translate(&self.type_name)
    }
}

impl From<ResourceIdentity> for ResourceRecord {
    fn from(value: ResourceIdentity) -> Self {
        Self::new(value.id, value.resource_type.as_str())
    }
}

/// Principal type names starting with this prefix mark cluster-inherited grants.
pub const CLUSTER_INHERITED_PREFIX: &str = "ALL.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalRecord {
    pub id: i64,
    pub type_name: String,
}

impl PrincipalRecord {
    pub fn new(id: i64, type_name: impl Into<String>) -> Self {
        Self {
            id,
            type_name: type_name.into(),
        }
    }

    /// Name of the cluster permission this principal stands for, if it is a
    /// cluster-inherited principal such as `ALL.CLUSTER.USER`.
    pub fn inherited_permission_name(&self) -> Option<&str> {
        self.type_name
            .strip_prefix(CLUSTER_INHERITED_PREFIX)
            .filter(|name| !name.is_empty())
    }
}

/// One permission granted to one principal over one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedPrivilege {
    pub id: i64,
    pub principal: PrincipalRecord,
    pub resource: ResourceRecord,
    pub permission: Permission,
}

impl GrantedPrivilege {
    pub fn new(
        id: i64,
        principal: PrincipalRecord,
        resource: impl Into<ResourceRecord>,
        permission: Permission,
    ) -> Self {
        Self {
            id,
            principal,
            resource: resource.into(),
            permission,
        }
    }

    pub fn is_cluster_inherited(&self) -> bool {
        self.principal.inherited_permission_name().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_type_names_translate_case_insensitively() {
        assert_eq!(ResourceType::translate("ambari"), Ok(ResourceType::Admin));
        assert_eq!(ResourceType::translate(" Cluster "), Ok(ResourceType::Cluster));
        assert_eq!(ResourceType::translate("VIEW"), Ok(ResourceType::View));
    }

    #[test]
    fn view_definition_types_translate_to_view() {
        assert_eq!(
            ResourceType::translate("FILES{1.0.0}"),
            Ok(ResourceType::View)
        );
        assert!(ResourceType::translate("{1.0.0}").is_err());
        assert!(ResourceType::translate("FILES{}").is_err());
    }

    #[test]
    fn unknown_resource_type_is_reported_not_raised() {
        let err = ResourceType::translate("HOSTGROUP").unwrap_err();
        assert_eq!(err.name, "HOSTGROUP");
        assert_eq!(err.to_string(), "unknown resource type name 'HOSTGROUP'");
    }

    #[test]
    fn every_authorization_id_translates_back() {
        for authorization in RoleAuthorization::ALL {
            assert_eq!(
                RoleAuthorization::translate(authorization.id()),
                Ok(*authorization)
            );
        }
        assert_eq!(
            RoleAuthorization::translate("cluster.view_metrics"),
            Ok(RoleAuthorization::ClusterViewMetrics)
        );
        assert!(RoleAuthorization::translate("CLUSTER.TELEPORT").is_err());
    }

    #[test]
    fn inherited_permission_name_strips_prefix() {
        let inherited = PrincipalRecord::new(1, "ALL.CLUSTER.USER");
        assert_eq!(inherited.inherited_permission_name(), Some("CLUSTER.USER"));
        assert_eq!(PrincipalRecord::new(2, "USER").inherited_permission_name(), None);
        assert_eq!(PrincipalRecord::new(3, "ALL.").inherited_permission_name(), None);
    }
}
