use anyhow::Result;
use authz_tests::{
    ADMIN_RESOURCE, BOUND_VIEW_RESOURCE, CLUSTER_RESOURCE, DANGLING_VIEW_RESOURCE,
    QUIET_VIEW_RESOURCE, STANDALONE_VIEW_RESOURCE, add_dangling_view, seeded_store,
};
use platform_authz::{
    AuthenticatedPrincipal, AuthorizationSet, Authorizer, AuthzError, ResourceType,
    RoleAuthorization, authorization_names,
};
use platform_db::{DbPool, DbPrivilegeLookup, load_principal};

struct Fixture {
    pool: DbPool,
    authorizer: Authorizer<DbPrivilegeLookup>,
}

impl Fixture {
    async fn new() -> Result<Self> {
        let pool = seeded_store().await?;
        let authorizer = Authorizer::new(DbPrivilegeLookup::new(pool.clone()));
        Ok(Self { pool, authorizer })
    }

    async fn principal(&self, user_name: &str) -> Result<Option<AuthenticatedPrincipal>> {
        Ok(load_principal(&self.pool, user_name).await?)
    }

    async fn allows(
        &self,
        user_name: &str,
        resource_type: Option<ResourceType>,
        resource_id: Option<i64>,
        required: &[RoleAuthorization],
    ) -> Result<bool> {
        let principal = self.principal(user_name).await?;
        let required: AuthorizationSet = required.iter().copied().collect();
        Ok(self
            .authorizer
            .is_authorized(principal.as_ref(), resource_type, resource_id, &required)
            .await)
    }
}

#[tokio::test]
async fn cluster_user_holds_granted_cluster_authorizations() -> Result<()> {
    let fixture = Fixture::new().await?;
    let cluster = Some(ResourceType::Cluster);
    assert!(
        fixture
            .allows("alice", cluster, Some(CLUSTER_RESOURCE), &[RoleAuthorization::ClusterViewMetrics])
            .await?
    );
    assert!(
        !fixture
            .allows("alice", cluster, Some(CLUSTER_RESOURCE), &[RoleAuthorization::ClusterModifyConfigs])
            .await?
    );
    assert!(
        fixture
            .allows("alice", None, None, &[RoleAuthorization::ServiceViewConfigs])
            .await?
    );
    Ok(())
}

#[tokio::test]
async fn cluster_user_inherits_view_use_on_bound_view() -> Result<()> {
    let fixture = Fixture::new().await?;
    assert!(
        fixture
            .allows("alice", Some(ResourceType::View), Some(BOUND_VIEW_RESOURCE), &[RoleAuthorization::ViewUse])
            .await?
    );
    Ok(())
}

#[tokio::test]
async fn inheritance_needs_a_binding_and_an_inherited_grant() -> Result<()> {
    let fixture = Fixture::new().await?;
    let view = Some(ResourceType::View);
    let view_use = [RoleAuthorization::ViewUse];
    assert!(!fixture.allows("alice", view, Some(QUIET_VIEW_RESOURCE), &view_use).await?);
    assert!(!fixture.allows("alice", view, Some(STANDALONE_VIEW_RESOURCE), &view_use).await?);
    assert!(!fixture.allows("alice", view, None, &view_use).await?);
    Ok(())
}

#[tokio::test]
async fn view_bound_to_missing_cluster_is_denied() -> Result<()> {
    let fixture = Fixture::new().await?;
    add_dangling_view(&fixture.pool, 99).await?;
    assert!(
        !fixture
            .allows("alice", Some(ResourceType::View), Some(DANGLING_VIEW_RESOURCE), &[RoleAuthorization::ViewUse])
            .await?
    );
    Ok(())
}

#[tokio::test]
async fn view_user_is_scoped_to_its_own_view() -> Result<()> {
    let fixture = Fixture::new().await?;
    let view = Some(ResourceType::View);
    let view_use = [RoleAuthorization::ViewUse];
    assert!(fixture.allows("bob", view, Some(STANDALONE_VIEW_RESOURCE), &view_use).await?);
    assert!(fixture.allows("bob", view, None, &view_use).await?);
    // No cluster privileges, so nothing to inherit.
    assert!(!fixture.allows("bob", view, Some(BOUND_VIEW_RESOURCE), &view_use).await?);
    Ok(())
}

#[tokio::test]
async fn administrator_passes_everywhere_it_is_granted() -> Result<()> {
    let fixture = Fixture::new().await?;
    assert!(
        fixture
            .allows("admin", Some(ResourceType::Cluster), Some(CLUSTER_RESOURCE), &[RoleAuthorization::ClusterToggleKerberos])
            .await?
    );
    assert!(
        fixture
            .allows("admin", Some(ResourceType::View), Some(BOUND_VIEW_RESOURCE), &[RoleAuthorization::ViewUse])
            .await?
    );
    assert!(
        fixture
            .allows("admin", Some(ResourceType::Admin), Some(ADMIN_RESOURCE), &[RoleAuthorization::AdminManageUsers])
            .await?
    );
    Ok(())
}

#[tokio::test]
async fn inactive_user_is_denied() -> Result<()> {
    let fixture = Fixture::new().await?;
    let principal = fixture.principal("carol").await?;
    let required = AuthorizationSet::from([RoleAuthorization::ClusterViewMetrics]);
    let verdict = fixture
        .authorizer
        .verify_authorized(principal.as_ref(), None, None, &required)
        .await;
    assert_eq!(verdict, Err(AuthzError::Denied));

    // An empty requirement is satisfied by anyone, even nobody.
    assert!(
        fixture
            .authorizer
            .is_authorized(None, None, None, &AuthorizationSet::new())
            .await
    );
    Ok(())
}

#[tokio::test]
async fn authorization_names_use_display_names() -> Result<()> {
    let fixture = Fixture::new().await?;
    let bob = fixture.principal("bob").await?.expect("bob is active");
    assert_eq!(authorization_names(&bob), ["Use View"]);
    Ok(())
}
