mod me;

use std::sync::Arc;

use async_graphql::{
    Context, EmptyMutation, EmptySubscription, ErrorExtensions, Object, Schema, SimpleObject,
};
use platform_api::{ApiError, ApiResult};
use platform_authz::{Authorizer, PrincipalSource};
use platform_db::DbPrivilegeLookup;
use serde::Serialize;
use tracing::instrument;

use crate::principal::{AuthorizeRequest, RequestPrincipal, Requirement};

pub use me::MePayload;

pub type SchemaType = Schema<QueryRoot, EmptyMutation, EmptySubscription>;
pub type SharedAuthorizer = Arc<Authorizer<DbPrivilegeLookup>>;

pub fn build_schema(authorizer: SharedAuthorizer) -> SchemaType {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(authorizer)
        .finish()
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    #[instrument(name = "graphql.health", skip_all)]
    async fn health(&self) -> ApiResult<HealthPayload> {
        Ok(HealthPayload { ok: true })
    }

    #[instrument(name = "graphql.me", skip_all)]
    async fn me(&self, ctx: &Context<'_>) -> ApiResult<Option<MePayload>> {
        let principal = ctx
            .data_opt::<RequestPrincipal>()
            .and_then(RequestPrincipal::current_principal);
        Ok(principal.map(MePayload::from_principal))
    }

    /// Whether the caller holds any of `authorizations` on the resource.
    #[instrument(name = "graphql.authorized", skip_all)]
    async fn authorized(
        &self,
        ctx: &Context<'_>,
        resource_type: Option<String>,
        resource_id: Option<i64>,
        authorizations: Vec<String>,
    ) -> async_graphql::Result<bool> {
        let request = AuthorizeRequest {
            resource_type,
            resource_id,
            authorizations,
        };
        let requirement =
            Requirement::try_from(&request).map_err(|err| ApiError::from(err).extend())?;
        let authorizer = ctx.data::<SharedAuthorizer>()?;
        let principal = ctx
            .data_opt::<RequestPrincipal>()
            .cloned()
            .unwrap_or_default();
        Ok(authorizer
            .is_authorized_current(
                &principal,
                requirement.resource_type,
                requirement.resource_id,
                &requirement.authorizations,
            )
            .await)
    }

    #[instrument(name = "graphql.version", skip_all)]
    async fn version(&self) -> ApiResult<String> {
        Ok(env!("CARGO_PKG_VERSION").to_string())
    }
}

#[derive(Clone, Debug, SimpleObject, Serialize)]
pub struct HealthPayload {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::Request;
    use platform_authz::{
        AuthenticatedPrincipal, GrantedPrivilege, Permission, PrincipalRecord, ResourceRecord,
        RoleAuthorization,
    };
    use sea_orm::DatabaseConnection;
    use serde_json::json;

    fn schema() -> SchemaType {
        let lookup = DbPrivilegeLookup::new(DatabaseConnection::Disconnected);
        build_schema(Arc::new(Authorizer::new(lookup)))
    }

    fn operator() -> RequestPrincipal {
        let permission = Permission::new(5, "CLUSTER.OPERATOR")
            .with_authorization(RoleAuthorization::ClusterViewMetrics)
            .with_authorization(RoleAuthorization::ClusterModifyConfigs);
        RequestPrincipal(Some(AuthenticatedPrincipal::new(
            "olivia",
            [GrantedPrivilege::new(
                1,
                PrincipalRecord::new(10, "USER"),
                ResourceRecord::new(2, "CLUSTER"),
                permission,
            )],
        )))
    }

    #[tokio::test]
    async fn health_query_returns_ok() {
        let response = schema().execute(Request::new("{ health { ok } }")).await;
        assert!(response.errors.is_empty());
        let body = response.data.into_json().unwrap();
        assert_eq!(body, json!({"health": {"ok": true}}));
    }

    #[tokio::test]
    async fn me_lists_authorization_names() {
        let request = Request::new("{ me { name authorizations } }").data(operator());
        let response = schema().execute(request).await;
        assert!(response.errors.is_empty());
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({"me": {
                "name": "olivia",
                "authorizations": ["CLUSTER.VIEW_METRICS", "CLUSTER.MODIFY_CONFIGS"],
            }})
        );
    }

    #[tokio::test]
    async fn me_is_null_without_principal() {
        let response = schema().execute(Request::new("{ me { name } }")).await;
        assert_eq!(response.data.into_json().unwrap(), json!({"me": null}));
    }

    #[tokio::test]
    async fn authorized_checks_type_scope() {
        let query = r#"{
            cluster: authorized(resourceType: "CLUSTER", authorizations: ["CLUSTER.MODIFY_CONFIGS"])
            view: authorized(resourceType: "VIEW", authorizations: ["CLUSTER.MODIFY_CONFIGS"])
        }"#;
        let response = schema().execute(Request::new(query).data(operator())).await;
        assert!(response.errors.is_empty());
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({"cluster": true, "view": false})
        );
    }

    #[tokio::test]
    async fn unknown_authorization_is_bad_request() {
        let query = r#"{ authorized(authorizations: ["CLUSTER.FLY"]) }"#;
        let response = schema().execute(Request::new(query).data(operator())).await;
        assert_eq!(response.errors.len(), 1);
        let code = response.errors[0]
            .extensions
            .as_ref()
            .and_then(|map| map.get("code"))
            .cloned();
        assert_eq!(code, Some(async_graphql::Value::from("INVALID_INPUT")));
    }
}
