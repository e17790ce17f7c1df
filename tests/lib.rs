//! Seeded in-memory privilege store shared by the integration tests.
//!
//! Layout on top of the migrated catalog:
//!
//! | user  | principal | privilege                                   |
//! |-------|-----------|---------------------------------------------|
//! | alice | 100       | CLUSTER.USER on the `prod` cluster          |
//! | bob   | 101       | VIEW.USER on the standalone view            |
//! | carol | 102       | CLUSTER.USER on `prod`, but deactivated     |
//! | admin | 103       | AMBARI.ADMINISTRATOR on the admin resource  |
//!
//! The bound view is granted VIEW.USER for `ALL.CLUSTER.USER`, so every
//! cluster user inherits it. The quiet view is bound to the same cluster
//! without any inherited grant.

use anyhow::{Context, Result};
use entity::{admin_principal, admin_privilege, admin_resource, clusters, users, view_instance};
use migration::{Migrator, MigratorTrait};
use platform_db::{DbPool, connect_url};
use sea_orm::{ActiveValue::Set, ConnectionTrait, EntityTrait};

pub const ADMIN_RESOURCE: i64 = 1;
pub const CLUSTER_RESOURCE: i64 = 2;
pub const BOUND_VIEW_RESOURCE: i64 = 10;
pub const STANDALONE_VIEW_RESOURCE: i64 = 11;
pub const QUIET_VIEW_RESOURCE: i64 = 12;
/// Registered as a resource but no view instance points at it.
pub const ORPHAN_RESOURCE: i64 = 13;
/// View instance whose cluster handle names a cluster that does not exist.
pub const DANGLING_VIEW_RESOURCE: i64 = 14;

pub const PROD_CLUSTER: i64 = 1;

const USER_TYPE: i32 = 1;
const CLUSTER_TYPE: i32 = 2;
const VIEW_TYPE: i32 = 3;
/// Seeded shared principal for the `ALL.CLUSTER.USER` principal type.
const ALL_CLUSTER_USER_PRINCIPAL: i64 = 7;

const AMBARI_ADMINISTRATOR: i64 = 1;
const CLUSTER_USER: i64 = 2;
const VIEW_USER: i64 = 4;

/// Fresh in-memory database with migrations applied and fixtures loaded.
pub async fn seeded_store() -> Result<DbPool> {
    // One connection keeps every query on the same in-memory database.
    let pool = connect_url("sqlite::memory:", 1)
        .await
        .context("failed to open in-memory store")?;
    Migrator::up(&pool, None).await.context("migrations failed")?;
    seed(&pool).await.context("failed to load fixtures")?;
    Ok(pool)
}

/// Adds a view on [`DANGLING_VIEW_RESOURCE`] bound to cluster `cluster_id`,
/// bypassing the foreign key so the cluster can be missing.
pub async fn add_dangling_view(pool: &DbPool, cluster_id: i64) -> Result<()> {
    pool.execute_unprepared("PRAGMA foreign_keys = OFF").await?;
    admin_resource::Entity::insert(resource(DANGLING_VIEW_RESOURCE, VIEW_TYPE))
        .exec_without_returning(pool)
        .await?;
    view_instance::Entity::insert(view(
        4,
        "PIG{0.1.0}",
        "pig",
        DANGLING_VIEW_RESOURCE,
        Some(cluster_id),
    ))
    .exec_without_returning(pool)
    .await?;
    pool.execute_unprepared("PRAGMA foreign_keys = ON").await?;
    Ok(())
}

async fn seed(pool: &DbPool) -> Result<()> {
    admin_principal::Entity::insert_many((100..=103).map(|principal_id| {
        admin_principal::ActiveModel {
            principal_id: Set(principal_id),
            principal_type_id: Set(USER_TYPE),
        }
    }))
    .exec_without_returning(pool)
    .await?;

    users::Entity::insert_many([
        user(1, "alice", 100, true),
        user(2, "bob", 101, true),
        user(3, "carol", 102, false),
        user(4, "admin", 103, true),
    ])
    .exec_without_returning(pool)
    .await?;

    admin_resource::Entity::insert_many([
        resource(CLUSTER_RESOURCE, CLUSTER_TYPE),
        resource(BOUND_VIEW_RESOURCE, VIEW_TYPE),
        resource(STANDALONE_VIEW_RESOURCE, VIEW_TYPE),
        resource(QUIET_VIEW_RESOURCE, VIEW_TYPE),
        resource(ORPHAN_RESOURCE, VIEW_TYPE),
    ])
    .exec_without_returning(pool)
    .await?;

    clusters::Entity::insert(clusters::ActiveModel {
        cluster_id: Set(PROD_CLUSTER),
        cluster_name: Set("prod".to_string()),
        resource_id: Set(CLUSTER_RESOURCE),
    })
    .exec_without_returning(pool)
    .await?;

    view_instance::Entity::insert_many([
        view(1, "FILES{1.0.0}", "files", BOUND_VIEW_RESOURCE, Some(PROD_CLUSTER)),
        view(2, "HIVE{2.0.0}", "hive", STANDALONE_VIEW_RESOURCE, None),
        view(3, "TEZ{0.7.0}", "tez", QUIET_VIEW_RESOURCE, Some(PROD_CLUSTER)),
    ])
    .exec_without_returning(pool)
    .await?;

    admin_privilege::Entity::insert_many([
        privilege(1, CLUSTER_USER, CLUSTER_RESOURCE, 100),
        privilege(2, VIEW_USER, BOUND_VIEW_RESOURCE, ALL_CLUSTER_USER_PRINCIPAL),
        privilege(3, VIEW_USER, STANDALONE_VIEW_RESOURCE, 101),
        privilege(4, CLUSTER_USER, CLUSTER_RESOURCE, 102),
        privilege(5, AMBARI_ADMINISTRATOR, ADMIN_RESOURCE, 103),
    ])
    .exec_without_returning(pool)
    .await?;

    Ok(())
}

fn user(user_id: i64, user_name: &str, principal_id: i64, active: bool) -> users::ActiveModel {
    users::ActiveModel {
        user_id: Set(user_id),
        user_name: Set(user_name.to_string()),
        principal_id: Set(principal_id),
        active: Set(active),
    }
}

fn resource(resource_id: i64, resource_type_id: i32) -> admin_resource::ActiveModel {
    admin_resource::ActiveModel {
        resource_id: Set(resource_id),
        resource_type_id: Set(resource_type_id),
    }
}

fn view(
    view_instance_id: i64,
    view_name: &str,
    name: &str,
    resource_id: i64,
    cluster_handle: Option<i64>,
) -> view_instance::ActiveModel {
    view_instance::ActiveModel {
        view_instance_id: Set(view_instance_id),
        view_name: Set(view_name.to_string()),
        name: Set(name.to_string()),
        resource_id: Set(resource_id),
        cluster_handle: Set(cluster_handle),
    }
}

fn privilege(
    privilege_id: i64,
    permission_id: i64,
    resource_id: i64,
    principal_id: i64,
) -> admin_privilege::ActiveModel {
    admin_privilege::ActiveModel {
        privilege_id: Set(privilege_id),
        permission_id: Set(permission_id),
        resource_id: Set(resource_id),
        principal_id: Set(principal_id),
    }
}
