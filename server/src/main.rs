mod config;
mod graphql;
mod http;
mod principal;
mod session;

use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use platform_authz::Authorizer;
use platform_db::{DbPool, DbPrivilegeLookup, connect};
use platform_obs::{ObsConfig, init_tracing};
use tracing::info;

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
    principal::{AuthorizeRequest, Requirement, resolve_principal},
};

#[derive(Parser, Debug)]
#[command(name = "authz-server", version, about = "Privilege-based authorization service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP + GraphQL server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Decide a single authorization question and print the verdict.
    Check(CheckCommand),
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
}

impl From<ServeCommand> for ServeConfig {
    fn from(value: ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[derive(Args, Debug)]
struct CheckCommand {
    /// Login name; login aliases apply.
    #[arg(long)]
    user: String,
    #[arg(long, value_name = "TYPE")]
    resource_type: Option<String>,
    #[arg(long, value_name = "ID")]
    resource_id: Option<i64>,
    /// Authorization id such as CLUSTER.VIEW_METRICS; repeat for alternatives.
    #[arg(long = "authorization", value_name = "ID")]
    authorizations: Vec<String>,
}

impl From<CheckCommand> for AuthorizeRequest {
    fn from(value: CheckCommand) -> Self {
        AuthorizeRequest {
            resource_type: value.resource_type,
            resource_id: value.resource_id,
            authorizations: value.authorizations,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing(ObsConfig::from_env("authz-server"))?;
    let cli = Cli::parse();
    let app_config = AppConfig::load()?;
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, app_config).await.map(|_| ExitCode::SUCCESS),
        Command::Migrate(action) => {
            let pool = setup_pool(&app_config).await?;
            match action {
                MigrateCommand::Up => migrate_up(&pool).await?,
                MigrateCommand::Down => migrate_down(&pool).await?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Check(cmd) => run_check(cmd, app_config).await,
    }
}

async fn setup_pool(config: &AppConfig) -> Result<DbPool> {
    connect(&config.database)
        .await
        .context("failed to connect to the privilege store")
}

async fn run_server(cmd: ServeCommand, config: AppConfig) -> Result<()> {
    let pool = setup_pool(&config).await?;
    ensure_migrations(&pool, cmd.allow_dirty).await?;
    let authorizer = Arc::new(Authorizer::new(DbPrivilegeLookup::new(pool.clone())));
    let state = AppState {
        schema: graphql::build_schema(authorizer.clone()),
        pool,
        authorizer,
        aliases: Arc::new(config.aliases()),
    };
    http::serve(cmd.into(), state).await
}

async fn run_check(cmd: CheckCommand, config: AppConfig) -> Result<ExitCode> {
    let pool = setup_pool(&config).await?;
    let aliases = config.aliases();
    let login = cmd.user.clone();
    let requirement = Requirement::try_from(&AuthorizeRequest::from(cmd))?;
    let principal = resolve_principal(&pool, &aliases, Some(&login)).await?;
    let authorizer = Authorizer::new(DbPrivilegeLookup::new(pool));
    let allowed = authorizer
        .is_authorized_current(
            &principal,
            requirement.resource_type,
            requirement.resource_id,
            &requirement.authorizations,
        )
        .await;
    if allowed {
        println!("authorized");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("denied");
        Ok(ExitCode::FAILURE)
    }
}

async fn ensure_migrations(pool: &DbPool, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if !pending.is_empty() && !allow_dirty {
        anyhow::bail!(
            "pending migrations detected; run `authz-server migrate up` or pass --allow-dirty"
        );
    }
    Ok(())
}

async fn migrate_up(pool: &DbPool) -> Result<()> {
    Migrator::up(pool, None).await?;
    info!("database migrations applied");
    Ok(())
}

async fn migrate_down(pool: &DbPool) -> Result<()> {
    Migrator::down(pool, Some(1)).await?;
    info!("most recent migration rolled back");
    Ok(())
}
