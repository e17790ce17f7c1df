use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Json, Router,
    extract::{FromRequestParts, State},
    http::{HeaderName, StatusCode, request::Parts},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use platform_api::ApiError;
use platform_authz::PrincipalSource;
use platform_db::DbPool;
use sea_orm::{ConnectionTrait, Statement};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{Span, field, info, instrument};

use crate::{
    graphql::{SchemaType, SharedAuthorizer},
    principal::{
        AUTHENTICATED_USER_HEADER, AuthorizeRequest, RequestPrincipal, Requirement,
        resolve_principal,
    },
    session::LoginAliases,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub schema: SchemaType,
    pub authorizer: SharedAuthorizer,
    pub aliases: Arc<LoginAliases>,
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "authorization server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/authorize", post(authorize_handler))
        .route("/graphql", post(graphql_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

impl FromRequestParts<AppState> for RequestPrincipal {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> HttpResult<Self> {
        let login = parts
            .headers
            .get(AUTHENTICATED_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty());
        resolve_principal(&state.pool, &state.aliases, login)
            .await
            .map_err(|err| HttpError::from(ApiError::internal(err)))
    }
}

#[derive(Debug, Serialize)]
struct AuthorizeResponse {
    authorized: bool,
}

/// 200 when authorized, 403 otherwise. The denial body never says why.
#[instrument(name = "http.authorize", skip_all, fields(caller = field::Empty))]
async fn authorize_handler(
    State(state): State<AppState>,
    principal: RequestPrincipal,
    Json(request): Json<AuthorizeRequest>,
) -> HttpResult<Json<AuthorizeResponse>> {
    Span::current().record("caller", caller_name(&principal));
    let requirement = Requirement::try_from(&request).map_err(ApiError::from)?;
    state
        .authorizer
        .verify_authorized_current(
            &principal,
            requirement.resource_type,
            requirement.resource_id,
            &requirement.authorizations,
        )
        .await
        .map_err(ApiError::from)?;
    Ok(Json(AuthorizeResponse { authorized: true }))
}

/// Name recorded on request spans; anonymous callers get a fixed label.
pub(crate) fn caller_name(principal: &RequestPrincipal) -> &str {
    principal
        .authenticated_name(Some(ANONYMOUS_CALLER))
        .unwrap_or(ANONYMOUS_CALLER)
}

const ANONYMOUS_CALLER: &str = "anonymous";

#[instrument(name = "http.graphql", skip_all, fields(caller = field::Empty))]
async fn graphql_handler(
    State(state): State<AppState>,
    principal: RequestPrincipal,
    request: GraphQLRequest,
) -> GraphQLResponse {
    Span::current().record("caller", caller_name(&principal));
    let req = request.into_inner().data(principal);
    state.schema.execute(req).await.into()
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let backend = state.pool.get_database_backend();
    let db_ok = state
        .pool
        .execute(Statement::from_string(backend, "SELECT 1".to_string()))
        .await
        .is_ok();
    Json(HealthResponse {
        ok: db_ok,
        db_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    version: &'static str,
}

type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        Self {
            status: StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for CTRL+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}
