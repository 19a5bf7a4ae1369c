//! graphql-server — HTTP front end for the customer/transaction ledger.
//!
//! Serves a single GraphQL endpoint over an in-memory store:
//! - `POST /graphql` executes queries and mutations.
//! - `GET /graphql?query=...` executes a query for clients that do not ask for
//!   HTML; mutations are refused on GET.
//! - `GET /graphql` otherwise serves the GraphiQL IDE (disable with
//!   GRAPHIQL_ENABLED=false).
//! - `GET /healthz` is a liveness probe.
//!
//! All data lives in process memory and resets on restart.
//!
//! Run:
//! ```bash
//! # pretty logs (default); PORT optional
//! cargo run -p graphql-server
//!
//! # json logs, empty store
//! LOG_FORMAT=json SEED_DATA=false cargo run -p graphql-server
//! ```
//!
//! Configuration: See `config.rs` for all environment variables.
//!

mod config;
mod schema;

use std::net::SocketAddr;
use std::sync::Arc;

use async_graphql::http::{parse_query_string, GraphiQLSource};
use async_graphql::parser::types::OperationType;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use domain::adapters::memory_repo::InMemoryStore;
use domain::service::LedgerService;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::schema::LedgerSchema;

#[derive(Clone)]
struct AppState {
    schema: LedgerSchema,
    graphiql_enabled: bool,
}

#[tokio::main]
async fn main() {
    // Load and validate config first (fail fast on misconfiguration)
    let cfg = match config::Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&cfg);
    cfg.log_summary();

    let state = build_state(&cfg);
    let app = with_layers(router(state), &cfg.cors_allow_origin);

    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(%addr, err = %e, "bind failed");
            std::process::exit(1);
        }
    };
    info!(%addr, "graphql-server listening");
    if let Err(e) = axum::serve(listener, app).await {
        error!(err = %e, "server error");
        std::process::exit(1);
    }
}

fn init_tracing(cfg: &config::Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match cfg.log_format {
        config::LogFormat::Json => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(fmt::time::SystemTime)
                        .with_writer(std::io::stdout),
                )
                .init();
        }
        config::LogFormat::Pretty => {
            registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_writer(std::io::stdout),
                )
                .init();
        }
    }
}

fn build_state(cfg: &config::Config) -> AppState {
    let store = if cfg.seed_data {
        InMemoryStore::seeded()
    } else {
        InMemoryStore::new()
    };
    let ledger = Arc::new(LedgerService::new(store));
    AppState {
        schema: schema::build_schema(ledger, cfg.max_query_depth),
        graphiql_enabled: cfg.graphiql_enabled,
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/graphql", get(graphql_get).post(graphql_handler))
        .route("/healthz", get(healthz))
        .fallback(not_found)
        .with_state(state)
}

/// Request id, tracing span and CORS around the routes.
///
/// `x-request-id` is generated (UUID v4) when the caller sends none and is
/// echoed on every response.
fn with_layers(app: Router, cors_origin: &HeaderValue) -> Router {
    let x_request_id = HeaderName::from_static("x-request-id");

    app.layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
        .layer(cors_layer(cors_origin))
}

// CORS - origin already validated in Config::from_env()
fn cors_layer(origin: &HeaderValue) -> CorsLayer {
    if origin.as_bytes() == b"*" {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list([origin.clone()]))
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    }
}

async fn graphql_handler(
    State(state): State<AppState>,
    Json(req): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    let resp = state.schema.execute(req).await;
    if resp.is_err() {
        info!(errors = resp.errors.len(), "graphql request finished with errors");
    }
    Json(resp)
}

/// GET /graphql: run `?query=` for API clients, show GraphiQL to browsers.
async fn graphql_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> Response {
    let request = match raw.as_deref().map(parse_query_string).transpose() {
        Ok(request) => request.filter(|r| !r.query.is_empty()),
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(http_common::json_error_with_message(
                    "bad_request",
                    &e.to_string(),
                )),
            )
                .into_response();
        }
    };

    match request {
        Some(request) if !(state.graphiql_enabled && accepts_html(&headers)) => {
            execute_get(&state, request).await
        }
        _ => graphiql(&state),
    }
}

async fn execute_get(state: &AppState, mut request: async_graphql::Request) -> Response {
    if selects_mutation(&mut request) {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "POST")],
            Json(http_common::json_error_with_message(
                "method_not_allowed",
                "Can only perform a mutation operation from a POST request",
            )),
        )
            .into_response();
    }
    let resp = state.schema.execute(request).await;
    if resp.is_err() {
        info!(errors = resp.errors.len(), "graphql request finished with errors");
    }
    Json(resp).into_response()
}

fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// True when the operation the request would run is a mutation.
///
/// Unparseable documents return false and are reported by the schema.
fn selects_mutation(request: &mut async_graphql::Request) -> bool {
    let wanted = request.operation_name.clone();
    let Ok(doc) = request.parsed_query() else {
        return false;
    };
    doc.operations.iter().any(|(name, op)| {
        op.node.ty == OperationType::Mutation
            && wanted
                .as_deref()
                .map_or(true, |w| name.is_some_and(|n| n.as_str() == w))
    })
}

fn graphiql(state: &AppState) -> Response {
    if !state.graphiql_enabled {
        return (
            StatusCode::NOT_FOUND,
            Json(http_common::json_error_with_message(
                "not_found",
                "GraphiQL is disabled",
            )),
        )
            .into_response();
    }
    Html(GraphiQLSource::build().endpoint("/graphql").finish()).into_response()
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(http_common::json_status_ok()))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(http_common::json_err("not_found")))
}
