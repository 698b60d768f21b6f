//! # Agenda API
//!
//! HTTP admin API for a multi-tenant booking service: each authenticated
//! owner manages their business profile, the services they offer and their
//! weekly availability.
//!
//! ## Architecture
//!
//! - **Routes**: endpoint paths, grouped per resource
//! - **Handlers**: authenticate, validate, call the store, wrap the result
//! - **Middleware**: bearer-token identity and error-to-response mapping
//! - **Config**: environment-driven settings
//!
//! Handlers reach persistence only through [`AgendaStore`], always passing
//! the authenticated owner, so one tenant can never address another's rows.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use agenda_db::AgendaStore;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::middleware::auth::JwtVerifier;

/// Shared application state, read-only once the server is running
pub struct ApiState {
    /// Persistence backend
    pub store: Arc<dyn AgendaStore>,
    /// Bearer token verifier
    pub auth: JwtVerifier,
}

impl ApiState {
    pub fn new(store: Arc<dyn AgendaStore>, auth: JwtVerifier) -> Self {
        Self { store, auth }
    }
}

/// Builds the application router with every route and request tracing
///
/// CORS and the request timeout are added by [`start_server`], so tests can
/// drive this router directly.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Business profile
        .merge(routes::profile::routes())
        // Service management endpoints
        .merge(routes::services::routes())
        // Weekly availability
        .merge(routes::availability::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builds the CORS layer for the configured origins
///
/// # Errors
///
/// Returns an error naming the first origin that is not a valid header value.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin: {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true))
}

/// Starts the API server
///
/// Logging must already be initialised by the caller.
///
/// # Example
///
/// ```no_run
/// # use std::sync::Arc;
/// # use agenda_api::{ApiState, config::ApiConfig, middleware::auth::JwtVerifier, start_server};
/// # use agenda_db::{PgStore, create_pool};
/// # async fn run() -> eyre::Result<()> {
/// let config = ApiConfig::from_env()?;
/// let pool = create_pool(&config.database_url, config.database_max_connections).await?;
/// let auth = JwtVerifier::new(&config.jwt_secret, config.jwt_audience.as_deref());
/// let state = Arc::new(ApiState::new(Arc::new(PgStore::new(pool)), auth));
/// start_server(config, state).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, state: Arc<ApiState>) -> Result<()> {
    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    // Add request timeout middleware
    let app = app.layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)));

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
