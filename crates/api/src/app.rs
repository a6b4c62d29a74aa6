//! Application state and router assembly.

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_auth, require_organizer,
    security_headers_middleware, trace_id,
};
use crate::routes;
use crate::services::{AuthService, LiveUpdateHub};
use domain::services::RegistrationNotifier;
use persistence::repositories::{EventRepository, RegistrationRepository, UserRepository};
use shared::jwt::JwtConfig;

/// Shared application state passed to handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub auth: AuthService,
    pub users: UserRepository,
    pub events: EventRepository,
    pub registrations: RegistrationRepository,
    pub live: Arc<LiveUpdateHub>,
    pub notifier: Arc<dyn RegistrationNotifier>,
}

/// Builds the application router with all routes and middleware.
pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    let jwt = Arc::new(
        JwtConfig::with_leeway(
            &config.jwt.private_key,
            &config.jwt.public_key,
            config.jwt.access_token_expiry_secs,
            config.jwt.refresh_token_expiry_secs,
            config.jwt.leeway_secs,
        )
        .context("Failed to build JWT configuration")?,
    );

    let live = LiveUpdateHub::new(pool.clone());
    let notifier: Arc<dyn RegistrationNotifier> = live.clone();

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        jwt: jwt.clone(),
        auth: AuthService::new(pool.clone(), jwt),
        users: UserRepository::new(pool.clone()),
        events: EventRepository::new(pool.clone()),
        registrations: RegistrationRepository::new(pool),
        live,
        notifier,
    };

    // Public routes: no authentication required.
    let public_routes = Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route("/api/health/live", get(routes::health::live))
        .route("/api/health/ready", get(routes::health::ready))
        .route("/metrics", get(metrics_handler))
        .route("/ws", get(routes::live::ws_handler))
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/refresh", post(routes::auth::refresh))
        .route("/api/events", get(routes::events::list_events))
        .route("/api/events/:id", get(routes::events::get_event));

    // Authenticated routes: any valid account.
    let authenticated_routes = Router::new()
        .route("/api/auth/me", get(routes::auth::me))
        .route(
            "/api/registrations/:event_id",
            post(routes::registrations::register).delete(routes::registrations::cancel),
        )
        .route(
            "/api/registrations/my-registrations",
            get(routes::registrations::my_registrations),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    // Organizer routes: valid account with the organizer role.
    // Layers run outermost-last-added, so authentication runs before the
    // role check.
    let organizer_routes = Router::new()
        .route("/api/events", post(routes::events::create_event))
        .route(
            "/api/events/:id",
            put(routes::events::update_event).delete(routes::events::delete_event),
        )
        .route(
            "/api/events/organizer/my-events",
            get(routes::events::my_events),
        )
        .route(
            "/api/registrations/event/:event_id",
            get(routes::registrations::event_registrations),
        )
        .route_layer(axum_middleware::from_fn(require_organizer))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let cors = build_cors_layer(&state.config.security.cors_origins)?;
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    let app = Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .merge(organizer_routes)
        .layer(axum_middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(axum_middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state);

    Ok(app)
}

/// Builds the CORS layer from configured origins. An empty list allows any
/// origin, for local development.
fn build_cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.is_empty() {
        return Ok(layer.allow_origin(tower_http::cors::Any));
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<anyhow::Result<_>>()?;

    Ok(layer.allow_origin(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_accepts_valid_origins() {
        let origins = vec!["https://example.com".to_string()];
        assert!(build_cors_layer(&origins).is_ok());
    }

    #[test]
    fn test_cors_layer_rejects_invalid_origin() {
        let origins = vec!["not a header value\n".to_string()];
        assert!(build_cors_layer(&origins).is_err());
    }

    #[test]
    fn test_cors_layer_allows_empty_origins() {
        assert!(build_cors_layer(&[]).is_ok());
    }
}
