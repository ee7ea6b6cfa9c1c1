use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_job::create_job;
use super::handlers::delete_job::delete_job;
use super::handlers::get_job::get_job;
use super::handlers::list_jobs::list_jobs;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::register::register;
use super::handlers::update_job::update_job;
use super::middleware::identify;
use crate::config::RoleSource;
use crate::domain::job::ports::JobServicePort;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub job_service: Arc<dyn JobServicePort>,
    pub authenticator: Arc<Authenticator>,
    pub role_source: RoleSource,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    job_service: Arc<dyn JobServicePort>,
    authenticator: Arc<Authenticator>,
    role_source: RoleSource,
) -> Router {
    let state = AppState {
        user_service,
        job_service,
        authenticator,
        role_source,
    };

    let public_routes = Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/jobs", get(list_jobs))
        .route("/api/v1/jobs/:job_id", get(get_job));

    let protected_routes = Router::new()
        .route("/api/v1/jobs", post(create_job))
        .route("/api/v1/jobs/:job_id", put(update_job))
        .route("/api/v1/jobs/:job_id", delete(delete_job))
        .route_layer(middleware::from_fn_with_state(state.clone(), identify));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
