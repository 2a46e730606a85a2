pub mod config;
pub mod error;
pub mod mail;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod submission;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::mail::graph::GraphMailer;
use crate::mail::MailRelay;
use crate::rate_limit::SubmissionRateLimiter;
use crate::state::{AppState, SharedState};

/// Build the application state with the Graph mail relay from `config.mail`.
pub fn build_state(config: Config) -> Result<SharedState, String> {
    let mailer = GraphMailer::new(
        config.mail.clone(),
        Duration::from_secs(config.http_timeout_secs),
    )?;
    Ok(state_with_mailer(config, Arc::new(mailer)))
}

pub fn state_with_mailer(config: Config, mailer: Arc<dyn MailRelay>) -> SharedState {
    Arc::new(AppState {
        config,
        mailer,
        submission_limiter: SubmissionRateLimiter::new(),
    })
}

pub fn build_app(state: SharedState) -> Router {
    let max_body_size = state.config.max_body_size;

    Router::new()
        .merge(routes::contact_routes())
        .route("/health", axum::routing::get(health))
        .layer(DefaultBodyLimit::disable())
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(error::panic_response))
                .layer(RequestBodyLimitLayer::new(max_body_size)),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
