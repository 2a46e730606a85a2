use std::net::IpAddr;

use axum::http::HeaderMap;
use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::mail::templates;
use crate::state::SharedState;

use super::fields;
use super::honeypot;
use super::metadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Honeypot tripped; nothing was sent.
    Spam,
    Delivered,
    /// Token or send step failed. Logged, but not surfaced to the client.
    DeliveryFailed,
}

pub async fn run(
    state: &SharedState,
    headers: &HeaderMap,
    peer_addr: IpAddr,
    raw_data: serde_json::Value,
) -> Result<Outcome, AppError> {
    let meta = metadata::extract(headers, peer_addr, &state.config.trusted_proxies);

    if honeypot::is_spam(&raw_data, &state.config.honeypot_field) {
        tracing::info!(ip = %meta.ip, user_agent = %meta.user_agent, "Honeypot triggered, dropping submission");
        return Ok(Outcome::Spam);
    }

    let submission = fields::validate(&raw_data).map_err(|e| {
        tracing::debug!(ip = %meta.ip, "Rejected submission: {e}");
        AppError::BadRequest(e)
    })?;

    if let Err(retry_after) = state.submission_limiter.check(
        meta.ip,
        state.config.rate_limit,
        state.config.rate_limit_window_secs,
    ) {
        tracing::warn!(ip = %meta.ip, "Submission rate limited");
        return Err(AppError::RateLimited(retry_after));
    }

    let reference = Uuid::now_v7();
    let email = templates::render_contact(&submission, &meta, reference, Utc::now())
        .map_err(|e| AppError::Internal(format!("Failed to render contact email: {e}")))?;

    match state.mailer.send(&email).await {
        Ok(()) => {
            tracing::info!(%reference, ip = %meta.ip, "Contact message relayed");
            Ok(Outcome::Delivered)
        }
        Err(e) => {
            tracing::error!(%reference, ip = %meta.ip, "Failed to relay contact message: {e}");
            Ok(Outcome::DeliveryFailed)
        }
    }
}
