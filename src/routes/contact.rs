use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::{parser, pipeline};

pub const SUCCESS_MESSAGE: &str = "Thank you! Your message has been sent.";

pub async fn submit(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let origin = state.config.allowed_origin.clone();

    let result = handle(&state, addr, &headers, &body).await;

    let mut response = match result {
        Ok(outcome) => {
            tracing::debug!(?outcome, "Contact submission handled");
            (
                StatusCode::OK,
                Json(json!({ "success": true, "message": SUCCESS_MESSAGE })),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    };

    if let Ok(value) = origin.parse::<HeaderValue>() {
        response
            .headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    response
}

async fn handle(
    state: &SharedState,
    addr: SocketAddr,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<pipeline::Outcome, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let raw_data = parser::parse_body(content_type, body).map_err(AppError::BadRequest)?;

    pipeline::run(state, headers, addr.ip(), raw_data).await
}

pub async fn preflight(State(state): State<SharedState>) -> Response {
    (
        [
            (
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                state.config.allowed_origin.clone(),
            ),
            (
                header::ACCESS_CONTROL_ALLOW_METHODS,
                "POST, OPTIONS".to_string(),
            ),
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                "Content-Type".to_string(),
            ),
            (header::ACCESS_CONTROL_MAX_AGE, "86400".to_string()),
        ],
        StatusCode::NO_CONTENT,
    )
        .into_response()
}
