//! Controller for signed deployment webhooks.
//!
//! Notifications are acknowledged and logged; acting on them happens elsewhere.

use crate::extractors::authenticated_caller::AuthenticatedCaller;

use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use log::*;
use serde::Serialize;
use utoipa::ToSchema;

/// Header some senders use to name the event type.
const EVENT_HEADER: &str = "x-github-event";

/// Response for webhook acknowledgment
#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookResponse {
    pub status: String,
}

impl WebhookResponse {
    fn accepted() -> Self {
        Self {
            status: "accepted".to_string(),
        }
    }
}

/// POST a signed deployment notification
#[utoipa::path(
    post,
    path = "/webhooks/deploy",
    request_body = serde_json::Value,
    responses(
        (status = 202, description = "Deployment notification accepted", body = WebhookResponse),
        (status = 400, description = "Body is not valid JSON"),
        (status = 401, description = "Unauthorized"),
        (status = 413, description = "Payload too large"),
        (status = 415, description = "Missing JSON content type")
    ),
    security(
        ("signature" = [])
    )
)]
pub async fn deploy(
    AuthenticatedCaller(caller): AuthenticatedCaller,
    headers: HeaderMap,
    Json(payload): Json<serde_json::Value>,
) -> impl IntoResponse {
    let event = headers
        .get(EVENT_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unspecified");

    info!(
        "Accepted deployment webhook (event: {event}, verified by {})",
        caller.scheme
    );
    debug!("Deployment webhook payload: {payload}");

    (StatusCode::ACCEPTED, Json(WebhookResponse::accepted()))
}
