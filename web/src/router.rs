use crate::{
    controller::{health_check_controller, node_controller, webhook_controller},
    middleware::signature::require_signature,
    params, AppState,
};
use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use webhook_auth::webhook::SIGNATURE_HEADER;

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI document. To be a part
// of the rendered document, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Deployer API"
        ),
        paths(
            health_check_controller::health_check,
            node_controller::create,
            node_controller::update,
            node_controller::update_registration,
            node_controller::index,
            node_controller::read,
            node_controller::delete,
            webhook_controller::deploy,
        ),
        components(
            schemas(
                domain::nodes::Model,
                params::node::RegistrationParams,
                webhook_controller::WebhookResponse,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "deployer", description = "Signed deployment webhooks and node registry API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Every route other than /health requires an HMAC-SHA256 signature of the raw
// request body in the X-Hub-Signature-256 header.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "signature",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    SIGNATURE_HEADER,
                    "sha256=<hex HMAC-SHA256 of the raw request body keyed with the shared webhook secret>",
                ))),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(node_routes(app_state.clone()))
        .merge(webhook_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn node_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/nodes", post(node_controller::create))
        .route("/nodes", get(node_controller::index))
        .route("/nodes/{id}", get(node_controller::read))
        .route("/nodes/{id}", put(node_controller::update))
        .route(
            "/nodes/{id}/registration",
            put(node_controller::update_registration),
        )
        .route("/nodes/{id}", delete(node_controller::delete))
        .route_layer(from_fn_with_state(app_state.clone(), require_signature))
        .with_state(app_state)
}

fn webhook_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/webhooks/deploy", post(webhook_controller::deploy))
        .route_layer(from_fn_with_state(app_state.clone(), require_signature))
        .with_state(app_state)
}
