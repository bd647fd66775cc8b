use axum::http::{
    header::{CONTENT_TYPE, HeaderName},
    HeaderValue, Method,
};
use log::*;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use webhook_auth::webhook::SIGNATURE_HEADER_NAME;

pub use self::error::{Error, Result};
pub use service::AppState;

mod controller;
mod error;
mod extractors;
mod middleware;
mod params;
mod router;

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state
        .config
        .interface
        .as_deref()
        .unwrap_or("127.0.0.1")
        .to_string();
    let listen_addr = format!("{interface}:{}", app_state.config.port);

    let cors_layer = cors_layer(&app_state.config.allowed_origins);

    let listener = TcpListener::bind(&listen_addr).await?;

    info!("Server starting... listening for connections on http://{listen_addr}");

    axum::serve(listener, router::define_routes(app_state).layer(cors_layer)).await
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();

    let allowed_headers: [HeaderName; 2] = [CONTENT_TYPE, SIGNATURE_HEADER_NAME];

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(allowed_headers)
        .allow_origin(origins)
}
