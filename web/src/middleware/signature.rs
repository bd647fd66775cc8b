use crate::{AppState, Error};
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use log::*;
use std::error::Error as StdError;
use webhook_auth::WebhookValidator;

/// Signature middleware that returns 401 Unauthorized for requests whose
/// `X-Hub-Signature-256` header does not match the body.
///
/// The body is buffered in full before anything else happens and the same bytes
/// are put back on the request, so handlers downstream read exactly what was signed.
pub async fn require_signature(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let bytes = match to_bytes(body, app_state.config.webhook_max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(err) if exceeds_length_limit(&err) => {
            warn!(
                "Rejecting {} {}: body exceeds {} bytes",
                parts.method, parts.uri, app_state.config.webhook_max_body_bytes
            );
            return (StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large").into_response();
        }
        Err(err) => {
            warn!("Failed to read body of {} {}: {err}", parts.method, parts.uri);
            return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
        }
    };

    let (outcome, body) = app_state
        .signature_verifier()
        .verify(&parts.headers, bytes)
        .into_parts();

    match outcome {
        Ok(identity) => {
            trace!("{} {} authenticated by {}", parts.method, parts.uri, identity.scheme);
            parts.extensions.insert(identity);
            next.run(Request::from_parts(parts, Body::from(body))).await
        }
        Err(err) => {
            warn!(
                "Rejecting {} {} ({:?}): {}",
                parts.method,
                parts.uri,
                err.webhook_kind(),
                err.reason()
            );
            Error::from(err).into_response()
        }
    }
}

fn exceeds_length_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(current) = source {
        if current.is::<LengthLimitError>() {
            return true;
        }
        source = current.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Bytes, extract::Extension, http::Request, middleware::from_fn_with_state,
        routing::post, Router,
    };
    use clap::Parser;
    use http_body_util::BodyExt;
    use sea_orm::DatabaseConnection;
    use secrecy::SecretString;
    use service::config::Config;
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };
    use tower::ServiceExt;
    use webhook_auth::{AuthenticatedIdentity, ShaSignatureVerifier};

    const SECRET: &str = "s3cr3t";
    const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

    fn app_state(max_body_bytes: usize) -> AppState {
        let max_body_bytes = max_body_bytes.to_string();
        let config = Config::try_parse_from([
            "deployer",
            "--webhook-max-body-bytes",
            max_body_bytes.as_str(),
        ])
        .unwrap()
        .set_webhook_secret(SecretString::new(SECRET.to_string()));

        AppState::new(config, &Arc::new(DatabaseConnection::Disconnected))
    }

    async fn echo(Extension(identity): Extension<AuthenticatedIdentity>, body: Bytes) -> Response {
        ([("x-authenticated-by", identity.scheme)], body).into_response()
    }

    fn app(max_body_bytes: usize) -> Router {
        let app_state = app_state(max_body_bytes);
        Router::new()
            .route("/echo", post(echo))
            .route_layer(from_fn_with_state(app_state.clone(), require_signature))
            .with_state(app_state)
    }

    fn sign(body: &[u8]) -> String {
        ShaSignatureVerifier::new(SecretString::new(SECRET.to_string())).sign(body)
    }

    fn request(signature: Option<&str>, body: &'static [u8]) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/echo");
        if let Some(signature) = signature {
            builder = builder.header(SIGNATURE_HEADER, signature);
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn body_bytes(response: Response) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_signed_request_reaches_handler_with_identical_body() {
        let body: &'static [u8] = br#"{"ref":"refs/heads/main","after":"9f2c"}"#;
        let signature = sign(body);

        let response = app(1024)
            .oneshot(request(Some(&signature), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["x-authenticated-by"],
            webhook_auth::webhook::SCHEME_NAME
        );
        assert_eq!(body_bytes(response).await, Bytes::from_static(body));
    }

    #[tokio::test]
    async fn test_signed_empty_body_is_accepted() {
        let signature = sign(b"");

        let response = app(1024)
            .oneshot(request(Some(&signature), b""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_signature_returns_401() {
        let response = app(1024).oneshot(request(None, b"{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_bytes(response).await, "Unauthorized");
    }

    #[tokio::test]
    async fn test_malformed_signature_returns_401() {
        let response = app(1024)
            .oneshot(request(Some("md5=abcdef"), b"{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_bytes(response).await, "Unauthorized");
    }

    #[tokio::test]
    async fn test_signature_over_different_body_returns_401() {
        let signature = sign(br#"{"a":1}"#);

        let response = app(1024)
            .oneshot(request(Some(&signature), br#"{"a":2}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_bytes(response).await, "Unauthorized");
    }

    #[tokio::test]
    async fn test_oversized_body_returns_413() {
        let body: &'static [u8] = b"0123456789abcdef";
        let signature = sign(body);

        let response = app(8)
            .oneshot(request(Some(&signature), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_body_read_failure_returns_400_without_running_handler() {
        static HANDLER_RAN: AtomicBool = AtomicBool::new(false);

        async fn record(body: Bytes) -> Bytes {
            HANDLER_RAN.store(true, Ordering::SeqCst);
            body
        }

        let app_state = app_state(1024);
        let app = Router::new()
            .route("/record", post(record))
            .route_layer(from_fn_with_state(app_state.clone(), require_signature))
            .with_state(app_state);

        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(br#"{"ref":"#)),
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )),
        ];
        let request = Request::builder()
            .method("POST")
            .uri("/record")
            .header(SIGNATURE_HEADER, sign(br#"{"ref":"refs/heads/main"}"#))
            .body(Body::from_stream(futures_util::stream::iter(chunks)))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_bytes(response).await, "Bad Request");
        assert!(!HANDLER_RAN.load(Ordering::SeqCst));
    }
}
