use crate::extractors::RejectionType;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use log::*;
use webhook_auth::AuthenticatedIdentity;

pub(crate) struct AuthenticatedCaller(pub AuthenticatedIdentity);

impl<S> FromRequestParts<S> for AuthenticatedCaller
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    // Reads the identity the signature middleware stored on the request. A route that
    // was mounted without that middleware has no identity and is rejected as Unauthorized.
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthenticatedIdentity>() {
            Some(identity) => Ok(AuthenticatedCaller(identity.clone())),
            None => {
                warn!("No authenticated identity on {} {}", parts.method, parts.uri);
                Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_extracts_identity_set_by_middleware() {
        let (mut parts, _) = Request::builder().uri("/nodes").body(()).unwrap().into_parts();
        parts
            .extensions
            .insert(AuthenticatedIdentity::new("ShaSignature"));

        let AuthenticatedCaller(identity) = AuthenticatedCaller::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(identity.scheme, "ShaSignature");
    }

    #[tokio::test]
    async fn test_rejects_request_without_identity() {
        let (mut parts, _) = Request::builder().uri("/nodes").body(()).unwrap().into_parts();

        let rejection = AuthenticatedCaller::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();

        assert_eq!(rejection.0, StatusCode::UNAUTHORIZED);
    }
}
