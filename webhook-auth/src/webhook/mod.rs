//! Webhook signature validation.

mod encoding;
mod signature;

pub use encoding::to_hex_string;
pub use signature::{ShaSignatureVerifier, SCHEME_NAME, SIGNATURE_PREFIX};

use bytes::Bytes;
use http::{HeaderMap, HeaderName};

use crate::error::Error;

/// Header carrying the claimed signature, as displayed in failure reasons.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

/// Lookup key for [`SIGNATURE_HEADER`]. Header names are case-insensitive.
pub const SIGNATURE_HEADER_NAME: HeaderName = HeaderName::from_static("x-hub-signature-256");

/// Identity attached to a request that passed signature verification.
///
/// Carries no claims beyond the name of the scheme that verified it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub scheme: String,
}

impl AuthenticatedIdentity {
    pub fn new(scheme: &str) -> Self {
        Self {
            scheme: scheme.to_string(),
        }
    }
}

/// Result of verifying a buffered request.
///
/// `body` holds exactly the bytes the signature was computed over, for
/// re-exposure to downstream readers whatever the outcome.
#[derive(Debug)]
pub struct Verification {
    pub outcome: Result<AuthenticatedIdentity, Error>,
    pub body: Bytes,
}

impl Verification {
    pub fn is_authenticated(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn into_parts(self) -> (Result<AuthenticatedIdentity, Error>, Bytes) {
        (self.outcome, self.body)
    }
}

/// Trait for validating webhook signatures.
pub trait WebhookValidator: Send + Sync {
    /// Validate a webhook request.
    ///
    /// # Arguments
    ///
    /// * `headers` - HTTP headers from the webhook request
    /// * `body` - Raw request body bytes
    ///
    /// # Returns
    ///
    /// The authenticated identity if the signature is valid, otherwise an error
    /// classifying why the request was rejected.
    fn validate(&self, headers: &HeaderMap, body: &[u8]) -> Result<AuthenticatedIdentity, Error>;

    /// Get the authentication scheme name reported by this validator.
    fn scheme_name(&self) -> &str;

    /// Validate an already captured body and hand the same bytes back.
    fn verify(&self, headers: &HeaderMap, body: Bytes) -> Verification {
        let outcome = self.validate(headers, &body);
        Verification { outcome, body }
    }
}
