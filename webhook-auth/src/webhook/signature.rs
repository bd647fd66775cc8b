//! HMAC-SHA256 webhook signature validation for the `X-Hub-Signature-256` header.

use hmac::{Hmac, Mac};
use http::HeaderMap;
use log::*;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use super::{
    to_hex_string, AuthenticatedIdentity, WebhookValidator, SIGNATURE_HEADER,
    SIGNATURE_HEADER_NAME,
};
use crate::error::{webhook_error, Error, WebhookErrorKind};

type HmacSha256 = Hmac<Sha256>;

/// Prefix every signature header value must start with (compared case-insensitively).
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Scheme name carried by identities this verifier produces.
pub const SCHEME_NAME: &str = "ShaSignature";

/// HMAC-SHA256 webhook verifier.
///
/// Built once at startup from the shared secret and shared read-only between
/// requests. An empty secret never authenticates anything.
#[derive(Debug)]
pub struct ShaSignatureVerifier {
    secret: SecretString,
}

impl ShaSignatureVerifier {
    /// Create a new verifier.
    ///
    /// # Arguments
    ///
    /// * `secret` - Webhook signing secret shared with the sender
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Produce the header value a sender holding the same secret would send for `body`.
    pub fn sign(&self, body: &[u8]) -> String {
        let mut mac = self.keyed_mac();
        mac.update(body);

        format!(
            "{SIGNATURE_PREFIX}{}",
            to_hex_string(&mac.finalize().into_bytes())
        )
    }

    fn has_secret(&self) -> bool {
        !self.secret.expose_secret().is_empty()
    }

    fn keyed_mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC can accept keys of any length")
    }

    fn invalid_header_value() -> Error {
        webhook_error(
            WebhookErrorKind::InvalidSignature,
            &format!("Invalid {SIGNATURE_HEADER} header value."),
        )
    }
}

/// Returns the claimed digest with the prefix removed, or `None` if the prefix is absent.
fn strip_signature_prefix(value: &str) -> Option<&str> {
    let prefix = value.get(..SIGNATURE_PREFIX.len())?;
    if prefix.eq_ignore_ascii_case(SIGNATURE_PREFIX) {
        value.get(SIGNATURE_PREFIX.len()..)
    } else {
        None
    }
}

impl WebhookValidator for ShaSignatureVerifier {
    fn validate(&self, headers: &HeaderMap, body: &[u8]) -> Result<AuthenticatedIdentity, Error> {
        let header_value = headers
            .get(SIGNATURE_HEADER_NAME)
            .filter(|value| !value.as_bytes().iter().all(u8::is_ascii_whitespace))
            .ok_or_else(|| {
                webhook_error(
                    WebhookErrorKind::MissingSignature,
                    &format!("{SIGNATURE_HEADER} header not present or empty."),
                )
            })?;

        let malformed = || {
            webhook_error(
                WebhookErrorKind::MalformedSignature,
                &format!("Invalid {SIGNATURE_HEADER} header value."),
            )
        };

        let signature = header_value.to_str().map_err(|_| malformed())?;
        let claimed_hex = strip_signature_prefix(signature).ok_or_else(malformed)?;

        // Decoding accepts either hex case; the comparison runs on raw digest bytes.
        let claimed_digest = hex::decode(claimed_hex).map_err(|_| Self::invalid_header_value())?;

        if !self.has_secret() {
            debug!("Webhook secret is empty, rejecting signature");
            return Err(Self::invalid_header_value());
        }

        let mut mac = self.keyed_mac();
        mac.update(body);

        // Constant-time comparison, including the length check.
        mac.verify_slice(&claimed_digest)
            .map_err(|_| Self::invalid_header_value())?;

        debug!("{SIGNATURE_HEADER} verified over {} body bytes", body.len());

        Ok(AuthenticatedIdentity::new(SCHEME_NAME))
    }

    fn scheme_name(&self) -> &str {
        SCHEME_NAME
    }
}
