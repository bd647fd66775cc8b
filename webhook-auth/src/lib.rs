//! # webhook-auth
//!
//! Authentication for inbound deployment webhooks:
//! - HMAC-SHA256 signature verification of the `X-Hub-Signature-256` header
//! - Lowercase hex encoding of digests
//! - The minimal identity attached to requests that pass verification
//!
//! ## Architecture
//!
//! This crate has no dependency on a web framework. It works on an `http::HeaderMap`
//! and the fully buffered request body, so `web` can run it from an axum middleware
//! while tests and tooling call it directly.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use webhook_auth::webhook::{ShaSignatureVerifier, WebhookValidator};
//!
//! let verifier = ShaSignatureVerifier::new(secret);
//! let verification = verifier.verify(&headers, body);
//! ```

pub mod error;
pub mod webhook;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
pub use webhook::{AuthenticatedIdentity, ShaSignatureVerifier, Verification, WebhookValidator};
