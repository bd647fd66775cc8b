//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use std::error::Error as StdError;
use std::fmt;
use webhook_auth::error::Error as WebhookAuthError;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums. The `source` field holds the original error from the lower layer.
/// `web` depends on `domain`, which depends on `entity_api` and `webhook-auth`;
/// `web` only ever sees the kinds defined here and maps them to HTTP status codes.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    /// The request could not be authenticated. Never carries detail to callers.
    Unauthenticated,
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
}

/// Entity errors bubbled up from `entity_api`, reduced to what `domain` consumers need.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    NotFound,
    Invalid,
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api` layer to the `domain` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let entity_error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound => EntityErrorKind::NotFound,
            EntityApiErrorKind::InvalidQueryTerm | EntityApiErrorKind::ValidationError => {
                EntityErrorKind::Invalid
            }
            _ => EntityErrorKind::Other("EntityErrorKind".to_string()),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)),
        }
    }
}

// Every signature failure collapses to the same kind; the source keeps the detail for logs.
impl From<WebhookAuthError> for Error {
    fn from(err: WebhookAuthError) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Unauthenticated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webhook_auth::error::{webhook_error, WebhookErrorKind};

    #[test]
    fn entity_not_found_translates_to_not_found() {
        let err: Error = EntityApiError {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        }
        .into();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );
    }

    #[test]
    fn entity_validation_translates_to_invalid() {
        let err: Error = EntityApiError {
            source: None,
            error_kind: EntityApiErrorKind::ValidationError,
        }
        .into();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Invalid))
        );
    }

    #[test]
    fn every_signature_failure_translates_to_unauthenticated() {
        for kind in [
            WebhookErrorKind::MissingSignature,
            WebhookErrorKind::MalformedSignature,
            WebhookErrorKind::InvalidSignature,
        ] {
            let err: Error = webhook_error(kind, "rejected").into();
            assert_eq!(err.error_kind, DomainErrorKind::Unauthenticated);
            assert!(StdError::source(&err).is_some());
        }
    }
}
