//! This module holds typed parameters for various endpoint inputs.
//!
//! Each parameter type is a struct deserialized straight from the query string or
//! JSON body, so malformed input is rejected by the extractor before any
//! application logic runs.

pub(crate) mod node;
