use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    /// Only return nodes with this registration state
    pub(crate) registered: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = params::node::RegistrationParams)]
pub(crate) struct RegistrationParams {
    pub(crate) registered: bool,
}
