use crate::error::Error;
use crate::nodes::Model;
pub use entity_api::node::{create, delete_by_id, find_by_id, set_registered, update};
use log::*;
use sea_orm::DatabaseConnection;

/// Lists nodes, optionally narrowed to those with the given registration state.
pub async fn find_by(
    db: &DatabaseConnection,
    registered: Option<bool>,
) -> Result<Vec<Model>, Error> {
    let nodes = match registered {
        Some(registered) => entity_api::node::find_by_registered(db, registered).await?,
        None => entity_api::node::find_all(db).await?,
    };

    debug!("Found {} nodes (registered filter: {registered:?})", nodes.len());

    Ok(nodes)
}
