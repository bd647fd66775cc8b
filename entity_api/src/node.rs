//! CRUD operations for the nodes table.

use super::error::Error;
use entity::nodes::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, QueryOrder, TryIntoModel,
};

/// Rejects API endpoints that are present but not an absolute http(s) URL.
fn validate_api_endpoint(api_endpoint: Option<&str>) -> Result<(), Error> {
    match api_endpoint {
        None => Ok(()),
        Some(endpoint) if endpoint.starts_with("http://") || endpoint.starts_with("https://") => {
            Ok(())
        }
        Some(endpoint) => {
            debug!("Rejecting node api_endpoint without http(s) scheme: {endpoint}");
            Err(Error::validation())
        }
    }
}

/// Creates a new node record
pub async fn create(db: &DatabaseConnection, node_model: Model) -> Result<Model, Error> {
    debug!("New Node Model to be inserted: {:?}", node_model);

    validate_api_endpoint(node_model.api_endpoint.as_deref())?;

    let now = chrono::Utc::now();

    let node_active_model = ActiveModel {
        name: Set(node_model.name),
        description: Set(node_model.description),
        api_endpoint: Set(node_model.api_endpoint),
        registered: Set(node_model.registered),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(node_active_model.save(db).await?.try_into_model()?)
}

/// Updates the descriptive fields and registration flag of an existing node
pub async fn update(db: &DatabaseConnection, id: Id, model: Model) -> Result<Model, Error> {
    validate_api_endpoint(model.api_endpoint.as_deref())?;

    let existing = find_by_id(db, id).await?;
    debug!("Existing Node model to be Updated: {:?}", existing);

    let active_model = ActiveModel {
        id: Unchanged(existing.id),
        name: Set(model.name),
        description: Set(model.description),
        api_endpoint: Set(model.api_endpoint),
        registered: Set(model.registered),
        created_at: Unchanged(existing.created_at),
        updated_at: Set(chrono::Utc::now().into()),
    };

    Ok(active_model.update(db).await?.try_into_model()?)
}

/// Sets only the registration flag of an existing node
pub async fn set_registered(
    db: &DatabaseConnection,
    id: Id,
    registered: bool,
) -> Result<Model, Error> {
    let existing = find_by_id(db, id).await?;
    debug!("Setting registered={registered} on Node {id}");

    let mut active_model: ActiveModel = existing.into();
    active_model.registered = Set(registered);
    active_model.updated_at = Set(chrono::Utc::now().into());

    Ok(active_model.update(db).await?.try_into_model()?)
}

/// Finds a node by ID
pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| {
        debug!("Node with id {id} not found");
        Error::not_found()
    })
}

/// Lists every node, ordered by name
pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, Error> {
    Ok(Entity::find().order_by_asc(Column::Name).all(db).await?)
}

/// Lists nodes by registration state, ordered by name
pub async fn find_by_registered(
    db: &DatabaseConnection,
    registered: bool,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Registered.eq(registered))
        .order_by_asc(Column::Name)
        .all(db)
        .await?)
}

/// Deletes a node by ID
pub async fn delete_by_id(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let model = find_by_id(db, id).await?;
    Entity::delete_by_id(model.id).exec(db).await?;
    Ok(())
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn node_model(registered: bool) -> Model {
        let now = chrono::Utc::now();

        Model {
            id: Id::new_v4(),
            name: Some("build-agent-01".to_owned()),
            description: Some("Primary build agent".to_owned()),
            api_endpoint: Some("https://agent-01.internal:8443".to_owned()),
            registered,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_a_new_node_model() -> Result<(), Error> {
        let node = node_model(false);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![node.clone()]])
            .into_connection();

        let created = create(&db, node.clone()).await?;

        assert_eq!(created.id, node.id);
        assert_eq!(created.api_endpoint, node.api_endpoint);

        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_api_endpoint_without_scheme() {
        let mut node = node_model(false);
        node.api_endpoint = Some("agent-01.internal:8443".to_owned());

        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = create(&db, node).await.unwrap_err();
        assert_eq!(err.error_kind, EntityApiErrorKind::ValidationError);
    }

    #[tokio::test]
    async fn update_returns_an_updated_node_model() -> Result<(), Error> {
        let existing = node_model(false);
        let mut changed = existing.clone();
        changed.description = Some("Retired build agent".to_owned());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![existing.clone()], vec![changed.clone()]])
            .into_connection();

        let updated = update(&db, existing.id, changed.clone()).await?;

        assert_eq!(updated.description, changed.description);

        Ok(())
    }

    #[tokio::test]
    async fn update_returns_not_found_for_unknown_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<Model, Vec<Model>, _>(vec![vec![]])
            .into_connection();

        let err = update(&db, Id::new_v4(), node_model(true)).await.unwrap_err();
        assert_eq!(err.error_kind, EntityApiErrorKind::RecordNotFound);
    }

    #[tokio::test]
    async fn set_registered_flips_the_flag() -> Result<(), Error> {
        let existing = node_model(false);
        let mut registered = existing.clone();
        registered.registered = true;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![existing.clone()], vec![registered]])
            .into_connection();

        let updated = set_registered(&db, existing.id, true).await?;

        assert!(updated.registered);

        Ok(())
    }

    #[tokio::test]
    async fn find_all_returns_every_node() -> Result<(), Error> {
        let nodes = vec![node_model(true), node_model(false)];

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![nodes.clone()])
            .into_connection();

        assert_eq!(find_all(&db).await?, nodes);

        Ok(())
    }

    #[tokio::test]
    async fn find_by_registered_returns_matching_nodes() -> Result<(), Error> {
        let nodes = vec![node_model(true)];

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![nodes.clone()])
            .into_connection();

        assert_eq!(find_by_registered(&db, true).await?, nodes);

        Ok(())
    }

    #[tokio::test]
    async fn delete_by_id_removes_existing_node() -> Result<(), Error> {
        let node = node_model(true);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![node.clone()]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        delete_by_id(&db, node.id).await?;

        Ok(())
    }
}
