use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::controller::ApiResponse;
use crate::extractors::authenticated_caller::AuthenticatedCaller;
use crate::params::node::{IndexParams, RegistrationParams};
use crate::{AppState, Error};
use domain::{node as NodeApi, nodes::Model, Id};
use log::*;

/// POST create a new Node
#[utoipa::path(
    post,
    path = "/nodes",
    request_body = domain::nodes::Model,
    responses(
        (status = 201, description = "Successfully Created a New Node", body = [domain::nodes::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("signature" = [])
    )
)]
pub async fn create(
    AuthenticatedCaller(caller): AuthenticatedCaller,
    State(app_state): State<AppState>,
    Json(node_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Node ({}): {:?}", caller.scheme, node_model);

    let node = NodeApi::create(app_state.db_conn_ref(), node_model).await?;

    debug!("New Node: {node:?}");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), node)),
    ))
}

/// GET a particular Node specified by its id.
#[utoipa::path(
    get,
    path = "/nodes/{id}",
    params(
        ("id" = Uuid, Path, description = "Node id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a specific Node by its id", body = [domain::nodes::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Node not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("signature" = [])
    )
)]
pub async fn read(
    AuthenticatedCaller(_caller): AuthenticatedCaller,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Node by id: {id}");

    let node = NodeApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), node)))
}

/// GET all Nodes, optionally filtered by registration state.
#[utoipa::path(
    get,
    path = "/nodes",
    params(IndexParams),
    responses(
        (status = 200, description = "Successfully retrieved all Nodes", body = [domain::nodes::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed"),
        (status = 503, description = "Service temporarily unavailable")
    ),
    security(
        ("signature" = [])
    )
)]
pub async fn index(
    AuthenticatedCaller(_caller): AuthenticatedCaller,
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Nodes");
    debug!("Filter Params: {params:?}");

    let nodes = NodeApi::find_by(app_state.db_conn_ref(), params.registered).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), nodes)))
}

#[utoipa::path(
    put,
    path = "/nodes/{id}",
    params(
        ("id" = Uuid, Path, description = "Id of node to update"),
    ),
    request_body = domain::nodes::Model,
    responses(
        (status = 200, description = "Successfully Updated Node", body = [domain::nodes::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Node not found"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("signature" = [])
    )
)]
pub async fn update(
    AuthenticatedCaller(_caller): AuthenticatedCaller,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(node_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Node with id: {id}");

    let node = NodeApi::update(app_state.db_conn_ref(), id, node_model).await?;

    debug!("Updated Node: {node:?}");

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), node)))
}

#[utoipa::path(
    put,
    path = "/nodes/{id}/registration",
    params(
        ("id" = Uuid, Path, description = "Id of node to (de)register"),
    ),
    request_body = RegistrationParams,
    responses(
        (status = 200, description = "Successfully Updated Node registration", body = [domain::nodes::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Node not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("signature" = [])
    )
)]
pub async fn update_registration(
    AuthenticatedCaller(_caller): AuthenticatedCaller,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<RegistrationParams>,
) -> Result<impl IntoResponse, Error> {
    debug!(
        "PUT Update Node registration with id: {id} to {}",
        params.registered
    );

    let node = NodeApi::set_registered(app_state.db_conn_ref(), id, params.registered).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), node)))
}

/// DELETE a Node specified by its primary key.
#[utoipa::path(
    delete,
    path = "/nodes/{id}",
    params(
        ("id" = Uuid, Path, description = "Node id to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted a certain Node by its id", body = [Uuid]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Node not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("signature" = [])
    )
)]
pub async fn delete(
    AuthenticatedCaller(_caller): AuthenticatedCaller,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Node by id: {id}");

    NodeApi::delete_by_id(app_state.db_conn_ref(), id).await?;
    Ok(Json(json!({"id": id})))
}
