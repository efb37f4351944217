use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::SessionUser;
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::envelope::{Envelope, Status};
use crate::gateway::DocumentGateway;
use crate::models::{FieldBag, ProductStatus, Session};
use crate::service::ProductService;

/// Wire shape of every response: `{status, error, data?}`
#[derive(Serialize, ToSchema)]
pub struct EnvelopeBody {
    /// Mirrors the HTTP status code
    #[schema(example = 200)]
    pub status: u16,
    pub error: Option<String>,
    /// Record id on create, a record on get, a list of records on list;
    /// absent on update and delete
    #[schema(value_type = Object)]
    pub data: Option<serde_json::Value>,
}

/// OpenAPI documentation for one product type's endpoints
///
/// Field names depend on the product type: `feedName`/`kilogram`/`sack` for
/// feeds, `vaccineName`/`milliliter`/`bottle` for vaccines.
#[derive(OpenApi)]
#[openapi(
    paths(create_product, list_products, get_product, update_product, delete_product),
    components(schemas(EnvelopeBody, ProductStatus))
)]
pub struct ApiDoc;

/// Router for one product type; the service's schema decides which
pub fn router<G: DocumentGateway + 'static>(service: ProductService<G>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

fn session_of(user: Option<SessionUser>) -> Session {
    user.map(|user| Session::for_user(user.user_id))
        .unwrap_or_default()
}

/// A body that isn't a JSON object gets the same envelope as any other bad input
fn body_rejected(rejection: JsonRejection) -> Response {
    tracing::debug!(error = %rejection, "Rejected request body");
    Envelope::<()>::failure(Status::BadRequest, "Invalid request body").into_response()
}

/// Create a record owned by the caller
#[utoipa::path(
    post,
    path = "",
    request_body(content = Object, description = "All six product fields"),
    responses(
        (status = 200, description = "Record created, `data` is its id", body = EnvelopeBody),
        (status = 400, description = "Missing or invalid field", body = EnvelopeBody),
        (status = 401, description = "No session", body = EnvelopeBody),
        (status = 500, description = "Store failure", body = EnvelopeBody)
    )
)]
async fn create_product<G: DocumentGateway>(
    State(service): State<Arc<ProductService<G>>>,
    user: Option<SessionUser>,
    body: Result<Json<FieldBag>, JsonRejection>,
) -> Response {
    let Json(fields) = match body {
        Ok(body) => body,
        Err(rejection) => return body_rejected(rejection),
    };
    service
        .create(&session_of(user), &fields)
        .await
        .into_response()
}

/// List the caller's records
#[utoipa::path(
    get,
    path = "",
    responses(
        (status = 200, description = "Caller's records", body = EnvelopeBody),
        (status = 401, description = "No session", body = EnvelopeBody),
        (status = 500, description = "Store failure", body = EnvelopeBody)
    )
)]
async fn list_products<G: DocumentGateway>(
    State(service): State<Arc<ProductService<G>>>,
    user: Option<SessionUser>,
) -> Response {
    service.list(&session_of(user)).await.into_response()
}

/// Get one of the caller's records
#[utoipa::path(
    get,
    path = "/{id}",
    params(
        ("id" = String, Path, description = "Record id (ObjectId hex)")
    ),
    responses(
        (status = 200, description = "Record found", body = EnvelopeBody),
        (status = 401, description = "No session", body = EnvelopeBody),
        (status = 404, description = "No such record for this caller", body = EnvelopeBody),
        (status = 500, description = "Store failure", body = EnvelopeBody)
    )
)]
async fn get_product<G: DocumentGateway>(
    State(service): State<Arc<ProductService<G>>>,
    user: Option<SessionUser>,
    Path(id): Path<String>,
) -> Response {
    service
        .get_owned(&session_of(user), &id)
        .await
        .into_response()
}

/// Update the provided fields of one of the caller's records
#[utoipa::path(
    put,
    path = "/{id}",
    params(
        ("id" = String, Path, description = "Record id (ObjectId hex)")
    ),
    request_body(content = Object, description = "Any subset of the product fields"),
    responses(
        (status = 200, description = "Record updated", body = EnvelopeBody),
        (status = 400, description = "No fields or invalid field", body = EnvelopeBody),
        (status = 401, description = "No session", body = EnvelopeBody),
        (status = 404, description = "No such record for this caller", body = EnvelopeBody),
        (status = 500, description = "Store failure", body = EnvelopeBody)
    )
)]
async fn update_product<G: DocumentGateway>(
    State(service): State<Arc<ProductService<G>>>,
    user: Option<SessionUser>,
    Path(id): Path<String>,
    body: Result<Json<FieldBag>, JsonRejection>,
) -> Response {
    let Json(fields) = match body {
        Ok(body) => body,
        Err(rejection) => return body_rejected(rejection),
    };
    service
        .update(&session_of(user), &id, &fields)
        .await
        .into_response()
}

/// Delete one of the caller's records
#[utoipa::path(
    delete,
    path = "/{id}",
    params(
        ("id" = String, Path, description = "Record id (ObjectId hex)")
    ),
    responses(
        (status = 200, description = "Record deleted", body = EnvelopeBody),
        (status = 401, description = "No session", body = EnvelopeBody),
        (status = 404, description = "No such record for this caller", body = EnvelopeBody),
        (status = 500, description = "Store failure", body = EnvelopeBody)
    )
)]
async fn delete_product<G: DocumentGateway>(
    State(service): State<Arc<ProductService<G>>>,
    user: Option<SessionUser>,
    Path(id): Path<String>,
) -> Response {
    service.delete(&session_of(user), &id).await.into_response()
}
