use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Response,
    routing::get,
    Router,
};

use crate::response::WebError;
use crate::routes::crud;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services).post(add_service).patch(update_service))
        .route("/services/", get(list_services).post(add_service).patch(update_service))
        .route("/services/:id", get(get_service).delete(delete_service))
}

#[utoipa::path(
    get, path = "/services/{id}", tag = "services",
    params(("id" = i64, Path, description = "Service ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ServiceDoc),
        (status = 400, description = "Incorrect id"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_service(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, WebError> {
    crud::get_one(state.repos.services.as_ref(), &id).await
}

#[utoipa::path(
    get, path = "/services/", tag = "services",
    responses(
        (status = 200, description = "OK", body = [crate::openapi::ServiceDoc]),
        (status = 404, description = "Read Failed")
    )
)]
pub async fn list_services(State(state): State<AppState>) -> Result<Response, WebError> {
    crud::get_all(state.repos.services.as_ref()).await
}

#[utoipa::path(
    post, path = "/services/", tag = "services",
    request_body = crate::openapi::ServiceDoc,
    responses(
        (status = 200, description = "Added successfully"),
        (status = 400, description = "Bad Request"),
        (status = 500, description = "Add Failed")
    )
)]
pub async fn add_service(State(state): State<AppState>, body: Bytes) -> Result<Response, WebError> {
    crud::add(state.repos.services.as_ref(), &body).await
}

#[utoipa::path(
    patch, path = "/services/", tag = "services",
    request_body = crate::openapi::ServiceDoc,
    responses(
        (status = 200, description = "Updated successfully"),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Update Failed")
    )
)]
pub async fn update_service(State(state): State<AppState>, body: Bytes) -> Result<Response, WebError> {
    crud::update(state.repos.services.as_ref(), &body).await
}

#[utoipa::path(
    delete, path = "/services/{id}", tag = "services",
    params(("id" = i64, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Deleted successfully"),
        (status = 400, description = "Incorrect id"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete_service(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, WebError> {
    crud::delete(state.repos.services.as_ref(), &id).await
}
