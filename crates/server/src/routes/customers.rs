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
        .route("/customers", get(list_customers).post(add_customer).patch(update_customer))
        .route("/customers/", get(list_customers).post(add_customer).patch(update_customer))
        .route("/customers/:id", get(get_customer).delete(delete_customer))
}

#[utoipa::path(
    get, path = "/customers/{id}", tag = "customers",
    params(("id" = i64, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::CustomerDoc),
        (status = 400, description = "Incorrect id"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_customer(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, WebError> {
    crud::get_one(state.repos.customers.as_ref(), &id).await
}

#[utoipa::path(
    get, path = "/customers/", tag = "customers",
    responses(
        (status = 200, description = "OK", body = [crate::openapi::CustomerDoc]),
        (status = 404, description = "Read Failed")
    )
)]
pub async fn list_customers(State(state): State<AppState>) -> Result<Response, WebError> {
    crud::get_all(state.repos.customers.as_ref()).await
}

#[utoipa::path(
    post, path = "/customers/", tag = "customers",
    request_body = crate::openapi::CustomerDoc,
    responses(
        (status = 200, description = "Added successfully"),
        (status = 400, description = "Bad Request"),
        (status = 500, description = "Add Failed")
    )
)]
pub async fn add_customer(State(state): State<AppState>, body: Bytes) -> Result<Response, WebError> {
    crud::add(state.repos.customers.as_ref(), &body).await
}

#[utoipa::path(
    patch, path = "/customers/", tag = "customers",
    request_body = crate::openapi::CustomerDoc,
    responses(
        (status = 200, description = "Updated successfully"),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Update Failed")
    )
)]
pub async fn update_customer(State(state): State<AppState>, body: Bytes) -> Result<Response, WebError> {
    crud::update(state.repos.customers.as_ref(), &body).await
}

#[utoipa::path(
    delete, path = "/customers/{id}", tag = "customers",
    params(("id" = i64, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Deleted successfully"),
        (status = 400, description = "Incorrect id"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete_customer(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, WebError> {
    crud::delete(state.repos.customers.as_ref(), &id).await
}
