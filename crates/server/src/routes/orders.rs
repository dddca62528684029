use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use tracing::info;

use crate::response::{handle_internal_error, handle_web_error, send_data, send_success, WebError};
use crate::routes::crud;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(add_order).patch(update_order))
        .route("/orders/", get(list_orders).post(add_order).patch(update_order))
        .route("/orders/:id", get(get_order).delete(delete_order))
        .route("/orders/:id/services", get(list_order_services))
        .route(
            "/orders/:id/services/:service_id",
            get(get_order_service).post(add_order_service).delete(delete_order_service),
        )
}

#[utoipa::path(
    get, path = "/orders/{id}", tag = "orders",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::OrderDoc),
        (status = 400, description = "Incorrect id"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_order(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, WebError> {
    crud::get_one(state.repos.orders.as_ref(), &id).await
}

#[utoipa::path(
    get, path = "/orders/", tag = "orders",
    responses(
        (status = 200, description = "OK", body = [crate::openapi::OrderDoc]),
        (status = 404, description = "Read Failed")
    )
)]
pub async fn list_orders(State(state): State<AppState>) -> Result<Response, WebError> {
    crud::get_all(state.repos.orders.as_ref()).await
}

#[utoipa::path(
    post, path = "/orders/", tag = "orders",
    request_body = crate::openapi::OrderDoc,
    responses(
        (status = 200, description = "Added successfully"),
        (status = 400, description = "Bad Request"),
        (status = 500, description = "Add Failed")
    )
)]
pub async fn add_order(State(state): State<AppState>, body: Bytes) -> Result<Response, WebError> {
    crud::add(state.repos.orders.as_ref(), &body).await
}

#[utoipa::path(
    patch, path = "/orders/", tag = "orders",
    request_body = crate::openapi::OrderDoc,
    responses(
        (status = 200, description = "Updated successfully"),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Update Failed")
    )
)]
pub async fn update_order(State(state): State<AppState>, body: Bytes) -> Result<Response, WebError> {
    crud::update(state.repos.orders.as_ref(), &body).await
}

#[utoipa::path(
    delete, path = "/orders/{id}", tag = "orders",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Deleted successfully"),
        (status = 400, description = "Incorrect id"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete_order(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, WebError> {
    crud::delete(state.repos.orders.as_ref(), &id).await
}

#[utoipa::path(
    get, path = "/orders/{id}/services/{service_id}", tag = "orders",
    params(
        ("id" = i64, Path, description = "Order ID"),
        ("service_id" = i64, Path, description = "Service ID")
    ),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ServiceDoc),
        (status = 400, description = "Incorrect id"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_order_service(
    State(state): State<AppState>,
    Path((order_id, service_id)): Path<(String, String)>,
) -> Result<Response, WebError> {
    let order_id = crud::parse_id(&order_id)?;
    let service_id = crud::parse_id(&service_id)?;
    let service = state
        .repos
        .order_services
        .get_order_service_by_id(order_id, service_id)
        .await
        .map_err(|e| {
            handle_internal_error("Database access error", &e);
            handle_web_error(
                StatusCode::NOT_FOUND,
                format!("There is no service with id {service_id} for order with id {order_id} in the database"),
            )
        })?;
    send_data(&service)
}

#[utoipa::path(
    get, path = "/orders/{id}/services", tag = "orders",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "OK", body = [crate::openapi::ServiceDoc]),
        (status = 400, description = "Incorrect id"),
        (status = 404, description = "Read Failed")
    )
)]
pub async fn list_order_services(State(state): State<AppState>, Path(order_id): Path<String>) -> Result<Response, WebError> {
    let order_id = crud::parse_id(&order_id)?;
    let services = state.repos.order_services.get_all_order_services(order_id).await.map_err(|e| {
        handle_internal_error("Database access error", &e);
        handle_web_error(
            StatusCode::NOT_FOUND,
            format!("There are no services for order with id {order_id} in the database"),
        )
    })?;
    send_data(&services)
}

#[utoipa::path(
    post, path = "/orders/{id}/services/{service_id}", tag = "orders",
    params(
        ("id" = i64, Path, description = "Order ID"),
        ("service_id" = i64, Path, description = "Service ID")
    ),
    responses(
        (status = 200, description = "Added successfully"),
        (status = 400, description = "Incorrect id"),
        (status = 404, description = "Order or service not found"),
        (status = 500, description = "Add Failed")
    )
)]
pub async fn add_order_service(
    State(state): State<AppState>,
    Path((order_id, service_id)): Path<(String, String)>,
) -> Result<Response, WebError> {
    let order_id = crud::parse_id(&order_id)?;
    let service_id = crud::parse_id(&service_id)?;
    crud::ensure_exists(state.repos.orders.as_ref(), order_id).await?;
    crud::ensure_exists(state.repos.services.as_ref(), service_id).await?;
    state
        .repos
        .order_services
        .add_service_to_order(order_id, service_id)
        .await
        .map_err(|e| crud::mutation_error(e, "Couldn't add data to the database"))?;
    info!(order_id, service_id, "added service to order");
    Ok(send_success("Added successfully"))
}

#[utoipa::path(
    delete, path = "/orders/{id}/services/{service_id}", tag = "orders",
    params(
        ("id" = i64, Path, description = "Order ID"),
        ("service_id" = i64, Path, description = "Service ID")
    ),
    responses(
        (status = 200, description = "Deleted successfully"),
        (status = 400, description = "Incorrect id"),
        (status = 404, description = "Order not found or service not in order"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete_order_service(
    State(state): State<AppState>,
    Path((order_id, service_id)): Path<(String, String)>,
) -> Result<Response, WebError> {
    let order_id = crud::parse_id(&order_id)?;
    let service_id = crud::parse_id(&service_id)?;
    crud::ensure_exists(state.repos.orders.as_ref(), order_id).await?;
    state
        .repos
        .order_services
        .get_order_service_by_id(order_id, service_id)
        .await
        .map_err(|e| {
            if !e.is_not_found() {
                handle_internal_error("Database access error", &e);
            }
            handle_web_error(StatusCode::NOT_FOUND, "The service doesn't exist or isn't included in the order")
        })?;
    state
        .repos
        .order_services
        .delete_service_from_order(order_id, service_id)
        .await
        .map_err(|e| crud::mutation_error(e, "Couldn't delete the service from the order"))?;
    info!(order_id, service_id, "removed service from order");
    Ok(send_success("Deleted successfully"))
}
