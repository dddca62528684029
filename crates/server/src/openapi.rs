use chrono::{DateTime, Utc};
use utoipa::OpenApi;
use utoipa::ToSchema;

/// Customer as sent and received; `id` is ignored on create.
#[derive(ToSchema)]
pub struct CustomerDoc {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub tax_id: String,
    pub email: String,
    pub phone_number: String,
}

#[derive(ToSchema)]
pub struct ServiceDoc {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Non-negative.
    pub price: f64,
}

#[derive(ToSchema)]
pub struct OrderDoc {
    pub id: i64,
    pub customer_id: i64,
    /// RFC 3339 timestamp.
    pub date: DateTime<Utc>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::customers::get_customer,
        crate::routes::customers::list_customers,
        crate::routes::customers::add_customer,
        crate::routes::customers::update_customer,
        crate::routes::customers::delete_customer,
        crate::routes::services::get_service,
        crate::routes::services::list_services,
        crate::routes::services::add_service,
        crate::routes::services::update_service,
        crate::routes::services::delete_service,
        crate::routes::orders::get_order,
        crate::routes::orders::list_orders,
        crate::routes::orders::add_order,
        crate::routes::orders::update_order,
        crate::routes::orders::delete_order,
        crate::routes::orders::get_order_service,
        crate::routes::orders::list_order_services,
        crate::routes::orders::add_order_service,
        crate::routes::orders::delete_order_service,
    ),
    components(schemas(CustomerDoc, ServiceDoc, OrderDoc)),
    tags(
        (name = "customers"),
        (name = "services"),
        (name = "orders")
    )
)]
pub struct ApiDoc;
