//! Repository abstractions shared by every resource.
//!
//! `get_by_id` reports a missing row as `ServiceError::NotFound`; `get_all`
//! never fails on an empty table. `update` and `delete` do not check affected
//! rows: callers verify existence first with `get_by_id`. The check and the
//! mutation are two statements, so a concurrent delete can slip in between.

use std::sync::Arc;

use async_trait::async_trait;
use models::{Customer, Order, Record, Service};
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;
use crate::scripts::SqlScripts;

pub mod memory;
pub mod sql;

#[async_trait]
pub trait CrudRepository<T: Record>: Send + Sync {
    async fn get_by_id(&self, id: i64) -> Result<T, ServiceError>;
    async fn get_all(&self) -> Result<Vec<T>, ServiceError>;
    /// Insert ignoring `record.id()`; returns the identifier storage assigned.
    async fn add(&self, record: &T) -> Result<i64, ServiceError>;
    async fn update(&self, record: &T) -> Result<(), ServiceError>;
    async fn delete(&self, id: i64) -> Result<(), ServiceError>;
}

/// The order ↔ service association.
#[async_trait]
pub trait OrderServicesRepository: Send + Sync {
    async fn get_order_service_by_id(&self, order_id: i64, service_id: i64) -> Result<Service, ServiceError>;
    async fn get_all_order_services(&self, order_id: i64) -> Result<Vec<Service>, ServiceError>;
    async fn add_service_to_order(&self, order_id: i64, service_id: i64) -> Result<(), ServiceError>;
    async fn delete_service_from_order(&self, order_id: i64, service_id: i64) -> Result<(), ServiceError>;
}

/// Every repository the controllers need, built once at startup.
#[derive(Clone)]
pub struct Repositories {
    pub customers: Arc<dyn CrudRepository<Customer>>,
    pub services: Arc<dyn CrudRepository<Service>>,
    pub orders: Arc<dyn CrudRepository<Order>>,
    pub order_services: Arc<dyn OrderServicesRepository>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool and one script loader.
    pub fn sql(db: DatabaseConnection, scripts: Arc<SqlScripts>) -> Self {
        let orders = Arc::new(sql::SqlRepository::<Order>::new(db.clone(), Arc::clone(&scripts)));
        Self {
            customers: Arc::new(sql::SqlRepository::<Customer>::new(db.clone(), Arc::clone(&scripts))),
            services: Arc::new(sql::SqlRepository::<Service>::new(db, scripts)),
            orders: orders.clone(),
            order_services: orders,
        }
    }

    /// In-memory repositories; nothing survives a restart.
    ///
    /// # Examples
    /// ```
    /// use models::Customer;
    /// use service::repository::Repositories;
    /// let repos = Repositories::memory();
    /// let acme = Customer { name: "Acme".into(), ..Default::default() };
    /// let id = tokio_test::block_on(repos.customers.add(&acme)).unwrap();
    /// let found = tokio_test::block_on(repos.customers.get_by_id(id)).unwrap();
    /// assert_eq!(found.name, "Acme");
    /// ```
    pub fn memory() -> Self {
        memory::MemoryStore::default().repositories()
    }
}
