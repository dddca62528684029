use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use models::{Order, Record, Service};
use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult, Statement, Value};
use tracing::debug;

use super::{CrudRepository, OrderServicesRepository};
use crate::errors::ServiceError;
use crate::scripts::{CrudOp, SqlScripts};

/// SQL-backed repository for any [`Record`]; statements come from [`SqlScripts`].
pub struct SqlRepository<T> {
    db: DatabaseConnection,
    scripts: Arc<SqlScripts>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> SqlRepository<T> {
    pub fn new(db: DatabaseConnection, scripts: Arc<SqlScripts>) -> Self {
        Self { db, scripts, _record: PhantomData }
    }

    async fn crud_statement(&self, op: CrudOp, values: Vec<Value>) -> Result<Statement, ServiceError> {
        self.statement(T::COLLECTION, &op.script_name(T::ENTITY, T::COLLECTION), values).await
    }
}

impl<T> SqlRepository<T> {
    async fn statement(&self, collection: &str, name: &str, values: Vec<Value>) -> Result<Statement, ServiceError> {
        let sql = self.scripts.load(collection, name).await?;
        debug!(script = %name, params = values.len(), "prepared statement");
        Ok(Statement::from_sql_and_values(self.db.get_database_backend(), sql, values))
    }
}

#[async_trait]
impl<T: Record> CrudRepository<T> for SqlRepository<T> {
    async fn get_by_id(&self, id: i64) -> Result<T, ServiceError> {
        let stmt = self.crud_statement(CrudOp::GetById, vec![id.into()]).await?;
        T::find_by_statement(stmt)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found(T::ENTITY))
    }

    async fn get_all(&self) -> Result<Vec<T>, ServiceError> {
        let stmt = self.crud_statement(CrudOp::GetAll, Vec::new()).await?;
        Ok(T::find_by_statement(stmt).all(&self.db).await?)
    }

    async fn add(&self, record: &T) -> Result<i64, ServiceError> {
        let stmt = self.crud_statement(CrudOp::Add, record.insert_values()).await?;
        let row = self
            .db
            .query_one(stmt)
            .await?
            .ok_or_else(|| ServiceError::Storage(format!("insert into {} returned no id", T::COLLECTION)))?;
        Ok(row.try_get::<i64>("", "id")?)
    }

    async fn update(&self, record: &T) -> Result<(), ServiceError> {
        let stmt = self.crud_statement(CrudOp::Update, record.update_values()).await?;
        self.db.execute(stmt).await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let stmt = self.crud_statement(CrudOp::Delete, vec![id.into()]).await?;
        self.db.execute(stmt).await?;
        Ok(())
    }
}

#[async_trait]
impl OrderServicesRepository for SqlRepository<Order> {
    async fn get_order_service_by_id(&self, order_id: i64, service_id: i64) -> Result<Service, ServiceError> {
        let stmt = self
            .statement(Order::COLLECTION, "get_order_service_by_id", vec![order_id.into(), service_id.into()])
            .await?;
        Service::find_by_statement(stmt)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("order service"))
    }

    async fn get_all_order_services(&self, order_id: i64) -> Result<Vec<Service>, ServiceError> {
        let stmt = self.statement(Order::COLLECTION, "get_all_order_services", vec![order_id.into()]).await?;
        Ok(Service::find_by_statement(stmt).all(&self.db).await?)
    }

    async fn add_service_to_order(&self, order_id: i64, service_id: i64) -> Result<(), ServiceError> {
        let stmt = self
            .statement(Order::COLLECTION, "add_service_to_order", vec![order_id.into(), service_id.into()])
            .await?;
        self.db.execute(stmt).await?;
        Ok(())
    }

    async fn delete_service_from_order(&self, order_id: i64, service_id: i64) -> Result<(), ServiceError> {
        let stmt = self
            .statement(Order::COLLECTION, "delete_service_from_order", vec![order_id.into(), service_id.into()])
            .await?;
        self.db.execute(stmt).await?;
        Ok(())
    }
}
