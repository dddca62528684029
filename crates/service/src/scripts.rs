//! SQL script loading.
//!
//! Scripts live under `<root>/<collection>/<name>.sql` and are read from disk on
//! every call, so edits take effect without a restart.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::errors::ServiceError;

/// The five statements every resource needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudOp {
    GetById,
    GetAll,
    Add,
    Update,
    Delete,
}

impl CrudOp {
    pub const ALL: [CrudOp; 5] = [CrudOp::GetById, CrudOp::GetAll, CrudOp::Add, CrudOp::Update, CrudOp::Delete];

    /// File stem for `entity` / `collection`, e.g. `get_customer_by_id` or `get_all_customers`.
    pub fn script_name(self, entity: &str, collection: &str) -> String {
        match self {
            CrudOp::GetById => format!("get_{entity}_by_id"),
            CrudOp::GetAll => format!("get_all_{collection}"),
            CrudOp::Add => format!("add_{entity}"),
            CrudOp::Update => format!("update_{entity}"),
            CrudOp::Delete => format!("delete_{entity}"),
        }
    }
}

pub const ORDER_SERVICE_SCRIPTS: [&str; 4] = [
    "get_order_service_by_id",
    "get_all_order_services",
    "add_service_to_order",
    "delete_service_from_order",
];

const RESOURCES: [(&str, &str); 3] = [("customer", "customers"), ("service", "services"), ("order", "orders")];

/// Every `(collection, name)` pair the repositories load.
pub fn expected_scripts() -> Vec<(String, String)> {
    let mut out = Vec::new();
    for (entity, collection) in RESOURCES {
        for op in CrudOp::ALL {
            out.push((collection.to_string(), op.script_name(entity, collection)));
        }
    }
    for name in ORDER_SERVICE_SCRIPTS {
        out.push(("orders".to_string(), name.to_string()));
    }
    out
}

#[derive(Debug, Clone)]
pub struct SqlScripts {
    root: PathBuf,
}

impl SqlScripts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_of(&self, collection: &str, name: &str) -> PathBuf {
        self.root.join(collection).join(format!("{name}.sql"))
    }

    /// Read one script. Missing, unreadable or blank files are storage errors.
    pub async fn load(&self, collection: &str, name: &str) -> Result<String, ServiceError> {
        let path = self.path_of(collection, name);
        let script = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ServiceError::Storage(format!("couldn't read script {}: {e}", path.display())))?;
        if script.trim().is_empty() {
            return Err(ServiceError::Storage(format!("script {} is empty", path.display())));
        }
        Ok(script)
    }

    /// Paths of expected scripts that are not present.
    pub async fn missing(&self) -> Vec<PathBuf> {
        let mut missing = Vec::new();
        for (collection, name) in expected_scripts() {
            let path = self.path_of(&collection, &name);
            if tokio::fs::metadata(&path).await.is_err() {
                missing.push(path);
            }
        }
        missing
    }

    /// Warn about each missing script; requests that need it will fail with a storage error.
    pub async fn verify(&self) -> usize {
        let missing = self.missing().await;
        for path in &missing {
            warn!(path = %path.display(), "sql script not found");
        }
        if missing.is_empty() {
            info!(root = %self.root.display(), "all sql scripts present");
        }
        missing.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::repo_scripts;

    #[test]
    fn names_follow_entity_and_collection() {
        assert_eq!(CrudOp::GetById.script_name("customer", "customers"), "get_customer_by_id");
        assert_eq!(CrudOp::GetAll.script_name("order", "orders"), "get_all_orders");
        assert_eq!(CrudOp::Update.script_name("service", "services"), "update_service");
        assert_eq!(expected_scripts().len(), 19);
    }

    #[tokio::test]
    async fn shipped_scripts_are_complete() {
        let scripts = repo_scripts();
        assert!(scripts.missing().await.is_empty());
        let sql = scripts.load("orders", "add_service_to_order").await.unwrap();
        assert!(sql.contains("order_services"));
    }

    #[tokio::test]
    async fn missing_and_blank_scripts_are_storage_errors() {
        let root = std::env::temp_dir().join(format!("restapp-sql-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(root.join("customers")).unwrap();
        std::fs::write(root.join("customers").join("delete_customer.sql"), "  \n").unwrap();
        let scripts = SqlScripts::new(&root);

        let err = scripts.load("customers", "get_customer_by_id").await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
        let err = scripts.load("customers", "delete_customer").await.unwrap_err();
        assert!(err.to_string().contains("empty"));
        assert_eq!(scripts.verify().await, 18);

        let _ = std::fs::remove_dir_all(root);
    }
}
