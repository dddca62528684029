use chrono::{DateTime, Utc};
use sea_orm::{FromQueryResult, Value};
use serde::{Deserialize, Serialize};

use crate::record::Record;

/// An order placed by a customer. Its services live in the `order_services` relation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromQueryResult)]
pub struct Order {
    #[serde(default)]
    pub id: i64,
    pub customer_id: i64,
    pub date: DateTime<Utc>,
}

impl Record for Order {
    const ENTITY: &'static str = "order";
    const COLLECTION: &'static str = "orders";

    fn id(&self) -> i64 { self.id }

    fn set_id(&mut self, id: i64) { self.id = id; }

    fn insert_values(&self) -> Vec<Value> {
        vec![self.customer_id.into(), self.date.into()]
    }
}
