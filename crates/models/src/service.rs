use sea_orm::{FromQueryResult, Value};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::record::Record;

/// A service the company sells; orders reference services through `order_services`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromQueryResult)]
#[serde(default)]
pub struct Service {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
}

pub fn validate_price(price: f64) -> Result<(), ModelError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ModelError::Validation(format!("price must be a non-negative number, got {price}")));
    }
    Ok(())
}

impl Record for Service {
    const ENTITY: &'static str = "service";
    const COLLECTION: &'static str = "services";

    fn id(&self) -> i64 { self.id }

    fn set_id(&mut self, id: i64) { self.id = id; }

    fn insert_values(&self) -> Vec<Value> {
        vec![self.title.clone().into(), self.description.clone().into(), self.price.into()]
    }

    fn validate(&self) -> Result<(), ModelError> {
        validate_price(self.price)
    }
}
