use sea_orm::{FromQueryResult, Value};
use serde::{Deserialize, Serialize};

use crate::record::Record;

/// A customer of the company. Every text field is free-form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromQueryResult)]
#[serde(default)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub tax_id: String,
    pub email: String,
    pub phone_number: String,
}

impl Record for Customer {
    const ENTITY: &'static str = "customer";
    const COLLECTION: &'static str = "customers";

    fn id(&self) -> i64 { self.id }

    fn set_id(&mut self, id: i64) { self.id = id; }

    fn insert_values(&self) -> Vec<Value> {
        vec![
            self.name.clone().into(),
            self.address.clone().into(),
            self.tax_id.clone().into(),
            self.email.clone().into(),
            self.phone_number.clone().into(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_empty() {
        let c: Customer = serde_json::from_str(r#"{"name":"Acme"}"#).unwrap();
        assert_eq!(c.id, 0);
        assert_eq!(c.name, "Acme");
        assert_eq!(c.email, "");
    }

    #[test]
    fn update_binds_id_first() {
        let c = Customer { id: 4, name: "Acme".into(), ..Default::default() };
        let values = c.update_values();
        assert_eq!(values.len(), 6);
        assert_eq!(values[0], Value::from(4i64));
        assert_eq!(values[1], Value::from("Acme".to_string()));
    }
}
