use sea_orm::{FromQueryResult, Value};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::ModelError;

/// A persisted resource addressed by an integer identifier.
///
/// The names drive both the HTTP messages and the script layout:
/// `<COLLECTION>/get_<ENTITY>_by_id.sql`, `<COLLECTION>/get_all_<COLLECTION>.sql`,
/// `<COLLECTION>/add_<ENTITY>.sql`, `<COLLECTION>/update_<ENTITY>.sql`,
/// `<COLLECTION>/delete_<ENTITY>.sql`.
pub trait Record:
    FromQueryResult + Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    /// Singular name, e.g. `customer`.
    const ENTITY: &'static str;
    /// Plural name, e.g. `customers`.
    const COLLECTION: &'static str;

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    /// Values bound by the insert script, in column order. The id is never bound.
    fn insert_values(&self) -> Vec<Value>;

    /// Values bound by the update script: `$1` is the id, the columns follow.
    fn update_values(&self) -> Vec<Value> {
        let mut values = vec![Value::from(self.id())];
        values.extend(self.insert_values());
        values
    }

    fn validate(&self) -> Result<(), ModelError> {
        Ok(())
    }
}
