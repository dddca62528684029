//! Plain records mapped from SQL rows, plus the shared connection helper.

pub mod errors;
pub mod db;
pub mod record;
pub mod customer;
pub mod service;
pub mod order;

pub use customer::Customer;
pub use order::Order;
pub use record::Record;
pub use service::Service;
