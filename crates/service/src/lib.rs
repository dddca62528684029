//! Data-access layer for customers, services and orders.
//! - Every repository call runs exactly one statement loaded from an external `.sql` file.
//! - Repositories are traits so controllers can run against PostgreSQL or an in-memory store.

pub mod errors;
pub mod scripts;
pub mod repository;
#[cfg(test)]
pub mod test_support;
