//! In-memory repositories.
//!
//! Used by the `memory` database driver and by controller tests. All stores of
//! one [`MemoryStore`] share a single set of tables behind one mutex, so the
//! reference rules of the PostgreSQL schema hold here too:
//! - an order must reference an existing customer;
//! - a customer with orders cannot be deleted;
//! - deleting an order or a service drops its order/service pairs.
//!
//! Each store can be told to fail reads or mutations, and counts the mutations
//! it applied.

use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use models::{Customer, Order, Record, Service};

use super::{CrudRepository, OrderServicesRepository, Repositories};
use crate::errors::ServiceError;

#[derive(Debug, Default)]
struct Faults {
    fail_reads: AtomicBool,
    fail_mutations: AtomicBool,
    mutations: AtomicUsize,
}

impl Faults {
    fn read(&self) -> Result<(), ServiceError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ServiceError::Storage("injected read failure".into()));
        }
        Ok(())
    }

    fn write(&self) -> Result<(), ServiceError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(ServiceError::Storage("injected write failure".into()));
        }
        Ok(())
    }

    fn applied(&self) {
        self.mutations.fetch_add(1, Ordering::SeqCst);
    }
}

/// Every table of one in-memory database.
#[derive(Debug, Default)]
pub struct Tables {
    customers: BTreeMap<i64, Customer>,
    services: BTreeMap<i64, Service>,
    orders: BTreeMap<i64, Order>,
    order_services: BTreeSet<(i64, i64)>,
}

type SharedTables = Arc<Mutex<Tables>>;

fn lock(tables: &Mutex<Tables>) -> Result<MutexGuard<'_, Tables>, ServiceError> {
    tables.lock().map_err(|_| ServiceError::Storage("in-memory store poisoned".into()))
}

/// Where a record lives in [`Tables`] and which reference rules guard it.
pub trait MemoryTable: Record {
    fn rows(tables: &Tables) -> &BTreeMap<i64, Self>;

    fn rows_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self>;

    /// Reject a row whose references point nowhere.
    fn check_references(_tables: &Tables, _row: &Self) -> Result<(), ServiceError> {
        Ok(())
    }

    /// Apply the delete rules of rows referencing `id`; runs before the row is removed.
    fn on_delete(_tables: &mut Tables, _id: i64) -> Result<(), ServiceError> {
        Ok(())
    }
}

impl MemoryTable for Customer {
    fn rows(tables: &Tables) -> &BTreeMap<i64, Self> { &tables.customers }

    fn rows_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self> { &mut tables.customers }

    fn on_delete(tables: &mut Tables, id: i64) -> Result<(), ServiceError> {
        if let Some(order) = tables.orders.values().find(|o| o.customer_id == id) {
            return Err(ServiceError::Storage(format!(
                "customer {id} is still referenced by order {}",
                order.id
            )));
        }
        Ok(())
    }
}

impl MemoryTable for Service {
    fn rows(tables: &Tables) -> &BTreeMap<i64, Self> { &tables.services }

    fn rows_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self> { &mut tables.services }

    fn on_delete(tables: &mut Tables, id: i64) -> Result<(), ServiceError> {
        tables.order_services.retain(|(_, sid)| *sid != id);
        Ok(())
    }
}

impl MemoryTable for Order {
    fn rows(tables: &Tables) -> &BTreeMap<i64, Self> { &tables.orders }

    fn rows_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self> { &mut tables.orders }

    fn check_references(tables: &Tables, row: &Self) -> Result<(), ServiceError> {
        if !tables.customers.contains_key(&row.customer_id) {
            return Err(ServiceError::Storage(format!(
                "order references missing customer {}",
                row.customer_id
            )));
        }
        Ok(())
    }

    fn on_delete(tables: &mut Tables, id: i64) -> Result<(), ServiceError> {
        tables.order_services.retain(|(oid, _)| *oid != id);
        Ok(())
    }
}

/// A table of `T` keyed by identifier; identifiers start at 1.
pub struct MemoryRepository<T> {
    tables: SharedTables,
    next_id: AtomicI64,
    faults: Faults,
    _record: PhantomData<fn() -> T>,
}

impl<T> MemoryRepository<T> {
    fn with_tables(tables: SharedTables) -> Self {
        Self { tables, next_id: AtomicI64::new(1), faults: Faults::default(), _record: PhantomData }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.faults.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_mutations(&self, fail: bool) {
        self.faults.fail_mutations.store(fail, Ordering::SeqCst);
    }

    /// Successful `add`/`update`/`delete` calls.
    pub fn mutation_count(&self) -> usize {
        self.faults.mutations.load(Ordering::SeqCst)
    }
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::with_tables(SharedTables::default())
    }
}

#[async_trait]
impl<T: MemoryTable> CrudRepository<T> for MemoryRepository<T> {
    async fn get_by_id(&self, id: i64) -> Result<T, ServiceError> {
        self.faults.read()?;
        let tables = lock(&self.tables)?;
        T::rows(&tables).get(&id).cloned().ok_or_else(|| ServiceError::not_found(T::ENTITY))
    }

    async fn get_all(&self) -> Result<Vec<T>, ServiceError> {
        self.faults.read()?;
        let tables = lock(&self.tables)?;
        Ok(T::rows(&tables).values().cloned().collect())
    }

    async fn add(&self, record: &T) -> Result<i64, ServiceError> {
        self.faults.write()?;
        let mut tables = lock(&self.tables)?;
        T::check_references(&tables, record)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut row = record.clone();
        row.set_id(id);
        T::rows_mut(&mut tables).insert(id, row);
        self.faults.applied();
        Ok(id)
    }

    async fn update(&self, record: &T) -> Result<(), ServiceError> {
        self.faults.write()?;
        let mut tables = lock(&self.tables)?;
        // like UPDATE ... WHERE id = $1: no row, no change
        if T::rows(&tables).contains_key(&record.id()) {
            T::check_references(&tables, record)?;
            T::rows_mut(&mut tables).insert(record.id(), record.clone());
        }
        self.faults.applied();
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.faults.write()?;
        let mut tables = lock(&self.tables)?;
        T::on_delete(&mut tables, id)?;
        T::rows_mut(&mut tables).remove(&id);
        self.faults.applied();
        Ok(())
    }
}

/// Order/service pairs; both ends must exist when a pair is added.
pub struct MemoryOrderServices {
    tables: SharedTables,
    faults: Faults,
}

impl MemoryOrderServices {
    fn with_tables(tables: SharedTables) -> Self {
        Self { tables, faults: Faults::default() }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.faults.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_mutations(&self, fail: bool) {
        self.faults.fail_mutations.store(fail, Ordering::SeqCst);
    }

    pub fn mutation_count(&self) -> usize {
        self.faults.mutations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderServicesRepository for MemoryOrderServices {
    async fn get_order_service_by_id(&self, order_id: i64, service_id: i64) -> Result<Service, ServiceError> {
        self.faults.read()?;
        let tables = lock(&self.tables)?;
        if !tables.order_services.contains(&(order_id, service_id)) {
            return Err(ServiceError::not_found("order service"));
        }
        tables.services.get(&service_id).cloned().ok_or_else(|| ServiceError::not_found("order service"))
    }

    async fn get_all_order_services(&self, order_id: i64) -> Result<Vec<Service>, ServiceError> {
        self.faults.read()?;
        let tables = lock(&self.tables)?;
        Ok(tables
            .order_services
            .range((order_id, i64::MIN)..=(order_id, i64::MAX))
            .filter_map(|(_, sid)| tables.services.get(sid).cloned())
            .collect())
    }

    async fn add_service_to_order(&self, order_id: i64, service_id: i64) -> Result<(), ServiceError> {
        self.faults.write()?;
        let mut tables = lock(&self.tables)?;
        if !tables.orders.contains_key(&order_id) || !tables.services.contains_key(&service_id) {
            return Err(ServiceError::Storage(format!(
                "pair ({order_id}, {service_id}) references a missing order or service"
            )));
        }
        if !tables.order_services.insert((order_id, service_id)) {
            return Err(ServiceError::Storage(format!(
                "service {service_id} is already included in order {order_id}"
            )));
        }
        self.faults.applied();
        Ok(())
    }

    async fn delete_service_from_order(&self, order_id: i64, service_id: i64) -> Result<(), ServiceError> {
        self.faults.write()?;
        lock(&self.tables)?.order_services.remove(&(order_id, service_id));
        self.faults.applied();
        Ok(())
    }
}

/// Concrete handles to every in-memory store, kept so callers can inject faults.
#[derive(Clone)]
pub struct MemoryStore {
    pub customers: Arc<MemoryRepository<Customer>>,
    pub services: Arc<MemoryRepository<Service>>,
    pub orders: Arc<MemoryRepository<Order>>,
    pub order_services: Arc<MemoryOrderServices>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        let tables = SharedTables::default();
        Self {
            customers: Arc::new(MemoryRepository::with_tables(Arc::clone(&tables))),
            services: Arc::new(MemoryRepository::with_tables(Arc::clone(&tables))),
            orders: Arc::new(MemoryRepository::with_tables(Arc::clone(&tables))),
            order_services: Arc::new(MemoryOrderServices::with_tables(tables)),
        }
    }
}

impl MemoryStore {
    pub fn repositories(&self) -> Repositories {
        Repositories {
            customers: self.customers.clone(),
            services: self.services.clone(),
            orders: self.orders.clone(),
            order_services: self.order_services.clone(),
        }
    }
}
