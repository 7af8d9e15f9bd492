use std::sync::Arc;

use uuid::Uuid;

use super::errors::DomainError;
use super::order::{Customer, OrderLineInput, OrderView, Product, StockUpdate};

pub trait CustomerRepository: Send + Sync + 'static {
    fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, DomainError>;
}

pub trait ProductRepository: Send + Sync + 'static {
    /// Batched lookup. Returns only the products that exist; the result
    /// order is not guaranteed to match `ids`.
    fn find_all_by_id(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError>;

    /// Persist new stock levels. Each update is guarded by the quantity
    /// observed at validation time; a stale guard fails the whole batch.
    fn update_quantity(&self, updates: Vec<StockUpdate>) -> Result<(), DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Persist the order and its lines atomically; returns the created
    /// order with its ledger-assigned id and timestamps.
    fn create(
        &self,
        customer: &Customer,
        lines: Vec<OrderLineInput>,
    ) -> Result<OrderView, DomainError>;
}

impl<T: CustomerRepository + ?Sized> CustomerRepository for Arc<T> {
    fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, DomainError> {
        (**self).find_by_id(id)
    }
}

impl<T: ProductRepository + ?Sized> ProductRepository for Arc<T> {
    fn find_all_by_id(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        (**self).find_all_by_id(ids)
    }

    fn update_quantity(&self, updates: Vec<StockUpdate>) -> Result<(), DomainError> {
        (**self).update_quantity(updates)
    }
}

impl<T: OrderRepository + ?Sized> OrderRepository for Arc<T> {
    fn create(
        &self,
        customer: &Customer,
        lines: Vec<OrderLineInput>,
    ) -> Result<OrderView, DomainError> {
        (**self).create(customer, lines)
    }
}
