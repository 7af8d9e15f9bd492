use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("customer does not exist")]
    InvalidCustomer,

    #[error("one or more products do not exist in the catalog")]
    InvalidProducts,

    #[error("insufficient stock for product(s): {0:?}")]
    InsufficientStock(Vec<Uuid>),

    #[error("stock changed concurrently for product {0}")]
    StockConflict(Uuid),

    #[error("internal error: {0}")]
    Internal(String),
}
