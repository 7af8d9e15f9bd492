use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub quantity: i32,
}

/// A single `(product, quantity)` pair as requested by the caller.
#[derive(Debug, Clone)]
pub struct OrderedProduct {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// An order line ready to persist; `unit_price` is the catalog price
/// snapshot taken at placement time, not a live reference.
#[derive(Debug, Clone)]
pub struct OrderLineInput {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLineView>,
}

/// Stock write-back for one product. `previous_quantity` is the stock level
/// observed during validation and guards the update against concurrent
/// decrements (compare-and-swap on the quantity column).
#[derive(Debug, Clone)]
pub struct StockUpdate {
    pub product_id: Uuid,
    pub previous_quantity: i32,
    pub quantity: i32,
}
