use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{OrderLineInput, OrderView, OrderedProduct, Product, StockUpdate};
use crate::domain::ports::{CustomerRepository, OrderRepository, ProductRepository};

/// Places a customer order against the product catalog.
///
/// The three collaborators are injected through the constructor; the service
/// itself holds no state and performs no I/O beyond what the ports expose.
pub struct PlaceOrderService<C, P, O> {
    customers: C,
    products: P,
    orders: O,
}

impl<C, P, O> PlaceOrderService<C, P, O>
where
    C: CustomerRepository,
    P: ProductRepository,
    O: OrderRepository,
{
    pub fn new(customers: C, products: P, orders: O) -> Self {
        Self {
            customers,
            products,
            orders,
        }
    }

    /// Validate the request against the catalog, persist the order, then
    /// write back the decremented stock levels.
    ///
    /// Any shortfall aborts the whole order; there is no partial
    /// fulfillment. All validation happens before the first write. The
    /// order insert and the stock write-back are two separate calls: if the
    /// latter fails the order stays persisted and the error is surfaced.
    pub fn place_order(
        &self,
        customer_id: Uuid,
        requested: Vec<OrderedProduct>,
    ) -> Result<OrderView, DomainError> {
        let customer = self
            .customers
            .find_by_id(customer_id)?
            .ok_or(DomainError::InvalidCustomer)?;

        let ids: Vec<Uuid> = requested.iter().map(|r| r.product_id).collect();
        let catalog = self.products.find_all_by_id(&ids)?;
        // The batch returns distinct existing rows, so a count mismatch
        // means an unknown id (or a duplicate id in the request).
        if catalog.len() != requested.len() {
            return Err(DomainError::InvalidProducts);
        }
        let by_id: HashMap<Uuid, &Product> = catalog.iter().map(|p| (p.id, p)).collect();

        let out_of_stock: Vec<Uuid> = requested
            .iter()
            .filter(|r| {
                by_id
                    .get(&r.product_id)
                    .is_some_and(|p| r.quantity > p.quantity)
            })
            .map(|r| r.product_id)
            .collect();
        if !out_of_stock.is_empty() {
            return Err(DomainError::InsufficientStock(out_of_stock));
        }

        let mut lines = Vec::with_capacity(requested.len());
        let mut updates = Vec::with_capacity(requested.len());
        for r in &requested {
            let product = by_id
                .get(&r.product_id)
                .ok_or(DomainError::InvalidProducts)?;
            lines.push(OrderLineInput {
                product_id: r.product_id,
                quantity: r.quantity,
                unit_price: product.price.clone(),
            });
            updates.push(StockUpdate {
                product_id: r.product_id,
                previous_quantity: product.quantity,
                quantity: product.quantity - r.quantity,
            });
        }

        let order = self.orders.create(&customer, lines)?;

        if let Err(e) = self.products.update_quantity(updates) {
            log::error!(
                "order {} persisted but stock update failed: {}",
                order.id,
                e
            );
            return Err(e);
        }

        Ok(order)
    }
}
