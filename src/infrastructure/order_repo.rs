use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{Customer, OrderLineInput, OrderLineView, OrderView};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_lines, orders};

use super::models::{NewOrderLineRow, NewOrderRow, OrderLineRow, OrderRow};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(
        &self,
        customer: &Customer,
        lines: Vec<OrderLineInput>,
    ) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;
        let customer_id = customer.id;

        conn.transaction::<_, DomainError, _>(|conn| {
            let order: OrderRow = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: Uuid::new_v4(),
                    customer_id,
                })
                .returning(OrderRow::as_returning())
                .get_result(conn)?;

            let new_lines: Vec<NewOrderLineRow> = lines
                .into_iter()
                .map(|l| NewOrderLineRow {
                    id: Uuid::new_v4(),
                    order_id: order.id,
                    product_id: l.product_id,
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                })
                .collect();
            let inserted: Vec<OrderLineRow> = diesel::insert_into(order_lines::table)
                .values(&new_lines)
                .returning(OrderLineRow::as_returning())
                .get_results(conn)?;

            Ok(OrderView {
                id: order.id,
                customer_id: order.customer_id,
                created_at: order.created_at,
                lines: inserted
                    .into_iter()
                    .map(|l| OrderLineView {
                        id: l.id,
                        product_id: l.product_id,
                        quantity: l.quantity,
                        unit_price: l.unit_price,
                    })
                    .collect(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use diesel::prelude::*;
    use std::str::FromStr;
    use uuid::Uuid;

    use super::DieselOrderRepository;
    use crate::domain::order::{Customer, OrderLineInput};
    use crate::domain::ports::OrderRepository;
    use crate::infrastructure::models::{OrderLineRow, OrderRow};
    use crate::infrastructure::test_support::{insert_customer, insert_product, setup_db};
    use crate::schema::{order_lines, orders};

    #[tokio::test]
    async fn create_persists_order_and_lines_in_one_transaction() {
        let (_container, pool) = setup_db().await;
        let customer_id = insert_customer(&pool, "Grace Hopper", "grace@example.com");
        let keyboard = insert_product(&pool, "keyboard", "5.00", 10);
        let monitor = insert_product(&pool, "monitor", "20.00", 3);

        let repo = DieselOrderRepository::new(pool.clone());
        let customer = Customer {
            id: customer_id,
            name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
        };

        let order = repo
            .create(
                &customer,
                vec![
                    OrderLineInput {
                        product_id: keyboard,
                        quantity: 2,
                        unit_price: BigDecimal::from_str("5.00").expect("valid decimal"),
                    },
                    OrderLineInput {
                        product_id: monitor,
                        quantity: 3,
                        unit_price: BigDecimal::from_str("20.00").expect("valid decimal"),
                    },
                ],
            )
            .expect("create failed");

        assert_eq!(order.customer_id, customer_id);
        assert_eq!(order.lines.len(), 2);

        let mut conn = pool.get().expect("Failed to get connection");
        let stored_order: OrderRow = orders::table
            .filter(orders::id.eq(order.id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .expect("order row should exist");
        assert_eq!(stored_order.customer_id, customer_id);

        let stored_lines: Vec<OrderLineRow> = order_lines::table
            .filter(order_lines::order_id.eq(order.id))
            .select(OrderLineRow::as_select())
            .load(&mut conn)
            .expect("line query failed");
        assert_eq!(stored_lines.len(), 2);
        for line in &stored_lines {
            if line.product_id == keyboard {
                assert_eq!(line.quantity, 2);
            } else {
                assert_eq!(line.product_id, monitor);
                assert_eq!(line.quantity, 3);
            }
        }
    }

    #[tokio::test]
    async fn create_fails_for_a_customer_the_ledger_has_never_seen() {
        let (_container, pool) = setup_db().await;
        let keyboard = insert_product(&pool, "keyboard", "5.00", 10);

        let repo = DieselOrderRepository::new(pool.clone());
        let ghost = Customer {
            id: Uuid::new_v4(),
            name: "Nobody".to_string(),
            email: "nobody@example.com".to_string(),
        };

        // The foreign key on orders.customer_id rejects the insert and the
        // transaction leaves no lines behind.
        let result = repo.create(
            &ghost,
            vec![OrderLineInput {
                product_id: keyboard,
                quantity: 1,
                unit_price: BigDecimal::from_str("5.00").expect("valid decimal"),
            }],
        );
        assert!(result.is_err());

        let mut conn = pool.get().expect("Failed to get connection");
        let line_count: i64 = order_lines::table
            .count()
            .get_result(&mut conn)
            .expect("count failed");
        assert_eq!(line_count, 0);
    }
}
