use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{Product, StockUpdate};
use crate::domain::ports::ProductRepository;
use crate::schema::products;

use super::models::ProductRow;

pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductRepository for DieselProductRepository {
    fn find_all_by_id(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = products::table
            .filter(products::id.eq_any(ids))
            .select(ProductRow::as_select())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn update_quantity(&self, updates: Vec<StockUpdate>) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        // Every update is a compare-and-swap on the quantity observed at
        // validation time. A stale guard means a concurrent decrement won
        // the race; the whole batch rolls back.
        conn.transaction::<_, DomainError, _>(|conn| {
            for update in updates {
                let changed = diesel::update(
                    products::table.filter(
                        products::id
                            .eq(update.product_id)
                            .and(products::quantity.eq(update.previous_quantity)),
                    ),
                )
                .set((
                    products::quantity.eq(update.quantity),
                    products::updated_at.eq(diesel::dsl::now),
                ))
                .execute(conn)?;

                if changed == 0 {
                    return Err(DomainError::StockConflict(update.product_id));
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::DieselProductRepository;
    use crate::domain::errors::DomainError;
    use crate::domain::order::StockUpdate;
    use crate::domain::ports::ProductRepository;
    use crate::infrastructure::test_support::{insert_product, setup_db};

    #[tokio::test]
    async fn find_all_by_id_returns_only_known_products() {
        let (_container, pool) = setup_db().await;
        let keyboard = insert_product(&pool, "keyboard", "5.00", 10);
        let monitor = insert_product(&pool, "monitor", "20.00", 3);

        let repo = DieselProductRepository::new(pool);
        let found = repo
            .find_all_by_id(&[keyboard, monitor, Uuid::new_v4()])
            .expect("lookup failed");

        assert_eq!(found.len(), 2);
        let mut ids: Vec<Uuid> = found.iter().map(|p| p.id).collect();
        ids.sort();
        let mut expected = vec![keyboard, monitor];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn update_quantity_applies_new_stock_levels() {
        let (_container, pool) = setup_db().await;
        let keyboard = insert_product(&pool, "keyboard", "5.00", 10);

        let repo = DieselProductRepository::new(pool);
        repo.update_quantity(vec![StockUpdate {
            product_id: keyboard,
            previous_quantity: 10,
            quantity: 8,
        }])
        .expect("update failed");

        let found = repo.find_all_by_id(&[keyboard]).expect("lookup failed");
        assert_eq!(found[0].quantity, 8);
    }

    #[tokio::test]
    async fn stale_guard_fails_and_rolls_back_the_whole_batch() {
        let (_container, pool) = setup_db().await;
        let keyboard = insert_product(&pool, "keyboard", "5.00", 10);
        let monitor = insert_product(&pool, "monitor", "20.00", 3);

        let repo = DieselProductRepository::new(pool);
        let result = repo.update_quantity(vec![
            StockUpdate {
                product_id: keyboard,
                previous_quantity: 10,
                quantity: 8,
            },
            StockUpdate {
                product_id: monitor,
                // Stale: the row holds 3.
                previous_quantity: 5,
                quantity: 2,
            },
        ]);

        match result {
            Err(DomainError::StockConflict(id)) => assert_eq!(id, monitor),
            other => panic!("expected StockConflict, got {:?}", other),
        }

        // The keyboard update in the same batch must have rolled back.
        let found = repo
            .find_all_by_id(&[keyboard, monitor])
            .expect("lookup failed");
        for product in found {
            if product.id == keyboard {
                assert_eq!(product.quantity, 10);
            } else {
                assert_eq!(product.quantity, 3);
            }
        }
    }
}
