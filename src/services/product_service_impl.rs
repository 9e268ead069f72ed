//! `SeaORM` implementation of the `ProductService` trait.

use crate::db::{Product, Store};
use crate::services::product_service::{ProductError, ProductFields, ProductService};
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmProductService {
    store: Store,
}

impl SeaOrmProductService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn record_mutation(action: &'static str) {
    metrics::counter!("product_mutations_total", "action" => action).increment(1);
}

#[async_trait]
impl ProductService for SeaOrmProductService {
    async fn list_all(&self) -> Result<Vec<Product>, ProductError> {
        Ok(self.store.list_products().await?)
    }

    async fn list_for_owner(&self, owner: i32) -> Result<Vec<Product>, ProductError> {
        Ok(self.store.list_products_for_owner(owner).await?)
    }

    async fn get(&self, id: i32) -> Result<Option<Product>, ProductError> {
        Ok(self.store.get_product(id).await?)
    }

    async fn create(&self, owner: i32, fields: &ProductFields) -> Result<Product, ProductError> {
        let input = fields.validate()?;
        let product = self.store.add_product(owner, &input).await?;
        record_mutation("create");
        Ok(product)
    }

    async fn update(&self, id: i32, fields: &ProductFields) -> Result<bool, ProductError> {
        let input = fields.validate()?;
        let updated = self.store.update_product(id, &input).await?;
        if updated {
            record_mutation("update");
            info!(product_id = id, "Updated product");
        }
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> Result<bool, ProductError> {
        let deleted = self.store.remove_product(id).await?;
        if deleted {
            record_mutation("delete");
            info!(product_id = id, "Deleted product");
        }
        Ok(deleted)
    }
}
