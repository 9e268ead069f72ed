use crate::entities::{prelude::*, products};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use tracing::info;

/// Repository for product records
pub struct ProductRepository {
    conn: DatabaseConnection,
}

impl ProductRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(&self, owner: i32, input: &ProductInput) -> Result<Product> {
        let active_model = products::ActiveModel {
            name: Set(input.name.clone()),
            price: Set(input.price),
            description: Set(input.description.clone()),
            owner: Set(owner),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert product")?;

        info!("Added product {} for user {}", model.id, owner);
        Ok(Product::from(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Product>> {
        let result = Products::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query product by ID")?;

        Ok(result.map(Product::from))
    }

    pub async fn list_all(&self) -> Result<Vec<Product>> {
        let rows = Products::find()
            .order_by_asc(products::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list products")?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    pub async fn list_for_owner(&self, owner: i32) -> Result<Vec<Product>> {
        let rows = Products::find()
            .filter(products::Column::Owner.eq(owner))
            .order_by_asc(products::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list products for owner")?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Overwrites name, price and description. Returns whether a row matched.
    pub async fn update(&self, id: i32, input: &ProductInput) -> Result<bool> {
        let result = Products::update_many()
            .col_expr(products::Column::Name, Expr::value(input.name.clone()))
            .col_expr(products::Column::Price, Expr::value(input.price))
            .col_expr(
                products::Column::Description,
                Expr::value(input.description.clone()),
            )
            .filter(products::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to update product")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Products::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete product")?;

        Ok(result.rows_affected > 0)
    }
}

// ============================================================================
// Data Types
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub owner: i32,
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            description: model.description,
            owner: model.owner,
        }
    }
}

/// Validated field values for creating or editing a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub name: String,
    pub price: f64,
    pub description: String,
}
