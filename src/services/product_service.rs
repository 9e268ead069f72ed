//! Domain service for product records.

use serde::Deserialize;
use thiserror::Error;

use crate::db::{Product, ProductInput};

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Please fill out all fields")]
    MissingFields,

    #[error("Price must be a number")]
    InvalidPrice,

    #[error("Database error: {0}")]
    Database(String),
}

impl ProductError {
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::MissingFields | Self::InvalidPrice)
    }
}

impl From<sea_orm::DbErr> for ProductError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ProductError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

/// Raw add/edit form submission. Every field is optional so that a missing
/// input reaches validation instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFields {
    pub name: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
}

impl ProductFields {
    /// Presence check on all three fields, then a numeric parse of the price.
    ///
    /// Values are not trimmed: a field is missing only when absent or empty.
    pub fn validate(&self) -> Result<ProductInput, ProductError> {
        let (Some(name), Some(price), Some(description)) = (
            non_empty(self.name.as_deref()),
            non_empty(self.price.as_deref()),
            non_empty(self.description.as_deref()),
        ) else {
            return Err(ProductError::MissingFields);
        };

        let price = price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or(ProductError::InvalidPrice)?;

        Ok(ProductInput {
            name: name.to_string(),
            price,
            description: description.to_string(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[async_trait::async_trait]
pub trait ProductService: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Product>, ProductError>;

    async fn list_for_owner(&self, owner: i32) -> Result<Vec<Product>, ProductError>;

    async fn get(&self, id: i32) -> Result<Option<Product>, ProductError>;

    /// Validates `fields` and inserts a product owned by `owner`.
    async fn create(&self, owner: i32, fields: &ProductFields) -> Result<Product, ProductError>;

    /// Validates `fields` and overwrites product `id`.
    ///
    /// Returns `false` when no product has that id; that is not an error.
    async fn update(&self, id: i32, fields: &ProductFields) -> Result<bool, ProductError>;

    /// Deletes product `id`. Returns `false` when it did not exist.
    async fn delete(&self, id: i32) -> Result<bool, ProductError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, price: &str, description: &str) -> ProductFields {
        ProductFields {
            name: Some(name.to_string()),
            price: Some(price.to_string()),
            description: Some(description.to_string()),
        }
    }

    #[test]
    fn test_validate_accepts_complete_form() {
        let input = fields("Widget", "9.99", "A widget").validate().unwrap();
        assert_eq!(input.name, "Widget");
        assert!((input.price - 9.99).abs() < f64::EPSILON);
        assert_eq!(input.description, "A widget");
    }

    #[test]
    fn test_validate_rejects_empty_or_missing_fields() {
        assert!(matches!(
            fields("Widget", "9.99", "").validate(),
            Err(ProductError::MissingFields)
        ));
        assert!(matches!(
            fields("", "9.99", "A widget").validate(),
            Err(ProductError::MissingFields)
        ));

        let missing_price = ProductFields {
            price: None,
            ..fields("Widget", "1", "A widget")
        };
        assert!(matches!(
            missing_price.validate(),
            Err(ProductError::MissingFields)
        ));
    }

    #[test]
    fn test_validate_rejects_non_numeric_price() {
        assert!(matches!(
            fields("Widget", "cheap", "A widget").validate(),
            Err(ProductError::InvalidPrice)
        ));
        assert!(matches!(
            fields("Widget", "NaN", "A widget").validate(),
            Err(ProductError::InvalidPrice)
        ));
    }

    #[test]
    fn test_whitespace_counts_as_present() {
        let input = fields(" ", " 3 ", " ").validate().unwrap();
        assert_eq!(input.name, " ");
        assert!((input.price - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_user_facing_classification() {
        assert!(ProductError::MissingFields.is_user_facing());
        assert!(ProductError::InvalidPrice.is_user_facing());
        assert!(!ProductError::Database("boom".into()).is_user_facing());
    }
}
