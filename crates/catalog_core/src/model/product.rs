//! Product records.
//!
//! Prices are exact decimals. They are persisted as canonical decimal text so
//! that scale survives a round-trip (`180.50` stays `180.50`).

use super::category::CategoryId;
use super::{is_blank, ValidationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Store-assigned product identifier.
pub type ProductId = i64;

/// Product that has not been persisted yet.
///
/// The owning category is supplied at save time, either by id or by saving
/// the draft together with a new category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.name) {
            return Err(ValidationError::EmptyProductName);
        }
        Ok(())
    }
}

/// Persisted product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub category_id: CategoryId,
}

impl Product {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.name) {
            return Err(ValidationError::EmptyProductName);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{NewProduct, Product};
    use crate::model::ValidationError;
    use rust_decimal::Decimal;

    #[test]
    fn blank_name_is_rejected() {
        let draft = NewProduct::new("", Decimal::new(120099, 2));
        assert_eq!(draft.validate(), Err(ValidationError::EmptyProductName));
    }

    #[test]
    fn price_serializes_as_exact_string() {
        let product = Product {
            id: 7,
            name: "Laptop".to_string(),
            price: Decimal::new(120099, 2),
            category_id: 1,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["price"], "1200.99");
    }
}
