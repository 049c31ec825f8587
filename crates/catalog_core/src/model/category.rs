//! Category records.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused.
//! - `CategoryRecord::products` is `None` when the caller did not ask for
//!   products, and `Some(..)` (possibly empty) when they were loaded.

use super::product::Product;
use super::{is_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned category identifier.
pub type CategoryId = i64;

/// Category that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Checks the draft before it is written.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.name) {
            return Err(ValidationError::EmptyCategoryName);
        }
        Ok(())
    }
}

/// Persisted category row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.name) {
            return Err(ValidationError::EmptyCategoryName);
        }
        Ok(())
    }
}

/// Read model pairing a category with its eagerly loaded products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub category: Category,
    /// Products ordered by ascending id, when requested.
    pub products: Option<Vec<Product>>,
}

impl CategoryRecord {
    /// Returns loaded products, or an empty slice when they were not requested.
    pub fn products(&self) -> &[Product] {
        self.products.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, CategoryRecord, NewCategory};
    use crate::model::ValidationError;

    #[test]
    fn blank_name_is_rejected() {
        assert_eq!(
            NewCategory::new("   ").validate(),
            Err(ValidationError::EmptyCategoryName)
        );
        assert!(NewCategory::new("Electronics").validate().is_ok());
    }

    #[test]
    fn products_accessor_handles_unloaded_relation() {
        let record = CategoryRecord {
            category: Category {
                id: 1,
                name: "Electronics".to_string(),
            },
            products: None,
        };
        assert!(record.products().is_empty());
    }
}
