//! Catalog domain model: categories and the products they own.
//!
//! # Responsibility
//! - Define plain records returned by repositories (no lazy loading, no
//!   change tracking).
//! - Define in-memory drafts used before the store assigns identifiers.
//!
//! # Invariants
//! - Every `Product` belongs to exactly one `Category` via `category_id`.
//! - Names are required and must not be blank.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category;
pub mod product;

/// Validation failures raised before any SQL mutation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyCategoryName,
    EmptyProductName,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCategoryName => write!(f, "category name must not be empty"),
            Self::EmptyProductName => write!(f, "product name must not be empty"),
        }
    }
}

impl Error for ValidationError {}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
