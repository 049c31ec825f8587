//! Scripted create/read/update/delete session.
//!
//! Runs the four catalog operations in order against a `CatalogService` and
//! writes one human-readable report per step.
//!
//! # Invariants
//! - A failed create is reported and the session continues.
//! - Read, update and delete failures abort the session with an error.

use crate::model::category::{CategoryRecord, NewCategory};
use crate::model::product::{NewProduct, Product};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::product_repo::ProductRepository;
use crate::repo::RepoError;
use crate::service::catalog_service::CatalogService;
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;

pub const CREATE_CATEGORY_NAME: &str = "Electronics";
pub const CREATE_PRODUCT_NAME: &str = "Laptop";
pub const UPDATE_PRODUCT_NAME: &str = "Microwave";
pub const DELETE_CATEGORY_NAME: &str = "Appliances";

/// 1200.99
pub fn create_product_price() -> Decimal {
    Decimal::new(120_099, 2)
}

/// 180.50
pub fn update_product_price() -> Decimal {
    Decimal::new(18_050, 2)
}

/// Outcome of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkthroughReport {
    /// Message of the caught create failure, if any.
    pub create_error: Option<String>,
    /// Catalog as read in the read step.
    pub catalog: Vec<CategoryRecord>,
    pub updated: Option<Product>,
    pub deleted: Option<CategoryRecord>,
}

/// Fatal session failure.
#[derive(Debug)]
pub enum WalkthroughError {
    Repo(RepoError),
    Io(std::io::Error),
}

impl Display for WalkthroughError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "failed to write report: {err}"),
        }
    }
}

impl Error for WalkthroughError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<RepoError> for WalkthroughError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<std::io::Error> for WalkthroughError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Runs create, read, update and delete in sequence, reporting to `out`.
pub fn run_walkthrough<C, P, W>(
    service: &CatalogService<C, P>,
    out: &mut W,
) -> Result<WalkthroughReport, WalkthroughError>
where
    C: CategoryRepository,
    P: ProductRepository,
    W: Write,
{
    let mut report = WalkthroughReport::default();

    writeln!(out, "=== CREATE ===")?;
    let category = NewCategory::new(CREATE_CATEGORY_NAME);
    let products = [NewProduct::new(CREATE_PRODUCT_NAME, create_product_price())];
    match service.create_category_with_products(&category, &products) {
        Ok(_) => writeln!(out, "Category and product created successfully!")?,
        Err(err) => {
            writeln!(out, "Error during CREATE: {err}")?;
            report.create_error = Some(err.to_string());
        }
    }

    writeln!(out, "\n=== READ ===")?;
    report.catalog = service.read_catalog()?;
    for record in &report.catalog {
        writeln!(out, "Category: {}", record.category.name)?;
        for product in record.products() {
            writeln!(out, "  Product: {} - {}", product.name, product.price)?;
        }
    }

    writeln!(out, "\n=== UPDATE ===")?;
    report.updated =
        service.update_first_product_price(UPDATE_PRODUCT_NAME, update_product_price())?;
    if report.updated.is_some() {
        writeln!(out, "Product price updated!")?;
    }

    writeln!(out, "\n=== DELETE ===")?;
    report.deleted = service.delete_first_category(DELETE_CATEGORY_NAME)?;
    if report.deleted.is_some() {
        writeln!(out, "Category and its products deleted!")?;
    }

    Ok(report)
}
