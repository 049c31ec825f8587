//! Catalog use-case service.
//!
//! # Responsibility
//! - Provide the create/read/update/delete entry points used by callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Update and delete act on the first match by name (lowest id) and are
//!   no-ops returning `None` when nothing matches.

use crate::model::category::{CategoryRecord, NewCategory};
use crate::model::product::{NewProduct, Product};
use crate::repo::category_repo::{CategoryListQuery, CategoryRepository};
use crate::repo::product_repo::ProductRepository;
use crate::repo::RepoResult;
use log::{debug, info, warn};
use rust_decimal::Decimal;

/// Use-case service over category and product repositories.
pub struct CatalogService<C: CategoryRepository, P: ProductRepository> {
    categories: C,
    products: P,
}

impl<C: CategoryRepository, P: ProductRepository> CatalogService<C, P> {
    pub fn new(categories: C, products: P) -> Self {
        Self {
            categories,
            products,
        }
    }

    /// Saves a new category and its products atomically.
    ///
    /// On error nothing is written.
    pub fn create_category_with_products(
        &self,
        category: &NewCategory,
        products: &[NewProduct],
    ) -> RepoResult<CategoryRecord> {
        match self
            .categories
            .create_category_with_products(category, products)
        {
            Ok(record) => {
                info!(
                    "event=catalog_create module=service status=ok category_id={} product_count={}",
                    record.category.id,
                    record.products().len()
                );
                Ok(record)
            }
            Err(err) => {
                warn!(
                    "event=catalog_create module=service status=error product_count={} error={}",
                    products.len(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Reads every category with its products eagerly loaded.
    pub fn read_catalog(&self) -> RepoResult<Vec<CategoryRecord>> {
        self.list_categories(&CategoryListQuery::with_products())
    }

    pub fn list_categories(&self, query: &CategoryListQuery) -> RepoResult<Vec<CategoryRecord>> {
        let records = self.categories.list_categories(query)?;
        debug!(
            "event=catalog_read module=service status=ok category_count={} include_products={}",
            records.len(),
            query.include_products
        );
        Ok(records)
    }

    /// Sets the price of the first product named `name`.
    ///
    /// Returns the updated product, or `None` when no product has that name.
    pub fn update_first_product_price(
        &self,
        name: &str,
        price: Decimal,
    ) -> RepoResult<Option<Product>> {
        let Some(mut product) = self.products.find_first_product_by_name(name)? else {
            debug!("event=catalog_update module=service status=skipped reason=not_found");
            return Ok(None);
        };

        product.price = price;
        self.products.update_product(&product)?;
        info!(
            "event=catalog_update module=service status=ok product_id={}",
            product.id
        );
        Ok(Some(product))
    }

    /// Deletes the first category named `name` together with its products.
    ///
    /// Returns the removed category with the products it owned, or `None`
    /// when no category has that name.
    pub fn delete_first_category(&self, name: &str) -> RepoResult<Option<CategoryRecord>> {
        let Some(record) = self.categories.find_first_category_by_name(name, true)? else {
            debug!("event=catalog_delete module=service status=skipped reason=not_found");
            return Ok(None);
        };

        let removed_products = self.categories.delete_category(record.category.id)?;
        info!(
            "event=catalog_delete module=service status=ok category_id={} removed_products={}",
            record.category.id, removed_products
        );
        Ok(Some(record))
    }
}
