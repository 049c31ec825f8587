//! Product repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `product` table.
//! - Own the row mapping shared with category reads that load products.
//!
//! # Invariants
//! - A product is only inserted or re-parented under an existing category.
//! - "First" lookups resolve to the lowest `id` among matches.

use super::{ensure_connection_ready, parse_price, price_to_db, RepoError, RepoResult};
use crate::model::category::CategoryId;
use crate::model::product::{NewProduct, Product, ProductId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    price,
    category_id
FROM product";

/// Repository interface for product operations.
pub trait ProductRepository {
    /// Inserts a product under `category_id` and returns the stored row.
    fn create_product(&self, category_id: CategoryId, draft: &NewProduct) -> RepoResult<Product>;
    fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>>;
    /// Lists products of one category ordered by ascending id.
    fn list_products_for_category(&self, category_id: CategoryId) -> RepoResult<Vec<Product>>;
    /// Returns the lowest-id product whose name equals `name` exactly.
    fn find_first_product_by_name(&self, name: &str) -> RepoResult<Option<Product>>;
    /// Persists all mutable fields of an existing product.
    ///
    /// The target `category_id` must name an existing category, whether or
    /// not the connection enforces foreign keys.
    fn update_product(&self, product: &Product) -> RepoResult<()>;
    fn delete_product(&self, id: ProductId) -> RepoResult<()>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn create_product(&self, category_id: CategoryId, draft: &NewProduct) -> RepoResult<Product> {
        draft.validate()?;
        if !category_exists(self.conn, category_id)? {
            return Err(RepoError::CategoryNotFound(category_id));
        }
        insert_product(self.conn, category_id, draft)
    }

    fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }
        Ok(None)
    }

    fn list_products_for_category(&self, category_id: CategoryId) -> RepoResult<Vec<Product>> {
        load_products_for_category(self.conn, category_id)
    }

    fn find_first_product_by_name(&self, name: &str) -> RepoResult<Option<Product>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PRODUCT_SELECT_SQL}
             WHERE name = ?1
             ORDER BY id ASC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }
        Ok(None)
    }

    fn update_product(&self, product: &Product) -> RepoResult<()> {
        product.validate()?;
        if !category_exists(self.conn, product.category_id)? {
            return Err(RepoError::CategoryNotFound(product.category_id));
        }

        let changed = self.conn.execute(
            "UPDATE product
             SET
                name = ?1,
                price = ?2,
                category_id = ?3
             WHERE id = ?4;",
            params![
                product.name.as_str(),
                price_to_db(product.price),
                product.category_id,
                product.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::ProductNotFound(product.id));
        }

        Ok(())
    }

    fn delete_product(&self, id: ProductId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM product WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::ProductNotFound(id));
        }
        Ok(())
    }
}

/// Inserts one product row. `draft` must already be validated.
///
/// Takes a plain connection so it can run inside a caller's transaction.
pub(crate) fn insert_product(
    conn: &Connection,
    category_id: CategoryId,
    draft: &NewProduct,
) -> RepoResult<Product> {
    conn.execute(
        "INSERT INTO product (name, price, category_id) VALUES (?1, ?2, ?3);",
        params![draft.name.as_str(), price_to_db(draft.price), category_id],
    )?;

    Ok(Product {
        id: conn.last_insert_rowid(),
        name: draft.name.clone(),
        price: draft.price,
        category_id,
    })
}

pub(crate) fn load_products_for_category(
    conn: &Connection,
    category_id: CategoryId,
) -> RepoResult<Vec<Product>> {
    let mut stmt = conn.prepare(&format!(
        "{PRODUCT_SELECT_SQL}
         WHERE category_id = ?1
         ORDER BY id ASC;"
    ))?;
    let mut rows = stmt.query([category_id])?;
    let mut products = Vec::new();
    while let Some(row) = rows.next()? {
        products.push(parse_product_row(row)?);
    }
    Ok(products)
}

fn category_exists(conn: &Connection, category_id: CategoryId) -> RepoResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM category WHERE id = ?1;",
            [category_id],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let price_text: String = row.get("price")?;
    let product = Product {
        id: row.get("id")?,
        name: row.get("name")?,
        price: parse_price(&price_text)?,
        category_id: row.get("category_id")?,
    };
    product.validate()?;
    Ok(product)
}
