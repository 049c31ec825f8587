//! Category repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `category` table.
//! - Own the category/product aggregate writes: creating a category together
//!   with its products, and deleting a category together with its products.
//!
//! # Invariants
//! - Aggregate writes run in one transaction; a failure leaves no partial rows.
//! - Deleting a category removes its products explicitly inside the same
//!   transaction, in addition to the schema's `ON DELETE CASCADE`.
//! - Products are loaded only when `include_products` is set.

use super::product_repo::{insert_product, load_products_for_category};
use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::model::category::{Category, CategoryId, CategoryRecord, NewCategory};
use crate::model::product::NewProduct;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT
    id,
    name
FROM category";

/// Query options for listing categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryListQuery {
    /// Eagerly load each category's products.
    pub include_products: bool,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl CategoryListQuery {
    /// All categories, each with its products.
    pub fn with_products() -> Self {
        Self {
            include_products: true,
            ..Self::default()
        }
    }
}

/// Repository interface for category operations.
pub trait CategoryRepository {
    fn create_category(&self, draft: &NewCategory) -> RepoResult<Category>;
    /// Saves a new category and its products in one transaction.
    fn create_category_with_products(
        &self,
        draft: &NewCategory,
        products: &[NewProduct],
    ) -> RepoResult<CategoryRecord>;
    fn get_category(&self, id: CategoryId, include_products: bool)
        -> RepoResult<Option<CategoryRecord>>;
    /// Lists categories ordered by ascending id.
    fn list_categories(&self, query: &CategoryListQuery) -> RepoResult<Vec<CategoryRecord>>;
    /// Returns the lowest-id category whose name equals `name` exactly.
    fn find_first_category_by_name(
        &self,
        name: &str,
        include_products: bool,
    ) -> RepoResult<Option<CategoryRecord>>;
    fn rename_category(&self, category: &Category) -> RepoResult<()>;
    /// Deletes a category and its products; returns the number of products removed.
    fn delete_category(&self, id: CategoryId) -> RepoResult<usize>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn to_record(&self, category: Category, include_products: bool) -> RepoResult<CategoryRecord> {
        let products = if include_products {
            Some(load_products_for_category(self.conn, category.id)?)
        } else {
            None
        };
        Ok(CategoryRecord { category, products })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&self, draft: &NewCategory) -> RepoResult<Category> {
        draft.validate()?;
        insert_category(self.conn, draft)
    }

    fn create_category_with_products(
        &self,
        draft: &NewCategory,
        products: &[NewProduct],
    ) -> RepoResult<CategoryRecord> {
        draft.validate()?;
        for product in products {
            product.validate()?;
        }

        // Rolls back on drop if any insert fails.
        let tx = self.conn.unchecked_transaction()?;
        let category = insert_category(&tx, draft)?;
        let mut saved = Vec::with_capacity(products.len());
        for product in products {
            saved.push(insert_product(&tx, category.id, product)?);
        }
        tx.commit()?;

        Ok(CategoryRecord {
            category,
            products: Some(saved),
        })
    }

    fn get_category(
        &self,
        id: CategoryId,
        include_products: bool,
    ) -> RepoResult<Option<CategoryRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            let category = parse_category_row(row)?;
            return Ok(Some(self.to_record(category, include_products)?));
        }
        Ok(None)
    }

    fn list_categories(&self, query: &CategoryListQuery) -> RepoResult<Vec<CategoryRecord>> {
        let mut sql = format!("{CATEGORY_SELECT_SQL} ORDER BY id ASC");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }

        categories
            .into_iter()
            .map(|category| self.to_record(category, query.include_products))
            .collect()
    }

    fn find_first_category_by_name(
        &self,
        name: &str,
        include_products: bool,
    ) -> RepoResult<Option<CategoryRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL}
             WHERE name = ?1
             ORDER BY id ASC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            let category = parse_category_row(row)?;
            return Ok(Some(self.to_record(category, include_products)?));
        }
        Ok(None)
    }

    fn rename_category(&self, category: &Category) -> RepoResult<()> {
        category.validate()?;

        let changed = self.conn.execute(
            "UPDATE category SET name = ?1 WHERE id = ?2;",
            params![category.name.as_str(), category.id],
        )?;
        if changed == 0 {
            return Err(RepoError::CategoryNotFound(category.id));
        }
        Ok(())
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let removed_products = tx.execute("DELETE FROM product WHERE category_id = ?1;", [id])?;
        let changed = tx.execute("DELETE FROM category WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::CategoryNotFound(id));
        }
        tx.commit()?;
        Ok(removed_products)
    }
}

fn insert_category(conn: &Connection, draft: &NewCategory) -> RepoResult<Category> {
    conn.execute(
        "INSERT INTO category (name) VALUES (?1);",
        [draft.name.as_str()],
    )?;
    Ok(Category {
        id: conn.last_insert_rowid(),
        name: draft.name.clone(),
    })
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let category = Category {
        id: row.get("id")?,
        name: row.get("name")?,
    };
    category.validate()?;
    Ok(category)
}
