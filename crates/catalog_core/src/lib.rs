//! Category/product data-access layer over SQLite.
//! Repositories return plain records; related rows are loaded on request.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod walkthrough;

pub use config::{CatalogConfig, ConfigError, DatabaseConfig, LoggingConfig};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status, LogSink};
pub use model::category::{Category, CategoryId, CategoryRecord, NewCategory};
pub use model::product::{NewProduct, Product, ProductId};
pub use model::ValidationError;
pub use repo::category_repo::{CategoryListQuery, CategoryRepository, SqliteCategoryRepository};
pub use repo::product_repo::{ProductRepository, SqliteProductRepository};
pub use repo::{RepoError, RepoResult};
pub use rust_decimal::Decimal;
pub use service::catalog_service::CatalogService;
pub use walkthrough::{run_walkthrough, WalkthroughError, WalkthroughReport};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
