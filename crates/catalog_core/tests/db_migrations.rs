use catalog_core::db::migrations::latest_version;
use catalog_core::db::{open_configured, open_db, open_db_in_memory, DbError};
use catalog_core::DatabaseConfig;
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "category");
    assert_table_exists(&conn, "product");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "product");
}

#[test]
fn configured_file_path_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("configured.db");
    let config = DatabaseConfig {
        path: path.to_str().unwrap().to_string(),
    };

    let conn = open_configured(&config).unwrap();
    drop(conn);
    assert!(path.exists());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn product_foreign_key_cascades_on_category_delete() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO category (name) VALUES ('Appliances');", [])
        .unwrap();
    let category_id = conn.last_insert_rowid();
    conn.execute(
        "INSERT INTO product (name, price, category_id) VALUES ('Microwave', '150.00', ?1);",
        [category_id],
    )
    .unwrap();

    conn.execute("DELETE FROM category WHERE id = ?1;", [category_id])
        .unwrap();

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM product;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}

#[test]
fn orphan_product_is_rejected_by_store() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO product (name, price, category_id) VALUES ('Ghost', '1.00', 42);",
        [],
    );
    assert!(result.is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
