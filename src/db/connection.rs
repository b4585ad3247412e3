use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{debug, warn};

use super::fetch_products;
use crate::models::Product;

/// The store the UI reads from at startup.
pub struct OpenedCatalog {
    pub conn: Connection,
    pub products: Vec<Product>,
    /// `false` when the on-disk store could not be opened and `conn` is an
    /// empty in-memory fallback. Seeding is pointless in that case.
    pub persistent: bool,
}

/// Open the on-disk catalog for the UI. A store that cannot be opened
/// degrades to an empty in-memory catalog, and a failed read to an empty
/// product list; both are logged and the session carries on. Only a failure
/// to build the in-memory fallback is returned.
pub fn open_catalog(db_path: &Path) -> Result<OpenedCatalog> {
    let conn = match ensure_schema(db_path) {
        Ok(conn) => conn,
        Err(err) => {
            warn!(
                path = %db_path.display(),
                error = %format!("{err:#}"),
                "product store unavailable, using an empty catalog"
            );
            let conn = Connection::open_in_memory().context("failed to open in-memory store")?;
            create_schema(&conn)?;
            return Ok(OpenedCatalog {
                conn,
                products: Vec::new(),
                persistent: false,
            });
        }
    };

    let products = fetch_products(&conn).unwrap_or_else(|err| {
        warn!(error = %format!("{err:#}"), "failed to read the catalog, starting empty");
        Vec::new()
    });

    Ok(OpenedCatalog {
        conn,
        products,
        persistent: true,
    })
}

/// Ensure the database file exists, run lazy migrations, and return a live
/// connection.
pub fn ensure_schema(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(db_path).context("failed to open SQLite database")?;
    create_schema(&conn)?;
    debug!(path = %db_path.display(), "product store ready");

    Ok(conn)
}

/// Create the catalog table on an already-open connection. Split out from
/// [`ensure_schema`] so in-memory stores get the exact same DDL.
pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            price REAL NOT NULL CHECK (price >= 0),
            image_ref TEXT NOT NULL,
            stock INTEGER NOT NULL CHECK (stock >= 0)
        )",
        [],
    )
    .context("failed to create products table")?;

    Ok(())
}
