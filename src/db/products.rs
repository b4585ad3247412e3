use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

use super::StoreError;
use crate::models::Product;

const PRODUCT_COLUMNS: &str = "id, name, description, category, price, image_ref, stock";

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        price: row.get(4)?,
        image_ref: row.get(5)?,
        stock: row.get(6)?,
    })
}

/// Retrieve the whole catalog grouped by category. An empty result is normal
/// while the first-launch seeding is still running.
pub fn fetch_products(conn: &Connection) -> Result<Vec<Product>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             ORDER BY category COLLATE NOCASE, name COLLATE NOCASE"
        ))
        .context("failed to prepare product query")?;

    let products = stmt
        .query_map([], product_from_row)
        .context("failed to load products")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect products")?;

    Ok(products)
}

/// Look up a single product for the detail screen.
pub fn fetch_product(conn: &Connection, id: i64) -> Result<Option<Product>> {
    find_product(conn, id).context("failed to load product")
}

/// Read one row by primary key. The seeder uses this as its idempotency check.
pub fn find_product(conn: &Connection, id: i64) -> Result<Option<Product>, StoreError> {
    conn.query_row(
        &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
        params![id],
        product_from_row,
    )
    .optional()
    .map_err(StoreError::unavailable("looking up a product"))
}

/// Insert a batch of products in one IMMEDIATE transaction. Rows whose id is
/// already present are skipped, so concurrent or repeated batches never fail
/// on duplicates. Any other constraint failure aborts and rolls back the whole
/// batch. Returns the number of rows that were actually written.
pub fn insert_products(conn: &mut Connection, products: &[Product]) -> Result<usize, StoreError> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(StoreError::unavailable("starting the product batch"))?;

    let mut inserted = 0;
    {
        let mut stmt = tx
            .prepare(&format!(
                "INSERT INTO products ({PRODUCT_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO NOTHING"
            ))
            .map_err(StoreError::unavailable("preparing the product batch"))?;

        for product in products {
            inserted += stmt
                .execute(params![
                    product.id,
                    product.name,
                    product.description,
                    product.category,
                    product.price,
                    product.image_ref,
                    product.stock,
                ])
                .map_err(StoreError::unavailable("inserting a product"))?;
        }
    }

    tx.commit()
        .map_err(StoreError::unavailable("committing the product batch"))?;
    Ok(inserted)
}
