//! First-launch population of the catalog with a fixed set of sample
//! products.
//!
//! The store is always passed in explicitly. Seeding is idempotent: the
//! presence of product [`SEED_MARKER_ID`] means a previous run already wrote
//! the whole catalog, and the batch itself is a single transaction so that
//! marker can never exist without the rest of the rows.

use std::path::PathBuf;

use rusqlite::Connection;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

use crate::db::{self, StoreError};
use crate::models::Product;

/// Id of the product whose presence marks the store as seeded.
pub const SEED_MARKER_ID: i64 = 1;

/// The two store operations seeding depends on.
pub trait ProductStore {
    fn find_product(&self, id: i64) -> Result<Option<Product>, StoreError>;
    fn insert_products(&mut self, products: &[Product]) -> Result<usize, StoreError>;
}

impl ProductStore for Connection {
    fn find_product(&self, id: i64) -> Result<Option<Product>, StoreError> {
        db::find_product(self, id)
    }

    fn insert_products(&mut self, products: &[Product]) -> Result<usize, StoreError> {
        db::insert_products(self, products)
    }
}

/// What a seeding pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The marker row was already present; nothing was written.
    AlreadySeeded,
    /// The batch ran. `inserted` counts rows that were new.
    Seeded { inserted: usize },
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error("seeding task did not complete: {0}")]
    Interrupted(#[from] JoinError),
}

/// Populate `store` with [`sample_products`] unless it has been seeded before.
pub fn ensure_seeded<S: ProductStore + ?Sized>(store: &mut S) -> Result<SeedOutcome, StoreError> {
    if store.find_product(SEED_MARKER_ID)?.is_some() {
        debug!("catalog already seeded");
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let inserted = store.insert_products(&sample_products())?;
    info!(inserted, "seeded sample catalog");
    Ok(SeedOutcome::Seeded { inserted })
}

/// Seeding running on the runtime's blocking pool with its own connection.
pub struct SeedTask {
    handle: JoinHandle<Result<SeedOutcome, StoreError>>,
}

impl SeedTask {
    /// Start seeding the store at `db_path` in the background.
    pub fn spawn(runtime: &Handle, db_path: PathBuf) -> Self {
        let handle = runtime.spawn_blocking(move || -> Result<SeedOutcome, StoreError> {
            let mut conn = Connection::open(&db_path)
                .map_err(StoreError::unavailable("opening the store for seeding"))?;
            ensure_seeded(&mut conn)
        });
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task and flatten its result.
    pub async fn wait(self) -> Result<SeedOutcome, SeedError> {
        Ok(self.handle.await??)
    }
}

/// Log the end of a seeding run. Failures only degrade the catalog to empty;
/// the next launch tries again.
pub fn report(result: &Result<SeedOutcome, SeedError>) {
    match result {
        Ok(SeedOutcome::AlreadySeeded) => debug!("seeding skipped"),
        Ok(SeedOutcome::Seeded { inserted }) => info!(inserted, "seeding finished"),
        Err(err) => warn!(error = %err, "seeding failed; catalog will be empty until next launch"),
    }
}

/// The fixed sample catalog written on first launch.
pub fn sample_products() -> Vec<Product> {
    let product = |id: i64,
                   name: &str,
                   description: &str,
                   category: &str,
                   price: f64,
                   image_ref: &str,
                   stock: i64| Product {
        id,
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        price,
        image_ref: image_ref.to_string(),
        stock,
    };

    vec![
        product(
            1,
            "Falcon RGB Mechanical Keyboard",
            "Full-size keyboard with hot-swappable red switches and per-key lighting.",
            "Keyboards",
            129.99,
            "keyboard_falcon",
            25,
        ),
        product(
            2,
            "Viper Pro Wireless Mouse",
            "Ultralight 58 g mouse with a 26k DPI optical sensor.",
            "Mice",
            89.99,
            "mouse_viper",
            40,
        ),
        product(
            3,
            "Nebula 7.1 Headset",
            "Closed-back headset with virtual surround sound and detachable mic.",
            "Audio",
            99.50,
            "headset_nebula",
            18,
        ),
        product(
            4,
            "Titan XL Mouse Pad",
            "Extended cloth pad with stitched edges, 900 x 400 mm.",
            "Accessories",
            24.99,
            "mousepad_titan",
            60,
        ),
        product(
            5,
            "Orbit Pro Controller",
            "Wireless controller with remappable back paddles and hall-effect sticks.",
            "Controllers",
            69.99,
            "controller_orbit",
            32,
        ),
        product(
            6,
            "Pulse 27\" 165 Hz Monitor",
            "27 inch QHD IPS panel with 1 ms response time.",
            "Monitors",
            329.00,
            "monitor_pulse",
            9,
        ),
        product(
            7,
            "Echo USB Microphone",
            "Cardioid condenser mic with tap-to-mute and live monitoring.",
            "Audio",
            74.90,
            "mic_echo",
            14,
        ),
        product(
            8,
            "Apex Streaming Webcam",
            "1080p60 webcam with auto-focus and a privacy shutter.",
            "Accessories",
            59.99,
            "webcam_apex",
            0,
        ),
    ]
}
