//! Core library surface for the Peripheral Store TUI.
//!
//! The storefront has two moving parts: a one-time seeding of the SQLite
//! catalog and a navigator that moves the user between a closed set of
//! screens. Both are exposed here so the binary and the integration tests use
//! the same pieces.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod nav;
pub mod seed;
pub mod ui;

/// Convenience re-exports for the persistence layer.
pub use db::{ensure_schema, fetch_products, open_catalog, StoreError};

pub use config::AppConfig;
pub use models::Product;
pub use nav::{BackStackUnderflow, Destination, NavError, Navigator, Route, RouteArgs};
pub use seed::{ensure_seeded, SeedOutcome, SeedTask};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
