//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. They stay light-weight data holders so other layers can focus on
//! presentation and persistence logic.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
/// A gaming peripheral listed in the storefront catalog.
pub struct Product {
    /// Primary key from the database. Seeded rows use fixed ids so the seeding
    /// marker stays stable across runs.
    pub id: i64,
    /// Name shown in the catalog list.
    pub name: String,
    /// Longer blurb rendered on the detail screen.
    pub description: String,
    /// Grouping key used for catalog ordering (e.g. "Keyboards").
    pub category: String,
    /// Unit price. The schema rejects negative values.
    pub price: f64,
    /// Identifier of a bundled image asset, not a URL.
    pub image_ref: String,
    /// Units on hand.
    pub stock: i64,
}

impl Product {
    /// Format the price the way the catalog and detail views display it.
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
