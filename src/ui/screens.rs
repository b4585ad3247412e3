use std::cmp::min;

use rusqlite::Connection;
use tracing::warn;

use super::helpers::surface_error;
use crate::db::fetch_product;
use crate::models::Product;
use crate::nav::{Destination, Route};

/// Screen-local state, rebuilt from scratch every time a destination becomes
/// current. Popping past a screen drops whatever it held.
pub(crate) enum Screen {
    Welcome,
    Home(MenuScreen),
    Catalog(CatalogScreen),
    Product(ProductScreen),
    Profile(ProfileScreen),
    Counter(CounterScreen),
    Greeting(GreetingForm),
}

impl Screen {
    /// Build fresh state for `destination`. Only the product detail view
    /// touches the store.
    pub(crate) fn for_destination(destination: &Destination, conn: &Connection) -> Self {
        match destination.route() {
            Route::Welcome => Screen::Welcome,
            Route::Home => Screen::Home(MenuScreen::default()),
            Route::Catalog => Screen::Catalog(CatalogScreen::default()),
            Route::ProductDetail => {
                Screen::Product(ProductScreen::load(conn, destination.int_arg("productId")))
            }
            Route::Profile => Screen::Profile(ProfileScreen {
                user_name: destination.text_arg("userName").to_string(),
            }),
            Route::Counter => Screen::Counter(CounterScreen::default()),
            Route::Greeting => Screen::Greeting(GreetingForm::default()),
        }
    }
}

/// Entries on the home menu and where they lead.
pub(crate) const HOME_MENU: &[(&str, fn() -> Destination)] = &[
    ("Browse catalog", Destination::catalog),
    ("Counter demo", Destination::counter),
    ("Greeting form", Destination::greeting),
    ("Guest profile", guest_profile),
];

fn guest_profile() -> Destination {
    Destination::profile("")
}

#[derive(Default)]
pub(crate) struct MenuScreen {
    pub(crate) selected: usize,
}

impl MenuScreen {
    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.selected = shift(self.selected, offset, HOME_MENU.len());
    }

    pub(crate) fn destination(&self) -> Option<Destination> {
        HOME_MENU.get(self.selected).map(|(_, build)| build())
    }
}

/// Selection over the catalog list. The products themselves live on the app
/// so a finished seeding run can refresh them in place.
#[derive(Default)]
pub(crate) struct CatalogScreen {
    pub(crate) selected: usize,
}

impl CatalogScreen {
    pub(crate) fn move_selection(&mut self, offset: isize, len: usize) {
        self.selected = shift(self.selected, offset, len);
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    pub(crate) fn ensure_in_bounds(&mut self, len: usize) {
        self.selected = min(self.selected, len.saturating_sub(1));
    }
}

pub(crate) struct ProductScreen {
    pub(crate) product_id: i64,
    pub(crate) product: Option<Product>,
    pub(crate) error: Option<String>,
}

impl ProductScreen {
    /// Look the product up. A failed query leaves the screen showing the
    /// error instead of tearing down the session.
    pub(crate) fn load(conn: &Connection, product_id: i64) -> Self {
        match fetch_product(conn, product_id) {
            Ok(product) => Self {
                product_id,
                product,
                error: None,
            },
            Err(err) => {
                warn!(product_id, error = %err, "failed to load product");
                Self {
                    product_id,
                    product: None,
                    error: Some(surface_error(&err)),
                }
            }
        }
    }
}

pub(crate) struct ProfileScreen {
    pub(crate) user_name: String,
}

impl ProfileScreen {
    pub(crate) fn display_name(&self) -> &str {
        let trimmed = self.user_name.trim();
        if trimmed.is_empty() {
            "Guest"
        } else {
            trimmed
        }
    }
}

#[derive(Default)]
pub(crate) struct CounterScreen {
    pub(crate) count: i64,
}

impl CounterScreen {
    pub(crate) fn increment(&mut self) {
        self.count += 1;
    }

    pub(crate) fn decrement(&mut self) {
        self.count -= 1;
    }

    pub(crate) fn reset(&mut self) {
        self.count = 0;
    }
}

/// Single text field asking for a name.
#[derive(Default)]
pub(crate) struct GreetingForm {
    pub(crate) name: String,
    pub(crate) error: Option<String>,
}

impl GreetingForm {
    /// Append a printable character.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.name.push(ch);
        self.error = None;
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.name.pop();
    }

    /// Trimmed name, or an inline error when blank.
    pub(crate) fn submit(&mut self) -> Option<String> {
        let name = self.name.trim();
        if name.is_empty() {
            self.error = Some("Please enter a name.".to_string());
            None
        } else {
            Some(name.to_string())
        }
    }
}

fn shift(current: usize, offset: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let max = len as isize - 1;
    (current as isize + offset).clamp(0, max) as usize
}
