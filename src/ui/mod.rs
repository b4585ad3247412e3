//! Ratatui host for the storefront. The navigator decides which screen is
//! current; this layer renders it and turns key presses into navigation.

mod app;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
