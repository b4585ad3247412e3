//! Screen graph: the closed set of routes plus the back stack that moves the
//! user between them.

mod navigator;
mod route;

use thiserror::Error;

pub use navigator::Navigator;
pub use route::{build_concrete, placeholders, Destination, Route, RouteArgs};

/// Navigation contract violations. These are programming errors in the caller,
/// so the host surfaces them loudly instead of navigating nowhere.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("unknown route `{0}`")]
    UnknownRoute(String),
    #[error("route `{template}` requires argument `{argument}`")]
    MissingArgument { template: String, argument: String },
    #[error("navigator has not been started")]
    NotStarted,
    #[error("navigator was already started")]
    AlreadyStarted,
}

/// Returned by [`Navigator::go_back`] when only the root entry is left. This
/// is a boundary the host decides how to handle, typically by exiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot go back from the first screen")]
pub struct BackStackUnderflow;
