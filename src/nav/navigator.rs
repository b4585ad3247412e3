use tokio::sync::watch;
use tracing::debug;

use super::{BackStackUnderflow, Destination, NavError, Route, RouteArgs};

/// Owns the back stack. Every successful transition publishes the new top
/// entry to subscribers so the host can swap the visible screen.
///
/// The stack is only mutated from the UI loop; no locking is involved.
pub struct Navigator {
    stack: Vec<Destination>,
    publisher: watch::Sender<Option<Destination>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        let (publisher, _) = watch::channel(None);
        Self {
            stack: Vec::new(),
            publisher,
        }
    }

    /// Observe "current screen changed". The receiver starts out with the
    /// present top (or `None` before [`Navigator::start`]) marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<Option<Destination>> {
        self.publisher.subscribe()
    }

    /// Seed the stack with its root entry. Only valid once.
    pub fn start(&mut self, name: &str, args: &RouteArgs) -> Result<(), NavError> {
        if !self.stack.is_empty() {
            return Err(NavError::AlreadyStarted);
        }
        let destination = resolve(name, args)?;
        debug!(path = %destination, "navigator started");
        self.stack.push(destination);
        self.publish();
        Ok(())
    }

    /// Validate `name` and `args`, then push the resolved destination.
    pub fn navigate_to(&mut self, name: &str, args: &RouteArgs) -> Result<(), NavError> {
        if self.stack.is_empty() {
            return Err(NavError::NotStarted);
        }
        let destination = resolve(name, args)?;
        self.push(destination);
        Ok(())
    }

    /// Push a destination built with one of the typed constructors.
    pub fn navigate(&mut self, destination: Destination) -> Result<(), NavError> {
        if self.stack.is_empty() {
            return Err(NavError::NotStarted);
        }
        self.push(destination);
        Ok(())
    }

    /// Pop the top entry. With a single entry left the stack is untouched and
    /// the caller gets [`BackStackUnderflow`].
    pub fn go_back(&mut self) -> Result<(), BackStackUnderflow> {
        if self.stack.len() <= 1 {
            return Err(BackStackUnderflow);
        }
        if let Some(left) = self.stack.pop() {
            debug!(from = %left, depth = self.stack.len(), "navigated back");
        }
        self.publish();
        Ok(())
    }

    pub fn current(&self) -> Option<&Destination> {
        self.stack.last()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn push(&mut self, destination: Destination) {
        debug!(to = %destination, depth = self.stack.len() + 1, "navigated");
        self.stack.push(destination);
        self.publish();
    }

    fn publish(&self) {
        self.publisher.send_replace(self.stack.last().cloned());
    }
}

fn resolve(name: &str, args: &RouteArgs) -> Result<Destination, NavError> {
    let route = Route::from_name(name).ok_or_else(|| NavError::UnknownRoute(name.to_string()))?;
    Destination::resolve(route, args)
}
