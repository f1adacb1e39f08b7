//! Plugin command dispatch.
//!
//! The host offers every plugin command to a chain of handlers. Each
//! handler sees every command and decides for itself whether it is one
//! of its own; [`CommandRouter`] keeps the chain explicit instead of
//! wrapping one handler function inside another.

use crate::error::Result;
use crate::store::TopicStateStore;
use crate::variables::VariableStore;
use std::sync::Arc;
use tracing::{debug, trace};

/// A named handler for host plugin commands.
pub trait CommandHandler {
    /// Handler name for diagnostics.
    fn name(&self) -> &'static str;

    /// Handle a command. Returns `true` if the command was consumed.
    fn handle(&self, command: &str, args: &[&str]) -> Result<bool>;
}

/// Ordered chain of command handlers.
#[derive(Default)]
pub struct CommandRouter {
    handlers: Vec<Box<dyn CommandHandler>>,
}

impl CommandRouter {
    /// Create an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler to the end of the chain.
    pub fn register(&mut self, handler: Box<dyn CommandHandler>) {
        debug!(handler = handler.name(), "Registered command handler");
        self.handlers.push(handler);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, handler: Box<dyn CommandHandler>) -> Self {
        self.register(handler);
        self
    }

    /// Offer a command to every handler in registration order.
    ///
    /// Returns whether any handler consumed it. Stops at the first error.
    pub fn dispatch(&self, command: &str, args: &[&str]) -> Result<bool> {
        let mut handled = false;
        for handler in &self.handlers {
            if handler.handle(command, args)? {
                trace!(handler = handler.name(), command, "Command handled");
                handled = true;
            }
        }
        Ok(handled)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// `initializeTopics`: initialize the topic table.
pub struct InitializeTopicsCommand<V> {
    store: Arc<TopicStateStore<V>>,
}

impl<V> InitializeTopicsCommand<V> {
    /// Command name as typed in event scripts.
    pub const COMMAND: &'static str = "initializeTopics";

    /// Create the handler over a shared store.
    pub fn new(store: Arc<TopicStateStore<V>>) -> Self {
        Self { store }
    }
}

impl<V: VariableStore> CommandHandler for InitializeTopicsCommand<V> {
    fn name(&self) -> &'static str {
        "gossip_topics"
    }

    fn handle(&self, command: &str, _args: &[&str]) -> Result<bool> {
        if command != Self::COMMAND {
            return Ok(false);
        }
        self.store.initialize()?;
        Ok(true)
    }
}
