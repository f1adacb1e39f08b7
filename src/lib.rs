//! # Gossip Topics
//!
//! Tracks a small integer "stage" for every dialogue topic in a game,
//! persisted as one array inside a single host variable.
//!
//! ## Core Concepts
//!
//! - **Topic table**: `[sentinel, stage_1, ..., stage_N]` stored in one variable
//! - **Stages**: negative means unknown, zero or above means known/discussed
//! - **Auto-healing**: every mutating call initializes the table first if needed
//! - **Host surface**: a plugin command router and parsed script calls
//!
//! ## Example
//!
//! ```ignore
//! use gossip_topics::{MemoryVariables, TopicId, TopicStateStore, TopicsConfig};
//!
//! let store = TopicStateStore::new(TopicsConfig::default(), MemoryVariables::new())?;
//!
//! store.add_topic(TopicId(3))?;
//! assert!(store.can_discuss(TopicId(3), 0)?);
//!
//! store.discuss(TopicId(3), 2)?;
//! assert!(!store.can_discuss(TopicId(3), 0)?);
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod script;
pub mod store;
pub mod types;
pub mod variables;

// Re-exports
pub use commands::{CommandHandler, CommandRouter, InitializeTopicsCommand};
pub use config::TopicsConfig;
pub use error::{Result, TopicError};
pub use script::{ScriptCall, ScriptValue};
pub use store::TopicStateStore;
pub use types::*;
pub use variables::{MemoryVariables, VariableStore};
