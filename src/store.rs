//! The topic state machine.

use crate::config::TopicsConfig;
use crate::error::{Result, TopicError};
use crate::types::{Stage, TopicId, TopicTable};
use crate::variables::VariableStore;
use tracing::{debug, info, trace, warn};

/// Per-topic stage tracking backed by a single host variable.
///
/// Every query and mutation reads the whole table from the variable
/// store, and every mutation writes the whole table back. Mutating
/// calls initialize the table first when it is missing; read-only
/// calls never do.
///
/// Topic IDs outside `1..=total_topics` are rejected with
/// [`TopicError::InvalidTopicId`] before anything is read or written.
pub struct TopicStateStore<V> {
    /// Store configuration.
    config: TopicsConfig,

    /// Host variables holding the table.
    variables: V,
}

impl<V: VariableStore> TopicStateStore<V> {
    /// Create a store over the given host variables.
    pub fn new(config: TopicsConfig, variables: V) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, variables })
    }

    /// Configuration the store was created with.
    pub fn config(&self) -> &TopicsConfig {
        &self.config
    }

    /// Host variables the table is kept in.
    pub fn variables(&self) -> &V {
        &self.variables
    }

    /// Whether the storage variable holds an initialized table.
    pub fn is_initialized(&self) -> bool {
        debug!(slot = %self.config.storage_slot, "Checking topics initialization");
        self.variables
            .read(self.config.storage_slot)
            .is_some_and(|value| TopicTable::is_table_value(&value))
    }

    /// Initialize the table if needed and return it.
    ///
    /// An already initialized table is returned unchanged, including any
    /// non-integer elements it holds.
    pub fn initialize(&self) -> Result<TopicTable> {
        if let Some(table) = self.load() {
            trace!("Topics already initialized");
            return Ok(table);
        }

        let table = TopicTable::new(self.config.total_topics, self.config.starting_value);
        self.save(&table);
        info!(
            slot = %self.config.storage_slot,
            topics = self.config.total_topics,
            starting = self.config.starting_value,
            "Initialized gossip topics"
        );
        Ok(table)
    }

    /// Whether a topic is currently at exactly `expected`.
    ///
    /// Returns false on an uninitialized table without initializing it.
    /// A non-integer stage for this topic is reported as corruption.
    pub fn can_discuss(&self, topic: TopicId, expected: Stage) -> Result<bool> {
        Ok(self.stage(topic)? == Some(expected))
    }

    /// Mark a topic as known.
    ///
    /// Only an unknown (negative) stage is moved to `known_value`; a topic
    /// that has already progressed is left alone. Returns whether the
    /// stage changed. A non-integer stage counts as unknown and is repaired.
    pub fn add_topic(&self, topic: TopicId) -> Result<bool> {
        self.check_topic(topic)?;
        let mut table = self.initialize()?;
        self.check_slot(&table, topic)?;

        match table.stage(topic) {
            Some(current) if current >= 0 => {
                trace!(%topic, stage = current, "Topic already known");
                return Ok(false);
            }
            Some(current) => {
                debug!(%topic, from = current, to = self.config.known_value, "Added gossip topic")
            }
            None => warn!(%topic, "Repairing non-integer topic stage"),
        }

        table.set_stage(topic, self.config.known_value);
        self.save(&table);
        Ok(true)
    }

    /// Set a topic's stage unconditionally.
    ///
    /// `stage` may be above or below the current one; moving to a negative
    /// stage makes the topic eligible for [`add_topic`](Self::add_topic) again.
    /// Overwriting a non-integer stage repairs it.
    pub fn discuss(&self, topic: TopicId, stage: Stage) -> Result<()> {
        self.check_topic(topic)?;
        debug!(%topic, stage, "Discussing gossip topic");
        let mut table = self.initialize()?;
        self.check_slot(&table, topic)?;
        if table.stage(topic).is_none() {
            warn!(%topic, "Repairing non-integer topic stage");
        }

        table.set_stage(topic, stage);
        self.save(&table);
        Ok(())
    }

    /// Current stage of a topic, or `None` on an uninitialized table.
    pub fn stage(&self, topic: TopicId) -> Result<Option<Stage>> {
        self.check_topic(topic)?;
        let Some(table) = self.load() else {
            return Ok(None);
        };
        self.check_slot(&table, topic)?;
        table.checked_stage(topic).map(Some).map_err(|e| {
            warn!(%topic, "Non-integer topic stage");
            e
        })
    }

    /// Whether a topic is known (stage zero or above).
    pub fn is_known(&self, topic: TopicId) -> Result<bool> {
        Ok(self.stage(topic)?.is_some_and(|stage| stage >= 0))
    }

    /// The persisted table, or `None` if uninitialized.
    pub fn table(&self) -> Option<TopicTable> {
        self.load()
    }

    fn check_topic(&self, topic: TopicId) -> Result<()> {
        if topic.0 == 0 || topic.0 > self.config.total_topics {
            return Err(TopicError::InvalidTopicId {
                topic,
                total: self.config.total_topics,
            });
        }
        Ok(())
    }

    fn check_slot(&self, table: &TopicTable, topic: TopicId) -> Result<()> {
        if topic.0 as usize <= table.len() {
            return Ok(());
        }
        warn!(
            %topic,
            persisted = table.len(),
            configured = self.config.total_topics,
            "Topic table shorter than configured"
        );
        Err(TopicError::Corruption(format!(
            "Topic {} missing from persisted table of {} topics (configured {})",
            topic,
            table.len(),
            self.config.total_topics
        )))
    }

    fn load(&self) -> Option<TopicTable> {
        let value = self.variables.read(self.config.storage_slot)?;
        TopicTable::from_value(&value)
    }

    fn save(&self, table: &TopicTable) {
        self.variables
            .write(self.config.storage_slot, table.to_value());
    }
}
