//! Core types for topic tracking.

use crate::error::{Result, TopicError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Marker stored at index 0 of an initialized topic table.
pub const TOPICS_SENTINEL: &str = "HRK_GTH_Init";

/// Progress marker for a topic. Negative means unknown.
pub type Stage = i64;

/// Identifier of a dialogue topic. Valid IDs start at 1.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(pub u32);

impl fmt::Debug for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TopicId({})", self.0)
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Address of a host variable.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableId(pub u32);

impl fmt::Debug for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VariableId({})", self.0)
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed view of the persisted topic array.
///
/// On the host side the table is a plain array whose first element is
/// [`TOPICS_SENTINEL`] and whose element `i` is the stage of topic `i`.
/// Here the sentinel is implicit and `slots[i - 1]` holds topic `i`.
///
/// An element that is not an integer is kept as-is and only affects its
/// own topic; writing a stage to it repairs it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicTable {
    slots: Vec<StageSlot>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum StageSlot {
    Stage(Stage),
    /// Non-integer element found in a persisted table.
    Invalid(Value),
}

impl TopicTable {
    /// Create a table of `total` topics, all at `starting`.
    pub fn new(total: u32, starting: Stage) -> Self {
        Self {
            slots: vec![StageSlot::Stage(starting); total as usize],
        }
    }

    /// Number of topics held (excluding the sentinel slot).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot(&self, topic: TopicId) -> Option<&StageSlot> {
        let index = (topic.0 as usize).checked_sub(1)?;
        self.slots.get(index)
    }

    /// Stage of a topic, or `None` if its slot is missing or not an integer.
    pub fn stage(&self, topic: TopicId) -> Option<Stage> {
        match self.slot(topic)? {
            StageSlot::Stage(stage) => Some(*stage),
            StageSlot::Invalid(_) => None,
        }
    }

    /// Stage of a topic, reporting a missing or non-integer slot as corruption.
    pub fn checked_stage(&self, topic: TopicId) -> Result<Stage> {
        match self.slot(topic) {
            Some(StageSlot::Stage(stage)) => Ok(*stage),
            Some(StageSlot::Invalid(value)) => Err(TopicError::Corruption(format!(
                "Topic {} holds non-integer stage {}",
                topic, value
            ))),
            None => Err(TopicError::Corruption(format!(
                "Topic {} missing from persisted table of {} topics",
                topic,
                self.slots.len()
            ))),
        }
    }

    /// Set the stage of a topic. Returns false if the table has no slot for it.
    pub fn set_stage(&mut self, topic: TopicId, stage: Stage) -> bool {
        let Some(index) = (topic.0 as usize).checked_sub(1) else {
            return false;
        };
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = StageSlot::Stage(stage);
                true
            }
            None => false,
        }
    }

    /// Iterate `(topic, stage)` pairs in ID order, skipping non-integer slots.
    pub fn iter(&self) -> impl Iterator<Item = (TopicId, Stage)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| match slot {
                StageSlot::Stage(stage) => Some((TopicId(i as u32 + 1), *stage)),
                StageSlot::Invalid(_) => None,
            })
    }

    /// Topics whose persisted element is not an integer.
    pub fn invalid_topics(&self) -> impl Iterator<Item = TopicId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| matches!(slot, StageSlot::Invalid(_)))
            .map(|(i, _)| TopicId(i as u32 + 1))
    }

    /// Host representation: `[sentinel, stage_1, ..., stage_N]`.
    ///
    /// Non-integer elements are written back unchanged.
    pub fn to_value(&self) -> Value {
        let mut arr = Vec::with_capacity(self.slots.len() + 1);
        arr.push(Value::String(TOPICS_SENTINEL.to_string()));
        arr.extend(self.slots.iter().map(|slot| match slot {
            StageSlot::Stage(stage) => Value::from(*stage),
            StageSlot::Invalid(value) => value.clone(),
        }));
        Value::Array(arr)
    }

    /// Whether a host value carries the initialization sentinel.
    pub fn is_table_value(value: &Value) -> bool {
        matches!(
            value.as_array().and_then(|arr| arr.first()),
            Some(Value::String(tag)) if tag == TOPICS_SENTINEL
        )
    }

    /// Parse a host value.
    ///
    /// Anything without the sentinel is an uninitialized slot (`None`).
    pub fn from_value(value: &Value) -> Option<Self> {
        if !Self::is_table_value(value) {
            return None;
        }
        let arr = value.as_array()?;

        let slots = arr[1..]
            .iter()
            .map(|v| match v.as_i64() {
                Some(stage) => StageSlot::Stage(stage),
                None => StageSlot::Invalid(v.clone()),
            })
            .collect();

        Some(Self { slots })
    }
}
