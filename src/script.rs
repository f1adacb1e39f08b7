//! Script calls exposed to event and dialogue scripts.
//!
//! Scripts invoke topic operations by name, e.g. `this.discussTopic(3, 2);`
//! in an event command or `canDiscussTopic(3, 0)` in a conditional branch.

use crate::error::{Result, TopicError};
use crate::store::TopicStateStore;
use crate::types::{Stage, TopicId, TopicTable};
use crate::variables::VariableStore;
use std::str::FromStr;

/// A parsed script call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptCall {
    /// `topicsInitialized()`
    TopicsInitialized,
    /// `initializeGossipTopics()`
    InitializeGossipTopics,
    /// `canDiscussTopic(topic, stage)`
    CanDiscussTopic { topic: TopicId, stage: Stage },
    /// `addGossipTopic(topic)`
    AddGossipTopic { topic: TopicId },
    /// `discussTopic(topic, newStage)`
    DiscussTopic { topic: TopicId, stage: Stage },
}

/// Value a script call evaluates to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptValue {
    Bool(bool),
    Table(TopicTable),
    Unit,
}

impl ScriptCall {
    /// Function name as written in scripts.
    pub fn name(&self) -> &'static str {
        match self {
            ScriptCall::TopicsInitialized => "topicsInitialized",
            ScriptCall::InitializeGossipTopics => "initializeGossipTopics",
            ScriptCall::CanDiscussTopic { .. } => "canDiscussTopic",
            ScriptCall::AddGossipTopic { .. } => "addGossipTopic",
            ScriptCall::DiscussTopic { .. } => "discussTopic",
        }
    }

    /// Run the call against a store.
    pub fn execute<V: VariableStore>(&self, store: &TopicStateStore<V>) -> Result<ScriptValue> {
        match *self {
            ScriptCall::TopicsInitialized => Ok(ScriptValue::Bool(store.is_initialized())),
            ScriptCall::InitializeGossipTopics => store.initialize().map(ScriptValue::Table),
            ScriptCall::CanDiscussTopic { topic, stage } => {
                store.can_discuss(topic, stage).map(ScriptValue::Bool)
            }
            ScriptCall::AddGossipTopic { topic } => {
                store.add_topic(topic)?;
                Ok(ScriptValue::Unit)
            }
            ScriptCall::DiscussTopic { topic, stage } => {
                store.discuss(topic, stage)?;
                Ok(ScriptValue::Unit)
            }
        }
    }
}

impl FromStr for ScriptCall {
    type Err = TopicError;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        let text = text.strip_suffix(';').unwrap_or(text).trim_end();
        let text = text.strip_prefix("this.").unwrap_or(text);

        let (name, rest) = text
            .split_once('(')
            .ok_or_else(|| TopicError::Script(format!("missing argument list: {s:?}")))?;
        let inner = rest
            .strip_suffix(')')
            .ok_or_else(|| TopicError::Script(format!("unclosed argument list: {s:?}")))?;

        let args: Vec<i64> = if inner.trim().is_empty() {
            Vec::new()
        } else {
            inner
                .split(',')
                .map(|arg| {
                    let arg = arg.trim();
                    arg.parse()
                        .map_err(|_| TopicError::Script(format!("not an integer: {arg:?}")))
                })
                .collect::<Result<_>>()?
        };

        let name = name.trim();
        let call = match (name, args.as_slice()) {
            ("topicsInitialized", []) => ScriptCall::TopicsInitialized,
            ("initializeGossipTopics", []) => ScriptCall::InitializeGossipTopics,
            ("canDiscussTopic", &[topic, stage]) => ScriptCall::CanDiscussTopic {
                topic: topic_arg(topic)?,
                stage,
            },
            ("addGossipTopic", &[topic]) => ScriptCall::AddGossipTopic {
                topic: topic_arg(topic)?,
            },
            ("discussTopic", &[topic, stage]) => ScriptCall::DiscussTopic {
                topic: topic_arg(topic)?,
                stage,
            },
            (
                "topicsInitialized" | "initializeGossipTopics" | "canDiscussTopic"
                | "addGossipTopic" | "discussTopic",
                _,
            ) => {
                return Err(TopicError::Script(format!(
                    "wrong number of arguments to {name}: {}",
                    args.len()
                )))
            }
            _ => return Err(TopicError::Script(format!("unknown function: {name}"))),
        };
        Ok(call)
    }
}

fn topic_arg(raw: i64) -> Result<TopicId> {
    u32::try_from(raw)
        .map(TopicId)
        .map_err(|_| TopicError::Script(format!("topic ID out of range: {raw}")))
}
