//! Error handling and edge case tests.

use gossip_topics::{
    MemoryVariables, ScriptCall, TopicError, TopicId, TopicStateStore, TopicsConfig, VariableId,
    VariableStore,
};
use serde_json::json;

const SLOT: VariableId = VariableId(3);

fn test_store(total_topics: u32) -> TopicStateStore<MemoryVariables> {
    TopicStateStore::new(
        TopicsConfig {
            storage_slot: SLOT,
            total_topics,
            ..Default::default()
        },
        MemoryVariables::new(),
    )
    .unwrap()
}

// --- Topic IDs ---

#[test]
fn test_topic_zero_rejected() {
    let store = test_store(5);
    store.initialize().unwrap();

    let result = store.discuss(TopicId(0), 3);
    assert!(matches!(
        result,
        Err(TopicError::InvalidTopicId { topic: TopicId(0), total: 5 })
    ));

    // Sentinel survives.
    assert!(store.is_initialized());
    assert_eq!(
        store.variables().read(SLOT),
        Some(json!(["HRK_GTH_Init", -1, -1, -1, -1, -1]))
    );
}

#[test]
fn test_topic_beyond_total_rejected() {
    let store = test_store(5);

    assert!(matches!(
        store.add_topic(TopicId(6)),
        Err(TopicError::InvalidTopicId { .. })
    ));
    assert!(matches!(
        store.stage(TopicId(6)),
        Err(TopicError::InvalidTopicId { .. })
    ));
    assert!(!store.is_initialized());
}

#[test]
fn test_error_message() {
    let store = test_store(2);
    let err = store.add_topic(TopicId(9)).unwrap_err();
    assert_eq!(err.to_string(), "Invalid topic ID: 9 (valid range is 1..=2)");
}

#[test]
fn test_zero_topics() {
    let store = test_store(0);
    let table = store.initialize().unwrap();
    assert!(table.is_empty());
    assert_eq!(store.variables().read(SLOT), Some(json!(["HRK_GTH_Init"])));
    assert!(store.add_topic(TopicId(1)).is_err());
}

// --- Persisted Data ---

#[test]
fn test_corrupted_stage_reported_for_its_topic_only() {
    let store = test_store(3);
    store
        .variables()
        .write(SLOT, json!(["HRK_GTH_Init", 0, "x", -1]));

    assert!(store.is_initialized());
    assert!(matches!(
        store.can_discuss(TopicId(2), 0),
        Err(TopicError::Corruption(_))
    ));
    assert!(matches!(store.stage(TopicId(2)), Err(TopicError::Corruption(_))));

    // Other topics keep working.
    assert!(store.can_discuss(TopicId(1), 0).unwrap());
    assert!(store.add_topic(TopicId(3)).unwrap());
    store.discuss(TopicId(1), 5).unwrap();
    assert_eq!(
        store.variables().read(SLOT),
        Some(json!(["HRK_GTH_Init", 5, "x", 0]))
    );

    let table = store.initialize().unwrap();
    assert_eq!(table.invalid_topics().collect::<Vec<_>>(), vec![TopicId(2)]);
}

#[test]
fn test_discuss_repairs_corrupted_stage() {
    let store = test_store(3);
    store
        .variables()
        .write(SLOT, json!(["HRK_GTH_Init", 0, {"bad": true}, -1]));

    store.discuss(TopicId(2), 4).unwrap();
    assert!(store.can_discuss(TopicId(2), 4).unwrap());
    assert_eq!(
        store.variables().read(SLOT),
        Some(json!(["HRK_GTH_Init", 0, 4, -1]))
    );
    assert_eq!(store.table().unwrap().invalid_topics().count(), 0);
}

#[test]
fn test_longer_persisted_table_still_usable() {
    let store = test_store(2);
    store
        .variables()
        .write(SLOT, json!(["HRK_GTH_Init", 0, 1, 2, 3]));

    store.discuss(TopicId(2), 5).unwrap();
    assert_eq!(
        store.variables().read(SLOT),
        Some(json!(["HRK_GTH_Init", 0, 5, 2, 3]))
    );
}

#[test]
fn test_unrelated_data_in_slot_is_replaced_on_write() {
    let store = test_store(2);
    store.variables().write(SLOT, json!({"gold": 100}));

    assert!(!store.can_discuss(TopicId(1), -1).unwrap());
    store.add_topic(TopicId(1)).unwrap();
    assert_eq!(
        store.variables().read(SLOT),
        Some(json!(["HRK_GTH_Init", 0, -1]))
    );
}

// --- Configuration ---

#[test]
fn test_oversized_topic_count_rejected() {
    let result = TopicsConfig::from_parameters([("Total Topics", "4294967295")]);
    assert!(matches!(result, Err(TopicError::InvalidConfig(_))));

    let result = TopicStateStore::new(
        TopicsConfig {
            total_topics: TopicsConfig::MAX_TOPICS + 1,
            ..Default::default()
        },
        MemoryVariables::new(),
    );
    assert!(matches!(result, Err(TopicError::InvalidConfig(_))));
}

#[test]
fn test_invalid_config_rejected() {
    let result = TopicStateStore::new(
        TopicsConfig {
            known_value: -1,
            ..Default::default()
        },
        MemoryVariables::new(),
    );
    assert!(matches!(result, Err(TopicError::InvalidConfig(_))));
}

#[test]
fn test_script_with_bad_syntax() {
    let result = "discussTopic(1, two)".parse::<ScriptCall>();
    assert!(matches!(result, Err(TopicError::Script(_))));
}
