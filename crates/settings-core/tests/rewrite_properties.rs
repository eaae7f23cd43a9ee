//! Property tests for the legacy-key rewrite pipeline

use proptest::prelude::*;
use serde_json::Value;
use settings_core::ConfigDocument;
use settings_core::config::rewrite::{self, is_truthy};

const KEYS: &[&str] = &[
    "visitTimeout",
    "commandTimeout",
    "supportFolder",
    "pageLoadTimeout",
    "defaultCommandTimeout",
    "supportFile",
    "baseUrl",
    "projectId",
];

const LEGACY_KEYS: &[&str] = &["visitTimeout", "commandTimeout", "supportFolder"];

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-5i64..5000).prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::from),
    ]
}

fn flat_document() -> impl Strategy<Value = ConfigDocument> {
    prop::collection::btree_map(prop::sample::select(KEYS), leaf(), 0..6).prop_map(|entries| {
        let mut doc = ConfigDocument::new();
        for (key, value) in entries {
            doc.insert(key, value);
        }
        doc
    })
}

/// Flat documents, optionally wrapped in `cypress` objects several levels deep.
fn document() -> impl Strategy<Value = ConfigDocument> {
    flat_document().prop_recursive(4, 16, 1, |inner| {
        (flat_document(), inner).prop_map(|(mut outer, wrapped)| {
            outer.insert("cypress", Value::from(wrapped));
            outer
        })
    })
}

proptest! {
    #[test]
    fn rewrite_is_idempotent(doc in document()) {
        let once = rewrite::apply(&doc);
        let twice = rewrite::apply(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn no_truthy_legacy_key_survives(doc in document()) {
        let migrated = rewrite::apply(&doc);

        prop_assert!(!migrated.get("cypress").is_some_and(Value::is_object));
        for key in LEGACY_KEYS {
            prop_assert!(!migrated.get(key).is_some_and(is_truthy), "{} survived", key);
        }
    }

    #[test]
    fn rules_fire_only_on_change(doc in flat_document()) {
        let migration = rewrite::migrate(&doc);
        prop_assert_eq!(migration.applied.is_empty(), migration.document == doc);
    }
}
