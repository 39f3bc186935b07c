#![cfg(test)]

use crate::registry::DecisionTableRegistry;
use crate::table::FlagDecisionTable;

pub fn test_registry() -> DecisionTableRegistry {
    let tables: Vec<FlagDecisionTable> = vec![
        serde_json::from_str(
            r#"{
                "key": "countryFlag",
                "schemas": [
                    {"type": "audience", "attribute": "country", "values": ["US", "CA"]}
                ],
                "body": {
                    "US": "varA",
                    "CA": "varB"
                }
            }"#,
        )
        .unwrap(),
        serde_json::from_str(
            r#"{
                "key": "tieredFlag",
                "schemas": [
                    {"type": "audience", "attribute": "country", "values": ["US", "CA"]},
                    {"type": "audience", "attribute": "tier", "values": ["gold", "silver"]}
                ],
                "body": {
                    "USgold": "premium",
                    "USsilver": "standard",
                    "CAgold": "premium",
                    "CAsilver": "standard"
                }
            }"#,
        )
        .unwrap(),
        serde_json::from_str(
            r#"{
                "key": "staticFlag",
                "schemas": [],
                "body": {
                    "": "on"
                }
            }"#,
        )
        .unwrap(),
    ];

    DecisionTableRegistry::new(tables)
}
