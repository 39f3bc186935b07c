use std::collections::HashMap;

use itertools::Itertools;
use serde::Deserialize;

use crate::decision::{DecideOption, Decision};
use crate::schema::DecisionSchema;
use crate::Context;

/// A precomputed decision table for one flag: an ordered schema list plus a
/// mapping from concatenated-token lookup keys to variation keys.
///
/// The schema order is fixed at construction and must be identical to the order
/// in effect when the body was generated; otherwise the concatenation drifts and
/// lookups silently miscompute. The table does not validate this.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagDecisionTable {
    /// The key of the flag this table substitutes for.
    pub key: String,
    schemas: Vec<DecisionSchema>,
    body: HashMap<String, String>,
}

impl FlagDecisionTable {
    /// Create a table from its key, ordered schemas, and body. A lookup key
    /// absent from the body means "no variation".
    pub fn new(
        key: impl Into<String>,
        schemas: Vec<DecisionSchema>,
        body: HashMap<String, String>,
    ) -> Self {
        Self {
            key: key.into(),
            schemas,
            body,
        }
    }

    /// Computes the lookup key for a context: every schema's token, in table
    /// order, concatenated without a separator.
    ///
    /// The separator-free concatenation is inherited from the fixture format:
    /// distinct attribute combinations whose tokens happen to concatenate
    /// identically collide. Fixture builders are expected to emit fixed-width or
    /// self-delimiting tokens; the table does not validate encoding safety.
    pub fn lookup_key(&self, context: &Context) -> String {
        self.schemas
            .iter()
            .map(|schema| schema.token(context))
            .join("")
    }

    /// Computes the decision for a context by looking its lookup key up in the
    /// table body.
    ///
    /// A miss is not an error: it yields a decision with an absent variation.
    /// This path never evaluates flag-activation semantics (`enabled` is always
    /// true) and never resolves variable values.
    pub fn decide(&self, context: &Context, _options: &[DecideOption]) -> Decision {
        let lookup_key = self.lookup_key(context);
        let variation_key = self.body.get(&lookup_key).cloned();

        Decision {
            variation_key,
            enabled: true,
            variables: serde_json::json!({}),
            lookup_key,
            flag_key: self.key.clone(),
            user_context: context.clone(),
            reasons: Vec::new(),
            error: None,
        }
    }

    pub(crate) fn schemas(&self) -> &[DecisionSchema] {
        &self.schemas
    }
}
