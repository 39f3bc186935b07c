use std::fmt;

use serde::Serialize;

use crate::Context;

/// Options accepted by the decide operations.
///
/// These mirror the decide surface of the live evaluation path so that a harness
/// can substitute a table lookup for a real client call without changing its
/// call sites. Table lookups accept them and ignore them: every option governs a
/// collaborator (event dispatch, variable resolution, user profiles) that sits
/// outside this engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecideOption {
    /// Do not dispatch a decision event for this call.
    DisableDecisionEvent,
    /// Only return decisions for enabled flags.
    EnabledFlagsOnly,
    /// Bypass any stored user profile when bucketing.
    IgnoreUserProfileService,
    /// Skip resolving per-variation variable values.
    ExcludeVariables,
    /// Populate the decision's reasons with evaluation details.
    IncludeReasons,
}

/// Error is carried by a [Decision] when a flag could not be resolved against the
/// registry, and provides information about why.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Error {
    /// ClientNotReady indicates that the caller asked for a flag key that has no
    /// decision table configured, i.e. the registry is unready or unconfigured
    /// for that flag.
    ClientNotReady,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ClientNotReady => {
                write!(f, "client not ready: no decision table is configured for this flag")
            }
        }
    }
}

/// A Decision describes which variation (if any) a context received for a flag,
/// with the metadata a conformance harness needs to compare it against a golden
/// result.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    /// The resolved variation key, or None if the lookup key did not match any
    /// entry in the table body.
    pub variation_key: Option<String>,
    /// Whether the flag is considered active. Table lookups do not evaluate
    /// flag-activation semantics; this is true on every lookup path.
    pub enabled: bool,
    /// Per-variation variable values. Variable resolution is not performed by
    /// table lookups, so this is an empty JSON object on that path.
    pub variables: serde_json::Value,
    /// The concatenated-token key the table was indexed with. Surfaced for
    /// diagnostics and fixture regeneration.
    pub lookup_key: String,
    /// The key of the flag the decision is for.
    pub flag_key: String,
    /// The context the decision was computed for.
    pub user_context: Context,
    /// Messages describing how the decision was reached. Empty on the lookup
    /// path.
    pub reasons: Vec<String>,
    /// The classification carried by an error decision. Callers branch on this to
    /// distinguish an unresolved flag from a legitimately absent variation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Error>,
}

impl Decision {
    /// Constructs the decision returned when a flag cannot be resolved against
    /// the registry. It carries the supplied flag key and context, the error's
    /// classification, and a matching message in reasons; no exception path
    /// exists.
    pub fn error_decision(
        flag_key: impl Into<String>,
        user_context: Context,
        error: Error,
    ) -> Self {
        Self {
            variation_key: None,
            enabled: false,
            variables: serde_json::json!({}),
            lookup_key: String::new(),
            flag_key: flag_key.into(),
            user_context,
            reasons: vec![error.to_string()],
            error: Some(error),
        }
    }

    /// Returns true if this decision carries an error classification rather than
    /// a lookup result.
    pub fn has_failed(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContextBuilder;
    use assert_json_diff::assert_json_include;
    use serde_json::json;
    use spectral::prelude::*;

    #[test]
    fn error_decision_shape() {
        let context = ContextBuilder::new("user-1").build().unwrap();
        let decision = Decision::error_decision("missingFlag", context, Error::ClientNotReady);

        assert!(decision.has_failed());
        assert_that!(decision.error).contains_value(Error::ClientNotReady);
        assert_that!(decision.variation_key).is_none();
        assert!(!decision.enabled);
        assert_that!(decision.flag_key).is_equal_to("missingFlag".to_string());
        assert_that!(decision.lookup_key).is_equal_to(String::new());
        assert_that!(decision.reasons).has_length(1);
    }

    #[test]
    fn lookup_decision_serializes_with_stable_shape() {
        let registry = crate::test_common::test_registry();
        let mut builder = ContextBuilder::new("user-1");
        builder.set_string("country", "US");
        let context = builder.build().unwrap();

        let decision = registry.decide(&context, "countryFlag", &[]);
        assert_json_include!(
            actual: serde_json::to_value(&decision).unwrap(),
            expected: json!({
                "variationKey": "varA",
                "enabled": true,
                "variables": {},
                "lookupKey": "US",
                "flagKey": "countryFlag",
                "userContext": {"key": "user-1", "attributes": {"country": "US"}},
                "reasons": [],
            })
        );
    }

    #[test]
    fn error_decision_serializes_classification() {
        let context = ContextBuilder::new("user-1").build().unwrap();
        let decision = Decision::error_decision("missingFlag", context, Error::ClientNotReady);

        assert_json_include!(
            actual: serde_json::to_value(&decision).unwrap(),
            expected: json!({
                "variationKey": null,
                "enabled": false,
                "variables": {},
                "flagKey": "missingFlag",
                "error": "CLIENT_NOT_READY",
            })
        );
    }
}
