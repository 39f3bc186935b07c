use std::collections::HashMap;

use log::warn;
use rand::{thread_rng, Rng};

use crate::context::{ClientHandle, Context};
use crate::decision::{DecideOption, Decision, Error};
use crate::schema::DecisionSchema;
use crate::table::FlagDecisionTable;
use crate::AttributeValue;

/// Records the trace of a capture sweep: the schema order of the table under
/// construction and every lookup key computed while the sweep ran.
///
/// A session is owned by the harness and passed into
/// [DecisionTableRegistry::decide_captured]; outside of a session, lookups are
/// pure. An external fixture flush consumes the session to persist a new or
/// refreshed table body. A session is intended for a sweep over a single flag's
/// table; sweeping several flags through one session overwrites the recorded
/// schema order with the latest table's.
#[derive(Debug, Default)]
pub struct CaptureSession {
    schemas: Vec<DecisionSchema>,
    lookup_keys: Vec<String>,
}

impl CaptureSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, schemas: &[DecisionSchema], lookup_key: String) {
        self.schemas = schemas.to_vec();
        self.lookup_keys.push(lookup_key);
    }

    /// The schema order of the most recently served table.
    pub fn schemas(&self) -> &[DecisionSchema] {
        &self.schemas
    }

    /// Every lookup key computed during the sweep, in call order. Append-only for
    /// the session's lifetime.
    pub fn lookup_keys(&self) -> &[String] {
        &self.lookup_keys
    }

    /// Consumes the session, yielding the recorded schema order and lookup keys
    /// for the fixture flush.
    pub fn into_trace(self) -> (Vec<DecisionSchema>, Vec<String>) {
        (self.schemas, self.lookup_keys)
    }
}

/// The registry maps flag keys to their decision tables and is the single entry
/// point for table lookups and synthetic context generation.
///
/// A registry is built once by an external fixture loader and is immutable
/// afterwards, so concurrent readers may share it freely. At most one table
/// exists per flag key.
#[derive(Debug)]
pub struct DecisionTableRegistry {
    tables: HashMap<String, FlagDecisionTable>,
}

impl DecisionTableRegistry {
    /// Build a registry from reconstructed tables, keyed by each table's flag
    /// key. A duplicate flag key replaces the earlier table.
    pub fn new<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = FlagDecisionTable>,
    {
        let mut map = HashMap::new();
        for table in tables {
            let key = table.key.clone();
            if map.insert(key.clone(), table).is_some() {
                warn!("replacing existing decision table for flag '{}'", key);
            }
        }
        Self { tables: map }
    }

    /// Computes the decision for a context and flag key.
    ///
    /// If no table is configured for the key, returns an error decision carrying
    /// [Error::ClientNotReady]; this is detectable through
    /// [Decision::has_failed] and is never surfaced as a panic or an `Err`.
    /// Otherwise delegates to the flag's table, where an unmatched lookup key is
    /// an ordinary absent-variation decision.
    pub fn decide(&self, context: &Context, flag_key: &str, options: &[DecideOption]) -> Decision {
        match self.tables.get(flag_key) {
            None => Decision::error_decision(flag_key, context.clone(), Error::ClientNotReady),
            Some(table) => table.decide(context, options),
        }
    }

    /// Computes the decision for a context and flag key, additionally recording
    /// the served table's schema order and the computed lookup key into the
    /// given capture session.
    ///
    /// This is the only side-effecting lookup, and the effect is confined to the
    /// caller-owned session. An unknown flag key records nothing.
    pub fn decide_captured(
        &self,
        context: &Context,
        flag_key: &str,
        options: &[DecideOption],
        session: &mut CaptureSession,
    ) -> Decision {
        match self.tables.get(flag_key) {
            None => Decision::error_decision(flag_key, context.clone(), Error::ClientNotReady),
            Some(table) => {
                let decision = table.decide(context, options);
                session.record(table.schemas(), decision.lookup_key.clone());
                decision
            }
        }
    }

    /// Synthesizes a context for conformance sweeps over the given flag.
    ///
    /// The identifier is a random integer in [10000, 99999); collisions are
    /// accepted rather than checked, so generated populations should stay small
    /// relative to that range. If the flag has a table, each audience schema
    /// contributes a representative attribute sample, merged in schema order;
    /// when two schemas expose the same attribute name the later sample wins and
    /// the overwrite is logged. The returned context is bound to `client`.
    pub fn random_context(&self, client: &ClientHandle, flag_key: &str) -> Context {
        let mut rng = thread_rng();
        let user_id = rng.gen_range(10000..99999).to_string();

        let mut attributes: HashMap<String, AttributeValue> = HashMap::new();
        if let Some(table) = self.tables.get(flag_key) {
            for schema in table.schemas() {
                if let Some((name, value)) = schema.random_attribute(&mut rng) {
                    if let Some(previous) = attributes.insert(name.to_string(), value) {
                        warn!(
                            "schemas for flag '{}' sampled attribute '{}' more than once; discarding earlier value {:?}",
                            flag_key, name, previous
                        );
                    }
                }
            }
        }

        Context::new(user_id, attributes, Some(client.clone()))
    }

    /// Retrieve the decision table for `flag_key`.
    pub fn table(&self, flag_key: &str) -> Option<&FlagDecisionTable> {
        self.tables.get(flag_key)
    }

    /// The flag keys with configured tables, in no particular order.
    pub fn flag_keys(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// The number of configured tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if no tables are configured.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
