use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{AttributeValue, Context};

/// A decision schema derives one classification token from a [Context].
///
/// A table applies its schemas in a fixed order and concatenates the tokens into
/// the lookup key indexing its body. Token derivation is deterministic and total:
/// every context yields a token, with a missing or un-encodable attribute
/// yielding the empty token.
///
/// Schema kinds are a closed set, resolved once at construction; fixture
/// descriptors reconstruct them through the internally tagged serde
/// representation (`"type": "audience"`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DecisionSchema {
    /// Classifies a context by the value of a single attribute referenced by the
    /// audiences of a flag.
    #[serde(rename_all = "camelCase")]
    Audience {
        /// The attribute the schema reads.
        attribute: String,
        /// Representative values for the attribute, carried by the fixture
        /// descriptor for synthetic context generation. Not consulted during
        /// token derivation.
        #[serde(default)]
        values: Vec<AttributeValue>,
    },
}

impl DecisionSchema {
    /// Create an audience schema over the named attribute with the given sample
    /// pool.
    pub fn audience(
        attribute: impl Into<String>,
        values: impl IntoIterator<Item = AttributeValue>,
    ) -> Self {
        DecisionSchema::Audience {
            attribute: attribute.into(),
            values: values.into_iter().collect(),
        }
    }

    /// Derive the classification token for the given context.
    pub fn token(&self, context: &Context) -> String {
        match self {
            DecisionSchema::Audience { attribute, .. } => match context.attribute(attribute) {
                Some(value) => value.as_token().unwrap_or_default(),
                None => String::new(),
            },
        }
    }

    /// Produce a representative (attribute name, sample value) pair for synthetic
    /// context generation, or None if the schema has no sample pool.
    ///
    /// Used only while generating contexts, never during lookup.
    pub fn random_attribute<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(&str, AttributeValue)> {
        match self {
            DecisionSchema::Audience { attribute, values } => {
                let value = values.choose(rng)?;
                Some((attribute.as_str(), value.clone()))
            }
        }
    }
}
