use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::AttributeValue;

/// An opaque handle naming the client instance a [Context] is bound to.
///
/// Conformance harnesses run several independently implemented clients of the same
/// flagging protocol side by side; a handle records which of them a synthetic
/// context was generated for. The engine never inspects the handle beyond
/// carrying it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClientHandle(String);

impl ClientHandle {
    /// Create a handle with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the handle's name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Context is the user description consumed by decision-table lookups: an
/// identifier plus a map of attributes that schemas derive classification
/// tokens from.
///
/// Contexts are immutable once built. To construct one, use [crate::ContextBuilder].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Context {
    key: String,
    #[serde(default)]
    attributes: HashMap<String, AttributeValue>,
    // The client binding is a process-local association, not fixture data.
    #[serde(skip)]
    client: Option<ClientHandle>,
}

impl Context {
    pub(crate) fn new(
        key: String,
        attributes: HashMap<String, AttributeValue>,
        client: Option<ClientHandle>,
    ) -> Self {
        Self {
            key,
            attributes,
            client,
        }
    }

    /// Returns the context's identifier.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Looks up the value of the named attribute, if set.
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Returns the names of all attributes set on the context, in no particular order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Returns the handle of the client this context is bound to, if any.
    pub fn client(&self) -> Option<&ClientHandle> {
        self.client.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContextBuilder;
    use spectral::prelude::*;

    #[test]
    fn attribute_lookup() {
        let mut builder = ContextBuilder::new("user-1");
        builder.set_string("country", "US");
        let context = builder.build().unwrap();

        assert_that!(context.key()).is_equal_to("user-1");
        assert_that!(context.attribute("country"))
            .contains_value(&AttributeValue::String("US".to_string()));
        assert_that!(context.attribute("tier")).is_none();
        assert_that!(context.client()).is_none();
    }

    #[test]
    fn client_binding_is_not_serialized() {
        let mut builder = ContextBuilder::new("user-1");
        builder.client(ClientHandle::new("rust-client"));
        let context = builder.build().unwrap();
        assert_that!(context.client().unwrap().name()).is_equal_to("rust-client");

        let json = serde_json::to_value(&context).unwrap();
        assert!(json.get("client").is_none());

        let restored: Context = serde_json::from_value(json).unwrap();
        assert_that!(restored.client()).is_none();
        assert_that!(restored.key()).is_equal_to("user-1");
    }
}
