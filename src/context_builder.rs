use std::collections::HashMap;

use log::warn;

use crate::context::{ClientHandle, Context};
use crate::AttributeValue;

/// Contains methods for building a [Context] with a specified key.
///
/// You may use these methods to set attributes and bind a client handle before
/// calling [ContextBuilder::build]. If you do not change any values, the defaults
/// for the [Context] are:
/// - its key is set to whatever value you passed to [ContextBuilder::new]
/// - it has no attributes
/// - it is not bound to any client.
pub struct ContextBuilder {
    key: String,
    attributes: HashMap<String, AttributeValue>,
    client: Option<ClientHandle>,
}

impl ContextBuilder {
    /// Create a new context builder with the provided key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            attributes: HashMap::new(),
            client: None,
        }
    }

    /// Sets the context's key. The provided key cannot be an empty string.
    pub fn key(&mut self, key: impl Into<String>) -> &mut Self {
        self.key = key.into();
        self
    }

    /// Binds the context to the given client handle.
    pub fn client(&mut self, client: ClientHandle) -> &mut Self {
        self.client = Some(client);
        self
    }

    /// Sets an attribute to a boolean value.
    ///
    /// This method is exactly equivalent to calling
    /// `self.set_value(attribute_name, AttributeValue::Bool(value))`.
    pub fn set_bool(&mut self, attribute_name: &str, value: bool) -> &mut Self {
        self.set_value(attribute_name, AttributeValue::Bool(value));
        self
    }

    /// Sets an attribute to a f64 numeric value.
    ///
    /// This method is exactly equivalent to calling
    /// `self.set_value(attribute_name, AttributeValue::Number(value))`.
    pub fn set_float(&mut self, attribute_name: &str, value: f64) -> &mut Self {
        self.set_value(attribute_name, AttributeValue::Number(value));
        self
    }

    /// Sets an attribute to a string value.
    ///
    /// This method is exactly equivalent to calling
    /// `self.set_value(attribute_name, AttributeValue::String(value.into()))`.
    pub fn set_string(&mut self, attribute_name: &str, value: impl Into<String>) -> &mut Self {
        self.set_value(attribute_name, AttributeValue::String(value.into()));
        self
    }

    /// Sets the value of any attribute for the context.
    ///
    /// A value of [AttributeValue::Null] is equivalent to removing any current
    /// value of the attribute: schemas treat an attribute with a null value as if
    /// the attribute did not exist.
    pub fn set_value(&mut self, attribute_name: &str, value: AttributeValue) -> &mut Self {
        let _ = self.try_set_value(attribute_name, value);
        self
    }

    /// Sets the value of any attribute for the context.
    ///
    /// This is the same as [ContextBuilder::set_value], except that it returns true
    /// for success, or false if the attribute name was empty.
    pub fn try_set_value(&mut self, attribute_name: &str, value: AttributeValue) -> bool {
        match (attribute_name, value) {
            ("", _) => {
                warn!("Provided attribute name is empty. Ignoring.");
                false
            }
            (_, AttributeValue::Null) => {
                self.attributes.remove(attribute_name);
                true
            }
            (_, value) => {
                self.attributes.insert(attribute_name.to_string(), value);
                true
            }
        }
    }

    /// Creates a context from the current builder's properties.
    ///
    /// The context is immutable and will not be affected by any subsequent actions
    /// on the builder.
    ///
    /// It is possible to specify invalid properties for a builder, such as an empty
    /// key. In those situations, an `Err` type will be returned.
    pub fn build(&self) -> Result<Context, String> {
        if self.key.is_empty() {
            return Err(String::from("key cannot be empty"));
        }

        Ok(Context::new(
            self.key.clone(),
            self.attributes.clone(),
            self.client.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spectral::prelude::*;

    #[test]
    fn build_rejects_empty_key() {
        let builder = ContextBuilder::new("");
        assert_that!(builder.build()).is_err();
    }

    #[test]
    fn empty_attribute_name_is_ignored() {
        let mut builder = ContextBuilder::new("user-1");
        assert!(!builder.try_set_value("", AttributeValue::Bool(true)));
        let context = builder.build().unwrap();
        assert_eq!(context.attribute_names().count(), 0);
    }

    #[test]
    fn null_removes_attribute() {
        let mut builder = ContextBuilder::new("user-1");
        builder.set_string("country", "US");
        builder.set_value("country", AttributeValue::Null);
        let context = builder.build().unwrap();
        assert_that!(context.attribute("country")).is_none();
    }

    #[test]
    fn typed_setters() {
        let mut builder = ContextBuilder::new("user-1");
        builder
            .set_string("country", "CA")
            .set_bool("beta", true)
            .set_float("age", 29.0);
        let context = builder.build().unwrap();

        assert_that!(context.attribute("country"))
            .contains_value(&AttributeValue::String("CA".to_string()));
        assert_that!(context.attribute("beta")).contains_value(&AttributeValue::Bool(true));
        assert_that!(context.attribute("age")).contains_value(&AttributeValue::Number(29.0));
    }

    #[test]
    fn builder_is_reusable_after_build() {
        let mut builder = ContextBuilder::new("user-1");
        builder.set_string("country", "US");
        let first = builder.build().unwrap();

        builder.key("user-2").set_string("country", "CA");
        let second = builder.build().unwrap();

        assert_that!(first.key()).is_equal_to("user-1");
        assert_that!(first.attribute("country"))
            .contains_value(&AttributeValue::String("US".to_string()));
        assert_that!(second.key()).is_equal_to("user-2");
        assert_that!(second.attribute("country"))
            .contains_value(&AttributeValue::String("CA".to_string()));
    }
}
