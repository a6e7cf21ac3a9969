use crate::{property, MsgError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A one-way data message: a name, a property tree and an opaque buffer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Data {
    #[serde(default)]
    name: String,
    #[serde(default)]
    properties: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    buf: Vec<u8>,
}

impl Data {
    /// Creates a named data message with no properties.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets a top-level property.
    #[must_use]
    pub fn with_property(mut self, key: &str, value: Value) -> Self {
        property::insert(&mut self.properties, key, value);
        self
    }

    /// Attaches a raw buffer.
    #[must_use]
    pub fn with_buf(mut self, buf: Vec<u8>) -> Self {
        self.buf = buf;
        self
    }

    /// Returns the data name.
    ///
    /// # Errors
    ///
    /// [`MsgError::MissingName`] when the name is empty.
    pub fn name(&self) -> Result<&str, MsgError> {
        if self.name.is_empty() {
            Err(MsgError::MissingName)
        } else {
            Ok(&self.name)
        }
    }

    /// Returns the property at a dotted `path`.
    ///
    /// # Errors
    ///
    /// [`MsgError::PropertyNotFound`] when nothing lives at `path`.
    pub fn property(&self, path: &str) -> Result<&Value, MsgError> {
        property::lookup(&self.properties, path)
    }

    /// Serializes the property subtree at `path` to JSON.
    ///
    /// # Errors
    ///
    /// See [`property`](Self::property).
    pub fn properties_json(&self, path: &str) -> Result<String, MsgError> {
        property::to_json(&self.properties, path)
    }

    /// Returns the raw buffer.
    #[must_use]
    pub fn buf(&self) -> &[u8] {
        &self.buf
    }
}
