//! Request assembly helpers shared by the service modules.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ClientResult;

/// Query parameters for one call. `version` is appended by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(Vec<(&'static str, String)>);

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn push(mut self, key: &'static str, value: impl ToString) -> Self {
        self.0.push((key, value.to_string()));
        self
    }

    /// Push only when `value` is set.
    #[must_use]
    pub fn push_opt<T: ToString>(self, key: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    #[must_use]
    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.0
    }
}

/// A JSON object body, built field by field from options getters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonBody(Map<String, Value>);

impl JsonBody {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: Serialize + ?Sized>(mut self, key: &str, value: &T) -> ClientResult<Self> {
        self.0.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Set only when `value` is present.
    pub fn set_opt<T: Serialize + ?Sized>(self, key: &str, value: Option<&T>) -> ClientResult<Self> {
        match value {
            Some(value) => self.set(key, value),
            None => Ok(self),
        }
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}
