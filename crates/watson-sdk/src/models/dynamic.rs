//! Forward-compatible property bags.
//!
//! A dynamic model keeps the fields the SDK knows about as typed struct
//! members and everything else in a flattened JSON map. Typed members are
//! decoded with [`lenient`], so a payload whose shape has drifted still
//! parses: the mismatching member becomes `None` and the rest of the object
//! is kept.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Deserialize into `Option<T>`, yielding `None` when the value has the wrong shape.
///
/// Use with `#[serde(default, deserialize_with = "lenient")]`.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(typed) => Ok(Some(typed)),
        Err(err) => {
            tracing::debug!(
                target_type = std::any::type_name::<T>(),
                error = %err,
                "Dropping property with unexpected shape"
            );
            Ok(None)
        }
    }
}

/// Like [`lenient`] for members that are not optional: a mismatch yields `T::default()`.
pub fn lenient_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

/// Like [`lenient`] for list members: a mismatch yields an empty list, and
/// list entries with the wrong shape are skipped one by one.
pub fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        if !value.is_null() {
            tracing::debug!(
                target_type = std::any::type_name::<T>(),
                "Expected a list, dropping property"
            );
        }
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(typed) => Some(typed),
            Err(err) => {
                tracing::debug!(
                    target_type = std::any::type_name::<T>(),
                    error = %err,
                    "Dropping list entry with unexpected shape"
                );
                None
            }
        })
        .collect())
}

/// String-keyed access to the properties a model does not type.
///
/// `get` and friends see only the extra properties; fields the model
/// exposes as struct members are read through those members.
pub trait DynamicModel {
    /// The untyped properties.
    fn properties(&self) -> &Map<String, Value>;

    /// Mutable access to the untyped properties.
    fn properties_mut(&mut self) -> &mut Map<String, Value>;

    /// Raw stored value.
    fn get(&self, key: &str) -> Option<&Value> {
        self.properties().get(key)
    }

    /// Stored value converted to `T`, or `None` if absent or shaped differently.
    fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Store a property, returning the previous value.
    fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.properties_mut().insert(key.into(), value.into())
    }

    /// Remove a property, returning its value.
    fn remove(&mut self, key: &str) -> Option<Value> {
        self.properties_mut().remove(key)
    }

    fn contains_key(&self, key: &str) -> bool {
        self.properties().contains_key(key)
    }

    /// Keys of the untyped properties, in no particular order.
    fn property_names(&self) -> Vec<&str> {
        self.properties().keys().map(String::as_str).collect()
    }
}

/// Implement [`DynamicModel`] for a struct with a `properties` map field.
macro_rules! dynamic_model {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::models::DynamicModel for $ty {
                fn properties(&self) -> &serde_json::Map<String, serde_json::Value> {
                    &self.properties
                }

                fn properties_mut(&mut self) -> &mut serde_json::Map<String, serde_json::Value> {
                    &mut self.properties
                }
            }

            impl $ty {
                /// Add an extra property, builder style.
                #[must_use]
                pub fn add(
                    mut self,
                    key: impl Into<String>,
                    value: impl Into<serde_json::Value>,
                ) -> Self {
                    self.properties.insert(key.into(), value.into());
                    self
                }
            }
        )+
    };
}

pub(crate) use dynamic_model;
