//! Specification Extensions support for OpenAPI.
//!
//! Any object in a document may carry extra `x-` prefixed fields that tooling
//! is free to interpret.

use crate::error::OpenApiResult;
use crate::validation::Validate;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A map of extension fields that can be added to any OpenAPI object.
///
/// Extensions are patterned fields that are always prefixed by "x-".
/// The value can be null, a primitive, an array or an object.
///
/// Objects capture their unknown keys into this map through `#[serde(flatten)]`.
/// Keys that do not start with `x-` are dropped while decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Extensions(IndexMap<String, Value>);

impl Extensions {
    /// Create a new empty extensions map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an extension field
    ///
    /// # Panics
    ///
    /// Panics if `key` does not start with `x-`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        if !key.starts_with("x-") {
            panic!("Extension keys must start with 'x-': {}", key);
        }
        self.0.insert(key, value.into());
        self
    }

    /// Get an extension field value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Check if an extension field exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate over all extension key-value pairs in definition order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Check if extensions map is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of extensions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Builder pattern for adding extensions
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }
}

impl<'de> Deserialize<'de> for Extensions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut map = IndexMap::<String, Value>::deserialize(deserializer)?;
        map.retain(|key, _| key.starts_with("x-"));
        Ok(Self(map))
    }
}

impl Validate for Extensions {
    fn validate(&self) -> OpenApiResult<()> {
        for key in self.0.keys() {
            if !key.starts_with("x-") {
                return Err(crate::error::OpenApiError::validation(format!(
                    "Extension key must start with 'x-': {}",
                    key
                )));
            }

            if key.len() <= 2 {
                return Err(crate::error::OpenApiError::validation(format!(
                    "Extension key must have content after 'x-': {}",
                    key
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extensions_insert_and_get() {
        let ext = Extensions::new()
            .with("x-internal-id", "abc")
            .with("x-rate-limit", 100);

        assert_eq!(ext.len(), 2);
        assert_eq!(ext.get("x-internal-id"), Some(&json!("abc")));
        assert!(ext.contains_key("x-rate-limit"));
        assert!(ext.validate().is_ok());
    }

    #[test]
    #[should_panic(expected = "Extension keys must start with 'x-'")]
    fn test_extensions_reject_unprefixed_key() {
        Extensions::new().insert("internal-id", "abc");
    }

    #[test]
    fn test_extensions_keep_definition_order() {
        let ext = Extensions::new().with("x-b", 1).with("x-a", 2);
        let keys: Vec<&String> = ext.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["x-b", "x-a"]);
    }

    #[test]
    fn test_extensions_drop_unprefixed_keys_on_decode() {
        let ext: Extensions =
            serde_json::from_value(json!({"x-kept": true, "unknown": 1})).unwrap();

        assert_eq!(ext.len(), 1);
        assert_eq!(ext.get("x-kept"), Some(&json!(true)));
    }

    #[test]
    fn test_extensions_validation_requires_content() {
        let ext = Extensions::new().with("x-", 1);
        assert!(ext.validate().is_err());
    }
}
