//! Per-field access over a JSON object.
//!
//! Each accessor fixes how its key is treated: `required` fails when absent,
//! `optional` yields `None`, `or_default` yields `T::default()`. In every case a
//! present value of the wrong shape fails. A `null` value counts as absent.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{GeminiError, Result};

pub(crate) struct Object<'a> {
    map: &'a Map<String, Value>,
    path: String,
}

impl<'a> Object<'a> {
    pub(crate) fn new(value: &'a Value, path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        match value.as_object() {
            Some(map) => Ok(Self { map, path }),
            None => Err(GeminiError::DataCorrupted {
                path,
                reason: format!("expected an object, found {}", kind(value)),
            }),
        }
    }

    pub(crate) fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn field_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    /// Key presence as written in the document, including explicit `null`.
    pub(crate) fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|value| !value.is_null())
    }

    pub(crate) fn keys(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }

    pub(crate) fn required<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        match self.get(key) {
            Some(value) => leaf(value, self.field_path(key)),
            None => Err(GeminiError::MissingField {
                path: self.field_path(key),
            }),
        }
    }

    pub(crate) fn optional<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get(key)
            .map(|value| leaf(value, self.field_path(key)))
            .transpose()
    }

    pub(crate) fn or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        Ok(self.optional(key)?.unwrap_or_default())
    }

    /// Decodes a present value with a custom decoder; absent yields `None`.
    pub(crate) fn optional_with<T>(
        &self,
        key: &str,
        decode: impl FnOnce(&'a Value, String) -> Result<T>,
    ) -> Result<Option<T>> {
        self.get(key)
            .map(|value| decode(value, self.field_path(key)))
            .transpose()
    }

    pub(crate) fn required_with<T>(
        &self,
        key: &str,
        decode: impl FnOnce(&'a Value, String) -> Result<T>,
    ) -> Result<T> {
        match self.get(key) {
            Some(value) => decode(value, self.field_path(key)),
            None => Err(GeminiError::MissingField {
                path: self.field_path(key),
            }),
        }
    }

    /// Decodes each element of an array field; absent yields `None`.
    pub(crate) fn optional_array_with<T>(
        &self,
        key: &str,
        mut decode: impl FnMut(&'a Value, String) -> Result<T>,
    ) -> Result<Option<Vec<T>>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let path = self.field_path(key);
        let Some(items) = value.as_array() else {
            return Err(GeminiError::DataCorrupted {
                path,
                reason: format!("expected an array, found {}", kind(value)),
            });
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| decode(item, format!("{}[{}]", path, i)))
            .collect::<Result<Vec<T>>>()
            .map(Some)
    }
}

pub(crate) fn leaf<T: DeserializeOwned>(value: &Value, path: String) -> Result<T> {
    T::deserialize(value).map_err(|source| GeminiError::InvalidField { path, source })
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_missing_and_invalid() {
        let value = json!({"endIndex": "thirteen"});
        let obj = Object::new(&value, "citation").unwrap();

        let missing = obj.required::<u32>("uri").unwrap_err();
        assert!(matches!(missing, GeminiError::MissingField { ref path } if path == "citation.uri"));

        let invalid = obj.required::<u32>("endIndex").unwrap_err();
        assert!(matches!(invalid, GeminiError::InvalidField { ref path, .. } if path == "citation.endIndex"));
    }

    #[test]
    fn test_or_default_absent_vs_wrong_type() {
        let value = json!({"present": 7, "wrong": "7", "null": null});
        let obj = Object::new(&value, "").unwrap();

        assert_eq!(obj.or_default::<u32>("present").unwrap(), 7);
        assert_eq!(obj.or_default::<u32>("absent").unwrap(), 0);
        assert_eq!(obj.or_default::<u32>("null").unwrap(), 0);
        assert!(obj.or_default::<u32>("wrong").is_err());
    }

    #[test]
    fn test_contains_counts_null() {
        let value = json!({"promptFeedback": null});
        let obj = Object::new(&value, "").unwrap();
        assert!(obj.contains("promptFeedback"));
        assert!(obj.get("promptFeedback").is_none());
    }

    #[test]
    fn test_non_object_rejected() {
        let value = json!([1, 2]);
        let err = Object::new(&value, "candidates[0]").err().unwrap();
        assert!(err.is_structural());
        assert_eq!(err.path(), Some("candidates[0]"));
    }

    #[test]
    fn test_array_element_paths() {
        let value = json!({"items": [1, "two"]});
        let obj = Object::new(&value, "root").unwrap();
        let err = obj
            .optional_array_with("items", |v, path| leaf::<u32>(v, path))
            .unwrap_err();
        assert_eq!(err.path(), Some("root.items[1]"));

        let scalar = json!({"items": 3});
        let obj = Object::new(&scalar, "root").unwrap();
        assert!(obj.optional_array_with("items", |v, p| leaf::<u32>(v, p)).is_err());
    }
}
