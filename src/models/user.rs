//! The authenticated user.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque description of the authenticated user, as supplied by the broker.
///
/// The shape is broker-defined, so the fields stay behind accessors: a `User`
/// is frozen on arrival and never mutated, though the session's reference to
/// it may be replaced or cleared.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct User(Value);

impl User {
    /// Wrap a broker-supplied JSON object
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Look up a top-level field by name
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// The underlying JSON value
    #[must_use]
    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_transparently_and_exposes_fields() {
        let user: User = serde_json::from_value(json!({"email": "a@b.c", "name": "A"})).unwrap();
        assert_eq!(user.get("email"), Some(&json!("a@b.c")));
        assert_eq!(user.get("missing"), None);
    }
}
